use anyhow::Result;
use codegrant::application::{
    ports::{
        authorization_code::AuthorizationCodeStore,
        issued_token::IssuedTokenStore,
        resource_owner::ResourceOwnerDirectory,
        security::{PasswordHasher, SecretGenerator, TokenManager},
        time::Clock,
    },
    services::{ApplicationServices, GrantSettings, ServicePorts},
};
use codegrant::config::AppConfig;
use codegrant::domain::client::ClientRegistry;
use codegrant::infrastructure::{
    database, redis_pool,
    repositories::{InMemoryClientRegistry, PostgresClientRegistry},
    security::{
        authorization_code_store::InMemoryAuthorizationCodeStore,
        issued_token_store::InMemoryIssuedTokenStore, password::Argon2PasswordHasher,
        redis_authorization_code_store::RedisAuthorizationCodeStore,
        redis_issued_token_store::RedisIssuedTokenStore,
        resource_owners::InMemoryResourceOwnerDirectory, secrets::OsRngSecretGenerator,
        token::JwtTokenManager,
    },
    time::SystemClock,
};
use codegrant::presentation::http::{
    middleware::rate_limit::RateLimitSettings,
    routes::{RouterOptions, build_router},
    state::HttpState,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let password_hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher);
    let secrets: Arc<dyn SecretGenerator> = Arc::new(OsRngSecretGenerator);

    let client_registry: Arc<dyn ClientRegistry> = match config.database_url() {
        Some(url) => {
            let pool = database::init_pool(url).await?;
            database::run_migrations(&pool).await?;
            tracing::info!("client registry backed by postgres");
            Arc::new(PostgresClientRegistry::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, registered clients live in memory");
            Arc::new(InMemoryClientRegistry::new())
        }
    };

    let (authorization_codes, issued_tokens): (
        Arc<dyn AuthorizationCodeStore>,
        Arc<dyn IssuedTokenStore>,
    ) = match config.redis_url() {
        Some(url) => {
            let pool = redis_pool::create_pool(url)?;
            tracing::info!("code and token stores backed by redis");
            (
                Arc::new(RedisAuthorizationCodeStore::from_pool(pool.clone())),
                Arc::new(RedisIssuedTokenStore::from_pool(pool)),
            )
        }
        None => {
            tracing::warn!("REDIS_URL not set, codes and tokens live in memory");
            (
                Arc::new(InMemoryAuthorizationCodeStore::new()),
                Arc::new(InMemoryIssuedTokenStore::new()),
            )
        }
    };

    let directory = InMemoryResourceOwnerDirectory::from_credentials(
        config.resource_owners(),
        Arc::clone(&password_hasher),
    )
    .await?;
    if directory.is_empty() {
        tracing::warn!("RESOURCE_OWNERS is empty, nobody can log in to authorize clients");
    }
    let resource_owners: Arc<dyn ResourceOwnerDirectory> = Arc::new(directory);

    let token_manager: Arc<dyn TokenManager> = Arc::new(JwtTokenManager::new(
        config.jwt_secret(),
        config.jwt_issuer(),
        config.access_token_ttl(),
        config.session_ttl(),
        Arc::clone(&clock),
    )?);

    let services = Arc::new(ApplicationServices::new(
        ServicePorts {
            client_registry,
            authorization_codes,
            issued_tokens,
            resource_owners,
            password_hasher,
            token_manager,
            secrets,
            clock,
        },
        GrantSettings {
            code_ttl: config.auth_code_ttl(),
            refresh_token_ttl: config.refresh_token_ttl(),
        },
    ));

    let app = build_router(
        HttpState { services },
        RouterOptions {
            allowed_origins: config.allowed_origins().to_vec(),
            rate_limit: Some(RateLimitSettings {
                per_second: config.token_rate_limit_per_second(),
                burst: config.token_rate_limit_burst(),
            }),
        },
    );

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!("listening on {address}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info,sqlx=warn".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
