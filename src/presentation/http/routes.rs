// src/presentation/http/routes.rs
use crate::presentation::http::middleware::rate_limit::{RateLimitSettings, rate_limit_layer};
use crate::presentation::http::state::HttpState;
use crate::presentation::http::{
    controllers::{clients, oauth, session, tokens},
    openapi::{self, StatusResponse},
};
use axum::{
    Extension, Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    pub allowed_origins: Vec<String>,
    /// `None` disables rate limiting, which in-process tests need because
    /// they carry no peer address.
    pub rate_limit: Option<RateLimitSettings>,
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}

pub fn build_router(state: HttpState, options: RouterOptions) -> Router {
    // Endpoints that check credentials are the ones worth throttling.
    let mut credential_routes = Router::new()
        .route("/auth", get(oauth::authorize).post(oauth::authorize_with_login))
        .route("/token", post(oauth::token))
        .route("/login", post(session::login));

    if let Some(settings) = options.rate_limit {
        match rate_limit_layer(settings) {
            Some(layer) => credential_routes = credential_routes.layer(layer),
            None => tracing::warn!(?settings, "invalid rate limit settings, limiter disabled"),
        }
    }

    Router::new()
        .merge(openapi::docs_router())
        .merge(credential_routes)
        .route("/health", get(health))
        .route("/register", post(clients::register))
        .route("/clients", get(clients::list_clients))
        .route("/delete", post(clients::delete_client))
        .route("/validate", post(tokens::validate))
        .route("/logout", post(tokens::logout))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&options.allowed_origins))
        .layer(Extension(state))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health check.", body = crate::presentation::http::openapi::StatusResponse)
    ),
    security([]),
    tag = "System"
)]
pub async fn health() -> axum::Json<StatusResponse> {
    axum::Json(StatusResponse {
        status: "ok".into(),
    })
}
