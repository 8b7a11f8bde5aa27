// src/config.rs
use chrono::Duration;
use std::env;
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    listen_addr: String,
    database_url: Option<String>,
    redis_url: Option<String>,
    jwt_secret: String,
    jwt_issuer: String,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
    auth_code_ttl: Duration,
    session_ttl: Duration,
    resource_owners: Vec<(String, String)>,
    allowed_origins: Vec<String>,
    token_rate_limit_per_second: u64,
    token_rate_limit_burst: u32,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

const MIN_JWT_SECRET_BYTES: usize = 32;
/// Upper bound for every configured lifetime: one year.
const MAX_TTL_SECONDS: i64 = 365 * 24 * 60 * 60;

fn default_listen_addr() -> String {
    "127.0.0.1:8080".into()
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".into()]
}

fn positive_seconds(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: i64,
) -> Result<Duration, ConfigError> {
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|secs| (1..=MAX_TTL_SECONDS).contains(secs))
        .and_then(Duration::try_seconds)
        .ok_or_else(|| {
            ConfigError::Invalid(format!(
                "{key} must be between 1 and {MAX_TTL_SECONDS} seconds, got {raw:?}"
            ))
        })
}

fn parse_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid(format!("{key} is not a valid number: {raw:?}"))),
    }
}

/// `alice:secret,bob:hunter2`. Passwords may contain `:`; usernames may not.
fn parse_resource_owners(raw: &str) -> Result<Vec<(String, String)>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once(':') {
            Some((user, pass)) if !user.is_empty() && !pass.is_empty() => {
                Ok((user.to_string(), pass.to_string()))
            }
            _ => Err(ConfigError::Invalid(format!(
                "RESOURCE_OWNERS entry must be user:password, got {entry:?}"
            ))),
        })
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Build configuration from environment variables, loading a `.env` file
    /// first when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let listen_addr = non_empty(lookup("LISTEN_ADDR")).unwrap_or_else(default_listen_addr);
        let database_url = non_empty(lookup("DATABASE_URL"));
        let redis_url = non_empty(lookup("REDIS_URL"));

        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(ConfigError::Invalid(format!(
                "JWT_SECRET must be at least {MIN_JWT_SECRET_BYTES} bytes"
            )));
        }
        let jwt_issuer = non_empty(lookup("JWT_ISSUER"))
            .unwrap_or_else(|| format!("http://{}", default_listen_addr()));

        let resource_owners = match lookup("RESOURCE_OWNERS") {
            Some(raw) => parse_resource_owners(&raw)?,
            None => Vec::new(),
        };

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect()
            })
            .unwrap_or_else(default_allowed_origins);

        let token_rate_limit_per_second =
            parse_number(&lookup, "TOKEN_RATE_LIMIT_PER_SECOND", 10u64)?;
        let token_rate_limit_burst = parse_number(&lookup, "TOKEN_RATE_LIMIT_BURST", 20u32)?;
        if token_rate_limit_per_second == 0 || token_rate_limit_burst == 0 {
            return Err(ConfigError::Invalid(
                "token rate limit values must be greater than zero".into(),
            ));
        }

        Ok(Self {
            listen_addr,
            database_url,
            redis_url,
            jwt_secret,
            jwt_issuer,
            access_token_ttl: positive_seconds(&lookup, "ACCESS_TOKEN_TTL_SECONDS", 3600)?,
            refresh_token_ttl: positive_seconds(&lookup, "REFRESH_TOKEN_TTL_SECONDS", 2_592_000)?,
            auth_code_ttl: positive_seconds(&lookup, "AUTH_CODE_TTL_SECONDS", 3600)?,
            session_ttl: positive_seconds(&lookup, "SESSION_TTL_SECONDS", 900)?,
            resource_owners,
            allowed_origins,
            token_rate_limit_per_second,
            token_rate_limit_burst,
        })
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    /// `None` selects the in-process client registry.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    /// `None` selects the in-process code and token stores.
    pub fn redis_url(&self) -> Option<&str> {
        self.redis_url.as_deref()
    }

    pub fn jwt_secret(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    pub fn jwt_issuer(&self) -> &str {
        &self.jwt_issuer
    }

    pub fn access_token_ttl(&self) -> Duration {
        self.access_token_ttl
    }

    pub fn refresh_token_ttl(&self) -> Duration {
        self.refresh_token_ttl
    }

    pub fn auth_code_ttl(&self) -> Duration {
        self.auth_code_ttl
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    pub fn resource_owners(&self) -> &[(String, String)] {
        &self.resource_owners
    }

    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }

    pub fn token_rate_limit_per_second(&self) -> u64 {
        self.token_rate_limit_per_second
    }

    pub fn token_rate_limit_burst(&self) -> u32 {
        self.token_rate_limit_burst
    }
}
