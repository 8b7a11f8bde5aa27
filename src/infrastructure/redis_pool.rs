// src/infrastructure/redis_pool.rs
use crate::application::error::{ApplicationError, ApplicationResult};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use deadpool_redis::{Config as DeadpoolConfig, Connection, Pool, Runtime};
use sha2::{Digest, Sha256};

/// Create a pool from a redis URL (e.g. redis://:password@host:6379/0).
pub fn create_pool(url: &str) -> ApplicationResult<Pool> {
    DeadpoolConfig::from_url(url)
        .create_pool(Some(Runtime::Tokio1))
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))
}

pub async fn connection(pool: &Pool) -> ApplicationResult<Connection> {
    pool.get()
        .await
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))
}

pub fn map_redis(err: redis::RedisError) -> ApplicationError {
    ApplicationError::infrastructure(err.to_string())
}

/// Keys are derived from a digest so a dump of Redis does not hand out live
/// credentials.
pub fn hashed_key(prefix: &str, secret: &str) -> String {
    let digest = Sha256::digest(secret.as_bytes());
    format!("{prefix}:{}", URL_SAFE_NO_PAD.encode(digest))
}

/// Milliseconds until `expires_at`, at least 1 so `PX` accepts it.
pub fn ttl_millis(
    now: chrono::DateTime<chrono::Utc>,
    expires_at: chrono::DateTime<chrono::Utc>,
) -> i64 {
    (expires_at - now).num_milliseconds().max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn hashed_key_hides_secret() {
        let key = hashed_key("authz_code", "secret-code");
        assert!(key.starts_with("authz_code:"));
        assert!(!key.contains("secret-code"));
        assert_eq!(key, hashed_key("authz_code", "secret-code"));
    }

    #[test]
    fn ttl_never_drops_below_one_millisecond() {
        let now = Utc::now();
        assert_eq!(ttl_millis(now, now - Duration::seconds(5)), 1);
        assert_eq!(ttl_millis(now, now + Duration::seconds(2)), 2000);
    }
}
