// src/infrastructure/security/redis_authorization_code_store.rs
use crate::application::ports::authorization_code::{AuthorizationCodeStore, CodePredicate};
use crate::application::{ApplicationResult, error::ApplicationError};
use crate::domain::grant::AuthorizationCode;
use crate::infrastructure::redis_pool::{connection, create_pool, hashed_key, map_redis, ttl_millis};
use async_trait::async_trait;
use deadpool_redis::Pool;
use redis::AsyncCommands;

const KEY_PREFIX: &str = "authz_code";

// Deletes KEYS[1] only if it still holds exactly ARGV[1]. The predicate runs
// in Rust against that same snapshot, so a concurrent redeemer either sees
// the key gone or loses this comparison.
const COMPARE_AND_DELETE: &str = r#"
    local cur = redis.call('GET', KEYS[1])
    if cur == ARGV[1] then
        redis.call('DEL', KEYS[1])
        return 1
    else
        return 0
    end
"#;

/// Codes shared by every server instance pointing at the same Redis. Records
/// are JSON and carry a `PX` expiry equal to the code lifetime.
#[derive(Clone)]
pub struct RedisAuthorizationCodeStore {
    pool: Pool,
}

impl RedisAuthorizationCodeStore {
    pub fn from_url(url: &str) -> ApplicationResult<Self> {
        Ok(Self {
            pool: create_pool(url)?,
        })
    }

    pub fn from_pool(pool: Pool) -> Self {
        Self { pool }
    }
}

fn encode(record: &AuthorizationCode) -> ApplicationResult<String> {
    serde_json::to_string(record).map_err(|err| ApplicationError::infrastructure(err.to_string()))
}

fn decode(raw: &str) -> ApplicationResult<AuthorizationCode> {
    serde_json::from_str(raw).map_err(|err| ApplicationError::infrastructure(err.to_string()))
}

#[async_trait]
impl AuthorizationCodeStore for RedisAuthorizationCodeStore {
    async fn put(&self, record: AuthorizationCode) -> ApplicationResult<()> {
        let mut conn = connection(&self.pool).await?;

        let key = hashed_key(KEY_PREFIX, &record.code);
        let ttl = ttl_millis(record.issued_at, record.expires_at);
        let stored: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(encode(&record)?)
            .arg("NX")
            .arg("PX")
            .arg(ttl)
            .query_async(&mut conn)
            .await
            .map_err(map_redis)?;

        match stored {
            Some(_) => Ok(()),
            None => Err(ApplicationError::conflict(
                "authorization code already exists",
            )),
        }
    }

    async fn get(&self, code: &str) -> ApplicationResult<Option<AuthorizationCode>> {
        let mut conn = connection(&self.pool).await?;

        let raw: Option<String> = conn
            .get(hashed_key(KEY_PREFIX, code))
            .await
            .map_err(map_redis)?;
        raw.as_deref().map(decode).transpose()
    }

    async fn delete_if_match(
        &self,
        code: &str,
        predicate: CodePredicate<'_>,
    ) -> ApplicationResult<Option<AuthorizationCode>> {
        let mut conn = connection(&self.pool).await?;

        let key = hashed_key(KEY_PREFIX, code);
        let raw: Option<String> = conn.get(&key).await.map_err(map_redis)?;
        let Some(raw) = raw else {
            return Ok(None);
        };

        let record = decode(&raw)?;
        if !predicate(&record) {
            return Ok(None);
        }

        let deleted: i32 = redis::cmd("EVAL")
            .arg(COMPARE_AND_DELETE)
            .arg(1)
            .arg(&key)
            .arg(&raw)
            .query_async(&mut conn)
            .await
            .map_err(map_redis)?;

        Ok((deleted == 1).then_some(record))
    }
}
