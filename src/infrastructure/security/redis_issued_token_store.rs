// src/infrastructure/security/redis_issued_token_store.rs
use crate::application::ports::issued_token::{IssuedTokenStore, TokenPredicate};
use crate::application::{ApplicationResult, error::ApplicationError};
use crate::domain::{client::ClientId, grant::IssuedToken};
use crate::infrastructure::redis_pool::{connection, create_pool, hashed_key, map_redis, ttl_millis};
use async_trait::async_trait;
use deadpool_redis::Pool;
use redis::AsyncCommands;

const KEY_PREFIX: &str = "issued_token";

pub fn client_index_key(client_id: &ClientId) -> String {
    format!("client_tokens:{}", client_id)
}

// KEYS[1] token key, KEYS[2] client index. ARGV: value, ttl ms, expiry ms,
// now ms. The index is a sorted set scored by expiry; members already past
// `now` are trimmed and the index lives as long as its latest member.
const SAVE_TOKEN: &str = r#"
    redis.call('SET', KEYS[1], ARGV[1], 'PX', ARGV[2])
    redis.call('ZREMRANGEBYSCORE', KEYS[2], '-inf', ARGV[4])
    redis.call('ZADD', KEYS[2], ARGV[3], KEYS[1])
    local last = redis.call('ZRANGE', KEYS[2], -1, -1, 'WITHSCORES')
    redis.call('PEXPIREAT', KEYS[2], math.floor(tonumber(last[2])) + 1000)
    return 1
"#;

// KEYS[1] token key, KEYS[2] client index. Removes the token only if it still
// holds ARGV[1].
const COMPARE_AND_TAKE: &str = r#"
    local cur = redis.call('GET', KEYS[1])
    if cur == ARGV[1] then
        redis.call('DEL', KEYS[1])
        redis.call('ZREM', KEYS[2], KEYS[1])
        return 1
    else
        return 0
    end
"#;

// Drops every token listed in the client's index together with the index.
// Returns how many token keys actually existed.
const REVOKE_CLIENT: &str = r#"
    local members = redis.call('ZRANGE', KEYS[1], 0, -1)
    local removed = 0
    for i=1,#members do
        removed = removed + redis.call('DEL', members[i])
    end
    redis.call('DEL', KEYS[1])
    return removed
"#;

/// Issued tokens keyed by a digest of the token value. Each client has an
/// index of its token keys so deleting the client can revoke them all in one
/// script call. Entries of tokens that expired naturally are trimmed on the
/// client's next `save`.
#[derive(Clone)]
pub struct RedisIssuedTokenStore {
    pool: Pool,
}

impl RedisIssuedTokenStore {
    pub fn from_url(url: &str) -> ApplicationResult<Self> {
        Ok(Self {
            pool: create_pool(url)?,
        })
    }

    pub fn from_pool(pool: Pool) -> Self {
        Self { pool }
    }
}

fn decode(raw: &str) -> ApplicationResult<IssuedToken> {
    serde_json::from_str(raw).map_err(|err| ApplicationError::infrastructure(err.to_string()))
}

#[async_trait]
impl IssuedTokenStore for RedisIssuedTokenStore {
    async fn save(&self, token: IssuedToken) -> ApplicationResult<()> {
        let mut conn = connection(&self.pool).await?;

        let key = hashed_key(KEY_PREFIX, &token.token);
        let index = client_index_key(&token.client_id);
        let raw = serde_json::to_string(&token)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        let ttl = ttl_millis(token.issued_at, token.expires_at);

        redis::cmd("EVAL")
            .arg(SAVE_TOKEN)
            .arg(2)
            .arg(&key)
            .arg(&index)
            .arg(raw)
            .arg(ttl)
            .arg(token.expires_at.timestamp_millis())
            .arg(token.issued_at.timestamp_millis())
            .query_async::<()>(&mut conn)
            .await
            .map_err(map_redis)?;
        Ok(())
    }

    async fn find(&self, token: &str) -> ApplicationResult<Option<IssuedToken>> {
        let mut conn = connection(&self.pool).await?;

        let raw: Option<String> = conn
            .get(hashed_key(KEY_PREFIX, token))
            .await
            .map_err(map_redis)?;
        raw.as_deref().map(decode).transpose()
    }

    async fn take_if_match(
        &self,
        token: &str,
        predicate: TokenPredicate<'_>,
    ) -> ApplicationResult<Option<IssuedToken>> {
        let mut conn = connection(&self.pool).await?;

        let key = hashed_key(KEY_PREFIX, token);
        let raw: Option<String> = conn.get(&key).await.map_err(map_redis)?;
        let Some(raw) = raw else {
            return Ok(None);
        };

        let record = decode(&raw)?;
        if !predicate(&record) {
            return Ok(None);
        }

        let taken: i32 = redis::cmd("EVAL")
            .arg(COMPARE_AND_TAKE)
            .arg(2)
            .arg(&key)
            .arg(client_index_key(&record.client_id))
            .arg(&raw)
            .query_async(&mut conn)
            .await
            .map_err(map_redis)?;

        Ok((taken == 1).then_some(record))
    }

    async fn revoke(&self, token: &str) -> ApplicationResult<bool> {
        self.take_if_match(token, &|_: &IssuedToken| true)
            .await
            .map(|taken| taken.is_some())
    }

    async fn revoke_for_client(&self, client_id: &ClientId) -> ApplicationResult<u64> {
        let mut conn = connection(&self.pool).await?;

        let removed: i64 = redis::cmd("EVAL")
            .arg(REVOKE_CLIENT)
            .arg(1)
            .arg(client_index_key(client_id))
            .query_async(&mut conn)
            .await
            .map_err(map_redis)?;

        Ok(removed.max(0) as u64)
    }
}
