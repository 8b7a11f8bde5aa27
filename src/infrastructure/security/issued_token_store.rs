// src/infrastructure/security/issued_token_store.rs
use crate::application::ports::issued_token::{IssuedTokenStore, TokenPredicate};
use crate::application::{ApplicationResult, error::ApplicationError};
use crate::domain::{client::ClientId, grant::IssuedToken};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
pub struct InMemoryIssuedTokenStore {
    inner: Mutex<HashMap<String, IssuedToken>>,
}

impl InMemoryIssuedTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> ApplicationResult<MutexGuard<'_, HashMap<String, IssuedToken>>> {
        self.inner
            .lock()
            .map_err(|_| ApplicationError::infrastructure("issued token store poisoned"))
    }
}

#[async_trait]
impl IssuedTokenStore for InMemoryIssuedTokenStore {
    /// Records already expired at the new token's `issued_at` are dropped on
    /// the way in.
    async fn save(&self, token: IssuedToken) -> ApplicationResult<()> {
        let mut guard = self.lock()?;
        let now = token.issued_at;
        guard.retain(|_, record| record.expires_at > now);
        guard.insert(token.token.clone(), token);
        Ok(())
    }

    async fn find(&self, token: &str) -> ApplicationResult<Option<IssuedToken>> {
        Ok(self.lock()?.get(token).cloned())
    }

    async fn take_if_match(
        &self,
        token: &str,
        predicate: TokenPredicate<'_>,
    ) -> ApplicationResult<Option<IssuedToken>> {
        let mut guard = self.lock()?;
        let matches = guard.get(token).is_some_and(|record| predicate(record));
        Ok(if matches { guard.remove(token) } else { None })
    }

    async fn revoke(&self, token: &str) -> ApplicationResult<bool> {
        Ok(self.lock()?.remove(token).is_some())
    }

    async fn revoke_for_client(&self, client_id: &ClientId) -> ApplicationResult<u64> {
        let mut guard = self.lock()?;
        let before = guard.len();
        guard.retain(|_, record| !record.belongs_to(client_id));
        Ok((before - guard.len()) as u64)
    }
}
