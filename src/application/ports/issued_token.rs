// src/application/ports/issued_token.rs
use crate::application::ApplicationResult;
use crate::domain::{client::ClientId, grant::IssuedToken};
use async_trait::async_trait;

pub type TokenPredicate<'a> = &'a (dyn Fn(&IssuedToken) -> bool + Send + Sync);

#[async_trait]
pub trait IssuedTokenStore: Send + Sync {
    async fn save(&self, token: IssuedToken) -> ApplicationResult<()>;

    async fn find(&self, token: &str) -> ApplicationResult<Option<IssuedToken>>;

    /// Atomically remove and return the record when `predicate` holds.
    async fn take_if_match(
        &self,
        token: &str,
        predicate: TokenPredicate<'_>,
    ) -> ApplicationResult<Option<IssuedToken>>;

    /// Returns true if a record was removed.
    async fn revoke(&self, token: &str) -> ApplicationResult<bool>;

    /// Remove every token issued to `client_id`; returns how many were removed.
    async fn revoke_for_client(&self, client_id: &ClientId) -> ApplicationResult<u64>;
}
