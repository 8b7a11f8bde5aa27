// src/application/ports/authorization_code.rs
use crate::application::ApplicationResult;
use crate::domain::grant::AuthorizationCode;
use async_trait::async_trait;

/// Condition evaluated against the stored record inside the store's atomic
/// section.
pub type CodePredicate<'a> = &'a (dyn Fn(&AuthorizationCode) -> bool + Send + Sync);

#[async_trait]
pub trait AuthorizationCodeStore: Send + Sync {
    /// Persist a new record keyed by its code. Fails with
    /// `ApplicationError::Conflict` when the code is already live.
    async fn put(&self, record: AuthorizationCode) -> ApplicationResult<()>;

    async fn get(&self, code: &str) -> ApplicationResult<Option<AuthorizationCode>>;

    /// Atomically remove the record if it exists and `predicate` holds for it,
    /// returning the removed record. Of several concurrent callers at most one
    /// receives `Some`.
    async fn delete_if_match(
        &self,
        code: &str,
        predicate: CodePredicate<'_>,
    ) -> ApplicationResult<Option<AuthorizationCode>>;
}
