use crate::application::{ApplicationResult, dto::ResourceOwner};
use async_trait::async_trait;

#[async_trait]
pub trait ResourceOwnerDirectory: Send + Sync {
    /// Verify the owner's password. Unknown users and wrong passwords both
    /// fail with `ApplicationError::Unauthorized`.
    async fn authenticate(&self, username: &str, password: &str)
    -> ApplicationResult<ResourceOwner>;
}
