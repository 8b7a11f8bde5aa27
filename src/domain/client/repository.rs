use crate::domain::client::{
    entity::{NewClient, RegisteredClient},
    value_objects::ClientId,
};
use crate::domain::errors::DomainResult;
use async_trait::async_trait;

#[async_trait]
pub trait ClientRegistry: Send + Sync {
    /// Fails with `DomainError::Conflict` when the client id is taken.
    async fn insert(&self, new_client: NewClient) -> DomainResult<RegisteredClient>;

    async fn find_by_id(&self, client_id: &ClientId) -> DomainResult<Option<RegisteredClient>>;

    /// Returns false when nothing was deleted.
    async fn delete(&self, client_id: &ClientId) -> DomainResult<bool>;

    async fn list(&self) -> DomainResult<Vec<RegisteredClient>>;
}
