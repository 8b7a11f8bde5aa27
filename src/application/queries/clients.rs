// src/application/queries/clients.rs
use crate::{
    application::{ApplicationResult, dto::ClientDto},
    domain::client::ClientRegistry,
};
use std::sync::Arc;

pub struct ClientQueryService {
    registry: Arc<dyn ClientRegistry>,
}

impl ClientQueryService {
    pub fn new(registry: Arc<dyn ClientRegistry>) -> Self {
        Self { registry }
    }

    /// Registered clients, without any secret material.
    pub async fn list_clients(&self) -> ApplicationResult<Vec<ClientDto>> {
        let mut clients = self.registry.list().await?;
        clients.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(clients.into_iter().map(ClientDto::from).collect())
    }
}
