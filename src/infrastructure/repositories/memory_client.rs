// src/infrastructure/repositories/memory_client.rs
use crate::domain::client::{ClientId, ClientRegistry, NewClient, RegisteredClient};
use crate::domain::errors::{DomainError, DomainResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Registry used when no database is configured. Contents are lost on
/// restart.
#[derive(Default)]
pub struct InMemoryClientRegistry {
    clients: RwLock<HashMap<String, RegisteredClient>>,
}

impl InMemoryClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> DomainResult<RwLockReadGuard<'_, HashMap<String, RegisteredClient>>> {
        self.clients
            .read()
            .map_err(|_| DomainError::Persistence("client registry poisoned".into()))
    }

    fn write(&self) -> DomainResult<RwLockWriteGuard<'_, HashMap<String, RegisteredClient>>> {
        self.clients
            .write()
            .map_err(|_| DomainError::Persistence("client registry poisoned".into()))
    }
}

#[async_trait]
impl ClientRegistry for InMemoryClientRegistry {
    async fn insert(&self, new_client: NewClient) -> DomainResult<RegisteredClient> {
        let mut guard = self.write()?;
        match guard.entry(new_client.client_id.as_str().to_owned()) {
            Entry::Occupied(_) => Err(DomainError::Conflict("client_id already exists".into())),
            Entry::Vacant(slot) => Ok(slot.insert(RegisteredClient::from(new_client)).clone()),
        }
    }

    async fn find_by_id(&self, client_id: &ClientId) -> DomainResult<Option<RegisteredClient>> {
        Ok(self.read()?.get(client_id.as_str()).cloned())
    }

    async fn delete(&self, client_id: &ClientId) -> DomainResult<bool> {
        Ok(self.write()?.remove(client_id.as_str()).is_some())
    }

    async fn list(&self) -> DomainResult<Vec<RegisteredClient>> {
        let mut clients: Vec<_> = self.read()?.values().cloned().collect();
        clients.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.client_id.as_str().cmp(b.client_id.as_str()))
        });
        Ok(clients)
    }
}
