// src/domain/client/entity.rs
use crate::domain::client::value_objects::{ClientId, ClientSecretHash, RedirectUri, Scope};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct RegisteredClient {
    pub client_id: ClientId,
    pub secret_hash: ClientSecretHash,
    pub redirect_uris: Vec<RedirectUri>,
    pub scopes: Scope,
    pub created_at: DateTime<Utc>,
}

impl RegisteredClient {
    pub fn allows_redirect(&self, redirect_uri: &RedirectUri) -> bool {
        self.redirect_uris.iter().any(|uri| uri == redirect_uri)
    }

    /// Scope granted for a request. No request means everything the client
    /// was registered with; a request outside that set is refused.
    pub fn resolve_scope(&self, requested: Option<Scope>) -> Option<Scope> {
        match requested {
            None => Some(self.scopes.clone()),
            Some(scope) if scope.is_empty() => Some(self.scopes.clone()),
            Some(scope) if scope.is_subset_of(&self.scopes) => Some(scope),
            Some(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewClient {
    pub client_id: ClientId,
    pub secret_hash: ClientSecretHash,
    pub redirect_uris: Vec<RedirectUri>,
    pub scopes: Scope,
    pub created_at: DateTime<Utc>,
}

impl From<NewClient> for RegisteredClient {
    fn from(value: NewClient) -> Self {
        Self {
            client_id: value.client_id,
            secret_hash: value.secret_hash,
            redirect_uris: value.redirect_uris,
            scopes: value.scopes,
            created_at: value.created_at,
        }
    }
}
