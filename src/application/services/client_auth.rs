// src/application/services/client_auth.rs
use crate::application::{
    ApplicationResult, error::ApplicationError, ports::security::PasswordHasher,
};
use crate::domain::client::{ClientId, ClientRegistry, RedirectUri, RegisteredClient};
use std::sync::Arc;

/// Client registry lookups and credential checks shared by every grant.
pub struct ClientAuthenticator {
    registry: Arc<dyn ClientRegistry>,
    password_hasher: Arc<dyn PasswordHasher>,
}

impl ClientAuthenticator {
    pub fn new(
        registry: Arc<dyn ClientRegistry>,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            registry,
            password_hasher,
        }
    }

    pub async fn is_registered(&self, client_id: &str) -> ApplicationResult<bool> {
        match self.find(client_id).await {
            Ok(_) => Ok(true),
            Err(ApplicationError::UnknownClient) => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub async fn verify_secret(&self, client_id: &str, secret: &str) -> ApplicationResult<bool> {
        match self.authenticate(client_id, secret).await {
            Ok(_) => Ok(true),
            Err(ApplicationError::UnknownClient | ApplicationError::InvalidClientSecret) => {
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    pub async fn redirect_urls(&self, client_id: &str) -> ApplicationResult<Vec<RedirectUri>> {
        Ok(self.find(client_id).await?.redirect_uris)
    }

    pub async fn find(&self, client_id: &str) -> ApplicationResult<RegisteredClient> {
        // A malformed id cannot belong to a registered client.
        let Ok(id) = ClientId::new(client_id) else {
            return Err(ApplicationError::UnknownClient);
        };

        self.registry
            .find_by_id(&id)
            .await?
            .ok_or(ApplicationError::UnknownClient)
    }

    /// Look the client up and check its secret against the stored argon2 hash.
    pub async fn authenticate(
        &self,
        client_id: &str,
        secret: &str,
    ) -> ApplicationResult<RegisteredClient> {
        let client = self.find(client_id).await.inspect_err(|err| {
            if matches!(err, ApplicationError::UnknownClient) {
                tracing::warn!(client_id, "client authentication failed: unknown client");
            }
        })?;

        match self
            .password_hasher
            .verify(secret, client.secret_hash.as_str())
            .await
        {
            Ok(()) => Ok(client),
            Err(ApplicationError::Unauthorized(_)) => {
                tracing::warn!(client_id, "client authentication failed: bad secret");
                Err(ApplicationError::InvalidClientSecret)
            }
            Err(err) => Err(err),
        }
    }
}
