// src/infrastructure/security/resource_owners.rs
use crate::application::{
    dto::ResourceOwner,
    error::{ApplicationError, ApplicationResult},
    ports::{resource_owner::ResourceOwnerDirectory, security::PasswordHasher},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Fixed set of resource owners loaded at startup. Passwords are hashed once
/// on load and never kept in plain text.
pub struct InMemoryResourceOwnerDirectory {
    owners: HashMap<String, String>,
    /// Verified against when the username is unknown, so both paths cost one
    /// hash verification.
    decoy_hash: String,
    hasher: Arc<dyn PasswordHasher>,
}

const DECOY_PASSWORD: &str = "no-such-resource-owner";

impl InMemoryResourceOwnerDirectory {
    pub async fn from_credentials(
        credentials: &[(String, String)],
        hasher: Arc<dyn PasswordHasher>,
    ) -> ApplicationResult<Self> {
        let mut owners = HashMap::with_capacity(credentials.len());
        for (username, password) in credentials {
            if username.is_empty() || password.is_empty() {
                return Err(ApplicationError::validation(
                    "resource owner username and password must be non-empty",
                ));
            }
            let hash = hasher.hash(password).await?;
            owners.insert(username.clone(), hash);
        }

        let decoy_hash = hasher.hash(DECOY_PASSWORD).await?;

        Ok(Self {
            owners,
            decoy_hash,
            hasher,
        })
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

#[async_trait]
impl ResourceOwnerDirectory for InMemoryResourceOwnerDirectory {
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> ApplicationResult<ResourceOwner> {
        let Some(hash) = self.owners.get(username) else {
            let _ = self.hasher.verify(password, &self.decoy_hash).await;
            tracing::warn!(%username, "login for unknown resource owner");
            return Err(ApplicationError::unauthorized("invalid credentials"));
        };

        self.hasher.verify(password, hash).await.map_err(|err| {
            if matches!(err, ApplicationError::Unauthorized(_)) {
                tracing::warn!(%username, "login with wrong password");
            }
            err
        })?;

        Ok(ResourceOwner {
            username: username.to_owned(),
        })
    }
}
