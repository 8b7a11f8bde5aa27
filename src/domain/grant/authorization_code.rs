// src/domain/grant/authorization_code.rs
use crate::domain::client::{ClientId, RedirectUri, Scope};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::grant::pkce::PkceChallenge;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A single-use authorization code record. The `code` itself is an opaque
/// random key; everything else lives server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationCode {
    pub code: String,
    pub client_id: ClientId,
    pub redirect_uri: RedirectUri,
    pub issued_to: String,
    pub scope: Scope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge: Option<PkceChallenge>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AuthorizationCode {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        code: String,
        client_id: ClientId,
        redirect_uri: RedirectUri,
        issued_to: String,
        scope: Scope,
        challenge: Option<PkceChallenge>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> DomainResult<Self> {
        if code.is_empty() {
            return Err(DomainError::Validation("authorization code cannot be empty".into()));
        }
        if ttl <= Duration::zero() {
            return Err(DomainError::Validation(
                "authorization code ttl must be positive".into(),
            ));
        }
        let expires_at = issued_at.checked_add_signed(ttl).ok_or_else(|| {
            DomainError::Validation("authorization code ttl is out of range".into())
        })?;

        Ok(Self {
            code,
            client_id,
            redirect_uri,
            issued_to,
            scope,
            challenge,
            issued_at,
            expires_at,
        })
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_bound_to(&self, client_id: &ClientId, redirect_uri: &RedirectUri) -> bool {
        &self.client_id == client_id && &self.redirect_uri == redirect_uri
    }
}
