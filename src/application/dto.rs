// src/application/dto.rs
use crate::domain::client::{ClientId, RegisteredClient, Scope};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Bearer token handed to an OAuth2 client.
    Access,
    /// Short-lived token proving a resource owner logged in.
    Session,
}

#[derive(Debug, Clone)]
pub struct TokenSubject {
    pub token_type: TokenType,
    pub client_id: Option<ClientId>,
    pub subject: Option<String>,
    pub scope: Scope,
}

impl TokenSubject {
    pub fn access(client_id: ClientId, subject: Option<String>, scope: Scope) -> Self {
        Self {
            token_type: TokenType::Access,
            client_id: Some(client_id),
            subject,
            scope,
        }
    }

    pub fn session(username: impl Into<String>) -> Self {
        Self {
            token_type: TokenType::Session,
            client_id: None,
            subject: Some(username.into()),
            scope: Scope::empty(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SignedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub expires_in: i64,
}

#[derive(Debug, Clone)]
pub struct VerifiedToken {
    pub token_type: TokenType,
    pub client_id: Option<String>,
    pub subject: Option<String>,
    pub scope: Scope,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceOwner {
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponseDto {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub scope: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClientCredentialsDto {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uris: Vec<String>,
    pub scope: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClientDto {
    pub client_id: String,
    pub redirect_uris: Vec<String>,
    pub scope: String,
    pub created_at: DateTime<Utc>,
}

impl From<RegisteredClient> for ClientDto {
    fn from(client: RegisteredClient) -> Self {
        Self {
            client_id: client.client_id.into(),
            redirect_uris: client
                .redirect_uris
                .iter()
                .map(|uri| uri.as_str().to_owned())
                .collect(),
            scope: client.scopes.to_string(),
            created_at: client.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenIntrospectionDto {
    pub active: bool,
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub scope: String,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionDto {
    pub session_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, Clone)]
pub struct AuthorizationRedirect {
    pub code: String,
    pub location: String,
}
