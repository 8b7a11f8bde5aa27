// src/application/error.rs
use crate::domain::errors::DomainError;
use thiserror::Error;

pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("infrastructure failure: {0}")]
    Infrastructure(String),

    #[error("client is not registered")]
    UnknownClient,

    #[error("client secret does not match")]
    InvalidClientSecret,

    /// Unknown, mismatched, expired or already used code or refresh token.
    #[error("invalid grant")]
    InvalidGrant,

    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("redirect_uri is not registered for this client")]
    InvalidRedirectUri,

    #[error("requested scope exceeds the client's scope")]
    InvalidScope,

    #[error("unsupported grant_type: {0}")]
    UnsupportedGrantType(String),

    #[error("unsupported response_type: {0}")]
    UnsupportedResponseType(String),
}

impl ApplicationError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn infrastructure(msg: impl Into<String>) -> Self {
        Self::Infrastructure(msg.into())
    }

    /// OAuth2 error code for kinds defined by RFC 6749, if any.
    pub fn oauth_code(&self) -> Option<&'static str> {
        match self {
            Self::UnknownClient | Self::InvalidClientSecret => Some("invalid_client"),
            Self::InvalidGrant => Some("invalid_grant"),
            Self::MissingParameter(_) | Self::InvalidRedirectUri => Some("invalid_request"),
            Self::InvalidScope => Some("invalid_scope"),
            Self::UnsupportedGrantType(_) => Some("unsupported_grant_type"),
            Self::UnsupportedResponseType(_) => Some("unsupported_response_type"),
            _ => None,
        }
    }
}
