// src/presentation/http/error.rs
use crate::application::{ApplicationResult, error::ApplicationError};
use crate::domain::errors::DomainError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// `error` carries the OAuth2 error code for OAuth failures and the HTTP
/// reason phrase otherwise.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    error: String,
    message: String,
}

impl HttpError {
    pub fn from_error(err: ApplicationError) -> Self {
        if let Some(code) = err.oauth_code() {
            let (status, message) = oauth_response(&err);
            tracing::warn!(%status, error = code, detail = %err, "oauth request rejected");
            return Self {
                status,
                error: code.to_string(),
                message,
            };
        }

        let (status, message) = match err {
            ApplicationError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApplicationError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApplicationError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApplicationError::Infrastructure(msg) => {
                tracing::error!(error = %msg, "infrastructure failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            ApplicationError::Domain(domain_err) => match domain_err {
                DomainError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
                DomainError::Conflict(msg) => (StatusCode::CONFLICT, msg),
                DomainError::Persistence(msg) => {
                    tracing::error!(error = %msg, "persistence failure");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal server error".to_string(),
                    )
                }
            },
            // Every OAuth kind returned early above.
            other => (StatusCode::BAD_REQUEST, other.to_string()),
        };

        if status.is_client_error() {
            tracing::warn!(%status, %message, "request rejected");
        }
        Self::new(status, message)
    }

    fn new(status: StatusCode, message: String) -> Self {
        Self {
            status,
            error: status.canonical_reason().unwrap_or("error").to_string(),
            message,
        }
    }
}

/// Fixed messages so a client cannot tell which check failed.
fn oauth_response(err: &ApplicationError) -> (StatusCode, String) {
    match err {
        ApplicationError::UnknownClient => (
            StatusCode::UNAUTHORIZED,
            "client authentication failed".into(),
        ),
        ApplicationError::InvalidClientSecret => (
            StatusCode::FORBIDDEN,
            "client authentication failed".into(),
        ),
        ApplicationError::InvalidGrant => (
            StatusCode::BAD_REQUEST,
            "the authorization grant is invalid, expired or already used".into(),
        ),
        ApplicationError::MissingParameter(name) => (
            StatusCode::BAD_REQUEST,
            format!("missing required parameter: {name}"),
        ),
        ApplicationError::InvalidRedirectUri => (
            StatusCode::BAD_REQUEST,
            "redirect_uri is not registered for this client".into(),
        ),
        ApplicationError::InvalidScope => (
            StatusCode::BAD_REQUEST,
            "requested scope is not allowed for this client".into(),
        ),
        ApplicationError::UnsupportedGrantType(_) => (
            StatusCode::BAD_REQUEST,
            "grant_type is not supported".into(),
        ),
        ApplicationError::UnsupportedResponseType(_) => (
            StatusCode::BAD_REQUEST,
            "response_type is not supported".into(),
        ),
        other => (StatusCode::BAD_REQUEST, other.to_string()),
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let payload = ErrorResponse {
            error: self.error,
            message: self.message,
        };
        (self.status, Json(payload)).into_response()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

pub type HttpResult<T> = Result<T, HttpError>;

pub trait IntoHttpResult<T> {
    fn into_http(self) -> HttpResult<T>;
}

impl<T> IntoHttpResult<T> for ApplicationResult<T> {
    fn into_http(self) -> HttpResult<T> {
        self.map_err(HttpError::from_error)
    }
}
