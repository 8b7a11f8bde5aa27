// src/presentation/http/extractors.rs
use crate::{
    application::{dto::ResourceOwner, error::ApplicationError},
    presentation::http::state::HttpState,
};
use axum::{Extension, extract::FromRequestParts, http::request::Parts};
use headers::{
    Authorization, HeaderMapExt,
    authorization::{Basic, Bearer},
};

use super::error::HttpError;

/// Resource owner proven by a session token in `Authorization: Bearer`.
#[derive(Debug, Clone)]
pub struct SessionOwner(pub ResourceOwner);

/// Raw bearer token, if the request carried one.
#[derive(Debug, Clone)]
pub struct MaybeBearer(pub Option<String>);

/// `client_secret_basic` credentials, if the request carried them.
#[derive(Debug, Clone)]
pub struct MaybeBasicClient(pub Option<(String, String)>);

async fn http_state<S: Send + Sync>(parts: &mut Parts, state: &S) -> Result<HttpState, HttpError> {
    let Extension(app_state) = Extension::<HttpState>::from_request_parts(parts, state)
        .await
        .map_err(|_| {
            HttpError::from_error(ApplicationError::infrastructure(
                "application state missing",
            ))
        })?;
    Ok(app_state)
}

impl<S> FromRequestParts<S> for SessionOwner
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = http_state(parts, state).await?;

        let header = parts
            .headers
            .typed_get::<Authorization<Bearer>>()
            .ok_or_else(|| {
                HttpError::from_error(ApplicationError::unauthorized(
                    "missing Authorization header",
                ))
            })?;

        let owner = app_state
            .services
            .session_commands
            .owner_from_session(header.token())
            .await
            .map_err(HttpError::from_error)?;

        Ok(Self(owner))
    }
}

impl<S> FromRequestParts<S> for MaybeBearer
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            parts
                .headers
                .typed_get::<Authorization<Bearer>>()
                .map(|header| header.token().to_owned()),
        ))
    }
}

impl<S> FromRequestParts<S> for MaybeBasicClient
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            parts
                .headers
                .typed_get::<Authorization<Basic>>()
                .map(|header| (header.username().to_owned(), header.password().to_owned())),
        ))
    }
}
