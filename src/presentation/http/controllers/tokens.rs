// src/presentation/http/controllers/tokens.rs
use crate::application::{dto::TokenIntrospectionDto, error::ApplicationError};
use crate::presentation::http::error::{HttpError, HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::MaybeBearer;
use crate::presentation::http::openapi::StatusResponse;
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json, extract::Query};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ValidateParams {
    /// Used when no `Authorization: Bearer` header is sent.
    pub access_token: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LogoutRequest {
    #[serde(default)]
    pub access_token: String,
}

#[utoipa::path(
    post,
    path = "/validate",
    params(ValidateParams),
    responses(
        (status = 200, description = "Token is active", body = TokenIntrospectionDto),
        (status = 401, description = "Token is unknown, revoked, expired or forged", body = crate::presentation::http::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Tokens"
)]
pub async fn validate(
    Extension(state): Extension<HttpState>,
    MaybeBearer(bearer): MaybeBearer,
    Query(params): Query<ValidateParams>,
) -> HttpResult<Json<TokenIntrospectionDto>> {
    let token = bearer
        .or(params.access_token)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            HttpError::from_error(ApplicationError::unauthorized("missing access token"))
        })?;

    state
        .services
        .token_queries
        .validate(&token)
        .await
        .into_http()
        .map(Json)
}

/// Idempotent: logging out twice, or with an unknown token, still succeeds.
#[utoipa::path(
    post,
    path = "/logout",
    request_body = LogoutRequest,
    responses(
        (status = 200, description = "Token revoked", body = StatusResponse),
        (status = 400, description = "Missing access_token", body = crate::presentation::http::error::ErrorResponse)
    ),
    security([]),
    tag = "Tokens"
)]
pub async fn logout(
    Extension(state): Extension<HttpState>,
    Json(payload): Json<LogoutRequest>,
) -> HttpResult<Json<StatusResponse>> {
    state
        .services
        .token_commands
        .revoke(&payload.access_token)
        .await
        .into_http()?;

    Ok(Json(StatusResponse {
        status: "revoked".into(),
    }))
}
