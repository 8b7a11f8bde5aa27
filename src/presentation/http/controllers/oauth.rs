// src/presentation/http/controllers/oauth.rs
use crate::application::{
    commands::{authorization::IssueCodeCommand, tokens::ExchangeTokenCommand},
    dto::{AuthorizationRedirect, TokenResponseDto},
};
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::{MaybeBasicClient, SessionOwner};
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Form, Json,
    extract::Query,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AuthorizeParams {
    /// Must be `code`.
    pub response_type: Option<String>,
    pub client_id: Option<String>,
    /// Must exactly match one of the client's registered URIs.
    pub redirect_uri: Option<String>,
    /// Space-delimited; defaults to every scope the client was registered with.
    pub scope: Option<String>,
    /// Echoed back on the redirect.
    pub state: Option<String>,
    pub code_challenge: Option<String>,
    /// `plain` (default) or `S256`.
    pub code_challenge_method: Option<String>,
}

impl From<AuthorizeParams> for IssueCodeCommand {
    fn from(params: AuthorizeParams) -> Self {
        Self {
            response_type: params.response_type,
            client_id: params.client_id,
            redirect_uri: params.redirect_uri,
            scope: params.scope,
            state: params.state,
            code_challenge: params.code_challenge,
            code_challenge_method: params.code_challenge_method,
        }
    }
}

/// Login form posted back to the authorization endpoint.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AuthorizeForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub response_type: Option<String>,
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub scope: Option<String>,
    pub state: Option<String>,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<String>,
}

impl AuthorizeForm {
    fn into_parts(self) -> (String, String, IssueCodeCommand) {
        let command = IssueCodeCommand {
            response_type: self.response_type,
            client_id: self.client_id,
            redirect_uri: self.redirect_uri,
            scope: self.scope,
            state: self.state,
            code_challenge: self.code_challenge,
            code_challenge_method: self.code_challenge_method,
        };
        (self.username, self.password, command)
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TokenRequest {
    pub grant_type: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub code: Option<String>,
    pub redirect_uri: Option<String>,
    pub code_verifier: Option<String>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
}

fn found(redirect: AuthorizationRedirect) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, redirect.location)]).into_response()
}

#[utoipa::path(
    get,
    path = "/auth",
    params(AuthorizeParams),
    responses(
        (status = 302, description = "Redirect to the client with `code` and `state`."),
        (status = 400, description = "Invalid request", body = crate::presentation::http::error::ErrorResponse),
        (status = 401, description = "Missing session or unknown client", body = crate::presentation::http::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "OAuth2"
)]
pub async fn authorize(
    Extension(state): Extension<HttpState>,
    SessionOwner(owner): SessionOwner,
    Query(params): Query<AuthorizeParams>,
) -> HttpResult<Response> {
    state
        .services
        .authorization_codes
        .issue(&owner, params.into())
        .await
        .into_http()
        .map(found)
}

#[utoipa::path(
    post,
    path = "/auth",
    request_body(content = AuthorizeForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Redirect to the client with `code` and `state`."),
        (status = 400, description = "Invalid request", body = crate::presentation::http::error::ErrorResponse),
        (status = 401, description = "Bad credentials or unknown client", body = crate::presentation::http::error::ErrorResponse)
    ),
    security([]),
    tag = "OAuth2"
)]
pub async fn authorize_with_login(
    Extension(state): Extension<HttpState>,
    Form(form): Form<AuthorizeForm>,
) -> HttpResult<Response> {
    let (username, password, command) = form.into_parts();

    let owner = state
        .services
        .session_commands
        .authenticate_owner(&username, &password)
        .await
        .into_http()?;

    state
        .services
        .authorization_codes
        .issue(&owner, command)
        .await
        .into_http()
        .map(found)
}

/// Client credentials may come from the form or from HTTP Basic; the header
/// wins when both are present.
#[utoipa::path(
    post,
    path = "/token",
    request_body(content = TokenRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Tokens issued", body = TokenResponseDto),
        (status = 400, description = "invalid_request, invalid_grant, invalid_scope or unsupported_grant_type", body = crate::presentation::http::error::ErrorResponse),
        (status = 401, description = "Unknown client", body = crate::presentation::http::error::ErrorResponse),
        (status = 403, description = "Wrong client secret", body = crate::presentation::http::error::ErrorResponse)
    ),
    security([]),
    tag = "OAuth2"
)]
pub async fn token(
    Extension(state): Extension<HttpState>,
    MaybeBasicClient(basic): MaybeBasicClient,
    Form(form): Form<TokenRequest>,
) -> HttpResult<impl IntoResponse> {
    let (client_id, client_secret) = match basic {
        Some((id, secret)) => (Some(id), Some(secret)),
        None => (form.client_id, form.client_secret),
    };

    let command = ExchangeTokenCommand {
        grant_type: form.grant_type,
        client_id,
        client_secret,
        code: form.code,
        redirect_uri: form.redirect_uri,
        code_verifier: form.code_verifier,
        refresh_token: form.refresh_token,
        scope: form.scope,
    };

    let response = state
        .services
        .token_commands
        .exchange(command)
        .await
        .into_http()?;

    Ok((
        [
            (header::CACHE_CONTROL, "no-store"),
            (header::PRAGMA, "no-cache"),
        ],
        Json(response),
    ))
}
