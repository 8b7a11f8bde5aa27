// src/presentation/http/controllers/clients.rs
use crate::application::{
    commands::clients::{DeleteClientCommand, RegisterClientCommand},
    dto::{ClientCredentialsDto, ClientDto},
    error::ApplicationError,
};
use crate::presentation::http::error::{HttpError, HttpResult, IntoHttpResult};
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json, body::Bytes, http::StatusCode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RegisterClientRequest {
    #[serde(default)]
    pub redirect_uris: Vec<String>,
    /// Space-delimited scopes the client may request.
    #[serde(default)]
    pub scope: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteClientRequest {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteClientResponse {
    pub client_id: String,
    pub revoked_tokens: u64,
    pub message: String,
}

/// The body is optional: an empty request registers a client with no
/// redirect URIs and no scopes.
#[utoipa::path(
    post,
    path = "/register",
    request_body(content = RegisterClientRequest, content_type = "application/json", description = "Optional; an empty body is accepted"),
    responses(
        (status = 201, description = "Client registered; the secret is shown only once", body = ClientCredentialsDto),
        (status = 400, description = "Invalid redirect URI or scope", body = crate::presentation::http::error::ErrorResponse)
    ),
    security([]),
    tag = "Clients"
)]
pub async fn register(
    Extension(state): Extension<HttpState>,
    body: Bytes,
) -> HttpResult<(StatusCode, Json<ClientCredentialsDto>)> {
    let payload = if body.iter().all(u8::is_ascii_whitespace) {
        RegisterClientRequest::default()
    } else {
        serde_json::from_slice::<RegisterClientRequest>(&body).map_err(|err| {
            HttpError::from_error(ApplicationError::validation(format!(
                "invalid registration body: {err}"
            )))
        })?
    };

    let command = RegisterClientCommand {
        redirect_uris: payload.redirect_uris,
        scope: payload.scope,
    };

    state
        .services
        .client_commands
        .register(command)
        .await
        .into_http()
        .map(|credentials| (StatusCode::CREATED, Json(credentials)))
}

#[utoipa::path(
    get,
    path = "/clients",
    responses(
        (status = 200, description = "Registered clients, oldest first", body = [ClientDto])
    ),
    security([]),
    tag = "Clients"
)]
pub async fn list_clients(
    Extension(state): Extension<HttpState>,
) -> HttpResult<Json<Vec<ClientDto>>> {
    state
        .services
        .client_queries
        .list_clients()
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    post,
    path = "/delete",
    request_body = DeleteClientRequest,
    responses(
        (status = 200, description = "Client deleted and its tokens revoked", body = DeleteClientResponse),
        (status = 401, description = "Unknown client", body = crate::presentation::http::error::ErrorResponse),
        (status = 403, description = "Wrong client secret", body = crate::presentation::http::error::ErrorResponse)
    ),
    security([]),
    tag = "Clients"
)]
pub async fn delete_client(
    Extension(state): Extension<HttpState>,
    Json(payload): Json<DeleteClientRequest>,
) -> HttpResult<Json<DeleteClientResponse>> {
    let client_id = payload.client_id.clone();
    let revoked_tokens = state
        .services
        .client_commands
        .delete(DeleteClientCommand {
            client_id: payload.client_id,
            client_secret: payload.client_secret,
        })
        .await
        .into_http()?;

    Ok(Json(DeleteClientResponse {
        client_id,
        revoked_tokens,
        message: "Client deleted successfully".into(),
    }))
}
