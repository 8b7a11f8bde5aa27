// src/presentation/http/controllers/session.rs
use crate::application::{commands::sessions::LoginCommand, dto::SessionDto};
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Resource owner session", body = SessionDto),
        (status = 400, description = "Missing username or password", body = crate::presentation::http::error::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::presentation::http::error::ErrorResponse)
    ),
    security([]),
    tag = "Session"
)]
pub async fn login(
    Extension(state): Extension<HttpState>,
    Json(payload): Json<LoginRequest>,
) -> HttpResult<Json<SessionDto>> {
    state
        .services
        .session_commands
        .login(LoginCommand {
            username: payload.username,
            password: payload.password,
        })
        .await
        .into_http()
        .map(Json)
}
