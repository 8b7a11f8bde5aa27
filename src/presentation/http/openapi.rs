// src/presentation/http/openapi.rs
use axum::Router;
use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufWriter, path::Path};
use utoipa::openapi::{
    Components,
    security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa::{Modify, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::controllers::oauth::authorize,
        crate::presentation::http::controllers::oauth::authorize_with_login,
        crate::presentation::http::controllers::oauth::token,
        crate::presentation::http::controllers::clients::register,
        crate::presentation::http::controllers::clients::list_clients,
        crate::presentation::http::controllers::clients::delete_client,
        crate::presentation::http::controllers::tokens::validate,
        crate::presentation::http::controllers::tokens::logout,
        crate::presentation::http::controllers::session::login,
        super::routes::health
    ),
    components(
        schemas(
            StatusResponse,
            crate::presentation::http::error::ErrorResponse,
            crate::presentation::http::controllers::oauth::AuthorizeForm,
            crate::presentation::http::controllers::oauth::TokenRequest,
            crate::presentation::http::controllers::clients::RegisterClientRequest,
            crate::presentation::http::controllers::clients::DeleteClientRequest,
            crate::presentation::http::controllers::clients::DeleteClientResponse,
            crate::presentation::http::controllers::tokens::LogoutRequest,
            crate::presentation::http::controllers::session::LoginRequest,
            crate::application::dto::TokenResponseDto,
            crate::application::dto::ClientCredentialsDto,
            crate::application::dto::ClientDto,
            crate::application::dto::TokenIntrospectionDto,
            crate::application::dto::SessionDto
        )
    ),
    tags(
        (name = "OAuth2", description = "Authorization code issuance and token endpoint"),
        (name = "Clients", description = "Client registration and removal"),
        (name = "Tokens", description = "Access token validation and logout"),
        (name = "Session", description = "Resource owner login"),
        (name = "System", description = "System level endpoints")
    ),
    modifiers(&ApiDocCustomizer),
    info(
        title = "codegrant",
        description = "OAuth2 authorization code server",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

struct ApiDocCustomizer;

impl Modify for ApiDocCustomizer {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Components::default);
        let mut http = Http::new(HttpAuthScheme::Bearer);
        http.bearer_format = Some("JWT".into());
        components.add_security_scheme("bearerAuth", SecurityScheme::Http(http));
    }
}

/// Swagger UI at `/docs`, backed by the generated document.
pub fn docs_router() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url(OPENAPI_JSON_PATH, ApiDoc::openapi()))
}

pub fn write_openapi_snapshot(path: impl AsRef<Path>) -> std::io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &ApiDoc::openapi())?;
    Ok(())
}
