// src/application/services/mod.rs
pub mod client_auth;

use std::sync::Arc;

use crate::{
    application::{
        commands::{
            authorization::AuthorizationCodeService, clients::ClientCommandService,
            sessions::SessionCommandService, tokens::TokenCommandService,
        },
        ports::{
            authorization_code::AuthorizationCodeStore,
            issued_token::IssuedTokenStore,
            resource_owner::ResourceOwnerDirectory,
            security::{PasswordHasher, SecretGenerator, TokenManager},
            time::Clock,
        },
        queries::{clients::ClientQueryService, tokens::TokenQueryService},
    },
    domain::client::ClientRegistry,
};
use chrono::Duration;
use client_auth::ClientAuthenticator;

/// Lifetimes of the server-side grants. Access and session token lifetimes
/// belong to the `TokenManager`.
#[derive(Debug, Clone, Copy)]
pub struct GrantSettings {
    pub code_ttl: Duration,
    pub refresh_token_ttl: Duration,
}

impl Default for GrantSettings {
    fn default() -> Self {
        Self {
            code_ttl: Duration::seconds(3600),
            refresh_token_ttl: Duration::days(30),
        }
    }
}

/// Every port the services need, built once at startup.
pub struct ServicePorts {
    pub client_registry: Arc<dyn ClientRegistry>,
    pub authorization_codes: Arc<dyn AuthorizationCodeStore>,
    pub issued_tokens: Arc<dyn IssuedTokenStore>,
    pub resource_owners: Arc<dyn ResourceOwnerDirectory>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub token_manager: Arc<dyn TokenManager>,
    pub secrets: Arc<dyn SecretGenerator>,
    pub clock: Arc<dyn Clock>,
}

pub struct ApplicationServices {
    pub client_commands: Arc<ClientCommandService>,
    pub client_queries: Arc<ClientQueryService>,
    pub authorization_codes: Arc<AuthorizationCodeService>,
    pub token_commands: Arc<TokenCommandService>,
    pub token_queries: Arc<TokenQueryService>,
    pub session_commands: Arc<SessionCommandService>,
}

impl ApplicationServices {
    pub fn new(ports: ServicePorts, settings: GrantSettings) -> Self {
        let clients = Arc::new(ClientAuthenticator::new(
            Arc::clone(&ports.client_registry),
            Arc::clone(&ports.password_hasher),
        ));

        let client_commands = Arc::new(ClientCommandService::new(
            Arc::clone(&ports.client_registry),
            Arc::clone(&clients),
            Arc::clone(&ports.password_hasher),
            Arc::clone(&ports.secrets),
            Arc::clone(&ports.issued_tokens),
            Arc::clone(&ports.clock),
        ));
        let client_queries = Arc::new(ClientQueryService::new(Arc::clone(
            &ports.client_registry,
        )));

        let authorization_codes = Arc::new(AuthorizationCodeService::new(
            Arc::clone(&clients),
            Arc::clone(&ports.authorization_codes),
            Arc::clone(&ports.secrets),
            Arc::clone(&ports.clock),
            settings.code_ttl,
        ));

        let token_commands = Arc::new(TokenCommandService::new(
            Arc::clone(&authorization_codes),
            Arc::clone(&clients),
            Arc::clone(&ports.token_manager),
            Arc::clone(&ports.issued_tokens),
            Arc::clone(&ports.secrets),
            Arc::clone(&ports.clock),
            settings.refresh_token_ttl,
        ));
        let token_queries = Arc::new(TokenQueryService::new(
            Arc::clone(&ports.token_manager),
            Arc::clone(&ports.issued_tokens),
            Arc::clone(&ports.clock),
        ));

        let session_commands = Arc::new(SessionCommandService::new(
            Arc::clone(&ports.resource_owners),
            Arc::clone(&ports.token_manager),
        ));

        Self {
            client_commands,
            client_queries,
            authorization_codes,
            token_commands,
            token_queries,
            session_commands,
        }
    }
}
