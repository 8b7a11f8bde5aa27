use crate::{
    application::{
        ports::{
            issued_token::IssuedTokenStore,
            security::{PasswordHasher, SecretGenerator},
            time::Clock,
        },
        services::client_auth::ClientAuthenticator,
    },
    domain::client::ClientRegistry,
};
use std::sync::Arc;

pub const CLIENT_ID_BYTES: usize = 16;
pub const CLIENT_SECRET_BYTES: usize = 32;

pub struct ClientCommandService {
    pub(super) registry: Arc<dyn ClientRegistry>,
    pub(super) clients: Arc<ClientAuthenticator>,
    pub(super) password_hasher: Arc<dyn PasswordHasher>,
    pub(super) secrets: Arc<dyn SecretGenerator>,
    pub(super) issued_tokens: Arc<dyn IssuedTokenStore>,
    pub(super) clock: Arc<dyn Clock>,
}

impl ClientCommandService {
    pub fn new(
        registry: Arc<dyn ClientRegistry>,
        clients: Arc<ClientAuthenticator>,
        password_hasher: Arc<dyn PasswordHasher>,
        secrets: Arc<dyn SecretGenerator>,
        issued_tokens: Arc<dyn IssuedTokenStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            clients,
            password_hasher,
            secrets,
            issued_tokens,
            clock,
        }
    }
}
