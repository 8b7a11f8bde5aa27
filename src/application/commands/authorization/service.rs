use crate::application::{
    ports::{
        authorization_code::AuthorizationCodeStore,
        security::SecretGenerator,
        time::Clock,
    },
    services::client_auth::ClientAuthenticator,
};
use chrono::Duration;
use std::sync::Arc;

/// 256 bits of entropy per code.
pub const AUTHORIZATION_CODE_BYTES: usize = 32;

pub(super) const MAX_ISSUE_ATTEMPTS: u32 = 3;

/// Issues authorization codes and redeems them exactly once.
pub struct AuthorizationCodeService {
    pub(super) clients: Arc<ClientAuthenticator>,
    pub(super) store: Arc<dyn AuthorizationCodeStore>,
    pub(super) secrets: Arc<dyn SecretGenerator>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) code_ttl: Duration,
}

impl AuthorizationCodeService {
    pub fn new(
        clients: Arc<ClientAuthenticator>,
        store: Arc<dyn AuthorizationCodeStore>,
        secrets: Arc<dyn SecretGenerator>,
        clock: Arc<dyn Clock>,
        code_ttl: Duration,
    ) -> Self {
        Self {
            clients,
            store,
            secrets,
            clock,
            code_ttl,
        }
    }
}
