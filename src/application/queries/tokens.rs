// src/application/queries/tokens.rs
use crate::{
    application::{
        ApplicationResult,
        dto::{TokenIntrospectionDto, TokenType},
        error::ApplicationError,
        ports::{issued_token::IssuedTokenStore, security::TokenManager, time::Clock},
    },
    domain::grant::TokenKind,
};
use std::sync::Arc;

pub struct TokenQueryService {
    token_manager: Arc<dyn TokenManager>,
    issued_tokens: Arc<dyn IssuedTokenStore>,
    clock: Arc<dyn Clock>,
}

impl TokenQueryService {
    pub fn new(
        token_manager: Arc<dyn TokenManager>,
        issued_tokens: Arc<dyn IssuedTokenStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            token_manager,
            issued_tokens,
            clock,
        }
    }

    /// An access token is valid when its signature checks out and the server
    /// still holds its record. Expired records are dropped here, lazily.
    pub async fn validate(&self, token: &str) -> ApplicationResult<TokenIntrospectionDto> {
        if token.is_empty() {
            return Err(ApplicationError::MissingParameter("access_token"));
        }

        let Some(record) = self.issued_tokens.find(token).await? else {
            return Err(ApplicationError::unauthorized("invalid access token"));
        };

        if record.kind != TokenKind::Access {
            return Err(ApplicationError::unauthorized("invalid access token"));
        }

        if record.is_expired(self.clock.now()) {
            self.issued_tokens.revoke(token).await?;
            tracing::debug!(client_id = %record.client_id, "expired access token removed");
            return Err(ApplicationError::unauthorized("invalid access token"));
        }

        let verified = self
            .token_manager
            .authenticate(token, TokenType::Access)
            .await
            .map_err(|_| ApplicationError::unauthorized("invalid access token"))?;

        Ok(TokenIntrospectionDto {
            active: true,
            client_id: record.client_id.to_string(),
            sub: record.subject,
            scope: record.scope.to_string(),
            exp: verified.expires_at.timestamp(),
        })
    }
}
