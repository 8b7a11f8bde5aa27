use crate::{
    application::{
        commands::authorization::AuthorizationCodeService,
        dto::{TokenResponseDto, TokenSubject},
        error::{ApplicationError, ApplicationResult},
        ports::{
            issued_token::IssuedTokenStore,
            security::{SecretGenerator, TokenManager},
            time::Clock,
        },
        services::client_auth::ClientAuthenticator,
    },
    domain::{
        client::{ClientId, Scope},
        grant::{IssuedToken, TokenKind},
    },
};
use chrono::Duration;
use std::sync::Arc;

pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Token endpoint grants, refresh rotation and logout.
pub struct TokenCommandService {
    pub(super) codes: Arc<AuthorizationCodeService>,
    pub(super) clients: Arc<ClientAuthenticator>,
    pub(super) token_manager: Arc<dyn TokenManager>,
    pub(super) issued_tokens: Arc<dyn IssuedTokenStore>,
    pub(super) secrets: Arc<dyn SecretGenerator>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) refresh_token_ttl: Duration,
}

impl TokenCommandService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        codes: Arc<AuthorizationCodeService>,
        clients: Arc<ClientAuthenticator>,
        token_manager: Arc<dyn TokenManager>,
        issued_tokens: Arc<dyn IssuedTokenStore>,
        secrets: Arc<dyn SecretGenerator>,
        clock: Arc<dyn Clock>,
        refresh_token_ttl: Duration,
    ) -> Self {
        Self {
            codes,
            clients,
            token_manager,
            issued_tokens,
            secrets,
            clock,
            refresh_token_ttl,
        }
    }

    /// Sign an access token, record it, and optionally mint a refresh token.
    pub(super) async fn mint(
        &self,
        client_id: &ClientId,
        subject: Option<String>,
        scope: Scope,
        with_refresh: bool,
    ) -> ApplicationResult<TokenResponseDto> {
        let access = self
            .token_manager
            .issue(TokenSubject::access(
                client_id.clone(),
                subject.clone(),
                scope.clone(),
            ))
            .await?;

        self.issued_tokens
            .save(IssuedToken {
                token: access.token.clone(),
                kind: TokenKind::Access,
                client_id: client_id.clone(),
                subject: subject.clone(),
                scope: scope.clone(),
                issued_at: access.issued_at,
                expires_at: access.expires_at,
            })
            .await?;

        let refresh_token = if with_refresh {
            let token = self.secrets.generate(REFRESH_TOKEN_BYTES);
            let now = self.clock.now();
            let expires_at = now.checked_add_signed(self.refresh_token_ttl).ok_or_else(|| {
                ApplicationError::infrastructure("refresh token lifetime is out of range")
            })?;
            self.issued_tokens
                .save(IssuedToken {
                    token: token.clone(),
                    kind: TokenKind::Refresh,
                    client_id: client_id.clone(),
                    subject,
                    scope: scope.clone(),
                    issued_at: now,
                    expires_at,
                })
                .await?;
            Some(token)
        } else {
            None
        };

        Ok(TokenResponseDto {
            access_token: access.token,
            token_type: "Bearer".into(),
            expires_in: access.expires_in,
            refresh_token,
            scope: scope.to_string(),
        })
    }
}
