use super::service::TokenCommandService;
use crate::{
    application::{
        commands::authorization::RedeemCodeCommand,
        dto::TokenResponseDto,
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        client::Scope,
        grant::{IssuedToken, TokenKind},
    },
};

/// Raw token endpoint form. Which fields are required depends on `grant_type`.
#[derive(Debug, Clone, Default)]
pub struct ExchangeTokenCommand {
    pub grant_type: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub code: Option<String>,
    pub redirect_uri: Option<String>,
    pub code_verifier: Option<String>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
}

fn required(value: Option<String>, name: &'static str) -> ApplicationResult<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(ApplicationError::MissingParameter(name))
}

impl TokenCommandService {
    pub async fn exchange(
        &self,
        mut command: ExchangeTokenCommand,
    ) -> ApplicationResult<TokenResponseDto> {
        let grant_type = required(command.grant_type.take(), "grant_type")?;

        let result = match grant_type.as_str() {
            "authorization_code" => self.exchange_authorization_code(command).await,
            "client_credentials" => self.exchange_client_credentials(command).await,
            "refresh_token" => self.exchange_refresh_token(command).await,
            other => Err(ApplicationError::UnsupportedGrantType(other.to_owned())),
        };

        if let Err(err) = &result {
            tracing::warn!(grant_type = %grant_type, error = %err, "token request rejected");
        }
        result
    }

    async fn exchange_authorization_code(
        &self,
        command: ExchangeTokenCommand,
    ) -> ApplicationResult<TokenResponseDto> {
        let code = required(command.code, "code")?;
        let client_id = required(command.client_id, "client_id")?;
        let client_secret = required(command.client_secret, "client_secret")?;
        let redirect_uri = required(command.redirect_uri, "redirect_uri")?;

        let record = self
            .codes
            .redeem(RedeemCodeCommand {
                code,
                client_id,
                client_secret,
                redirect_uri,
                code_verifier: command.code_verifier,
            })
            .await?;

        self.mint(&record.client_id, Some(record.issued_to), record.scope, true)
            .await
    }

    async fn exchange_client_credentials(
        &self,
        command: ExchangeTokenCommand,
    ) -> ApplicationResult<TokenResponseDto> {
        let client_id = required(command.client_id, "client_id")?;
        let client_secret = required(command.client_secret, "client_secret")?;

        let client = self.clients.authenticate(&client_id, &client_secret).await?;

        let requested = command
            .scope
            .as_deref()
            .map(str::parse::<Scope>)
            .transpose()
            .map_err(|_| ApplicationError::InvalidScope)?;
        let scope = client
            .resolve_scope(requested)
            .ok_or(ApplicationError::InvalidScope)?;

        tracing::info!(client_id = %client.client_id, "client credentials grant");
        self.mint(&client.client_id, None, scope, false).await
    }

    /// Refresh tokens rotate: the presented one is taken out of the store
    /// atomically, so a replayed token finds nothing.
    async fn exchange_refresh_token(
        &self,
        command: ExchangeTokenCommand,
    ) -> ApplicationResult<TokenResponseDto> {
        let refresh_token = required(command.refresh_token, "refresh_token")?;
        let client_id = required(command.client_id, "client_id")?;
        let client_secret = required(command.client_secret, "client_secret")?;

        let client = self.clients.authenticate(&client_id, &client_secret).await?;

        let owner = &client.client_id;
        let taken = self
            .issued_tokens
            .take_if_match(&refresh_token, &|stored: &IssuedToken| {
                stored.kind == TokenKind::Refresh && stored.belongs_to(owner)
            })
            .await?;

        let Some(previous) = taken else {
            tracing::warn!(client_id = %client.client_id, "unknown or reused refresh token");
            return Err(ApplicationError::InvalidGrant);
        };

        if previous.is_expired(self.clock.now()) {
            tracing::info!(client_id = %client.client_id, "expired refresh token removed");
            return Err(ApplicationError::InvalidGrant);
        }

        self.mint(&client.client_id, previous.subject, previous.scope, true)
            .await
    }
}
