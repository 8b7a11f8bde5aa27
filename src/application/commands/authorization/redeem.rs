use super::service::AuthorizationCodeService;
use crate::{
    application::error::{ApplicationError, ApplicationResult},
    domain::{
        client::{ClientId, RedirectUri},
        grant::AuthorizationCode,
    },
};

pub struct RedeemCodeCommand {
    pub code: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub code_verifier: Option<String>,
}

impl AuthorizationCodeService {
    /// Authenticate the client, then redeem the code. The client is checked
    /// first so callers without the secret cannot burn a code.
    pub async fn redeem(&self, command: RedeemCodeCommand) -> ApplicationResult<AuthorizationCode> {
        let client = self
            .clients
            .authenticate(&command.client_id, &command.client_secret)
            .await?;

        self.redeem_for_client(
            &client.client_id,
            &command.code,
            &command.redirect_uri,
            command.code_verifier.as_deref(),
        )
        .await
    }

    /// Redeem a code on behalf of an already authenticated client. Every
    /// failure is reported as `InvalidGrant`.
    pub async fn redeem_for_client(
        &self,
        client_id: &ClientId,
        code: &str,
        redirect_uri: &str,
        code_verifier: Option<&str>,
    ) -> ApplicationResult<AuthorizationCode> {
        let redirect_uri =
            RedirectUri::new(redirect_uri).map_err(|_| ApplicationError::InvalidGrant)?;

        let Some(record) = self.store.get(code).await? else {
            tracing::warn!(client_id = %client_id, "redemption of unknown or used code");
            return Err(ApplicationError::InvalidGrant);
        };

        if !record.is_bound_to(client_id, &redirect_uri) {
            tracing::warn!(client_id = %client_id, "code presented with mismatched binding");
            return Err(ApplicationError::InvalidGrant);
        }

        let now = self.clock.now();
        if record.is_expired(now) {
            self.store
                .delete_if_match(code, &|stored: &AuthorizationCode| stored.is_expired(now))
                .await?;
            tracing::info!(client_id = %client_id, "expired code removed on redemption");
            return Err(ApplicationError::InvalidGrant);
        }

        if let Some(challenge) = record.challenge.as_ref() {
            if !code_verifier.is_some_and(|verifier| challenge.verify(verifier)) {
                tracing::warn!(client_id = %client_id, "pkce verification failed");
                return Err(ApplicationError::InvalidGrant);
            }
        }

        let consumed = self
            .store
            .delete_if_match(code, &|stored: &AuthorizationCode| {
                stored.is_bound_to(client_id, &redirect_uri) && !stored.is_expired(now)
            })
            .await?;

        match consumed {
            Some(record) => {
                tracing::info!(client_id = %client_id, "authorization code redeemed");
                Ok(record)
            }
            None => {
                tracing::warn!(client_id = %client_id, "authorization code lost redemption race");
                Err(ApplicationError::InvalidGrant)
            }
        }
    }
}
