use super::service::{AUTHORIZATION_CODE_BYTES, AuthorizationCodeService, MAX_ISSUE_ATTEMPTS};
use crate::{
    application::{
        dto::{AuthorizationRedirect, ResourceOwner},
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        client::{ClientId, RedirectUri, Scope},
        grant::{AuthorizationCode, PkceChallenge},
    },
};

/// Parameters of an authorization request as received from the user agent.
#[derive(Debug, Clone, Default)]
pub struct IssueCodeCommand {
    pub response_type: Option<String>,
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub scope: Option<String>,
    pub state: Option<String>,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<String>,
}

fn required(value: Option<String>, name: &'static str) -> ApplicationResult<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(ApplicationError::MissingParameter(name))
}

impl AuthorizationCodeService {
    /// Issue a code for `owner`, who has already logged in, and build the
    /// redirect back to the client.
    pub async fn issue(
        &self,
        owner: &ResourceOwner,
        command: IssueCodeCommand,
    ) -> ApplicationResult<AuthorizationRedirect> {
        let response_type = required(command.response_type, "response_type")?;
        if response_type != "code" {
            return Err(ApplicationError::UnsupportedResponseType(response_type));
        }
        let client_id = required(command.client_id, "client_id")?;
        let redirect_uri = required(command.redirect_uri, "redirect_uri")?;

        let client = self.clients.find(&client_id).await?;

        let redirect_uri =
            RedirectUri::new(redirect_uri).map_err(|_| ApplicationError::InvalidRedirectUri)?;
        if !client.allows_redirect(&redirect_uri) {
            tracing::warn!(client_id = %client.client_id, "redirect_uri not registered");
            return Err(ApplicationError::InvalidRedirectUri);
        }

        let requested = command
            .scope
            .as_deref()
            .map(str::parse::<Scope>)
            .transpose()
            .map_err(|_| ApplicationError::InvalidScope)?;
        let scope = client
            .resolve_scope(requested)
            .ok_or(ApplicationError::InvalidScope)?;

        let challenge = command
            .code_challenge
            .filter(|c| !c.is_empty())
            .map(|c| PkceChallenge::new(c, command.code_challenge_method.as_deref()))
            .transpose()?;

        let code = self
            .store_new_code(
                &client.client_id,
                &redirect_uri,
                &owner.username,
                &scope,
                challenge.as_ref(),
            )
            .await?;

        let mut params = vec![("code", code.as_str())];
        if let Some(state) = command.state.as_deref() {
            params.push(("state", state));
        }
        let location = redirect_uri.with_query_params(&params)?;

        tracing::info!(
            client_id = %client.client_id,
            subject = %owner.username,
            scope = %scope,
            "authorization code issued"
        );

        Ok(AuthorizationRedirect { code, location })
    }

    async fn store_new_code(
        &self,
        client_id: &ClientId,
        redirect_uri: &RedirectUri,
        issued_to: &str,
        scope: &Scope,
        challenge: Option<&PkceChallenge>,
    ) -> ApplicationResult<String> {
        for attempt in 1..=MAX_ISSUE_ATTEMPTS {
            let code = self.secrets.generate(AUTHORIZATION_CODE_BYTES);
            let record = AuthorizationCode::new(
                code.clone(),
                client_id.clone(),
                redirect_uri.clone(),
                issued_to.to_owned(),
                scope.clone(),
                challenge.cloned(),
                self.clock.now(),
                self.code_ttl,
            )?;

            match self.store.put(record).await {
                Ok(()) => return Ok(code),
                Err(ApplicationError::Conflict(_)) => {
                    tracing::warn!(attempt, "authorization code collision, regenerating");
                }
                Err(err) => return Err(err),
            }
        }

        Err(ApplicationError::infrastructure(
            "could not allocate a unique authorization code",
        ))
    }
}
