use super::service::{CLIENT_ID_BYTES, CLIENT_SECRET_BYTES, ClientCommandService};
use crate::{
    application::{
        dto::ClientCredentialsDto,
        error::ApplicationResult,
    },
    domain::client::{ClientId, ClientSecretHash, NewClient, RedirectUri, Scope},
};

#[derive(Debug, Clone, Default)]
pub struct RegisterClientCommand {
    pub redirect_uris: Vec<String>,
    pub scope: Option<String>,
}

impl ClientCommandService {
    /// Register a client with fresh random credentials. The plaintext secret
    /// appears only in the returned value.
    pub async fn register(
        &self,
        command: RegisterClientCommand,
    ) -> ApplicationResult<ClientCredentialsDto> {
        let mut redirect_uris = Vec::with_capacity(command.redirect_uris.len());
        for raw in command.redirect_uris {
            let uri = RedirectUri::new(raw)?;
            if !redirect_uris.contains(&uri) {
                redirect_uris.push(uri);
            }
        }

        let scopes = match command.scope.as_deref() {
            Some(raw) => raw.parse::<Scope>()?,
            None => Scope::empty(),
        };

        let client_id = ClientId::new(self.secrets.generate(CLIENT_ID_BYTES))?;
        let client_secret = self.secrets.generate(CLIENT_SECRET_BYTES);
        let secret_hash = ClientSecretHash::new(self.password_hasher.hash(&client_secret).await?)?;

        let client = self
            .registry
            .insert(NewClient {
                client_id,
                secret_hash,
                redirect_uris,
                scopes,
                created_at: self.clock.now(),
            })
            .await?;

        tracing::info!(
            client_id = %client.client_id,
            redirect_uris = client.redirect_uris.len(),
            "client registered"
        );

        Ok(ClientCredentialsDto {
            client_id: client.client_id.to_string(),
            client_secret,
            redirect_uris: client
                .redirect_uris
                .iter()
                .map(|uri| uri.as_str().to_owned())
                .collect(),
            scope: client.scopes.to_string(),
            message: "Client registered successfully".into(),
        })
    }
}
