use super::service::ClientCommandService;
use crate::application::error::{ApplicationError, ApplicationResult};

pub struct DeleteClientCommand {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCommandService {
    /// Delete an authenticated client together with every token issued to it.
    /// Returns the number of revoked tokens.
    pub async fn delete(&self, command: DeleteClientCommand) -> ApplicationResult<u64> {
        if command.client_id.is_empty() {
            return Err(ApplicationError::MissingParameter("client_id"));
        }
        if command.client_secret.is_empty() {
            return Err(ApplicationError::MissingParameter("client_secret"));
        }

        let client = self
            .clients
            .authenticate(&command.client_id, &command.client_secret)
            .await?;

        if !self.registry.delete(&client.client_id).await? {
            // Lost a race with a concurrent delete.
            return Err(ApplicationError::UnknownClient);
        }
        let revoked = self.issued_tokens.revoke_for_client(&client.client_id).await?;

        tracing::info!(client_id = %client.client_id, revoked, "client deleted");
        Ok(revoked)
    }
}
