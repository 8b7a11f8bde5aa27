use super::service::TokenCommandService;
use crate::application::error::{ApplicationError, ApplicationResult};

impl TokenCommandService {
    /// Logout: forget the token so validation fails from now on. Revoking an
    /// unknown token is not an error.
    pub async fn revoke(&self, token: &str) -> ApplicationResult<bool> {
        if token.is_empty() {
            return Err(ApplicationError::MissingParameter("access_token"));
        }

        let removed = self.issued_tokens.revoke(token).await?;
        tracing::info!(removed, "token revoked");
        Ok(removed)
    }
}
