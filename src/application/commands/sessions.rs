// src/application/commands/sessions.rs
use crate::application::{
    dto::{ResourceOwner, SessionDto, TokenSubject, TokenType},
    error::{ApplicationError, ApplicationResult},
    ports::{resource_owner::ResourceOwnerDirectory, security::TokenManager},
};
use std::sync::Arc;

pub struct LoginCommand {
    pub username: String,
    pub password: String,
}

/// Resource owner login. The session token it returns is what the
/// authorization endpoint accepts as proof of login.
pub struct SessionCommandService {
    owners: Arc<dyn ResourceOwnerDirectory>,
    token_manager: Arc<dyn TokenManager>,
}

impl SessionCommandService {
    pub fn new(
        owners: Arc<dyn ResourceOwnerDirectory>,
        token_manager: Arc<dyn TokenManager>,
    ) -> Self {
        Self {
            owners,
            token_manager,
        }
    }

    pub async fn authenticate_owner(
        &self,
        username: &str,
        password: &str,
    ) -> ApplicationResult<ResourceOwner> {
        if username.is_empty() {
            return Err(ApplicationError::MissingParameter("username"));
        }
        if password.is_empty() {
            return Err(ApplicationError::MissingParameter("password"));
        }
        self.owners.authenticate(username, password).await
    }

    pub async fn login(&self, command: LoginCommand) -> ApplicationResult<SessionDto> {
        let owner = self
            .authenticate_owner(&command.username, &command.password)
            .await?;

        let signed = self
            .token_manager
            .issue(TokenSubject::session(owner.username.clone()))
            .await?;

        tracing::info!(subject = %owner.username, "resource owner logged in");

        Ok(SessionDto {
            session_token: signed.token,
            token_type: "Bearer".into(),
            expires_in: signed.expires_in,
        })
    }

    pub async fn owner_from_session(&self, token: &str) -> ApplicationResult<ResourceOwner> {
        let verified = self
            .token_manager
            .authenticate(token, TokenType::Session)
            .await?;

        verified
            .subject
            .map(|username| ResourceOwner { username })
            .ok_or_else(|| ApplicationError::unauthorized("session token has no subject"))
    }
}
