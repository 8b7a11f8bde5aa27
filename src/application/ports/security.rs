// src/application/ports/security.rs
use crate::application::{
    ApplicationResult,
    dto::{SignedToken, TokenSubject, TokenType, VerifiedToken},
};
use async_trait::async_trait;

#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> ApplicationResult<String>;
    /// Must compare in constant time.
    async fn verify(&self, password: &str, expected_hash: &str) -> ApplicationResult<()>;
}

#[async_trait]
pub trait TokenManager: Send + Sync {
    async fn issue(&self, subject: TokenSubject) -> ApplicationResult<SignedToken>;
    /// Verify signature, expiry and that the token is of the `expected` type.
    async fn authenticate(&self, token: &str, expected: TokenType)
    -> ApplicationResult<VerifiedToken>;
}

pub trait SecretGenerator: Send + Sync {
    /// `bytes` of OS randomness, base64url encoded without padding.
    fn generate(&self, bytes: usize) -> String;
}
