// src/infrastructure/security/token.rs
use crate::application::{
    dto::{SignedToken, TokenSubject, TokenType, VerifiedToken},
    error::{ApplicationError, ApplicationResult},
    ports::{security::TokenManager, time::Clock},
};
use crate::domain::client::Scope;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// HS256 keys shorter than this are rejected at startup.
pub const MIN_SECRET_BYTES: usize = 32;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    iss: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client_id: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    scope: String,
    token_type: TokenType,
    iat: i64,
    exp: i64,
    jti: String,
}

/// Signs access and session tokens with a shared HMAC secret. Expiry is
/// checked against the injected `Clock`, not by `jsonwebtoken`.
#[derive(Clone)]
pub struct JwtTokenManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    access_ttl: Duration,
    session_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtTokenManager {
    pub fn new(
        secret: &[u8],
        issuer: impl Into<String>,
        access_ttl: Duration,
        session_ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> ApplicationResult<Self> {
        if secret.len() < MIN_SECRET_BYTES {
            return Err(ApplicationError::infrastructure(format!(
                "jwt secret must be at least {MIN_SECRET_BYTES} bytes"
            )));
        }
        if access_ttl <= Duration::zero() || session_ttl <= Duration::zero() {
            return Err(ApplicationError::infrastructure(
                "token lifetimes must be positive",
            ));
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            issuer: issuer.into(),
            access_ttl,
            session_ttl,
            clock,
        })
    }

    fn ttl_for(&self, token_type: TokenType) -> Duration {
        match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Session => self.session_ttl,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation
    }
}

fn timestamp(value: i64) -> ApplicationResult<DateTime<Utc>> {
    DateTime::from_timestamp(value, 0)
        .ok_or_else(|| ApplicationError::unauthorized("token timestamp out of range"))
}

#[async_trait]
impl TokenManager for JwtTokenManager {
    async fn issue(&self, subject: TokenSubject) -> ApplicationResult<SignedToken> {
        let issued_at = self.clock.now();
        let ttl = self.ttl_for(subject.token_type);
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| ApplicationError::infrastructure("token lifetime is out of range"))?;

        let claims = Claims {
            iss: self.issuer.clone(),
            sub: subject.subject,
            client_id: subject.client_id.map(String::from),
            scope: subject.scope.to_string(),
            token_type: subject.token_type,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| ApplicationError::infrastructure(format!("failed to sign jwt: {err}")))?;

        Ok(SignedToken {
            token,
            issued_at,
            expires_at,
            expires_in: ttl.num_seconds(),
        })
    }

    async fn authenticate(
        &self,
        token: &str,
        expected: TokenType,
    ) -> ApplicationResult<VerifiedToken> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation())
            .map_err(|err| ApplicationError::unauthorized(format!("invalid token: {err}")))?;
        let claims = data.claims;

        if claims.token_type != expected {
            return Err(ApplicationError::unauthorized("unexpected token type"));
        }

        let expires_at = timestamp(claims.exp)?;
        if self.clock.now() >= expires_at {
            return Err(ApplicationError::unauthorized("token expired"));
        }

        let scope = claims
            .scope
            .parse::<Scope>()
            .map_err(|_| ApplicationError::unauthorized("malformed scope claim"))?;

        Ok(VerifiedToken {
            token_type: claims.token_type,
            client_id: claims.client_id,
            subject: claims.sub,
            scope,
            issued_at: timestamp(claims.iat)?,
            expires_at,
        })
    }
}
