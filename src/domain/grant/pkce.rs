// src/domain/grant/pkce.rs
use crate::domain::errors::{DomainError, DomainResult};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::str::FromStr;
use subtle::ConstantTimeEq;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PkceMethod {
    #[serde(rename = "plain")]
    Plain,
    #[serde(rename = "S256")]
    S256,
}

impl FromStr for PkceMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(Self::Plain),
            "S256" => Ok(Self::S256),
            other => Err(DomainError::Validation(format!(
                "unsupported code_challenge_method: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PkceChallenge {
    pub challenge: String,
    pub method: PkceMethod,
}

impl PkceChallenge {
    /// Only a non-empty challenge is required; the RFC 7636 length range is
    /// not enforced. A missing method means `plain`.
    pub fn new(challenge: impl Into<String>, method: Option<&str>) -> DomainResult<Self> {
        let challenge = challenge.into();
        if challenge.is_empty() {
            return Err(DomainError::Validation("code_challenge cannot be empty".into()));
        }
        let method = method.map_or(Ok(PkceMethod::Plain), str::parse)?;
        Ok(Self { challenge, method })
    }

    pub fn verify(&self, verifier: &str) -> bool {
        let computed = match self.method {
            PkceMethod::Plain => verifier.to_owned(),
            PkceMethod::S256 => URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes())),
        };
        computed.as_bytes().ct_eq(self.challenge.as_bytes()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_verifier_matches_itself() {
        let challenge = PkceChallenge::new("verifier", Some("plain")).unwrap();
        assert!(challenge.verify("verifier"));
        assert!(!challenge.verify("other"));
    }

    #[test]
    fn s256_matches_rfc7636_example() {
        // Appendix B of RFC 7636.
        let challenge = PkceChallenge::new(
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM",
            Some("S256"),
        )
        .unwrap();
        assert!(challenge.verify("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk"));
        assert!(!challenge.verify("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXj"));
    }

    #[test]
    fn missing_method_defaults_to_plain() {
        let challenge = PkceChallenge::new("abc", None).unwrap();
        assert_eq!(challenge.method, PkceMethod::Plain);
    }

    #[test]
    fn unknown_method_is_rejected() {
        assert!(PkceChallenge::new("abc", Some("S512")).is_err());
    }
}
