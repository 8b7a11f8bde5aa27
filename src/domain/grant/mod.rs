// src/domain/grant/mod.rs
pub mod authorization_code;
pub mod issued_token;
pub mod pkce;

pub use authorization_code::AuthorizationCode;
pub use issued_token::{IssuedToken, TokenKind};
pub use pkce::{PkceChallenge, PkceMethod};
