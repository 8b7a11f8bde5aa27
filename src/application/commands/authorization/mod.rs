// src/application/commands/authorization/mod.rs
mod issue;
mod redeem;
mod service;

pub use issue::IssueCodeCommand;
pub use redeem::RedeemCodeCommand;
pub use service::{AUTHORIZATION_CODE_BYTES, AuthorizationCodeService};
