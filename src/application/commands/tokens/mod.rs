// src/application/commands/tokens/mod.rs
mod exchange;
mod revoke;
mod service;

pub use exchange::ExchangeTokenCommand;
pub use service::{REFRESH_TOKEN_BYTES, TokenCommandService};
