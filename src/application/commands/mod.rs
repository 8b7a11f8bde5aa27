pub mod authorization;
pub mod clients;
pub mod sessions;
pub mod tokens;
