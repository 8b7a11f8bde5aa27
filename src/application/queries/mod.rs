pub mod clients;
pub mod tokens;
