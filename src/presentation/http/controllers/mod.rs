// src/presentation/http/controllers/mod.rs
pub mod clients;
pub mod oauth;
pub mod session;
pub mod tokens;
