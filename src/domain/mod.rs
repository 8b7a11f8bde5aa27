// src/domain/mod.rs
pub mod client;
pub mod errors;
pub mod grant;
