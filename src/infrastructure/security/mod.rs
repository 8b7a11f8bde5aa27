// src/infrastructure/security/mod.rs
pub mod authorization_code_store;
pub mod issued_token_store;
pub mod password;
pub mod redis_authorization_code_store;
pub mod redis_issued_token_store;
pub mod resource_owners;
pub mod secrets;
pub mod token;
