// src/application/ports/mod.rs
pub mod authorization_code;
pub mod issued_token;
pub mod resource_owner;
pub mod security;
pub mod time;

// Type aliases to make port injection sites more descriptive and reduce `dyn` noise
pub type AuthorizationCodeStorePort = dyn authorization_code::AuthorizationCodeStore;
pub type IssuedTokenStorePort = dyn issued_token::IssuedTokenStore;
pub type ResourceOwnerDirectoryPort = dyn resource_owner::ResourceOwnerDirectory;
pub type PasswordHasherPort = dyn security::PasswordHasher;
pub type TokenManagerPort = dyn security::TokenManager;
pub type SecretGeneratorPort = dyn security::SecretGenerator;
pub type ClockPort = dyn time::Clock;
