// src/infrastructure/repositories/mod.rs
mod error;
mod memory_client;
mod postgres_client;

pub use error::map_sqlx;
pub use memory_client::InMemoryClientRegistry;
pub use postgres_client::PostgresClientRegistry;
