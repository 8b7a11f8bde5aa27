// src/domain/client/mod.rs
pub mod entity;
pub mod repository;
pub mod value_objects;

pub use entity::{NewClient, RegisteredClient};
pub use repository::ClientRegistry;
pub use value_objects::{ClientId, ClientSecretHash, RedirectUri, Scope};
