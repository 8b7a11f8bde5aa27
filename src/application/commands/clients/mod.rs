// src/application/commands/clients/mod.rs
mod delete;
mod register;
mod service;

pub use delete::DeleteClientCommand;
pub use register::RegisterClientCommand;
pub use service::{CLIENT_ID_BYTES, CLIENT_SECRET_BYTES, ClientCommandService};
