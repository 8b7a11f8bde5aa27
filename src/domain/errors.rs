// src/domain/errors.rs
use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Failures raised by value objects, grant records and the client registry.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A value object or grant record rejected its input.
    #[error("validation error: {0}")]
    Validation(String),
    /// The registry already holds a client with this id.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("persistence error: {0}")]
    Persistence(String),
}
