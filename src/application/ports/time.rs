// src/application/ports/time.rs
use chrono::{DateTime, Utc};

/// Source of the current instant for code, token and session expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
