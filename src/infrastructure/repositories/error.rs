use crate::domain::errors::DomainError;

const CLIENT_PKEY: &str = "oauth_clients_pkey";
const UNIQUE_VIOLATION: &str = "23505";
const CHECK_VIOLATION: &str = "23514";

/// Translate a sqlx failure from the `oauth_clients` table into a registry
/// error. Only the primary key conflict is a caller-visible condition.
pub fn map_sqlx(err: sqlx::Error) -> DomainError {
    let sqlx::Error::Database(db_err) = &err else {
        return DomainError::Persistence(err.to_string());
    };

    match (db_err.constraint(), db_err.code().as_deref()) {
        (Some(CLIENT_PKEY), _) | (None, Some(UNIQUE_VIOLATION)) => {
            DomainError::Conflict("client_id already exists".into())
        }
        (_, Some(CHECK_VIOLATION)) => {
            DomainError::Validation(format!("client record rejected: {}", db_err.message()))
        }
        (Some(other), _) => {
            DomainError::Persistence(format!("database constraint violation: {other}"))
        }
        _ => DomainError::Persistence(db_err.message().to_string()),
    }
}
