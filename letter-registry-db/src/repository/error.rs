use thiserror::Error;
use uuid::Uuid;

/// SQLSTATE codes after which the same statement may simply be retried.
const TRANSIENT_SQLSTATES: [&str; 3] = [
    "40001", // serialization_failure
    "40P01", // deadlock_detected
    "55P03", // lock_not_available
];
const UNIQUE_VIOLATION: &str = "23505";

/// Errors raised by repository implementations.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(Uuid),

    /// The stored row no longer carries the hash that was read.
    #[error("Concurrent update detected for {0}")]
    Conflict(Uuid),

    #[error("Duplicate value: {0}")]
    Duplicate(String),

    #[error("Transient storage failure: {0}")]
    Transient(String),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid data: {0}")]
    Invalid(String),
}

impl RepositoryError {
    pub fn is_transient(&self) -> bool {
        matches!(self, RepositoryError::Transient(_))
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::Database(db_error) => match db_error.code().as_deref() {
                Some(code) if TRANSIENT_SQLSTATES.contains(&code) => {
                    RepositoryError::Transient(db_error.message().to_string())
                }
                Some(UNIQUE_VIOLATION) => RepositoryError::Duplicate(db_error.message().to_string()),
                _ => RepositoryError::Database(error),
            },
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => RepositoryError::Transient(error.to_string()),
            _ => RepositoryError::Database(error),
        }
    }
}
