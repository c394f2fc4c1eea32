use letter_registry_api::ApiError;

use crate::numbering::FormatError;
use crate::repository::error::RepositoryError;

impl From<RepositoryError> for ApiError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound(id) => ApiError::NotFound(format!("letter {id}")),
            RepositoryError::Conflict(id) => {
                ApiError::Conflict(format!("letter {id} was modified concurrently, reload and retry"))
            }
            RepositoryError::Duplicate(what) => ApiError::Conflict(format!("duplicate {what}")),
            RepositoryError::Invalid(message) => ApiError::ValidationError(message),
            RepositoryError::Transient(message) => ApiError::DatabaseError(message),
            RepositoryError::Database(error) => ApiError::DatabaseError(error.to_string()),
            RepositoryError::Serialization(message) => ApiError::InternalError(message),
        }
    }
}

impl From<FormatError> for ApiError {
    fn from(error: FormatError) -> Self {
        ApiError::ValidationError(error.to_string())
    }
}
