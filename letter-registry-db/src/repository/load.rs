use async_trait::async_trait;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;
use crate::repository::error::RepositoryError;

/// Loads one entity, failing with [`RepositoryError::NotFound`] when absent.
#[async_trait]
pub trait Load<T: Identifiable>: Send + Sync {
    async fn load(&self, id: Uuid) -> Result<T, RepositoryError>;
}
