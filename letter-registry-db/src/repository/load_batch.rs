use async_trait::async_trait;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;
use crate::repository::error::RepositoryError;

/// Generic repository trait for loading multiple entities by their IDs
///
/// Results are positional: `result[i]` belongs to `ids[i]` and is `None` when
/// no such entity exists.
#[async_trait]
pub trait LoadBatch<T: Identifiable>: Send + Sync {
    async fn load_batch(&self, ids: &[Uuid]) -> Result<Vec<Option<T>>, RepositoryError>;
}
