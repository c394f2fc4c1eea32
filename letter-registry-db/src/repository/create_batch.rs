use async_trait::async_trait;

use crate::models::audit::Audited;
use crate::models::auditable::Auditable;
use crate::repository::error::RepositoryError;

/// Generic repository trait for creating multiple auditable entities
///
/// Each entity is inserted together with its `Created` audit entry; an entity
/// is never visible without its entry. Implementations stamp the audit chain
/// (`hash`, `audit_log_id`) and return the entities as stored.
///
/// # Type Parameters
/// * `T` - The entity type that must implement Auditable trait
///
/// # Example
/// ```ignore
/// impl CreateBatch<LetterModel> for LetterRepositoryImpl {
///     async fn create_batch(&self, items: Vec<Audited<LetterModel>>) -> Result<Vec<LetterModel>, RepositoryError> {
///         // Implementation
///     }
/// }
/// ```
#[async_trait]
pub trait CreateBatch<T: Auditable + Send + 'static>: Send + Sync {
    /// # Returns
    /// * `Ok(Vec<T>)` - The created entities with hash and audit_log_id populated
    /// * `Err(RepositoryError::Duplicate)` - A unique index rejected an entity
    async fn create_batch(&self, items: Vec<Audited<T>>) -> Result<Vec<T>, RepositoryError>;
}
