use async_trait::async_trait;

use crate::models::audit::Audited;
use crate::models::auditable::Auditable;
use crate::repository::error::RepositoryError;

/// Generic repository trait for updating multiple auditable entities
///
/// Every entity must still carry the `hash` it was loaded with. Entities
/// whose content did not change are returned as-is and produce no audit
/// entry. Changed entities are written only if the stored row still carries
/// the loaded hash; otherwise the call fails with
/// [`RepositoryError::Conflict`] and nothing is written for that entity.
///
/// # Example
/// ```ignore
/// let mut letter = repo.load(id).await?;
/// letter.status = LetterStatus::Sent;
/// let updated = repo.update_batch(vec![Audited::new(letter, entry)]).await?;
/// ```
#[async_trait]
pub trait UpdateBatch<T: Auditable + Send + 'static>: Send + Sync {
    async fn update_batch(&self, items: Vec<Audited<T>>) -> Result<Vec<T>, RepositoryError>;
}
