use async_trait::async_trait;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;
use crate::repository::error::RepositoryError;
use crate::repository::pagination::{Page, PageRequest};

/// Generic repository trait for loading the audit trail of an entity with pagination
///
/// Entries come most recent first. An unknown id yields an empty page.
///
/// # Example
/// ```ignore
/// use letter_registry_db::repository::pagination::PageRequest;
///
/// let page = repo.load_audits(letter_id, PageRequest::new(20, 0)).await?;
/// assert_eq!(page.items[0].revision, page.total as i32);
/// ```
#[async_trait]
pub trait LoadAudits<T: Identifiable>: Send + Sync {
    async fn load_audits(&self, id: Uuid, page: PageRequest) -> Result<Page<T>, RepositoryError>;
}
