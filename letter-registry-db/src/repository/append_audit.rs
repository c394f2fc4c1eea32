use async_trait::async_trait;

use crate::models::audit::AuditLogModel;
use crate::repository::error::RepositoryError;

/// Append-only sink for audit entries.
///
/// Entry ids and `(letter_id, revision)` pairs are unique; appending a
/// duplicate fails with [`RepositoryError::Duplicate`].
#[async_trait]
pub trait AppendAudit: Send + Sync {
    async fn append(&self, entry: AuditLogModel) -> Result<AuditLogModel, RepositoryError>;
}
