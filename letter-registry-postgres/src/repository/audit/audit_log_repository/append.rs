use async_trait::async_trait;
use letter_registry_db::models::audit::AuditLogModel;
use letter_registry_db::repository::{AppendAudit, RepositoryError};

use super::repo_impl::AuditLogRepositoryImpl;
use crate::executor::transaction_consumed;

impl AuditLogRepositoryImpl {
    pub(super) async fn append_impl(&self, entry: AuditLogModel) -> Result<AuditLogModel, RepositoryError> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(transaction_consumed)?;
        Self::insert(&mut **transaction, &entry).await?;
        Ok(entry)
    }
}

#[async_trait]
impl AppendAudit for AuditLogRepositoryImpl {
    async fn append(&self, entry: AuditLogModel) -> Result<AuditLogModel, RepositoryError> {
        self.append_impl(entry).await
    }
}
