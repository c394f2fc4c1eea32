use async_trait::async_trait;
use letter_registry_db::models::audit::Audited;
use letter_registry_db::models::letter::LetterModel;
use letter_registry_db::repository::{RepositoryError, UpdateBatch};

use super::repo_impl::LetterRepositoryImpl;
use crate::executor::transaction_consumed;
use crate::repository::audit::AuditLogRepositoryImpl;

impl LetterRepositoryImpl {
    pub(super) async fn update_batch_impl(
        &self,
        items: Vec<Audited<LetterModel>>,
    ) -> Result<Vec<LetterModel>, RepositoryError> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut updated_items = Vec::with_capacity(items.len());
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(transaction_consumed)?;

        for Audited { mut entity, audit_log } in items {
            let Some(previous_hash) = entity.seal_updated(audit_log.id)? else {
                updated_items.push(entity);
                continue;
            };

            AuditLogRepositoryImpl::insert(&mut **transaction, &audit_log).await?;

            // Only workflow columns are written; identity columns never change.
            let rows_affected = sqlx::query(
                r#"
                UPDATE letter SET
                status = $2, document_url = $3, notes = $4, sent_by_id = $5, sent_at = $6,
                updated_at = $7, revision = $8, antecedent_hash = $9, antecedent_audit_log_id = $10,
                hash = $11, audit_log_id = $12
                WHERE id = $1 AND hash = $13
                "#,
            )
            .bind(entity.id)
            .bind(entity.status)
            .bind(entity.document_url.as_deref())
            .bind(entity.notes.as_deref())
            .bind(entity.sent_by_id)
            .bind(entity.sent_at)
            .bind(entity.updated_at)
            .bind(entity.revision)
            .bind(entity.antecedent_hash)
            .bind(entity.antecedent_audit_log_id)
            .bind(entity.hash)
            .bind(entity.audit_log_id)
            .bind(previous_hash)
            .execute(&mut **transaction)
            .await?
            .rows_affected();

            if rows_affected == 0 {
                let exists: bool = sqlx::query_scalar(r#"SELECT EXISTS (SELECT 1 FROM letter WHERE id = $1)"#)
                    .bind(entity.id)
                    .fetch_one(&mut **transaction)
                    .await?;
                return Err(if exists {
                    RepositoryError::Conflict(entity.id)
                } else {
                    RepositoryError::NotFound(entity.id)
                });
            }

            updated_items.push(entity);
        }

        Ok(updated_items)
    }
}

#[async_trait]
impl UpdateBatch<LetterModel> for LetterRepositoryImpl {
    async fn update_batch(&self, items: Vec<Audited<LetterModel>>) -> Result<Vec<LetterModel>, RepositoryError> {
        self.update_batch_impl(items).await
    }
}
