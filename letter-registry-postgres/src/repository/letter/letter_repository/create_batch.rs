use async_trait::async_trait;
use letter_registry_db::models::audit::Audited;
use letter_registry_db::models::letter::LetterModel;
use letter_registry_db::repository::{CreateBatch, RepositoryError};
use sqlx::PgConnection;

use super::repo_impl::LetterRepositoryImpl;
use crate::executor::transaction_consumed;
use crate::repository::audit::AuditLogRepositoryImpl;

impl LetterRepositoryImpl {
    pub(super) async fn create_batch_impl(
        &self,
        items: Vec<Audited<LetterModel>>,
    ) -> Result<Vec<LetterModel>, RepositoryError> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut saved_items = Vec::with_capacity(items.len());
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(transaction_consumed)?;

        for Audited { mut entity, audit_log } in items {
            if audit_log.letter_id != entity.id {
                return Err(RepositoryError::Invalid(format!(
                    "audit entry {} does not belong to letter {}",
                    audit_log.id, entity.id
                )));
            }
            entity.seal_created(audit_log.id)?;

            AuditLogRepositoryImpl::insert(&mut **transaction, &audit_log).await?;
            insert_letter(&mut **transaction, &entity).await?;
            saved_items.push(entity);
        }

        Ok(saved_items)
    }
}

async fn insert_letter(conn: &mut PgConnection, item: &LetterModel) -> Result<(), RepositoryError> {
    sqlx::query(
        r#"
        INSERT INTO letter
        (id, formatted_number, entity_code, category_code, project_label, year, month, running_number,
         recipient_name, recipient_company, notes, status, document_url, is_confidential, creator_id,
         sent_by_id, sent_at, created_at, updated_at, revision, antecedent_hash, antecedent_audit_log_id,
         hash, audit_log_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20,
                $21, $22, $23, $24)
        "#,
    )
    .bind(item.id)
    .bind(item.formatted_number.as_str())
    .bind(item.entity_code.as_str())
    .bind(item.category_code.as_str())
    .bind(item.project_label.as_str())
    .bind(item.year)
    .bind(item.month)
    .bind(item.running_number)
    .bind(item.recipient_name.as_str())
    .bind(item.recipient_company.as_deref())
    .bind(item.notes.as_deref())
    .bind(item.status)
    .bind(item.document_url.as_deref())
    .bind(item.is_confidential)
    .bind(item.creator_id)
    .bind(item.sent_by_id)
    .bind(item.sent_at)
    .bind(item.created_at)
    .bind(item.updated_at)
    .bind(item.revision)
    .bind(item.antecedent_hash)
    .bind(item.antecedent_audit_log_id)
    .bind(item.hash)
    .bind(item.audit_log_id)
    .execute(conn)
    .await?;
    Ok(())
}

#[async_trait]
impl CreateBatch<LetterModel> for LetterRepositoryImpl {
    async fn create_batch(&self, items: Vec<Audited<LetterModel>>) -> Result<Vec<LetterModel>, RepositoryError> {
        self.create_batch_impl(items).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::{audited_letter, create_test_letter};
    use crate::test_helper::setup_test_context;
    use letter_registry_db::repository::{CreateBatch, Load, LoadAudits, PageRequest, RepositoryError};

    #[tokio::test]
    #[ignore]
    #[serial_test::serial]
    async fn test_create_batch() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let session = ctx.session();

        let letters: Vec<_> = (1..=3).map(|n| create_test_letter("HR", n)).collect();
        let saved = session
            .letter_repository
            .create_batch(letters.iter().cloned().map(audited_letter).collect())
            .await?;

        assert_eq!(saved.len(), 3);
        for letter in &saved {
            assert_ne!(letter.hash, 0);
            assert!(letter.audit_log_id.is_some());
            assert_eq!(&session.letter_repository.load(letter.id).await?, letter);

            let audits = session.audit_log_repository.load_audits(letter.id, PageRequest::default()).await?;
            assert_eq!(audits.total, 1);
            assert_eq!(Some(audits.items[0].id), letter.audit_log_id);
        }
        Ok(())
    }

    #[tokio::test]
    #[ignore]
    #[serial_test::serial]
    async fn test_duplicate_running_number_is_rejected() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let letter_repo = &ctx.session().letter_repository;

        letter_repo.create_batch(vec![audited_letter(create_test_letter("LEG", 7))]).await?;
        let again = letter_repo.create_batch(vec![audited_letter(create_test_letter("LEG", 7))]).await;

        assert!(matches!(again, Err(RepositoryError::Duplicate(_))));
        Ok(())
    }
}
