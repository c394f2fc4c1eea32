use async_trait::async_trait;
use letter_registry_db::models::audit::AuditLogModel;
use letter_registry_db::repository::{LoadAudits, Page, PageRequest, RepositoryError};
use uuid::Uuid;

use super::repo_impl::AuditLogRepositoryImpl;
use crate::executor::transaction_consumed;

impl AuditLogRepositoryImpl {
    pub(super) async fn load_audits_impl(&self, id: Uuid, page: PageRequest) -> Result<Page<AuditLogModel>, RepositoryError> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(transaction_consumed)?;

        let total: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM letter_audit_log WHERE letter_id = $1"#)
            .bind(id)
            .fetch_one(&mut **transaction)
            .await?;

        // Most recent first; revision is strictly increasing per letter.
        let items = sqlx::query_as::<_, AuditLogModel>(
            r#"
            SELECT id, letter_id, action, previous_summary, new_summary, actor_id, occurred_at, revision
            FROM letter_audit_log
            WHERE letter_id = $1
            ORDER BY revision DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(id)
        .bind(page.limit as i64)
        .bind(page.offset as i64)
        .fetch_all(&mut **transaction)
        .await?;

        Ok(Page::new(items, total as usize, page.limit, page.offset))
    }
}

#[async_trait]
impl LoadAudits<AuditLogModel> for AuditLogRepositoryImpl {
    async fn load_audits(&self, id: Uuid, page: PageRequest) -> Result<Page<AuditLogModel>, RepositoryError> {
        self.load_audits_impl(id, page).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_context;
    use chrono::{TimeDelta, Utc};
    use letter_registry_db::models::audit::AuditLogModel;
    use letter_registry_db::repository::{AppendAudit, LoadAudits, PageRequest};
    use uuid::Uuid;

    #[tokio::test]
    #[ignore]
    #[serial_test::serial]
    async fn test_load_audits_pages_newest_first() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let audit_log_repo = &ctx.session().audit_log_repository;

        let letter_id = Uuid::new_v4();
        let actor_id = Uuid::new_v4();
        let start = Utc::now();
        audit_log_repo
            .append(AuditLogModel::created(letter_id, actor_id, "issued".into(), start))
            .await?;
        for revision in 2..=5 {
            let entry = AuditLogModel::updated(
                letter_id,
                actor_id,
                format!("notes: \"v{}\"", revision - 1),
                format!("notes: \"v{revision}\""),
                start + TimeDelta::seconds(revision as i64),
                revision,
            );
            audit_log_repo.append(entry).await?;
        }

        let first = audit_log_repo.load_audits(letter_id, PageRequest::new(2, 0)).await?;
        assert_eq!(first.total, 5);
        assert!(first.has_more());
        assert_eq!(first.items.iter().map(|e| e.revision).collect::<Vec<_>>(), vec![5, 4]);

        let last = audit_log_repo.load_audits(letter_id, PageRequest::new(2, 4)).await?;
        assert!(!last.has_more());
        assert_eq!(last.items[0].revision, 1);
        Ok(())
    }
}
