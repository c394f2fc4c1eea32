use letter_registry_db::models::audit::AuditLogModel;
use letter_registry_db::repository::RepositoryError;
use sqlx::PgConnection;

use crate::executor::Executor;

/// Append-only access to `letter_audit_log`.
pub struct AuditLogRepositoryImpl {
    pub(crate) executor: Executor,
}

impl AuditLogRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    /// Inserts one entry on an already locked connection, so letter writes can
    /// record their entry in the same statement sequence.
    pub(crate) async fn insert(conn: &mut PgConnection, entry: &AuditLogModel) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO letter_audit_log
            (id, letter_id, action, previous_summary, new_summary, actor_id, occurred_at, revision)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(entry.id)
        .bind(entry.letter_id)
        .bind(entry.action)
        .bind(entry.previous_summary.as_deref())
        .bind(entry.new_summary.as_str())
        .bind(entry.actor_id)
        .bind(entry.occurred_at)
        .bind(entry.revision)
        .execute(conn)
        .await?;
        Ok(())
    }
}
