use async_trait::async_trait;
use letter_registry_db::models::letter::LetterModel;
use letter_registry_db::repository::{Load, LoadBatch, RepositoryError};
use sqlx::{postgres::PgRow, Row};
use uuid::Uuid;

use crate::executor::Executor;
use crate::utils::{get_heapless_string, get_optional_heapless_string, TryFromRow};

pub(super) const LETTER_COLUMNS: &str = "id, formatted_number, entity_code, category_code, project_label, year, month, \
    running_number, recipient_name, recipient_company, notes, status, document_url, is_confidential, creator_id, \
    sent_by_id, sent_at, created_at, updated_at, revision, antecedent_hash, antecedent_audit_log_id, hash, audit_log_id";

pub struct LetterRepositoryImpl {
    pub(crate) executor: Executor,
}

impl LetterRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for LetterModel {
    fn try_from_row(row: &PgRow) -> Result<Self, RepositoryError> {
        Ok(LetterModel {
            id: row.try_get("id")?,
            formatted_number: get_heapless_string(row, "formatted_number")?,
            entity_code: get_heapless_string(row, "entity_code")?,
            category_code: get_heapless_string(row, "category_code")?,
            project_label: get_heapless_string(row, "project_label")?,
            year: row.try_get("year")?,
            month: row.try_get("month")?,
            running_number: row.try_get("running_number")?,
            recipient_name: get_heapless_string(row, "recipient_name")?,
            recipient_company: get_optional_heapless_string(row, "recipient_company")?,
            notes: get_optional_heapless_string(row, "notes")?,
            status: row.try_get("status")?,
            document_url: get_optional_heapless_string(row, "document_url")?,
            is_confidential: row.try_get("is_confidential")?,
            creator_id: row.try_get("creator_id")?,
            sent_by_id: row.try_get("sent_by_id")?,
            sent_at: row.try_get("sent_at")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            revision: row.try_get("revision")?,
            antecedent_hash: row.try_get("antecedent_hash")?,
            antecedent_audit_log_id: row.try_get("antecedent_audit_log_id")?,
            hash: row.try_get("hash")?,
            audit_log_id: row.try_get("audit_log_id")?,
        })
    }
}

#[async_trait]
impl Load<LetterModel> for LetterRepositoryImpl {
    async fn load(&self, id: Uuid) -> Result<LetterModel, RepositoryError> {
        self.load_batch(&[id])
            .await?
            .into_iter()
            .next()
            .flatten()
            .ok_or(RepositoryError::NotFound(id))
    }
}
