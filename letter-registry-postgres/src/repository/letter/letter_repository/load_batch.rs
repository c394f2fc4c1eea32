use async_trait::async_trait;
use letter_registry_db::models::letter::LetterModel;
use letter_registry_db::repository::{LoadBatch, RepositoryError};
use std::collections::HashMap;
use uuid::Uuid;

use super::repo_impl::{LetterRepositoryImpl, LETTER_COLUMNS};
use crate::executor::transaction_consumed;
use crate::utils::TryFromRow;

impl LetterRepositoryImpl {
    pub(super) async fn load_batch_impl(&self, ids: &[Uuid]) -> Result<Vec<Option<LetterModel>>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!("SELECT {LETTER_COLUMNS} FROM letter WHERE id = ANY($1)");
        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or_else(transaction_consumed)?;
            sqlx::query(&query).bind(ids).fetch_all(&mut **transaction).await?
        };

        let mut map = HashMap::with_capacity(rows.len());
        for row in rows {
            let letter = LetterModel::try_from_row(&row)?;
            map.insert(letter.id, letter);
        }

        // Results follow the order of `ids`
        Ok(ids.iter().map(|id| map.remove(id)).collect())
    }
}

#[async_trait]
impl LoadBatch<LetterModel> for LetterRepositoryImpl {
    async fn load_batch(&self, ids: &[Uuid]) -> Result<Vec<Option<LetterModel>>, RepositoryError> {
        self.load_batch_impl(ids).await
    }
}
