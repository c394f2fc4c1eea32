use async_trait::async_trait;
use letter_registry_api::LetterFilter;
use letter_registry_db::models::letter::LetterModel;
use letter_registry_db::repository::{FindLetters, RepositoryError};

use super::repo_impl::{LetterRepositoryImpl, LETTER_COLUMNS};
use crate::executor::transaction_consumed;
use crate::utils::{like_contains, TryFromRow};

impl LetterRepositoryImpl {
    pub(super) async fn find_letters_impl(&self, filter: &LetterFilter) -> Result<Vec<LetterModel>, RepositoryError> {
        let query = format!(
            r#"
            SELECT {LETTER_COLUMNS} FROM letter
            WHERE ($1::text IS NULL OR entity_code = $1)
              AND ($2::text IS NULL OR category_code = $2)
              AND ($3::letter_status IS NULL OR status = $3)
              AND ($4::int IS NULL OR year = $4)
              AND ($5::int IS NULL OR month = $5)
              AND ($6::text IS NULL
                   OR lower(formatted_number) LIKE $6
                   OR lower(recipient_name) LIKE $6
                   OR lower(recipient_company) LIKE $6)
            ORDER BY created_at DESC, running_number DESC
            "#
        );

        let entity_code = filter.entity_code.as_deref().map(|c| c.trim().to_uppercase());
        let category_code = filter.category_code.as_deref().map(|c| c.trim().to_uppercase());
        let search = filter.search_term().map(|term| like_contains(&term));

        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or_else(transaction_consumed)?;
            sqlx::query(&query)
                .bind(entity_code)
                .bind(category_code)
                .bind(filter.status)
                .bind(filter.year)
                .bind(filter.month)
                .bind(search)
                .fetch_all(&mut **transaction)
                .await?
        };

        rows.iter().map(LetterModel::try_from_row).collect()
    }
}

#[async_trait]
impl FindLetters for LetterRepositoryImpl {
    async fn find_letters(&self, filter: &LetterFilter) -> Result<Vec<LetterModel>, RepositoryError> {
        self.find_letters_impl(filter).await
    }
}
