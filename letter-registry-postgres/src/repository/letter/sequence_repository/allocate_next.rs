use async_trait::async_trait;
use letter_registry_db::models::letter::{SequenceCounterModel, SequenceKey};
use letter_registry_db::repository::{retry_transient, AllocateSequence, RepositoryError};

use super::repo_impl::SequenceRepositoryImpl;

impl SequenceRepositoryImpl {
    /// One atomic upsert: the row lock taken by `ON CONFLICT DO UPDATE`
    /// serializes concurrent callers on the same key.
    async fn try_allocate(&self, key: &SequenceKey) -> Result<i32, RepositoryError> {
        let next: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO letter_sequence (entity_code, category_code, year, month, last_issued)
            VALUES ($1, $2, $3, $4, 1)
            ON CONFLICT (entity_code, category_code, year, month)
            DO UPDATE SET last_issued = letter_sequence.last_issued + 1
            RETURNING last_issued
            "#,
        )
        .bind(key.entity_code.as_str())
        .bind(key.category_code.as_str())
        .bind(key.year)
        .bind(key.month)
        .fetch_one(&self.pool)
        .await?;
        Ok(next)
    }

    /// Counter row for `key`, `None` before the first allocation.
    pub async fn load_counter(&self, key: &SequenceKey) -> Result<Option<SequenceCounterModel>, RepositoryError> {
        let last_issued: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT last_issued FROM letter_sequence
            WHERE entity_code = $1 AND category_code = $2 AND year = $3 AND month = $4
            "#,
        )
        .bind(key.entity_code.as_str())
        .bind(key.category_code.as_str())
        .bind(key.year)
        .bind(key.month)
        .fetch_optional(&self.pool)
        .await?;
        Ok(last_issued.map(|last_issued| SequenceCounterModel {
            key: key.clone(),
            last_issued,
        }))
    }
}

#[async_trait]
impl AllocateSequence for SequenceRepositoryImpl {
    async fn allocate_next(&self, key: &SequenceKey) -> Result<i32, RepositoryError> {
        retry_transient(&self.retry_policy, key, || self.try_allocate(key)).await
    }

    async fn last_issued(&self, key: &SequenceKey) -> Result<i32, RepositoryError> {
        Ok(self.load_counter(key).await?.map_or(0, |counter| counter.last_issued))
    }
}
