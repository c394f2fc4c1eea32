use letter_registry_db::repository::AllocationRetryPolicy;
use sqlx::PgPool;

/// Running-number counters in `letter_sequence`.
///
/// Statements run on the pool, outside the session transaction: an
/// allocation commits on its own and survives a rollback of the letter
/// insert that follows it.
pub struct SequenceRepositoryImpl {
    pub(crate) pool: PgPool,
    pub(crate) retry_policy: AllocationRetryPolicy,
}

impl SequenceRepositoryImpl {
    pub fn new(pool: PgPool, retry_policy: AllocationRetryPolicy) -> Self {
        Self { pool, retry_policy }
    }
}
