//! Test helper module for transaction-based test isolation
//!
//! Tests run inside a session whose transaction is rolled back when the
//! context is dropped. Sequence counters are the exception: they commit on
//! their own, so tests touching them use unique keys.

use letter_registry_db::repository::{AllocationRetryPolicy, UnitOfWork};

use crate::config::PostgresConfig;
use crate::postgres_repositories::{PostgresRepositories, PostgresSession};

/// Test context that provides a transactional database session
pub struct TestContext {
    session: PostgresSession,
}

impl TestContext {
    pub fn session(&self) -> &PostgresSession {
        &self.session
    }
}

/// Connects using `DATABASE_URL`, applies migrations and opens a session that
/// is never committed.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
///     let ctx = setup_test_context().await?;
///     let letter_repo = &ctx.session().letter_repository;
///     // All changes are rolled back when ctx is dropped
///     Ok(())
/// }
/// ```
pub async fn setup_test_context() -> Result<TestContext, Box<dyn std::error::Error + Send + Sync>> {
    let repos = setup_shared_repos().await?;
    let session = repos.start_session().await?;
    Ok(TestContext { session })
}

/// Repositories over a migrated pool, for tests that commit or need several
/// sessions.
pub async fn setup_shared_repos() -> Result<PostgresRepositories, Box<dyn std::error::Error + Send + Sync>> {
    let config = PostgresConfig::from_env()?;
    let pool = config.connect().await?;

    sqlx::migrate!().run(&pool).await?;

    Ok(PostgresRepositories::new(pool, AllocationRetryPolicy::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::letter::letter_repository::test_utils::{audited_letter, create_test_letter};
    use letter_registry_db::repository::{CreateBatch, LoadBatch};

    #[tokio::test]
    #[ignore]
    #[serial_test::serial]
    async fn test_transaction_rollback() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let letter = create_test_letter("OPS", 900);
        {
            let ctx = setup_test_context().await?;
            ctx.session().letter_repository.create_batch(vec![audited_letter(letter.clone())]).await?;
            let loaded = ctx.session().letter_repository.load_batch(&[letter.id]).await?;
            assert!(loaded[0].is_some());
        } // Transaction is rolled back here when ctx is dropped

        let ctx = setup_test_context().await?;
        let loaded = ctx.session().letter_repository.load_batch(&[letter.id]).await?;
        assert!(loaded[0].is_none());
        Ok(())
    }
}
