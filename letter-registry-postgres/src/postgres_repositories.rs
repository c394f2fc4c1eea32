use async_trait::async_trait;
use letter_registry_api::LetterFilter;
use letter_registry_db::models::audit::{AuditLogModel, Audited};
use letter_registry_db::models::letter::{LetterModel, SequenceKey};
use letter_registry_db::repository::{
    AllocateSequence, AllocationRetryPolicy, AppendAudit, CreateBatch, FindLetters, Load, LoadAudits, LoadBatch,
    Page, PageRequest, RepositoryError, UnitOfWork, UnitOfWorkSession, UpdateBatch,
};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::executor::Executor;
use crate::repository::audit::AuditLogRepositoryImpl;
use crate::repository::letter::{LetterRepositoryImpl, SequenceRepositoryImpl};

/// Entry point of the Postgres store; cheap to clone.
#[derive(Clone)]
pub struct PostgresRepositories {
    pool: PgPool,
    sequences: Arc<SequenceRepositoryImpl>,
}

impl PostgresRepositories {
    pub fn new(pool: PgPool, retry_policy: AllocationRetryPolicy) -> Self {
        Self {
            sequences: Arc::new(SequenceRepositoryImpl::new(pool.clone(), retry_policy)),
            pool,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn sequence_repository(&self) -> Arc<SequenceRepositoryImpl> {
        self.sequences.clone()
    }
}

/// Allocation runs on its own pooled connection, never inside a session, so
/// a caller never holds a transaction while waiting for a counter.
#[async_trait]
impl AllocateSequence for PostgresRepositories {
    async fn allocate_next(&self, key: &SequenceKey) -> Result<i32, RepositoryError> {
        self.sequences.allocate_next(key).await
    }

    async fn last_issued(&self, key: &SequenceKey) -> Result<i32, RepositoryError> {
        self.sequences.last_issued(key).await
    }
}

#[async_trait]
impl UnitOfWork for PostgresRepositories {
    type Session = PostgresSession;

    /// Create all repositories sharing a single transaction
    async fn start_session(&self) -> Result<PostgresSession, RepositoryError> {
        let tx = self.pool.begin().await?;
        let executor = Executor::new(tx);

        Ok(PostgresSession {
            letter_repository: LetterRepositoryImpl::new(executor.clone()),
            audit_log_repository: AuditLogRepositoryImpl::new(executor.clone()),
            executor,
        })
    }
}

/// One transaction and the repositories bound to it. Dropping the session
/// without committing rolls the transaction back.
pub struct PostgresSession {
    pub letter_repository: LetterRepositoryImpl,
    pub audit_log_repository: AuditLogRepositoryImpl,
    executor: Executor,
}

#[async_trait]
impl UnitOfWorkSession for PostgresSession {
    async fn commit(self) -> Result<(), RepositoryError> {
        self.executor.commit().await
    }

    async fn rollback(self) -> Result<(), RepositoryError> {
        self.executor.rollback().await
    }
}

#[async_trait]
impl AppendAudit for PostgresSession {
    async fn append(&self, entry: AuditLogModel) -> Result<AuditLogModel, RepositoryError> {
        self.audit_log_repository.append(entry).await
    }
}

#[async_trait]
impl LoadAudits<AuditLogModel> for PostgresSession {
    async fn load_audits(&self, id: Uuid, page: PageRequest) -> Result<Page<AuditLogModel>, RepositoryError> {
        self.audit_log_repository.load_audits(id, page).await
    }
}

#[async_trait]
impl CreateBatch<LetterModel> for PostgresSession {
    async fn create_batch(&self, items: Vec<Audited<LetterModel>>) -> Result<Vec<LetterModel>, RepositoryError> {
        self.letter_repository.create_batch(items).await
    }
}

#[async_trait]
impl UpdateBatch<LetterModel> for PostgresSession {
    async fn update_batch(&self, items: Vec<Audited<LetterModel>>) -> Result<Vec<LetterModel>, RepositoryError> {
        self.letter_repository.update_batch(items).await
    }
}

#[async_trait]
impl Load<LetterModel> for PostgresSession {
    async fn load(&self, id: Uuid) -> Result<LetterModel, RepositoryError> {
        self.letter_repository.load(id).await
    }
}

#[async_trait]
impl LoadBatch<LetterModel> for PostgresSession {
    async fn load_batch(&self, ids: &[Uuid]) -> Result<Vec<Option<LetterModel>>, RepositoryError> {
        self.letter_repository.load_batch(ids).await
    }
}

#[async_trait]
impl FindLetters for PostgresSession {
    async fn find_letters(&self, filter: &LetterFilter) -> Result<Vec<LetterModel>, RepositoryError> {
        self.letter_repository.find_letters(filter).await
    }
}
