use async_trait::async_trait;

use crate::models::audit::AuditLogModel;
use crate::models::letter::LetterModel;
use crate::repository::{
    append_audit::AppendAudit, create_batch::CreateBatch,
    error::RepositoryError, find_letters::FindLetters, load::Load, load_audits::LoadAudits,
    update_batch::UpdateBatch,
};

/// Source of sessions; one session per unit of work (request).
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    type Session: UnitOfWorkSession;

    async fn start_session(&self) -> Result<Self::Session, RepositoryError>;
}

/// A transactional scope. Writes become durable on `commit`; dropping the
/// session without committing discards them.
#[async_trait]
pub trait UnitOfWorkSession: Send + Sync + Sized {
    async fn commit(self) -> Result<(), RepositoryError>;

    async fn rollback(self) -> Result<(), RepositoryError>;
}

/// Everything the letter registry needs from one session.
///
/// Sequence allocation is not part of a session: it is provided by the unit
/// of work itself and commits independently.
pub trait LetterSession:
    UnitOfWorkSession
    + AppendAudit
    + CreateBatch<LetterModel>
    + UpdateBatch<LetterModel>
    + Load<LetterModel>
    + FindLetters
    + LoadAudits<AuditLogModel>
{
}

impl<S> LetterSession for S where
    S: UnitOfWorkSession
        + AppendAudit
        + CreateBatch<LetterModel>
        + UpdateBatch<LetterModel>
        + Load<LetterModel>
        + FindLetters
        + LoadAudits<AuditLogModel>
{
}
