use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::letter::{Letter, LetterAuditEntry};
use crate::domain::request::{CreateLetterRequest, LetterFilter, LetterPatch};
use crate::error::ApiResult;
use crate::service::principal_provider::PrincipalProvider;

/// Surface of the letter registry exposed to the UI / API layer.
///
/// Every call resolves its principal through `session`; a missing session
/// yields `Unauthenticated` before anything else happens.
#[async_trait]
pub trait LetterService: Send + Sync {
    /// Allocates the next running number for the letter's composite key and
    /// persists the letter in `draft` status.
    ///
    /// # Errors
    /// `ValidationError` for bad input, `AllocationFailed` when the sequence
    /// counter could not be advanced.
    async fn create_letter(
        &self,
        session: &dyn PrincipalProvider,
        request: CreateLetterRequest,
    ) -> ApiResult<Letter>;

    /// Applies a workflow patch. No-op patches return the letter unchanged.
    ///
    /// # Errors
    /// `NotFound`, `Forbidden`, `ValidationError`, or `Conflict` when the
    /// letter changed concurrently.
    async fn update_letter(
        &self,
        session: &dyn PrincipalProvider,
        id: Uuid,
        patch: LetterPatch,
    ) -> ApiResult<Letter>;

    async fn get_letter(&self, session: &dyn PrincipalProvider, id: Uuid) -> ApiResult<Letter>;

    /// Letters matching `filter` that the principal may read, newest first.
    async fn list_letters(
        &self,
        session: &dyn PrincipalProvider,
        filter: LetterFilter,
    ) -> ApiResult<Vec<Letter>>;

    /// Audit entries of one letter, most recent first.
    async fn audit_trail(
        &self,
        session: &dyn PrincipalProvider,
        id: Uuid,
    ) -> ApiResult<Vec<LetterAuditEntry>>;
}
