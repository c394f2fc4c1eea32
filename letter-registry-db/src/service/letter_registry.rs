use async_trait::async_trait;
use heapless::String as HeaplessString;
use letter_registry_api::{
    ApiError, ApiResult, CreateLetterRequest, Letter, LetterAuditEntry, LetterFilter, LetterPatch, LetterService,
    LetterStatus, Principal, PrincipalProvider,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::access::AccessFilter;
use crate::config::RegistryConfig;
use crate::models::audit::{AuditLogModel, Audited};
use crate::models::letter::{LetterModel, SequenceKey};
use crate::numbering::{format_letter_number, normalize_project_label};
use crate::repository::{
    AllocateSequence, CreateBatch, FindLetters, LetterSession, Load, LoadAudits, PageRequest, RepositoryError,
    UnitOfWork, UnitOfWorkSession, UpdateBatch,
};
use crate::service::clock::{not_before, Clock, SystemClock};
use crate::utils::{to_heapless, to_optional_heapless};
use crate::workflow::{apply_patch, describe_created, diff_letters, is_backward, summarize};

/// Letter registry over any store providing a [`LetterSession`].
///
/// Each call runs in its own session. Creation checks and builds the whole
/// record before it allocates the running number; the allocation is never
/// undone, so only a letter that fails to persist leaves a gap in its
/// sequence, never a duplicate.
pub struct LetterRegistry<U: UnitOfWork> {
    unit_of_work: U,
    config: RegistryConfig,
    clock: Arc<dyn Clock>,
}

impl<U> LetterRegistry<U>
where
    U: UnitOfWork + AllocateSequence,
    U::Session: LetterSession,
{
    pub fn new(unit_of_work: U, config: RegistryConfig) -> Self {
        Self {
            unit_of_work,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    #[tracing::instrument(skip_all, fields(principal = %principal.id))]
    async fn issue(&self, principal: &Principal, request: CreateLetterRequest) -> ApiResult<Letter> {
        request.validate_fields()?;
        let entity_code = self.config.entity_code(&request.entity_code)?;
        let category_code = self.config.category_code(&request.category_code)?;
        let project_label = normalize_project_label(request.project_label.as_deref())?;

        let now = self.clock.now();
        let (year, month) = self
            .config
            .period_of(now)
            .map_err(|error| ApiError::InternalError(error.to_string()))?;
        let key = SequenceKey {
            entity_code: to_heapless("entity_code", &entity_code)?,
            category_code: to_heapless("category_code", &category_code)?,
            year,
            month,
        };

        // Everything that can reject the request happens before a number is
        // taken; the number and the formatted form are filled in afterwards.
        let mut letter = LetterModel {
            id: Uuid::new_v4(),
            formatted_number: HeaplessString::new(),
            entity_code: key.entity_code.clone(),
            category_code: key.category_code.clone(),
            project_label: to_heapless("project_label", &project_label)?,
            year,
            month,
            running_number: 0,
            recipient_name: to_heapless("recipient_name", request.recipient_name.trim())?,
            recipient_company: to_optional_heapless("recipient_company", non_blank(request.recipient_company.as_deref()))?,
            notes: to_optional_heapless("notes", non_blank(request.notes.as_deref()))?,
            status: LetterStatus::Draft,
            document_url: None,
            is_confidential: request.is_confidential,
            creator_id: principal.id,
            sent_by_id: None,
            sent_at: None,
            created_at: now,
            updated_at: now,
            revision: 1,
            antecedent_hash: 0,
            antecedent_audit_log_id: Uuid::nil(),
            hash: 0,
            audit_log_id: None,
        };
        format_letter_number(&entity_code, &category_code, Some(&project_label), month, year, 1)?;

        let running_number = self.unit_of_work.allocate_next(&key).await.map_err(|error| {
            tracing::warn!(%key, %error, "sequence allocation failed");
            ApiError::AllocationFailed(format!("{key}: {error}"))
        })?;
        let formatted_number =
            format_letter_number(&entity_code, &category_code, Some(&project_label), month, year, running_number)?;
        letter.running_number = running_number;
        letter.formatted_number = to_heapless("formatted_number", &formatted_number)?;

        let session = self.unit_of_work.start_session().await?;
        let entry = AuditLogModel::created(letter.id, principal.id, describe_created(&letter), now);

        let created = match session.create_batch(vec![Audited::new(letter, entry)]).await {
            Ok(mut saved) => saved
                .pop()
                .ok_or_else(|| ApiError::InternalError("store returned no letter".into()))?,
            Err(error) => {
                tracing::warn!(%key, running_number, %error, "letter not persisted, running number burned");
                discard(session).await;
                return Err(error.into());
            }
        };
        session.commit().await?;

        tracing::info!(letter_id = %created.id, number = %created.formatted_number, "letter issued");
        Ok(created.into())
    }

    #[tracing::instrument(skip_all, fields(principal = %principal.id, letter_id = %id))]
    async fn change(&self, principal: &Principal, id: Uuid, patch: LetterPatch) -> ApiResult<Letter> {
        if !AccessFilter::can_manage(principal) {
            return Err(ApiError::Forbidden(format!("principal {} may not manage letters", principal.id)));
        }
        let patch = patch.normalized();
        patch.validate_fields()?;

        let session = self.unit_of_work.start_session().await?;
        let current = session.load(id).await?;
        if !AccessFilter::can_read(&current, principal) {
            return Err(ApiError::Forbidden(format!("letter {id} is confidential")));
        }

        let now = not_before(self.clock.now(), current.updated_at);
        let mut next = apply_patch(&current, &patch, principal.id, now)?;
        let changes = diff_letters(&current, &next);
        if changes.is_empty() {
            tracing::debug!("patch changes nothing");
            session.commit().await?;
            return Ok(current.into());
        }
        if is_backward(current.status, next.status) {
            tracing::warn!(from = %current.status, to = %next.status, "letter status moved backward");
        }

        next.updated_at = now;
        next.revision = current.revision + 1;
        let summary = summarize(&changes);
        let entry = AuditLogModel::updated(id, principal.id, summary.previous, summary.new, now, next.revision);

        let updated = match session.update_batch(vec![Audited::new(next, entry)]).await {
            Ok(mut saved) => saved
                .pop()
                .ok_or_else(|| ApiError::InternalError("store returned no letter".into()))?,
            Err(error) => {
                if matches!(error, RepositoryError::Conflict(_)) {
                    tracing::warn!("letter changed since it was read");
                }
                discard(session).await;
                return Err(error.into());
            }
        };
        session.commit().await?;

        tracing::info!(revision = updated.revision, status = %updated.status, "letter updated");
        Ok(updated.into())
    }

    async fn readable(&self, session: &U::Session, principal: &Principal, id: Uuid) -> ApiResult<LetterModel> {
        let letter = session.load(id).await?;
        if !AccessFilter::can_read(&letter, principal) {
            return Err(ApiError::Forbidden(format!("letter {id} is confidential")));
        }
        Ok(letter)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

async fn discard<S: UnitOfWorkSession>(session: S) {
    if let Err(error) = session.rollback().await {
        tracing::warn!(%error, "rollback failed");
    }
}

#[async_trait]
impl<U> LetterService for LetterRegistry<U>
where
    U: UnitOfWork + AllocateSequence + 'static,
    U::Session: LetterSession + 'static,
{
    async fn create_letter(&self, session: &dyn PrincipalProvider, request: CreateLetterRequest) -> ApiResult<Letter> {
        let principal = session.current_principal().await?;
        self.issue(&principal, request).await
    }

    async fn update_letter(&self, session: &dyn PrincipalProvider, id: Uuid, patch: LetterPatch) -> ApiResult<Letter> {
        let principal = session.current_principal().await?;
        self.change(&principal, id, patch).await
    }

    async fn get_letter(&self, session: &dyn PrincipalProvider, id: Uuid) -> ApiResult<Letter> {
        let principal = session.current_principal().await?;
        let store = self.unit_of_work.start_session().await?;
        let letter = self.readable(&store, &principal, id).await?;
        store.commit().await?;
        Ok(letter.into())
    }

    async fn list_letters(&self, session: &dyn PrincipalProvider, filter: LetterFilter) -> ApiResult<Vec<Letter>> {
        let principal = session.current_principal().await?;
        let store = self.unit_of_work.start_session().await?;
        let letters = store.find_letters(&filter).await?;
        store.commit().await?;

        Ok(letters
            .into_iter()
            .filter(|letter| AccessFilter::can_read(letter, &principal))
            .map(Letter::from)
            .collect())
    }

    async fn audit_trail(&self, session: &dyn PrincipalProvider, id: Uuid) -> ApiResult<Vec<LetterAuditEntry>> {
        let principal = session.current_principal().await?;
        let store = self.unit_of_work.start_session().await?;
        self.readable(&store, &principal, id).await?;

        let mut entries = Vec::new();
        let mut page = PageRequest::default();
        loop {
            let batch = store.load_audits(id, page).await?;
            let has_more = batch.has_more();
            entries.extend(batch.items.into_iter().map(LetterAuditEntry::from));
            if !has_more {
                break;
            }
            page = page.next();
        }
        store.commit().await?;
        Ok(entries)
    }
}
