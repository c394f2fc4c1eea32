use chrono::{DateTime, Utc};
use letter_registry_api::{ApiError, ApiResult, LetterPatch, LetterStatus};
use uuid::Uuid;

use crate::models::letter::LetterModel;
use crate::utils::to_optional_heapless;

fn rank(status: LetterStatus) -> u8 {
    match status {
        LetterStatus::Draft => 0,
        LetterStatus::ReadyToSend => 1,
        LetterStatus::Sent => 2,
        LetterStatus::Closed => 3,
    }
}

/// Only `Closed` is guarded: it is terminal. Every other move, including
/// backward ones such as `Sent -> Draft`, is accepted.
pub fn check_transition(from: LetterStatus, to: LetterStatus) -> ApiResult<()> {
    if from.is_terminal() && from != to {
        return Err(ApiError::ValidationError(format!(
            "invalid status transition: {from} -> {to} ({from} is terminal)"
        )));
    }
    Ok(())
}

pub fn is_backward(from: LetterStatus, to: LetterStatus) -> bool {
    rank(to) < rank(from)
}

/// Computes the state a patch would produce. The result may equal `current`.
///
/// Entering `Sent` stamps `sent_by_id` / `sent_at` the first time only; the
/// stamp survives later moves away from and back into `Sent`.
pub fn apply_patch(
    current: &LetterModel,
    patch: &LetterPatch,
    actor_id: Uuid,
    now: DateTime<Utc>,
) -> ApiResult<LetterModel> {
    let mut next = current.clone();

    if let Some(status) = patch.status {
        check_transition(current.status, status)?;
        if status == LetterStatus::Sent && current.status != LetterStatus::Sent && next.sent_at.is_none() {
            next.sent_by_id = Some(actor_id);
            next.sent_at = Some(now);
        }
        next.status = status;
    }
    if let Some(document_url) = &patch.document_url {
        next.document_url = to_optional_heapless("document_url", document_url.as_deref())?;
    }
    if let Some(notes) = &patch.notes {
        next.notes = to_optional_heapless("notes", notes.as_deref())?;
    }

    Ok(next)
}
