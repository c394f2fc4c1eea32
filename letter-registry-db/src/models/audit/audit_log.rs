use chrono::{DateTime, Utc};
use letter_registry_api::{AuditAction, LetterAuditEntry};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::Identifiable;

/// # Documentation
/// - One immutable entry per recorded change of a letter: exactly one `Created`
///   entry at issuance, then one `Updated` entry per mutation carrying a
///   summary of every field that changed.
/// - Entries are append-only and are never rewritten or deleted.
/// - `revision` is the letter revision the change produced; together with
///   `letter_id` it is unique, and it orders the trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AuditLogModel {
    pub id: Uuid,
    pub letter_id: Uuid,
    pub action: AuditAction,
    /// Values of the changed fields before the change; `None` for `Created`.
    pub previous_summary: Option<String>,
    pub new_summary: String,
    pub actor_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub revision: i32,
}

impl AuditLogModel {
    pub fn created(letter_id: Uuid, actor_id: Uuid, summary: String, occurred_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            letter_id,
            action: AuditAction::Created,
            previous_summary: None,
            new_summary: summary,
            actor_id,
            occurred_at,
            revision: 1,
        }
    }

    pub fn updated(
        letter_id: Uuid,
        actor_id: Uuid,
        previous_summary: String,
        new_summary: String,
        occurred_at: DateTime<Utc>,
        revision: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            letter_id,
            action: AuditAction::Updated,
            previous_summary: Some(previous_summary),
            new_summary,
            actor_id,
            occurred_at,
            revision,
        }
    }
}

impl Identifiable for AuditLogModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl From<AuditLogModel> for LetterAuditEntry {
    fn from(model: AuditLogModel) -> Self {
        LetterAuditEntry {
            id: model.id,
            letter_id: model.letter_id,
            action: model.action,
            previous_summary: model.previous_summary,
            new_summary: model.new_summary,
            actor_id: model.actor_id,
            occurred_at: model.occurred_at,
            revision: model.revision,
        }
    }
}
