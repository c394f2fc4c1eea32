use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use letter_registry_api::{Letter, LetterStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::sequence::SequenceKey;
use crate::models::auditable::Auditable;
use crate::models::identifiable::Identifiable;
use crate::repository::error::RepositoryError;
use crate::utils::hash_as_i64;

/// # Documentation
/// Database model for an issued letter.
///
/// Identity fields (number, allocator inputs, recipient, confidentiality,
/// creator) are fixed at issuance. Workflow fields (`status`,
/// `document_url`, `notes`) change through audited updates only.
///
/// This entity is auditable: every stored state carries a hash used as the
/// optimistic concurrency token and the id of the audit entry that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterModel {
    pub id: Uuid,

    /// Canonical human-readable number, unique
    pub formatted_number: HeaplessString<256>,

    pub entity_code: HeaplessString<8>,
    pub category_code: HeaplessString<8>,

    /// Upper-cased project label, `GENERAL` when none was given
    pub project_label: HeaplessString<200>,

    pub year: i32,
    pub month: i32,

    /// Unique within (entity_code, category_code, year, month)
    pub running_number: i32,

    // Text limits are in characters; capacities are in bytes and hold
    // four bytes per character.
    pub recipient_name: HeaplessString<400>,
    pub recipient_company: Option<HeaplessString<400>>,
    pub notes: Option<HeaplessString<2000>>,

    pub status: LetterStatus,

    /// Link to the externally produced document body
    pub document_url: Option<HeaplessString<2000>>,

    pub is_confidential: bool,
    pub creator_id: Uuid,

    /// Set once, on the first transition into `Sent`; never cleared
    pub sent_by_id: Option<Uuid>,
    pub sent_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// 1 at creation, incremented on every recorded change
    pub revision: i32,

    /// Hash from the previous stored state (0 for initial create)
    pub antecedent_hash: i64,

    /// Reference to the previous audit log entry (Uuid::nil() for initial create)
    pub antecedent_audit_log_id: Uuid,

    /// Hash of the entity with hash field set to 0
    /// - 0: for new entities not yet created
    /// - Non-zero: computed hash, compared on update to detect concurrent writes
    pub hash: i64,

    /// Reference to the audit log entry that produced the stored state
    pub audit_log_id: Option<Uuid>,
}

impl LetterModel {
    pub fn sequence_key(&self) -> SequenceKey {
        SequenceKey {
            entity_code: self.entity_code.clone(),
            category_code: self.category_code.clone(),
            year: self.year,
            month: self.month,
        }
    }

    /// Stamps the audit chain of a letter about to be inserted.
    pub fn seal_created(&mut self, audit_log_id: Uuid) -> Result<(), RepositoryError> {
        self.antecedent_hash = 0;
        self.antecedent_audit_log_id = Uuid::nil();
        self.audit_log_id = Some(audit_log_id);
        self.hash = 0;
        self.hash = hash_as_i64(self)?;
        Ok(())
    }

    /// Stamps the audit chain of a modified letter.
    ///
    /// `self.hash` must still hold the hash of the state that was read.
    /// Returns `None` when nothing changed (the entity is left untouched),
    /// otherwise the hash the stored row must still carry for the write to
    /// succeed.
    pub fn seal_updated(&mut self, audit_log_id: Uuid) -> Result<Option<i64>, RepositoryError> {
        let previous_hash = self.hash;
        let previous_audit_log_id = self
            .audit_log_id
            .ok_or_else(|| RepositoryError::Invalid(format!("letter {} was never stored", self.id)))?;

        let mut entity_for_hashing = self.clone();
        entity_for_hashing.hash = 0;
        if hash_as_i64(&entity_for_hashing)? == previous_hash {
            return Ok(None);
        }

        self.antecedent_hash = previous_hash;
        self.antecedent_audit_log_id = previous_audit_log_id;
        self.audit_log_id = Some(audit_log_id);
        self.hash = 0;
        self.hash = hash_as_i64(self)?;
        Ok(Some(previous_hash))
    }
}

impl Identifiable for LetterModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl Auditable for LetterModel {
    fn get_audit_log_id(&self) -> Option<Uuid> {
        self.audit_log_id
    }

    fn get_hash(&self) -> i64 {
        self.hash
    }
}

impl From<LetterModel> for Letter {
    fn from(model: LetterModel) -> Self {
        Letter {
            id: model.id,
            formatted_number: model.formatted_number.to_string(),
            entity_code: model.entity_code.to_string(),
            category_code: model.category_code.to_string(),
            project_label: model.project_label.to_string(),
            year: model.year,
            month: model.month,
            running_number: model.running_number,
            recipient_name: model.recipient_name.to_string(),
            recipient_company: model.recipient_company.map(|s| s.to_string()),
            notes: model.notes.map(|s| s.to_string()),
            status: model.status,
            document_url: model.document_url.map(|s| s.to_string()),
            is_confidential: model.is_confidential,
            creator_id: model.creator_id,
            sent_by_id: model.sent_by_id,
            sent_at: model.sent_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
            revision: model.revision,
            version: model.hash,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use super::*;
    use chrono::TimeZone;

    pub fn create_test_letter(creator_id: Uuid, is_confidential: bool) -> LetterModel {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap();
        LetterModel {
            id: Uuid::new_v4(),
            formatted_number: HeaplessString::try_from("TCI/HR/GENERAL/03/2025/001").unwrap(),
            entity_code: HeaplessString::try_from("TCI").unwrap(),
            category_code: HeaplessString::try_from("HR").unwrap(),
            project_label: HeaplessString::try_from("GENERAL").unwrap(),
            year: 2025,
            month: 3,
            running_number: 1,
            recipient_name: HeaplessString::try_from("Budi").unwrap(),
            recipient_company: None,
            notes: None,
            status: LetterStatus::Draft,
            document_url: None,
            is_confidential,
            creator_id,
            sent_by_id: None,
            sent_at: None,
            created_at: now,
            updated_at: now,
            revision: 1,
            antecedent_hash: 0,
            antecedent_audit_log_id: Uuid::nil(),
            hash: 0,
            audit_log_id: None,
        }
    }
}
