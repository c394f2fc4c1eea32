use chrono::{TimeZone, Utc};
use heapless::String as HeaplessString;
use letter_registry_api::LetterStatus;
use letter_registry_db::models::audit::{AuditLogModel, Audited};
use letter_registry_db::models::letter::LetterModel;
use letter_registry_db::workflow::{describe_created, diff_letters, summarize};
use uuid::Uuid;

/// A stored-shape letter under `TCI/{category}/GENERAL/03/2025`. Timestamps
/// have whole seconds so rows read back equal.
pub fn create_test_letter(category: &str, running_number: i32) -> LetterModel {
    let issued_at = Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap();
    LetterModel {
        id: Uuid::new_v4(),
        formatted_number: HeaplessString::try_from(
            format!("TCI/{category}/GENERAL/03/2025/{running_number:03}").as_str(),
        )
        .unwrap(),
        entity_code: HeaplessString::try_from("TCI").unwrap(),
        category_code: HeaplessString::try_from(category).unwrap(),
        project_label: HeaplessString::try_from("GENERAL").unwrap(),
        year: 2025,
        month: 3,
        running_number,
        recipient_name: HeaplessString::try_from("Budi").unwrap(),
        recipient_company: Some(HeaplessString::try_from("Acme Media").unwrap()),
        notes: None,
        status: LetterStatus::Draft,
        document_url: None,
        is_confidential: false,
        creator_id: Uuid::new_v4(),
        sent_by_id: None,
        sent_at: None,
        created_at: issued_at,
        updated_at: issued_at,
        revision: 1,
        antecedent_hash: 0,
        antecedent_audit_log_id: Uuid::nil(),
        hash: 0,
        audit_log_id: None,
    }
}

pub fn audited_letter(letter: LetterModel) -> Audited<LetterModel> {
    let entry = AuditLogModel::created(letter.id, letter.creator_id, describe_created(&letter), letter.created_at);
    Audited::new(letter, entry)
}

/// Pairs `after` with the `Updated` entry describing its difference from
/// `before`, bumping the revision.
pub fn audited_update(before: &LetterModel, mut after: LetterModel) -> Audited<LetterModel> {
    let summary = summarize(&diff_letters(before, &after));
    after.revision = before.revision + 1;
    let entry = AuditLogModel::updated(
        after.id,
        after.creator_id,
        summary.previous,
        summary.new,
        after.updated_at,
        after.revision,
    );
    Audited::new(after, entry)
}
