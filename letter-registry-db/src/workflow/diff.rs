use crate::models::letter::LetterModel;

/// One workflow field whose value differs between two states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: &'static str,
    pub before: String,
    pub after: String,
}

/// Audit summaries for one change: old and new values of every changed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSummary {
    pub previous: String,
    pub new: String,
}

fn describe_text(value: Option<&str>) -> String {
    match value {
        Some(text) => format!("\"{text}\""),
        None => "(none)".to_string(),
    }
}

/// Differences in the mutable fields, in a fixed order.
pub fn diff_letters(before: &LetterModel, after: &LetterModel) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    if before.status != after.status {
        changes.push(FieldChange {
            field: "status",
            before: before.status.to_string(),
            after: after.status.to_string(),
        });
    }
    if before.document_url != after.document_url {
        changes.push(FieldChange {
            field: "document_url",
            before: describe_text(before.document_url.as_deref()),
            after: describe_text(after.document_url.as_deref()),
        });
    }
    if before.notes != after.notes {
        changes.push(FieldChange {
            field: "notes",
            before: describe_text(before.notes.as_deref()),
            after: describe_text(after.notes.as_deref()),
        });
    }
    changes
}

pub fn summarize(changes: &[FieldChange]) -> ChangeSummary {
    let join = |side: fn(&FieldChange) -> &str| {
        changes
            .iter()
            .map(|change| format!("{}: {}", change.field, side(change)))
            .collect::<Vec<_>>()
            .join("; ")
    };
    ChangeSummary {
        previous: join(|change| change.before.as_str()),
        new: join(|change| change.after.as_str()),
    }
}

pub fn describe_created(letter: &LetterModel) -> String {
    let mut summary = format!(
        "issued {} to {} (status: {})",
        letter.formatted_number, letter.recipient_name, letter.status
    );
    if letter.is_confidential {
        summary.push_str(", confidential");
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::letter::test_utils::create_test_letter;
    use heapless::String as HeaplessString;
    use letter_registry_api::LetterStatus;
    use uuid::Uuid;

    #[test]
    fn test_no_changes() {
        let letter = create_test_letter(Uuid::new_v4(), false);
        assert!(diff_letters(&letter, &letter.clone()).is_empty());
    }

    #[test]
    fn test_all_changes_in_one_summary() {
        let before = create_test_letter(Uuid::new_v4(), false);
        let mut after = before.clone();
        after.status = LetterStatus::Sent;
        after.notes = Some(HeaplessString::try_from("posted").unwrap());

        let changes = diff_letters(&before, &after);
        assert_eq!(changes.len(), 2);

        let summary = summarize(&changes);
        assert_eq!(summary.previous, "status: draft; notes: (none)");
        assert_eq!(summary.new, "status: sent; notes: \"posted\"");
    }

    #[test]
    fn test_describe_created() {
        let letter = create_test_letter(Uuid::new_v4(), true);
        assert_eq!(
            describe_created(&letter),
            "issued TCI/HR/GENERAL/03/2025/001 to Budi (status: draft), confidential"
        );
    }
}
