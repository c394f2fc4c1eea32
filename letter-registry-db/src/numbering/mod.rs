//! Canonical letter numbers: `{ENTITY}/{CATEGORY}/{PROJECT}/{MM}/{YYYY}/{NNN}`.

use thiserror::Error;

/// Label used when a letter is not tied to a project.
pub const DEFAULT_PROJECT_LABEL: &str = "GENERAL";

pub const MAX_CODE_LEN: usize = 8;
pub const MAX_PROJECT_LABEL_LEN: usize = 50;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("{field} must not be empty")]
    EmptyCode { field: &'static str },

    #[error("{field} '{value}' must be 1-8 ASCII letters or digits")]
    InvalidCode { field: &'static str, value: String },

    #[error("{field} '{value}' is not a known code")]
    UnknownCode { field: &'static str, value: String },

    #[error("project label '{0}' must be at most 50 characters without control characters")]
    InvalidProjectLabel(String),

    #[error("month {0} is outside 1..=12")]
    InvalidMonth(i32),

    #[error("year {0} is not a 4-digit year")]
    InvalidYear(i32),

    #[error("running number {0} must be positive")]
    InvalidRunningNumber(i32),
}

/// Upper-cases and checks an entity or category code.
pub fn normalize_code(field: &'static str, code: &str) -> Result<String, FormatError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(FormatError::EmptyCode { field });
    }
    if code.len() > MAX_CODE_LEN || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(FormatError::InvalidCode {
            field,
            value: code.to_string(),
        });
    }
    Ok(code.to_ascii_uppercase())
}

/// Upper-cases the free-text project label; blank or missing labels become
/// `GENERAL`. The limit applies to the upper-cased form, counted in
/// characters.
pub fn normalize_project_label(label: Option<&str>) -> Result<String, FormatError> {
    let label = label.map(str::trim).unwrap_or_default();
    if label.is_empty() {
        return Ok(DEFAULT_PROJECT_LABEL.to_string());
    }
    let normalized = label.to_uppercase();
    if normalized.chars().count() > MAX_PROJECT_LABEL_LEN || normalized.chars().any(char::is_control) {
        return Err(FormatError::InvalidProjectLabel(label.to_string()));
    }
    Ok(normalized)
}

/// Composes the canonical number.
///
/// The running number is padded to at least three digits and widened past
/// 999, never truncated. Only the project label may contain `/`: the two
/// fields before it and the three after it never do, so the label is
/// recovered by splitting two fields from the left and three from the right.
/// Distinct inputs therefore give distinct numbers.
pub fn format_letter_number(
    entity_code: &str,
    category_code: &str,
    project_label: Option<&str>,
    month: i32,
    year: i32,
    running_number: i32,
) -> Result<String, FormatError> {
    let entity_code = normalize_code("entity code", entity_code)?;
    let category_code = normalize_code("category code", category_code)?;
    let project_label = normalize_project_label(project_label)?;
    if !(1..=12).contains(&month) {
        return Err(FormatError::InvalidMonth(month));
    }
    if !(1000..=9999).contains(&year) {
        return Err(FormatError::InvalidYear(year));
    }
    if running_number < 1 {
        return Err(FormatError::InvalidRunningNumber(running_number));
    }
    Ok(format!(
        "{entity_code}/{category_code}/{project_label}/{month:02}/{year}/{running_number:03}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_with_project_label() {
        assert_eq!(
            format_letter_number("TCI", "HR", Some("Tamara"), 3, 2025, 7).as_deref(),
            Ok("TCI/HR/TAMARA/03/2025/007")
        );
    }

    #[test]
    fn test_format_defaults_missing_label() {
        assert_eq!(
            format_letter_number("TS", "FIN", None, 11, 2025, 42).as_deref(),
            Ok("TS/FIN/GENERAL/11/2025/042")
        );
        assert_eq!(
            format_letter_number("TS", "FIN", Some("   "), 11, 2025, 42).as_deref(),
            Ok("TS/FIN/GENERAL/11/2025/042")
        );
    }

    #[test]
    fn test_running_number_widens_past_999() {
        assert_eq!(
            format_letter_number("TCI", "OPS", None, 1, 2026, 1000).as_deref(),
            Ok("TCI/OPS/GENERAL/01/2026/1000")
        );
        assert_eq!(
            format_letter_number("TCI", "OPS", None, 1, 2026, 12345).as_deref(),
            Ok("TCI/OPS/GENERAL/01/2026/12345")
        );
    }

    #[test]
    fn test_codes_are_case_normalized() {
        assert_eq!(
            format_letter_number("tci", "hr", Some("summer launch"), 12, 2025, 1).as_deref(),
            Ok("TCI/HR/SUMMER LAUNCH/12/2025/001")
        );
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(
            format_letter_number("TCI", "HR", None, 13, 2025, 1),
            Err(FormatError::InvalidMonth(13))
        );
        assert_eq!(
            format_letter_number("TCI", "HR", None, 0, 2025, 1),
            Err(FormatError::InvalidMonth(0))
        );
        assert_eq!(
            format_letter_number("TCI", "HR", None, 5, 25, 1),
            Err(FormatError::InvalidYear(25))
        );
        assert_eq!(
            format_letter_number("TCI", "HR", None, 5, 2025, 0),
            Err(FormatError::InvalidRunningNumber(0))
        );
        assert!(matches!(
            format_letter_number("", "HR", None, 5, 2025, 1),
            Err(FormatError::EmptyCode { .. })
        ));
        assert!(matches!(
            format_letter_number("T/CI", "HR", None, 5, 2025, 1),
            Err(FormatError::InvalidCode { .. })
        ));
    }

    #[test]
    fn test_free_text_labels() {
        assert_eq!(
            format_letter_number("TCI", "MKT", Some("KOL Campaign #2"), 5, 2025, 1).as_deref(),
            Ok("TCI/MKT/KOL CAMPAIGN #2/05/2025/001")
        );
        assert_eq!(
            format_letter_number("TCI", "MKT", Some("Tamara & Co"), 5, 2025, 1).as_deref(),
            Ok("TCI/MKT/TAMARA & CO/05/2025/001")
        );
        assert_eq!(
            format_letter_number("TCI", "MKT", Some("Café Launch"), 5, 2025, 1).as_deref(),
            Ok("TCI/MKT/CAFÉ LAUNCH/05/2025/001")
        );
    }

    #[test]
    fn test_slash_in_label_is_recoverable() -> Result<(), FormatError> {
        let number = format_letter_number("TCI", "HR", Some("A/B"), 5, 2025, 1)?;
        assert_eq!(number, "TCI/HR/A/B/05/2025/001");

        let fields: Vec<&str> = number.split('/').collect();
        let label = fields[2..fields.len() - 3].join("/");
        assert_eq!(label, "A/B");
        assert_ne!(number, format_letter_number("TCI", "HR", Some("A"), 5, 2025, 1)?);
        Ok(())
    }

    #[test]
    fn test_label_limits() {
        let fifty = "é".repeat(50);
        assert_eq!(normalize_project_label(Some(&fifty)), Ok("É".repeat(50)));
        assert!(matches!(
            normalize_project_label(Some(&"x".repeat(51))),
            Err(FormatError::InvalidProjectLabel(_))
        ));
        assert!(matches!(
            normalize_project_label(Some("line\nbreak")),
            Err(FormatError::InvalidProjectLabel(_))
        ));
    }
}
