use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Workflow status of an issued letter.
///
/// The forward path is `Draft -> ReadyToSend -> Sent -> Closed`. Any open
/// status may jump straight to `Closed`, and `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "letter_status", rename_all = "snake_case"))]
pub enum LetterStatus {
    Draft,
    ReadyToSend,
    Sent,
    Closed,
}

impl LetterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LetterStatus::Draft => "draft",
            LetterStatus::ReadyToSend => "ready_to_send",
            LetterStatus::Sent => "sent",
            LetterStatus::Closed => "closed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LetterStatus::Closed)
    }
}

impl Default for LetterStatus {
    fn default() -> Self {
        LetterStatus::Draft
    }
}

impl fmt::Display for LetterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LetterStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(LetterStatus::Draft),
            "ready_to_send" => Ok(LetterStatus::ReadyToSend),
            "sent" => Ok(LetterStatus::Sent),
            "closed" => Ok(LetterStatus::Closed),
            _ => Err(format!("Invalid LetterStatus: {s}")),
        }
    }
}

/// Kind of change recorded by an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "letter_audit_action", rename_all = "snake_case"))]
pub enum AuditAction {
    Created,
    Updated,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditAction::Created => f.write_str("created"),
            AuditAction::Updated => f.write_str("updated"),
        }
    }
}

/// An issued letter as seen by callers of the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Letter {
    pub id: Uuid,
    /// Canonical number, e.g. `TCI/HR/GENERAL/03/2025/007`.
    pub formatted_number: String,
    pub entity_code: String,
    pub category_code: String,
    pub project_label: String,
    pub year: i32,
    pub month: i32,
    pub running_number: i32,
    pub recipient_name: String,
    pub recipient_company: Option<String>,
    pub notes: Option<String>,
    pub status: LetterStatus,
    pub document_url: Option<String>,
    pub is_confidential: bool,
    pub creator_id: Uuid,
    pub sent_by_id: Option<Uuid>,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Number of recorded changes, starting at 1 on creation.
    pub revision: i32,
    /// Opaque concurrency token; changes on every mutation.
    pub version: i64,
}

/// One immutable entry of a letter's audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterAuditEntry {
    pub id: Uuid,
    pub letter_id: Uuid,
    pub action: AuditAction,
    pub previous_summary: Option<String>,
    pub new_summary: String,
    pub actor_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub revision: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&LetterStatus::ReadyToSend).unwrap();
        assert_eq!(json, "\"ready_to_send\"");
        let parsed: LetterStatus = serde_json::from_str("\"sent\"").unwrap();
        assert_eq!(parsed, LetterStatus::Sent);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("closed".parse::<LetterStatus>(), Ok(LetterStatus::Closed));
        assert!("archived".parse::<LetterStatus>().is_err());
        assert_eq!(LetterStatus::default(), LetterStatus::Draft);
        assert!(LetterStatus::Closed.is_terminal());
        assert!(!LetterStatus::Sent.is_terminal());
    }
}
