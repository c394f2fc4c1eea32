use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidateLength, ValidateUrl};

use super::letter::LetterStatus;
use crate::error::{ApiError, ApiResult};

pub const MAX_NOTES_LEN: u64 = 500;
pub const MAX_URL_LEN: u64 = 500;

/// Input for issuing a new letter number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateLetterRequest {
    #[validate(length(min = 1, max = 8))]
    pub entity_code: String,

    #[validate(length(min = 1, max = 8))]
    pub category_code: String,

    /// Free-text project or campaign label; blank means `GENERAL`.
    #[validate(length(max = 50))]
    pub project_label: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub recipient_name: String,

    #[validate(length(max = 100))]
    pub recipient_company: Option<String>,

    #[validate(length(max = 500))]
    pub notes: Option<String>,

    #[serde(default)]
    pub is_confidential: bool,
}

/// Closed set of workflow fields a manager may change.
///
/// For `document_url` and `notes` the outer `Option` says whether the field is
/// touched at all, the inner one whether it is set or cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LetterStatus>,

    #[serde(default, deserialize_with = "deserialize_some", skip_serializing_if = "Option::is_none")]
    pub document_url: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_some", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

impl CreateLetterRequest {
    pub fn validate_fields(&self) -> ApiResult<()> {
        self.validate()?;
        if self.recipient_name.trim().is_empty() {
            return Err(ApiError::ValidationError("recipient_name: must not be blank".into()));
        }
        Ok(())
    }
}

fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

impl LetterPatch {
    pub fn status(status: LetterStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn notes(notes: Option<&str>) -> Self {
        Self {
            notes: Some(notes.map(str::to_string)),
            ..Default::default()
        }
    }

    pub fn document_url(url: Option<&str>) -> Self {
        Self {
            document_url: Some(url.map(str::to_string)),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.document_url.is_none() && self.notes.is_none()
    }

    /// Trims text fields and turns blank values into explicit clears.
    pub fn normalized(self) -> Self {
        fn blank_to_none(value: Option<Option<String>>) -> Option<Option<String>> {
            value.map(|inner| {
                inner
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
            })
        }
        Self {
            status: self.status,
            document_url: blank_to_none(self.document_url),
            notes: blank_to_none(self.notes),
        }
    }

    pub fn validate_fields(&self) -> ApiResult<()> {
        if let Some(Some(url)) = &self.document_url {
            if !url.validate_length(None, Some(MAX_URL_LEN), None) {
                return Err(ApiError::ValidationError(format!(
                    "document_url: must be at most {MAX_URL_LEN} characters"
                )));
            }
            if !url.validate_url() {
                return Err(ApiError::ValidationError(format!(
                    "document_url: not a valid URL: {url}"
                )));
            }
        }
        if let Some(Some(notes)) = &self.notes {
            if !notes.validate_length(None, Some(MAX_NOTES_LEN), None) {
                return Err(ApiError::ValidationError(format!(
                    "notes: must be at most {MAX_NOTES_LEN} characters"
                )));
            }
        }
        Ok(())
    }
}

/// Listing filters; all present criteria must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterFilter {
    pub entity_code: Option<String>,
    pub category_code: Option<String>,
    pub status: Option<LetterStatus>,
    pub year: Option<i32>,
    pub month: Option<i32>,
    /// Case-insensitive substring over number, recipient name and company.
    pub search: Option<String>,
}

impl LetterFilter {
    /// Search term trimmed and lower-cased, or `None` when blank.
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}
