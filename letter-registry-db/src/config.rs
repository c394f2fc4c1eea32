use chrono::{DateTime, Datelike, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::numbering::{normalize_code, FormatError};
use crate::repository::AllocationRetryPolicy;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("utc_offset_minutes {0} is outside -1439..=1439")]
    InvalidUtcOffset(i32),
}

/// Registry settings: the code catalog, the allocator's retry policy and the
/// UTC offset of the issuing office.
///
/// An empty catalog list accepts any well-formed code for that field.
/// Timestamps are always stored in UTC; only the numbering period (year and
/// month of the sequence key) is taken in local time, so a letter issued at
/// 01:00 on the 1st in UTC+7 belongs to the new month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub entity_codes: Vec<String>,
    pub category_codes: Vec<String>,
    pub allocation_retry: AllocationRetryPolicy,
    /// 0 numbers by UTC months.
    pub utc_offset_minutes: i32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            entity_codes: vec!["TCI".into(), "TS".into()],
            category_codes: ["HR", "FIN", "OPS", "LEG", "MKT", "PRJ"]
                .into_iter()
                .map(String::from)
                .collect(),
            allocation_retry: AllocationRetryPolicy::default(),
            utc_offset_minutes: 0,
        }
    }
}

impl RegistryConfig {
    pub fn entity_code(&self, code: &str) -> Result<String, FormatError> {
        Self::catalog_code("entity_code", &self.entity_codes, code)
    }

    pub fn category_code(&self, code: &str) -> Result<String, FormatError> {
        Self::catalog_code("category_code", &self.category_codes, code)
    }

    /// `(year, month)` of `at` in the office's local time.
    pub fn period_of(&self, at: DateTime<Utc>) -> Result<(i32, i32), ConfigError> {
        let offset = self
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(ConfigError::InvalidUtcOffset(self.utc_offset_minutes))?;
        let local = at.with_timezone(&offset);
        Ok((local.year(), local.month() as i32))
    }

    fn catalog_code(field: &'static str, catalog: &[String], code: &str) -> Result<String, FormatError> {
        let code = normalize_code(field, code)?;
        if catalog.is_empty() || catalog.iter().any(|known| known.eq_ignore_ascii_case(&code)) {
            Ok(code)
        } else {
            Err(FormatError::UnknownCode { field, value: code })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let config = RegistryConfig::default();
        assert_eq!(config.entity_code(" tci "), Ok("TCI".to_string()));
        assert_eq!(config.category_code("fin"), Ok("FIN".to_string()));
        assert!(matches!(
            config.entity_code("ACME"),
            Err(FormatError::UnknownCode { field: "entity_code", .. })
        ));
    }

    #[test]
    fn test_empty_catalog_accepts_any_code() {
        let config = RegistryConfig {
            entity_codes: Vec::new(),
            ..RegistryConfig::default()
        };
        assert_eq!(config.entity_code("acme"), Ok("ACME".to_string()));
        assert!(config.entity_code("AC/ME").is_err());
    }

    #[test]
    fn test_period_follows_utc_offset() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        use chrono::TimeZone;

        let evening = Utc.with_ymd_and_hms(2025, 3, 31, 18, 0, 0).unwrap();
        assert_eq!(RegistryConfig::default().period_of(evening)?, (2025, 3));

        let jakarta = RegistryConfig {
            utc_offset_minutes: 7 * 60,
            ..RegistryConfig::default()
        };
        assert_eq!(jakarta.period_of(evening)?, (2025, 4));

        let new_year = Utc.with_ymd_and_hms(2026, 1, 1, 3, 0, 0).unwrap();
        let new_york = RegistryConfig {
            utc_offset_minutes: -5 * 60,
            ..RegistryConfig::default()
        };
        assert_eq!(new_york.period_of(new_year)?, (2025, 12));

        let broken = RegistryConfig {
            utc_offset_minutes: 24 * 60,
            ..RegistryConfig::default()
        };
        assert_eq!(broken.period_of(evening), Err(ConfigError::InvalidUtcOffset(1440)));
        Ok(())
    }

    #[test]
    fn test_deserialize_partial() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let config: RegistryConfig = serde_json::from_str(r#"{"allocation_retry": {"max_attempts": 5}}"#)?;
        assert_eq!(config.allocation_retry.max_attempts, 5);
        assert_eq!(config.allocation_retry.base_backoff_ms, 25);
        assert_eq!(config.entity_codes, vec!["TCI", "TS"]);
        assert_eq!(config.utc_offset_minutes, 0);
        Ok(())
    }
}
