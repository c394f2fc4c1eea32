use heapless::String as HeaplessString;
use serde::Serialize;
use std::hash::Hasher;
use twox_hash::XxHash64;

use crate::repository::error::RepositoryError;

/// Hashes serializable data into an i64 using CBOR serialization and XxHash64.
///
/// This provides a stable hash across different runs and systems by:
/// - Serializing the data to CBOR format (deterministic binary representation)
/// - Using XxHash64 with a fixed seed (0) for consistent hashing
pub fn hash_as_i64<T: Serialize>(data: &T) -> Result<i64, RepositoryError> {
    let mut hasher = XxHash64::with_seed(0);
    let mut cbor = Vec::new();
    ciborium::ser::into_writer(data, &mut cbor)
        .map_err(|e| RepositoryError::Serialization(format!("Failed to serialize data for hashing: {e}")))?;
    hasher.write(&cbor);
    Ok(hasher.finish() as i64)
}

/// Copies `value` into a bounded string, naming `field` when it does not fit.
pub fn to_heapless<const N: usize>(field: &str, value: &str) -> Result<HeaplessString<N>, RepositoryError> {
    HeaplessString::try_from(value)
        .map_err(|_| RepositoryError::Invalid(format!("Value for '{field}' is too long (max {N} bytes)")))
}

/// Optional variant of [`to_heapless`].
pub fn to_optional_heapless<const N: usize>(
    field: &str,
    value: Option<&str>,
) -> Result<Option<HeaplessString<N>>, RepositoryError> {
    value.map(|v| to_heapless(field, v)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        name: &'static str,
        count: i32,
    }

    #[test]
    fn test_hash_is_stable_and_content_sensitive() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let a = hash_as_i64(&Sample { name: "letter", count: 1 })?;
        let b = hash_as_i64(&Sample { name: "letter", count: 1 })?;
        let c = hash_as_i64(&Sample { name: "letter", count: 2 })?;
        assert_eq!(a, b);
        assert_ne!(a, c);
        Ok(())
    }

    #[test]
    fn test_to_heapless_bounds() {
        let ok: Result<HeaplessString<4>, _> = to_heapless("code", "TCI");
        assert_eq!(ok.map(|s| s.to_string()).ok().as_deref(), Some("TCI"));

        let too_long: Result<HeaplessString<2>, _> = to_heapless("code", "TCI");
        assert!(matches!(too_long, Err(RepositoryError::Invalid(msg)) if msg.contains("code")));

        let none: Option<HeaplessString<4>> = to_optional_heapless("notes", None).ok().flatten();
        assert!(none.is_none());
    }
}
