use heapless::String as HeaplessString;
use letter_registry_db::repository::RepositoryError;
use sqlx::{postgres::PgRow, Row};
use std::str::FromStr;

/// A trait for converting a database row into a model.
pub trait TryFromRow<R>: Sized {
    fn try_from_row(row: &R) -> Result<Self, RepositoryError>;
}

/// Retrieves a required `HeaplessString` from a row.
pub fn get_heapless_string<const N: usize>(row: &PgRow, col_name: &str) -> Result<HeaplessString<N>, RepositoryError> {
    let s: String = row.try_get(col_name)?;
    HeaplessString::from_str(&s).map_err(|_| too_long(col_name, N))
}

/// Retrieves an optional `HeaplessString` from a row.
pub fn get_optional_heapless_string<const N: usize>(
    row: &PgRow,
    col_name: &str,
) -> Result<Option<HeaplessString<N>>, RepositoryError> {
    let s: Option<String> = row.try_get(col_name)?;
    s.map(|val| HeaplessString::from_str(&val))
        .transpose()
        .map_err(|_| too_long(col_name, N))
}

fn too_long(col_name: &str, max: usize) -> RepositoryError {
    RepositoryError::Invalid(format!("Value for column '{col_name}' is too long (max {max} bytes)"))
}

/// Escapes `%`, `_` and `\` so `term` matches literally inside a LIKE pattern.
pub fn like_contains(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_contains_escapes_wildcards() {
        assert_eq!(like_contains("budi"), "%budi%");
        assert_eq!(like_contains("50%_off\\"), "%50\\%\\_off\\\\%");
    }
}
