use async_trait::async_trait;
use letter_registry_api::LetterFilter;

use crate::models::letter::LetterModel;
use crate::repository::error::RepositoryError;

/// Letters matching every criterion of the filter, newest first.
///
/// Access control is not applied here.
#[async_trait]
pub trait FindLetters: Send + Sync {
    async fn find_letters(&self, filter: &LetterFilter) -> Result<Vec<LetterModel>, RepositoryError>;
}

/// In-process evaluation of a filter; `search` must already be lower-cased.
pub fn letter_matches(letter: &LetterModel, filter: &LetterFilter, search: Option<&str>) -> bool {
    if let Some(entity_code) = filter.entity_code.as_deref() {
        if !letter.entity_code.as_str().eq_ignore_ascii_case(entity_code.trim()) {
            return false;
        }
    }
    if let Some(category_code) = filter.category_code.as_deref() {
        if !letter.category_code.as_str().eq_ignore_ascii_case(category_code.trim()) {
            return false;
        }
    }
    if filter.status.is_some_and(|status| status != letter.status) {
        return false;
    }
    if filter.year.is_some_and(|year| year != letter.year) {
        return false;
    }
    if filter.month.is_some_and(|month| month != letter.month) {
        return false;
    }
    match search {
        None => true,
        Some(term) => {
            letter.formatted_number.to_lowercase().contains(term)
                || letter.recipient_name.to_lowercase().contains(term)
                || letter
                    .recipient_company
                    .as_ref()
                    .is_some_and(|company| company.to_lowercase().contains(term))
        }
    }
}
