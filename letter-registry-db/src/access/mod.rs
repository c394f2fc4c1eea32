//! Who may see and who may manage letters.

use letter_registry_api::{Principal, Role};

use crate::models::letter::LetterModel;

pub struct AccessFilter;

impl AccessFilter {
    /// Non-confidential letters are readable by everyone; confidential ones by
    /// their creator and super administrators.
    pub fn can_read(letter: &LetterModel, principal: &Principal) -> bool {
        !letter.is_confidential || principal.has_role(Role::SuperAdmin) || principal.id == letter.creator_id
    }

    pub fn can_manage(principal: &Principal) -> bool {
        principal.has_any_role(&Role::MANAGERS)
    }
}
