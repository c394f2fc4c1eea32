use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite key scoping one independent numbering sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SequenceKey {
    pub entity_code: HeaplessString<8>,
    pub category_code: HeaplessString<8>,
    pub year: i32,
    /// 1..=12
    pub month: i32,
}

impl fmt::Display for SequenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{:04}-{:02}",
            self.entity_code, self.category_code, self.year, self.month
        )
    }
}

/// # Documentation
/// One counter row per composite key. `last_issued` is the highest running
/// number handed out for the key; numbers `1..=last_issued` have all been
/// issued exactly once (some may be burned by failed creations, none reused).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceCounterModel {
    pub key: SequenceKey,
    pub last_issued: i32,
}
