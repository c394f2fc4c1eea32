pub mod clock;
pub mod error;
pub mod letter_registry;

pub use clock::*;
pub use letter_registry::LetterRegistry;
