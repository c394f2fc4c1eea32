pub mod diff;
pub mod transition;

pub use diff::*;
pub use transition::*;
