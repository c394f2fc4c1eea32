pub mod letter;
pub mod sequence;

pub use letter::*;
pub use sequence::*;
