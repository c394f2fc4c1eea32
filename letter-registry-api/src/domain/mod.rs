pub mod letter;
pub mod principal;
pub mod request;

pub use letter::*;
pub use principal::*;
pub use request::*;
