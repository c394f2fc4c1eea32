pub mod letter_service;
pub mod principal_provider;

pub use letter_service::*;
pub use principal_provider::*;
