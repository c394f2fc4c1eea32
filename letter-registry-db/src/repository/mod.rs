pub mod allocate_sequence;
pub mod append_audit;
pub mod create_batch;
pub mod error;
pub mod find_letters;
pub mod load;
pub mod load_audits;
pub mod load_batch;
pub mod memory;
pub mod pagination;
pub mod unit_of_work;
pub mod update_batch;

// Re-exports
pub use allocate_sequence::*;
pub use append_audit::*;
pub use create_batch::*;
pub use error::*;
pub use find_letters::*;
pub use load::*;
pub use load_audits::*;
pub use load_batch::*;
pub use pagination::*;
pub use unit_of_work::*;
pub use update_batch::*;
