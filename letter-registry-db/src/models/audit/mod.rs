pub mod audit_log;
pub mod audited;

pub use audit_log::*;
pub use audited::*;
