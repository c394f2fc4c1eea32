//! Postgres store for the letter registry.
//!
//! [`PostgresRepositories`] is the [`UnitOfWork`](letter_registry_db::repository::UnitOfWork):
//! every session wraps one transaction shared by the letter and audit log
//! repositories. Running numbers are allocated on the pool, outside any
//! session.

pub mod config;
pub mod executor;
pub mod postgres_repositories;
pub mod repository;
pub mod utils;

pub use config::PostgresConfig;
pub use executor::Executor;
pub use postgres_repositories::{PostgresRepositories, PostgresSession};
pub use repository::audit::audit_log_repository::AuditLogRepositoryImpl;
pub use repository::letter::{LetterRepositoryImpl, SequenceRepositoryImpl};

#[cfg(test)]
pub mod test_helper;
