//! Persistence models, repository contracts and the letter registry service.
//!
//! The service in [`service`] is generic over a [`repository::UnitOfWork`];
//! `letter-registry-postgres` provides the production store and
//! [`repository::memory`] an in-process one.

pub mod access;
pub mod config;
pub mod models;
pub mod numbering;
pub mod repository;
pub mod service;
pub mod utils;
pub mod workflow;

pub use config::RegistryConfig;
pub use service::LetterRegistry;
