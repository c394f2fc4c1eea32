//! In-process store implementing every repository contract.
//!
//! Each repository call is atomic under one lock, which is enough for the
//! registry because every service operation performs a single write call.
//! Writes are therefore applied immediately and `commit` has nothing left to
//! do; `rollback` cannot undo them.

pub mod store;

pub use store::{InMemoryLetterStore, InMemorySession};
