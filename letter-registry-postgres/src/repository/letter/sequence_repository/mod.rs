pub mod allocate_next;
pub mod repo_impl;

pub use repo_impl::SequenceRepositoryImpl;
