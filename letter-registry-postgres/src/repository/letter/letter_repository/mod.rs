pub mod create_batch;
pub mod find_letters;
pub mod load_batch;
pub mod repo_impl;
pub mod update_batch;

#[cfg(test)]
pub mod test_utils;

pub use repo_impl::LetterRepositoryImpl;
