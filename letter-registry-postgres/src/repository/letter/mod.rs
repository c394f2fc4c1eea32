pub mod letter_repository;
pub mod sequence_repository;

pub use letter_repository::LetterRepositoryImpl;
pub use sequence_repository::SequenceRepositoryImpl;
