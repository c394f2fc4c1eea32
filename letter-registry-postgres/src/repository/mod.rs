pub mod audit;
pub mod db_init;
pub mod letter;
