pub mod edit;
pub mod file;
