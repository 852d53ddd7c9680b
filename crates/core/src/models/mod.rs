pub mod holding;
pub mod outcome;
pub mod settings;
pub mod summary;
