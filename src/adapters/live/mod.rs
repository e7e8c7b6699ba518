//! Live adapters for real external interactions.

pub mod explorer;
pub mod filesystem;
pub mod shell;
