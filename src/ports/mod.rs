//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the application core and an
//! external system (filesystem, shell, block explorer). Implementations live
//! in `src/adapters/`.

pub mod explorer;
pub mod filesystem;
pub mod shell;

pub use explorer::{ContractMetadata, ExplorerClient, ExplorerFuture};
pub use filesystem::FileSystem;
pub use shell::{ShellExecutor, ShellOutput};
