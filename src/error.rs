//! Error taxonomy for a scaffold run.
//!
//! Every variant maps to exit status 1. Nothing is retried.

use std::path::PathBuf;

use crate::flatten::FlattenError;
use crate::scaffold::ScaffoldError;

/// Boxed error type returned by port implementations.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that abort a scaffold run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad command-line arguments; the message carries the usage text.
    #[error("{0}")]
    Usage(String),

    /// A required external command is not on `PATH`.
    #[error("required command `{0}` not found on PATH")]
    MissingCommand(String),

    /// A required environment variable is unset or empty.
    #[error("environment variable `{0}` is not set")]
    MissingEnv(&'static str),

    /// The destination folder is already present.
    #[error("destination `{}` already exists", .0.display())]
    DestinationExists(PathBuf),

    /// An external command ran but exited unsuccessfully.
    #[error("`{command}` exited with status {status}: {stderr}")]
    CommandFailed {
        /// The command line that was run.
        command: String,
        /// Exit status reported by the process.
        status: i32,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// An external command produced output that could not be interpreted.
    #[error("unexpected output from `{command}`: {output:?}")]
    UnexpectedOutput {
        /// The command line that was run.
        command: String,
        /// The raw output.
        output: String,
    },

    /// The block-explorer lookup failed.
    #[error("block explorer: {0}")]
    Explorer(String),

    /// Import flattening failed.
    #[error(transparent)]
    Flatten(#[from] FlattenError),

    /// Scaffold generation failed.
    #[error(transparent)]
    Scaffold(#[from] ScaffoldError),

    /// A filesystem or process-spawn failure.
    #[error("{context}: {source}")]
    Io {
        /// What was being attempted.
        context: String,
        /// The underlying error.
        #[source]
        source: PortError,
    },
}

impl Error {
    /// Wraps a port error with a short description of the failed operation.
    pub fn io(context: impl Into<String>, source: PortError) -> Self {
        Self::Io { context: context.into(), source }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failed_includes_stderr() {
        let err = Error::CommandFailed {
            command: "forge init demo".into(),
            status: 1,
            stderr: "already initialized".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("forge init demo"));
        assert!(msg.contains("already initialized"));
    }

    #[test]
    fn destination_exists_names_path() {
        let err = Error::DestinationExists(PathBuf::from("Token"));
        assert_eq!(err.to_string(), "destination `Token` already exists");
    }
}
