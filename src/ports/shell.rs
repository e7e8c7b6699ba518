//! Shell executor port for running external commands.

use serde::{Deserialize, Serialize};

use crate::error::PortError;

/// The output of a shell command execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellOutput {
    /// The exit code of the process.
    pub exit_code: i32,
    /// The captured standard output.
    pub stdout: String,
    /// The captured standard error.
    pub stderr: String,
}

impl ShellOutput {
    /// Returns `true` when the process exited with status 0.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Executes shell commands.
///
/// Every external tool (forge, cast, surya, dot, sol2uml) is reached through
/// this port so a run can be recorded and replayed.
pub trait ShellExecutor: Send + Sync {
    /// Runs a command string in the system shell and returns its output.
    ///
    /// A non-zero exit status is not an error at this level.
    ///
    /// # Errors
    ///
    /// Returns an error if the shell itself cannot be spawned.
    fn run(&self, command: &str) -> Result<ShellOutput, PortError>;
}
