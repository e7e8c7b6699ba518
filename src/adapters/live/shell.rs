//! Live shell executor using `std::process::Command`.

use std::process::Command;

use crate::error::PortError;
use crate::ports::shell::{ShellExecutor, ShellOutput};

/// Live shell executor that runs commands via `sh -c`.
///
/// Extra environment variables are handed to every child, so secrets can be
/// referenced as `"$VAR"` instead of appearing in the command text.
#[derive(Debug, Default)]
pub struct LiveShellExecutor {
    envs: Vec<(String, String)>,
}

impl LiveShellExecutor {
    /// Creates an executor that passes only the inherited environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable to the environment of every command.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }
}

impl ShellExecutor for LiveShellExecutor {
    fn run(&self, command: &str) -> Result<ShellOutput, PortError> {
        tracing::debug!(%command, "sh -c");
        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .envs(self.envs.iter().map(|(k, v)| (k, v)))
            .output()?;
        Ok(ShellOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
