//! Recording adapter for the `ShellExecutor` port.

use std::sync::{Arc, Mutex};

use serde_json::json;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::error::PortError;
use crate::ports::{ShellExecutor, ShellOutput};

/// Runs commands on an inner executor and records each command line with
/// its exit code and captured output.
pub struct RecordingShellExecutor {
    inner: Box<dyn ShellExecutor>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingShellExecutor {
    /// Wraps `inner`, appending to `recorder`.
    pub fn new(inner: Box<dyn ShellExecutor>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl ShellExecutor for RecordingShellExecutor {
    fn run(&self, command: &str) -> Result<ShellOutput, PortError> {
        let result = self.inner.run(command);
        if let Ok(output) = &result {
            tracing::trace!(%command, exit_code = output.exit_code, "recorded shell command");
        }
        record_result(&self.recorder, "shell", "run", &json!({ "command": command }), &result);
        result
    }
}
