//! Replaying adapter for the `ShellExecutor` port.

use std::sync::Mutex;

use serde_json::json;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::PortError;
use crate::ports::shell::{ShellExecutor, ShellOutput};

/// Answers commands with recorded outputs; nothing is executed.
pub struct ReplayingShellExecutor {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingShellExecutor {
    /// Serves `shell::run` interactions from `replayer`, in order.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl ShellExecutor for ReplayingShellExecutor {
    fn run(&self, command: &str) -> Result<ShellOutput, PortError> {
        let output = next_output(&self.replayer, "shell", "run", &json!({ "command": command }));
        replay_result(output, "shell::run")
    }
}
