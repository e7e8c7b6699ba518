//! Replaying adapters that replay recorded interactions.

pub mod explorer;
pub mod filesystem;
pub mod shell;

pub use explorer::ReplayingExplorerClient;
pub use filesystem::ReplayingFileSystem;
pub use shell::ReplayingShellExecutor;

use std::sync::Mutex;

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;
use crate::error::PortError;

/// Pull the next recorded output for `port::method`.
///
/// Replay serves interactions in recorded order regardless of input; when the
/// recorded input differs from `input` a warning names both, since the run
/// has drifted from the recording.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
    input: &serde_json::Value,
) -> serde_json::Value {
    let mut replayer = replayer.lock().expect("replayer lock poisoned");
    let interaction = replayer.next_interaction(port, method);
    if interaction.input != *input {
        tracing::warn!(
            port,
            method,
            seq = interaction.seq,
            recorded = %interaction.input,
            requested = %input,
            "replay drifted from recording"
        );
    }
    interaction.output
}

/// Turn a recorded output back into a `Result`.
///
/// Expects `{"ok": <value>}` or `{"err": "message"}`; a bare value is treated
/// as `ok`.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: serde_json::Value,
    context: &str,
) -> Result<T, PortError> {
    if let Some(err) = output.get("err") {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(msg.into());
    }
    let value = output.get("ok").cloned().unwrap_or(output);
    serde_json::from_value(value)
        .map_err(|e| format!("{context}: failed to deserialize: {e}").into())
}
