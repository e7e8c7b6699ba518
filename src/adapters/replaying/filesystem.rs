//! Replaying adapter for the `FileSystem` port.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::PortError;
use crate::ports::FileSystem;

/// Answers filesystem calls from a recording; the disk is never touched.
///
/// Writes are matched against the recorded path and contents, so a replay
/// that would produce a different file is reported as drift.
pub struct ReplayingFileSystem {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingFileSystem {
    /// Serves `fs::*` interactions from `replayer`, in order per method.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn replay<T: DeserializeOwned>(&self, method: &str, input: &Value) -> Result<T, PortError> {
        let output = next_output(&self.replayer, "fs", method, input);
        replay_result(output, &format!("fs::{method}"))
    }
}

impl FileSystem for ReplayingFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, PortError> {
        self.replay("read_to_string", &json!({ "path": path }))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError> {
        self.replay("write", &json!({ "path": path, "contents": contents }))
    }

    fn exists(&self, path: &Path) -> bool {
        self.replay("exists", &json!({ "path": path })).unwrap_or_else(|e| {
            panic!("Malformed fs::exists interaction for {}: {e}", path.display())
        })
    }

    fn walk_files(&self, root: &Path) -> Result<Vec<PathBuf>, PortError> {
        self.replay("walk_files", &json!({ "path": root }))
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), PortError> {
        self.replay("create_dir_all", &json!({ "path": path }))
    }

    fn remove_dir_all(&self, path: &Path) -> Result<(), PortError> {
        self.replay("remove_dir_all", &json!({ "path": path }))
    }

    fn remove_file(&self, path: &Path) -> Result<(), PortError> {
        self.replay("remove_file", &json!({ "path": path }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;

    fn fs_cassette(calls: &[(&str, Value, Value)]) -> CassetteReplayer {
        let interactions = calls
            .iter()
            .zip(0..)
            .map(|((method, input, output), seq)| Interaction {
                seq,
                port: "fs".into(),
                method: (*method).into(),
                input: input.clone(),
                output: output.clone(),
            })
            .collect();
        CassetteReplayer::new(&Cassette {
            name: "fs".into(),
            recorded_at: Utc::now(),
            version: "0.1.0".into(),
            interactions,
        })
    }

    #[test]
    fn serves_recorded_files_without_touching_disk() {
        let fs = ReplayingFileSystem::new(fs_cassette(&[
            ("exists", json!({"path": "/work/Vault"}), json!({"ok": false})),
            (
                "walk_files",
                json!({"path": "/work/Vault/.download"}),
                json!({"ok": ["/work/Vault/.download/Vault/src/Vault.sol"]}),
            ),
            (
                "read_to_string",
                json!({"path": "/work/Vault/.download/Vault/src/Vault.sol"}),
                json!({"ok": "contract Vault {}\n"}),
            ),
            (
                "write",
                json!({"path": "/work/Vault/src/Vault.sol", "contents": "contract Vault {}\n"}),
                json!({"ok": null}),
            ),
        ]));

        assert!(!fs.exists(Path::new("/work/Vault")));
        let files = fs.walk_files(Path::new("/work/Vault/.download")).unwrap();
        assert_eq!(files, [PathBuf::from("/work/Vault/.download/Vault/src/Vault.sol")]);
        assert_eq!(fs.read_to_string(&files[0]).unwrap(), "contract Vault {}\n");
        fs.write(Path::new("/work/Vault/src/Vault.sol"), "contract Vault {}\n").unwrap();
        assert!(!Path::new("/work/Vault").exists());
    }

    #[test]
    fn recorded_io_error_is_returned() {
        let fs = ReplayingFileSystem::new(fs_cassette(&[(
            "remove_file",
            json!({"path": "/work/Vault/src/Counter.sol"}),
            json!({"err": "Permission denied (os error 13)"}),
        )]));
        let err = fs.remove_file(Path::new("/work/Vault/src/Counter.sol")).unwrap_err();
        assert!(err.to_string().contains("os error 13"));
    }

    #[test]
    #[should_panic(expected = "Malformed fs::exists interaction")]
    fn malformed_exists_answer_panics() {
        let fs = ReplayingFileSystem::new(fs_cassette(&[(
            "exists",
            json!({"path": "/work"}),
            json!({"ok": "yes"}),
        )]));
        let _ = fs.exists(Path::new("/work"));
    }
}
