//! Recording session managing per-port cassette recorders.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::recorder::CassetteRecorder;

/// Manages per-port `CassetteRecorder` instances for a recording session.
///
/// Each port gets its own recorder writing to a separate cassette file in a
/// timestamped directory.
pub struct RecordingSession {
    /// Recorder for shell interactions.
    pub shell: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for explorer interactions.
    pub explorer: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for filesystem interactions.
    pub fs: Arc<Mutex<CassetteRecorder>>,
    /// Output directory containing all cassette files.
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Create a new recording session under `root/<timestamp>/`.
    ///
    /// Each `(var, value)` in `secrets` is redacted from every cassette.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The session directory already exists
    /// - The directory cannot be created
    pub fn new_in(root: &Path, secrets: &[(&str, &str)]) -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let output_dir = root.join(&timestamp);

        if output_dir.exists() {
            return Err(format!("Cassette directory already exists: {}", output_dir.display()));
        }

        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Failed to create cassette directory: {e}"))?;

        let make_recorder = |port: &str| -> Arc<Mutex<CassetteRecorder>> {
            let path = output_dir.join(format!("{port}.cassette.yaml"));
            let recorder = secrets.iter().fold(
                CassetteRecorder::new(path, format!("{timestamp}-{port}")),
                |rec, (var, value)| rec.redacting(var, value),
            );
            Arc::new(Mutex::new(recorder))
        };

        Ok(Self {
            shell: make_recorder("shell"),
            explorer: make_recorder("explorer"),
            fs: make_recorder("fs"),
            output_dir,
        })
    }

    /// Directory the cassettes are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Finish all recorders and write cassette files to disk.
    ///
    /// Every adapter holding a recorder must have been dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if a recorder is still shared or a cassette file
    /// cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        fn finish_one(arc: Arc<Mutex<CassetteRecorder>>, port: &str) -> Result<(), String> {
            let recorder = Arc::try_unwrap(arc)
                .map_err(|_| format!("Recording adapter for {port} still has references"))?
                .into_inner()
                .map_err(|e| format!("Recorder lock for {port} poisoned: {e}"))?;
            recorder.finish().map_err(|e| format!("Failed to write {port} cassette: {e}"))?;
            Ok(())
        }

        finish_one(self.shell, "shell")?;
        finish_one(self.explorer, "explorer")?;
        finish_one(self.fs, "fs")?;

        Ok(self.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_creates_output_directory_and_finishes() {
        let root = tempfile::tempdir().unwrap();
        let session = RecordingSession::new_in(root.path(), &[]).unwrap();
        let dir = session.output_dir().to_path_buf();
        assert!(dir.starts_with(root.path()));
        assert!(dir.exists(), "Output directory should exist after new_in()");

        let finished = session.finish().unwrap();
        assert_eq!(finished, dir);
        assert!(dir.join("shell.cassette.yaml").exists());
        assert!(dir.join("explorer.cassette.yaml").exists());
        assert!(dir.join("fs.cassette.yaml").exists());
    }

    #[test]
    fn finish_fails_while_recorder_is_shared() {
        let root = tempfile::tempdir().unwrap();
        let session = RecordingSession::new_in(root.path(), &[]).unwrap();
        let _held = Arc::clone(&session.shell);

        let err = session.finish().unwrap_err();
        assert!(err.contains("shell still has references"));
    }
}
