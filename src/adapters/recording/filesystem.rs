//! Recording adapter for the `FileSystem` port.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::{record_output, record_result};
use crate::cassette::recorder::CassetteRecorder;
use crate::error::PortError;
use crate::ports::FileSystem;

/// Records filesystem calls, including the contents read and written, while
/// delegating to an inner implementation.
pub struct RecordingFileSystem {
    inner: Box<dyn FileSystem>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingFileSystem {
    /// Wraps `inner`, appending to `recorder`.
    pub fn new(inner: Box<dyn FileSystem>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }

    fn record<T: Serialize>(&self, method: &str, path: &Path, result: &Result<T, PortError>) {
        record_result(&self.recorder, "fs", method, &PathInput { path }, result);
    }
}

#[derive(Serialize)]
struct PathInput<'a> {
    path: &'a Path,
}

#[derive(Serialize)]
struct WriteInput<'a> {
    path: &'a Path,
    contents: &'a str,
}

impl FileSystem for RecordingFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, PortError> {
        let result = self.inner.read_to_string(path);
        self.record("read_to_string", path, &result);
        result
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError> {
        let result = self.inner.write(path, contents);
        let input = WriteInput { path, contents };
        record_result(&self.recorder, "fs", "write", &input, &result);
        result
    }

    fn exists(&self, path: &Path) -> bool {
        let exists = self.inner.exists(path);
        record_output(&self.recorder, "fs", "exists", &PathInput { path }, &exists);
        exists
    }

    fn walk_files(&self, root: &Path) -> Result<Vec<PathBuf>, PortError> {
        let result = self.inner.walk_files(root);
        self.record("walk_files", root, &result);
        result
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), PortError> {
        let result = self.inner.create_dir_all(path);
        self.record("create_dir_all", path, &result);
        result
    }

    fn remove_dir_all(&self, path: &Path) -> Result<(), PortError> {
        let result = self.inner.remove_dir_all(path);
        self.record("remove_dir_all", path, &result);
        result
    }

    fn remove_file(&self, path: &Path) -> Result<(), PortError> {
        let result = self.inner.remove_file(path);
        self.record("remove_file", path, &result);
        result
    }
}
