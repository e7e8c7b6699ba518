//! Live filesystem adapter using `std::fs`.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::error::PortError;
use crate::ports::filesystem::FileSystem;

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, PortError> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;
        // Stage next to the target so the rename stays on one filesystem.
        let mut staged = NamedTempFile::new_in(parent)?;
        staged.write_all(contents.as_bytes())?;
        staged.persist(path)?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn walk_files(&self, root: &Path) -> Result<Vec<PathBuf>, PortError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), PortError> {
        Ok(std::fs::create_dir_all(path)?)
    }

    fn remove_dir_all(&self, path: &Path) -> Result<(), PortError> {
        Ok(std::fs::remove_dir_all(path)?)
    }

    fn remove_file(&self, path: &Path) -> Result<(), PortError> {
        Ok(std::fs::remove_file(path)?)
    }
}
