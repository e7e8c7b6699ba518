//! Filesystem port for file I/O operations.

use std::path::{Path, PathBuf};

use crate::error::PortError;

/// Provides filesystem access for reading and writing project files.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String, PortError>;

    /// Writes the given contents to a file, creating or overwriting it.
    ///
    /// Implementations replace the file atomically: readers see either the
    /// old contents or the new ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, disk full, etc.).
    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError>;

    /// Returns `true` if the path exists on the filesystem.
    fn exists(&self, path: &Path) -> bool;

    /// Lists every regular file below `root`, recursively, sorted by path.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be read.
    fn walk_files(&self, root: &Path) -> Result<Vec<PathBuf>, PortError>;

    /// Creates a directory and all missing parents.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> Result<(), PortError>;

    /// Removes a directory and everything in it.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be removed.
    fn remove_dir_all(&self, path: &Path) -> Result<(), PortError>;

    /// Removes a single file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be removed.
    fn remove_file(&self, path: &Path) -> Result<(), PortError>;
}
