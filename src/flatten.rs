//! Import flattening.
//!
//! Collapses a nested source tree into one directory and rewrites every
//! import directive to `import "./<basename>";`. The rewrite itself is pure
//! ([`flatten_source`], [`flatten_files`]); [`flatten_dir`] wraps it with the
//! read and write phases over the [`FileSystem`] port.

use std::collections::BTreeMap;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::ports::FileSystem;

static QUOTED_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)"|'([^']*)'"#).expect("valid quoted path regex"));

const KEYWORD: &str = "import";

/// A source file read from the input tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path of the file, relative to the tree root or absolute.
    pub path: PathBuf,
    /// Full text contents.
    pub contents: String,
}

/// A file destined for the flat output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatFile {
    /// Basename the file is written under.
    pub name: String,
    /// Contents with imports rewritten.
    pub contents: String,
    /// Where the file came from.
    pub origin: PathBuf,
}

/// An import statement found in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDirective<'a> {
    /// Byte range from the `import` keyword through the closing `;`.
    pub span: Range<usize>,
    /// The referenced path, exactly as written between the quotes.
    pub path: &'a str,
    /// 1-based line the statement starts on.
    pub line: usize,
}

/// Errors raised while flattening.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlattenError {
    /// Two different files share a basename.
    #[error("`{name}` exists at both {} and {}", .first.display(), .second.display())]
    BasenameCollision {
        /// The shared basename.
        name: String,
        /// The file that claimed the name first.
        first: PathBuf,
        /// The conflicting file.
        second: PathBuf,
    },

    /// An import statement has no quoted target or no closing `;`.
    #[error("{}:{line}: import without a quoted path", .file.display())]
    MalformedImport {
        /// File containing the statement.
        file: PathBuf,
        /// 1-based line number where the statement starts.
        line: usize,
    },

    /// A path with no final component.
    #[error("{} has no file name", .0.display())]
    NoFileName(PathBuf),
}

fn is_ident(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn is_keyword_at(bytes: &[u8], at: usize) -> bool {
    bytes[at..].starts_with(KEYWORD.as_bytes())
        && (at == 0 || !is_ident(bytes[at - 1]))
        && !matches!(bytes.get(at + KEYWORD.len()), Some(&b) if is_ident(b))
}

/// Index just past the string literal opened at `at`. Literals end at the
/// matching quote or, unterminated, at the end of the line.
fn skip_string(bytes: &[u8], at: usize) -> usize {
    let quote = bytes[at];
    let mut i = at + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn find(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes.get(from..)?.windows(needle.len()).position(|w| w == needle).map(|p| from + p)
}

/// Index of the `;` closing a statement that starts at `from`.
fn statement_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b';' => return Some(i),
            b'"' | b'\'' => i = skip_string(bytes, i),
            _ => i += 1,
        }
    }
    None
}

fn count_lines(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b == b'\n').count()
}

fn quoted_path(text: &str) -> Option<&str> {
    let caps = QUOTED_PATH.captures(text)?;
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str())
}

/// Locates every import statement in `contents`, in order.
///
/// `import` inside comments and string literals is ignored. Statements may
/// span lines and several may share a line.
///
/// # Errors
///
/// Returns [`FlattenError::MalformedImport`] for a statement with no quoted
/// target or no closing `;`.
pub fn find_imports<'a>(
    file: &Path,
    contents: &'a str,
) -> Result<Vec<ImportDirective<'a>>, FlattenError> {
    let bytes = contents.as_bytes();
    let malformed = |line| FlattenError::MalformedImport { file: file.to_path_buf(), line };
    let mut found = Vec::new();
    let mut line = 1;
    let mut i = 0;

    while i < bytes.len() {
        let next = match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                find(bytes, i, b"\n").unwrap_or(bytes.len())
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                find(bytes, i + 2, b"*/").map_or(bytes.len(), |p| p + 2)
            }
            b'"' | b'\'' => skip_string(bytes, i),
            _ if is_keyword_at(bytes, i) => {
                let end = statement_end(bytes, i + KEYWORD.len()).ok_or_else(|| malformed(line))?;
                let path = quoted_path(&contents[i..end]).ok_or_else(|| malformed(line))?;
                found.push(ImportDirective { span: i..end + 1, path, line });
                end + 1
            }
            b if is_ident(b) => {
                let mut j = i + 1;
                while j < bytes.len() && is_ident(bytes[j]) {
                    j += 1;
                }
                j
            }
            _ => i + 1,
        };
        line += count_lines(&bytes[i..next]);
        i = next;
    }

    Ok(found)
}

/// Final path segment of an import target.
#[must_use]
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// The directive every import is rewritten to.
#[must_use]
pub fn rewritten_import(path: &str) -> String {
    format!("import \"./{}\";", basename(path))
}

/// Rewrites the imports of one file.
///
/// Only the `import ... ;` spans change; everything around them, comments,
/// code sharing a line and line terminators included, comes through
/// byte-for-byte. A statement spread over several lines becomes one line.
///
/// # Errors
///
/// Returns [`FlattenError::MalformedImport`] if a statement has no quoted
/// target or never ends.
pub fn flatten_source(file: &Path, contents: &str) -> Result<String, FlattenError> {
    let mut out = String::with_capacity(contents.len());
    let mut cursor = 0;
    for import in find_imports(file, contents)? {
        out.push_str(&contents[cursor..import.span.start]);
        out.push_str(&rewritten_import(import.path));
        cursor = import.span.end;
    }
    out.push_str(&contents[cursor..]);
    Ok(out)
}

/// Rewrites a whole set of files into flat, basename-keyed output.
///
/// Files sharing a basename are merged when their rewritten contents are
/// identical and rejected otherwise. The result is sorted by name.
///
/// # Errors
///
/// Returns [`FlattenError::BasenameCollision`] on a conflicting basename, or
/// any error from [`flatten_source`].
pub fn flatten_files(files: &[SourceFile]) -> Result<Vec<FlatFile>, FlattenError> {
    let mut flat: BTreeMap<String, FlatFile> = BTreeMap::new();

    for file in files {
        let name = file
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| FlattenError::NoFileName(file.path.clone()))?
            .to_string();
        let contents = flatten_source(&file.path, &file.contents)?;

        if let Some(existing) = flat.get(&name) {
            if existing.contents != contents {
                return Err(FlattenError::BasenameCollision {
                    name,
                    first: existing.origin.clone(),
                    second: file.path.clone(),
                });
            }
            tracing::debug!(%name, duplicate = %file.path.display(), "identical file merged");
            continue;
        }

        flat.insert(name.clone(), FlatFile { name, contents, origin: file.path.clone() });
    }

    Ok(flat.into_values().collect())
}

/// Reads every file under `root`, in path order.
///
/// # Errors
///
/// Returns an error if the tree cannot be walked or a file cannot be read.
pub fn read_tree(fs: &dyn FileSystem, root: &Path) -> Result<Vec<SourceFile>> {
    let paths = fs
        .walk_files(root)
        .map_err(|e| Error::io(format!("failed to walk {}", root.display()), e))?;
    paths
        .into_iter()
        .map(|path| {
            let contents = fs
                .read_to_string(&path)
                .map_err(|e| Error::io(format!("failed to read {}", path.display()), e))?;
            Ok(SourceFile { path, contents })
        })
        .collect()
}

/// Writes flattened files into `out_dir`.
///
/// # Errors
///
/// Returns an error if a file cannot be written.
pub fn write_flat(fs: &dyn FileSystem, out_dir: &Path, files: &[FlatFile]) -> Result<()> {
    fs.create_dir_all(out_dir)
        .map_err(|e| Error::io(format!("failed to create {}", out_dir.display()), e))?;
    for file in files {
        let path = out_dir.join(&file.name);
        fs.write(&path, &file.contents)
            .map_err(|e| Error::io(format!("failed to write {}", path.display()), e))?;
    }
    Ok(())
}

/// Flattens the tree at `root` into `out_dir`, then removes `root`.
///
/// Nothing is written when the rewrite fails.
///
/// # Errors
///
/// Returns an error on I/O failure, a basename collision, or a malformed
/// import.
pub fn flatten_dir(fs: &dyn FileSystem, root: &Path, out_dir: &Path) -> Result<Vec<FlatFile>> {
    let sources = read_tree(fs, root)?;
    let flat = flatten_files(&sources)?;
    tracing::info!(
        files = sources.len(),
        flattened = flat.len(),
        from = %root.display(),
        to = %out_dir.display(),
        "flattened source tree"
    );
    write_flat(fs, out_dir, &flat)?;
    fs.remove_dir_all(root)
        .map_err(|e| Error::io(format!("failed to remove {}", root.display()), e))?;
    Ok(flat)
}
