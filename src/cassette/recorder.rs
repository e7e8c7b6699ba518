//! Records interactions into a cassette file.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::Value;

use super::format::{Cassette, Interaction};

/// Accumulates interactions and writes them as a YAML cassette.
///
/// Registered secrets are replaced by their `$VAR` reference in every
/// recorded string, so error messages that echo a request URL or an
/// environment value do not leak into the file.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    cassette: Cassette,
    secrets: Vec<(String, String)>,
}

impl CassetteRecorder {
    /// Starts a recording that [`finish`](Self::finish) writes to `path`.
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            cassette: Cassette {
                name: name.into(),
                recorded_at: Utc::now(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                interactions: Vec::new(),
            },
            secrets: Vec::new(),
        }
    }

    /// Replaces `value` with `$var` in everything recorded from now on.
    /// Empty values are ignored.
    #[must_use]
    pub fn redacting(mut self, var: &str, value: &str) -> Self {
        if !value.is_empty() {
            self.secrets.push((value.to_string(), format!("${var}")));
        }
        self
    }

    /// Appends an interaction; its `seq` is its position in the cassette.
    pub fn record(
        &mut self,
        port: impl Into<String>,
        method: impl Into<String>,
        mut input: Value,
        mut output: Value,
    ) {
        self.redact(&mut input);
        self.redact(&mut output);
        let seq = self.cassette.interactions.len() as u64;
        self.cassette.interactions.push(Interaction {
            seq,
            port: port.into(),
            method: method.into(),
            input,
            output,
        });
    }

    fn redact(&self, value: &mut Value) {
        match value {
            Value::String(s) => {
                for (secret, reference) in &self.secrets {
                    if s.contains(secret.as_str()) {
                        *s = s.replace(secret.as_str(), reference);
                    }
                }
            }
            Value::Array(items) => items.iter_mut().for_each(|v| self.redact(v)),
            Value::Object(map) => map.values_mut().for_each(|v| self.redact(v)),
            _ => {}
        }
    }

    /// Writes the cassette next to its final path and moves it into place.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be serialized or written.
    pub fn finish(self) -> Result<PathBuf, std::io::Error> {
        let yaml = serde_yaml::to_string(&self.cassette).map_err(std::io::Error::other)?;
        let dir = self.path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut staged = tempfile::NamedTempFile::new_in(dir.unwrap_or(Path::new(".")))?;
        staged.write_all(yaml.as_bytes())?;
        staged.persist(&self.path).map_err(|e| e.error)?;
        Ok(self.path)
    }
}
