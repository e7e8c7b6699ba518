//! Cassette configuration for composable per-port replay.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Per-port cassette file paths. Ports without a cassette path panic if
/// called during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Path to the shell port cassette file.
    pub shell: Option<PathBuf>,
    /// Path to the explorer port cassette file.
    pub explorer: Option<PathBuf>,
    /// Path to the filesystem port cassette file.
    pub fs: Option<PathBuf>,
}

/// Per-port replayers, each with its own interaction stream.
pub struct PortReplayers {
    /// Replayer for the shell port.
    pub shell: Option<CassetteReplayer>,
    /// Replayer for the explorer port.
    pub explorer: Option<CassetteReplayer>,
    /// Replayer for the filesystem port.
    pub fs: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// Picks up the `shell`, `explorer` and `fs` cassettes from a
    /// recording-session directory, skipping whichever is absent.
    #[must_use]
    pub fn from_dir(dir: &Path) -> Self {
        let existing =
            |port: &str| Some(dir.join(format!("{port}.cassette.yaml"))).filter(|p| p.exists());
        Self { shell: existing("shell"), explorer: existing("explorer"), fs: existing("fs") }
    }

    /// Load a single cassette file and create a replayer.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_port_cassette(path: &Path) -> Result<CassetteReplayer, String> {
        Ok(CassetteReplayer::new(&Cassette::load(path)?))
    }

    /// Load all configured per-port cassette files and create replayers.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        Ok(PortReplayers {
            shell: self.shell.as_deref().map(Self::load_port_cassette).transpose()?,
            explorer: self.explorer.as_deref().map(Self::load_port_cassette).transpose()?,
            fs: self.fs.as_deref().map(Self::load_port_cassette).transpose()?,
        })
    }
}
