//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::Arc;

use crate::adapters::live::explorer::LiveExplorerClient;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::shell::LiveShellExecutor;
use crate::adapters::recording::{
    RecordingExplorerClient, RecordingFileSystem, RecordingShellExecutor,
};
use crate::adapters::replaying::{
    ReplayingExplorerClient, ReplayingFileSystem, ReplayingShellExecutor,
};
use crate::address::Address;
use crate::cassette::config::CassetteConfig;
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::config::{Config, API_KEY_VAR, RPC_URL_VAR};
use crate::error::PortError;
use crate::ports::{ExplorerClient, ExplorerFuture, FileSystem, ShellExecutor, ShellOutput};

/// Bundles all port trait objects into a single context.
///
/// Constructors wire up different adapter implementations (live, replaying,
/// recording).
pub struct ServiceContext {
    /// Filesystem for file I/O.
    pub fs: Box<dyn FileSystem>,
    /// Shell executor for external tools.
    pub shell: Box<dyn ShellExecutor>,
    /// Block-explorer client.
    pub explorer: Box<dyn ExplorerClient>,
}

impl ServiceContext {
    /// Creates a live context talking to the real toolchain and explorer.
    #[must_use]
    pub fn live(config: &Config) -> Self {
        Self {
            fs: Box::new(LiveFileSystem),
            shell: Box::new(
                LiveShellExecutor::new()
                    .env(API_KEY_VAR, &config.api_key)
                    .env(RPC_URL_VAR, &config.rpc_url),
            ),
            explorer: Box::new(LiveExplorerClient::new(&config.explorer_url, &config.api_key)),
        }
    }

    /// Creates a live context whose shell, explorer and filesystem traffic is
    /// recorded into a new session directory under `root`, with the API key
    /// and RPC URL redacted.
    ///
    /// The context must be dropped before [`RecordingSession::finish`].
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory cannot be created.
    pub fn recording_at(root: &Path, config: &Config) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new_in(
            root,
            &[(API_KEY_VAR, config.api_key.as_str()), (RPC_URL_VAR, config.rpc_url.as_str())],
        )?;
        let live = Self::live(config);
        let ctx = Self {
            fs: Box::new(RecordingFileSystem::new(live.fs, Arc::clone(&session.fs))),
            shell: Box::new(RecordingShellExecutor::new(live.shell, Arc::clone(&session.shell))),
            explorer: Box::new(RecordingExplorerClient::new(
                live.explorer,
                Arc::clone(&session.explorer),
            )),
        };
        Ok((ctx, session))
    }

    /// Creates a replaying context from a monolithic cassette file.
    ///
    /// Every port gets its own replayer over the same cassette, so their
    /// cursors are independent.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path)?;
        Ok(Self {
            fs: Box::new(ReplayingFileSystem::new(CassetteReplayer::new(&cassette))),
            shell: Box::new(ReplayingShellExecutor::new(CassetteReplayer::new(&cassette))),
            explorer: Box::new(ReplayingExplorerClient::new(CassetteReplayer::new(&cassette))),
        })
    }

    /// Creates a replaying context from per-port cassette files.
    ///
    /// Shell and explorer panic with a clear message when called without a
    /// configured cassette. Without an `fs` cassette the filesystem is live.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;

        Ok(Self {
            fs: match replayers.fs {
                Some(r) => Box::new(ReplayingFileSystem::new(r)),
                None => Box::new(LiveFileSystem),
            },
            shell: match replayers.shell {
                Some(r) => Box::new(ReplayingShellExecutor::new(r)),
                None => Box::new(PanickingShellExecutor),
            },
            explorer: match replayers.explorer {
                Some(r) => Box::new(ReplayingExplorerClient::new(r)),
                None => Box::new(PanickingExplorerClient),
            },
        })
    }
}

// --- Panicking adapters for unspecified ports ---

struct PanickingShellExecutor;
impl ShellExecutor for PanickingShellExecutor {
    fn run(&self, command: &str) -> Result<ShellOutput, PortError> {
        panic!("ShellExecutor port not configured in CassetteConfig (ran {command:?})");
    }
}

struct PanickingExplorerClient;
impl ExplorerClient for PanickingExplorerClient {
    fn contract_metadata(&self, address: &Address) -> ExplorerFuture<'_> {
        panic!("ExplorerClient port not configured in CassetteConfig (looked up {address})");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::recorder::CassetteRecorder;
    use serde_json::json;

    #[test]
    fn replaying_context_from_monolithic_cassette() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("full.cassette.yaml");

        let mut rec = CassetteRecorder::new(&path, "full");
        rec.record(
            "shell",
            "run",
            json!({"command": "cast --version"}),
            json!({"ok": {"exit_code": 0, "stdout": "cast 1.0.0\n", "stderr": ""}}),
        );
        rec.record("fs", "exists", json!({"path": "/work/Vault"}), json!({"ok": true}));
        rec.finish().unwrap();

        let ctx = ServiceContext::replaying(&path).unwrap();
        let out = ctx.shell.run("cast --version").unwrap();
        assert_eq!(out.stdout, "cast 1.0.0\n");
        assert!(ctx.fs.exists(Path::new("/work/Vault")));
    }

    #[test]
    fn recording_context_writes_cassettes() {
        let root = tempfile::tempdir().unwrap();
        let config = Config {
            api_key: "test-api-key-0001".into(),
            rpc_url: "http://localhost:8545".into(),
            explorer_url: "http://localhost:1".into(),
        };

        let (ctx, session) = ServiceContext::recording_at(root.path(), &config).unwrap();
        let out = ctx.shell.run("echo \"rpc=$ETH_RPC_URL\"").unwrap();
        assert_eq!(out.stdout, "rpc=http://localhost:8545\n");
        drop(ctx);

        let dir = session.finish().unwrap();
        let shell = std::fs::read_to_string(dir.join("shell.cassette.yaml")).unwrap();
        assert!(shell.contains("rpc=$ETH_RPC_URL"));
        assert!(!shell.contains("localhost:8545"));
        assert!(dir.join("fs.cassette.yaml").exists());
    }

    #[test]
    #[should_panic(expected = "not configured in CassetteConfig")]
    fn unspecified_port_panics_with_clear_message() {
        let ctx = ServiceContext::replaying_from(&CassetteConfig::default()).unwrap();
        let _ = ctx.shell.run("forge --version");
    }
}
