//! Run configuration read once from the environment.

use crate::error::{Error, Result};

/// Environment variable holding the block-explorer API key.
pub const API_KEY_VAR: &str = "ETHERSCAN_API_KEY";
/// Environment variable holding the RPC endpoint used for slot reads and forks.
pub const RPC_URL_VAR: &str = "ETH_RPC_URL";
/// Optional override for the block-explorer API base URL.
pub const EXPLORER_URL_VAR: &str = "ETHERSCAN_API_URL";

/// Default block-explorer API endpoint.
pub const DEFAULT_EXPLORER_URL: &str = "https://api.etherscan.io/api";

/// Configuration shared by every phase of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Block-explorer API key.
    pub api_key: String,
    /// RPC endpoint URL.
    pub rpc_url: String,
    /// Block-explorer API base URL.
    pub explorer_url: String,
}

impl Config {
    /// Loads `.env` (if present) and reads the configuration from the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingEnv`] if a required variable is unset or empty.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingEnv`] if a required variable is unset or empty.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &'static str| {
            lookup(key).filter(|v| !v.trim().is_empty()).ok_or(Error::MissingEnv(key))
        };
        Ok(Self {
            api_key: required(API_KEY_VAR)?,
            rpc_url: required(RPC_URL_VAR)?,
            explorer_url: lookup(EXPLORER_URL_VAR)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_EXPLORER_URL.to_string()),
        })
    }
}
