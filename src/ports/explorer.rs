//! Block-explorer port for verified-contract lookups.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::PortError;

/// Boxed future type alias used by [`ExplorerClient`] to keep the trait dyn-compatible.
pub type ExplorerFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ContractMetadata, PortError>> + Send + 'a>>;

/// What the explorer reports about a verified contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractMetadata {
    /// Name of the primary contract.
    pub contract_name: String,
    /// Compiler version used for verification (e.g. `v0.8.19+commit.7dd6d404`).
    pub compiler_version: String,
    /// Whether the explorer flags the address as a proxy.
    pub proxy: bool,
    /// Implementation the explorer associates with a proxy, if any.
    pub implementation: Option<Address>,
}

/// Looks up verified contracts on a block explorer.
pub trait ExplorerClient: Send + Sync {
    /// Fetches the verified metadata for `address`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the response is malformed, or
    /// the contract is not verified.
    fn contract_metadata(&self, address: &Address) -> ExplorerFuture<'_>;
}
