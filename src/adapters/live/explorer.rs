//! Live adapter for the `ExplorerClient` port using an Etherscan-compatible API.

use reqwest::Client;
use serde::Deserialize;

use crate::address::Address;
use crate::error::PortError;
use crate::ports::explorer::{ContractMetadata, ExplorerClient, ExplorerFuture};

/// Live explorer client that calls the `contract/getsourcecode` endpoint.
pub struct LiveExplorerClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl LiveExplorerClient {
    /// Creates a client for the API at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self { client: Client::new(), base_url: base_url.into(), api_key: api_key.into() }
    }
}

/// Top-level envelope shared by every explorer endpoint.
#[derive(Deserialize)]
struct Envelope {
    status: String,
    message: String,
    result: serde_json::Value,
}

/// One entry of a successful `getsourcecode` result.
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SourceEntry {
    contract_name: String,
    #[serde(default)]
    compiler_version: String,
    #[serde(default)]
    proxy: String,
    #[serde(default)]
    implementation: String,
}

/// Parses a `getsourcecode` response body.
fn parse_source_response(body: &str) -> Result<ContractMetadata, String> {
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|e| format!("failed to parse explorer response: {e}"))?;

    if envelope.status != "1" {
        let detail = envelope.result.as_str().unwrap_or_default();
        return Err(format!("{} {detail}", envelope.message).trim().to_string());
    }

    let mut entries: Vec<SourceEntry> = serde_json::from_value(envelope.result)
        .map_err(|e| format!("unexpected getsourcecode result: {e}"))?;
    if entries.is_empty() {
        return Err("empty getsourcecode result".to_string());
    }
    let entry = entries.swap_remove(0);

    if entry.contract_name.is_empty() {
        return Err("contract source code is not verified".to_string());
    }

    let implementation = if entry.implementation.is_empty() {
        None
    } else {
        let parsed = entry.implementation.parse::<Address>();
        Some(parsed.map_err(|e| {
            format!("bad implementation address {:?}: {e}", entry.implementation)
        })?)
    };

    Ok(ContractMetadata {
        contract_name: entry.contract_name,
        compiler_version: entry.compiler_version,
        proxy: entry.proxy == "1",
        implementation,
    })
}

impl ExplorerClient for LiveExplorerClient {
    fn contract_metadata(&self, address: &Address) -> ExplorerFuture<'_> {
        let address = address.to_string();

        Box::pin(async move {
            tracing::debug!(url = %self.base_url, %address, "getsourcecode");
            let response = self
                .client
                .get(&self.base_url)
                .query(&[
                    ("module", "contract"),
                    ("action", "getsourcecode"),
                    ("address", address.as_str()),
                    ("apikey", self.api_key.as_str()),
                ])
                .send()
                .await
                .map_err(|e| -> PortError { format!("explorer request failed: {e}").into() })?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| -> PortError {
                    format!("failed to read explorer response: {e}").into()
                })?;

            if !status.is_success() {
                return Err(format!("explorer HTTP error ({}): {body}", status.as_u16()).into());
            }

            parse_source_response(&body).map_err(PortError::from)
        })
    }
}
