//! Replaying adapter for the `ExplorerClient` port.

use std::sync::Mutex;

use serde_json::json;

use super::{next_output, replay_result};
use crate::address::Address;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{ExplorerClient, ExplorerFuture};

/// Serves recorded explorer lookups from a cassette.
pub struct ReplayingExplorerClient {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingExplorerClient {
    /// Create a replaying explorer client backed by the given replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl ExplorerClient for ReplayingExplorerClient {
    fn contract_metadata(&self, address: &Address) -> ExplorerFuture<'_> {
        let input = json!({ "address": address });
        let output = next_output(&self.replayer, "explorer", "contract_metadata", &input);
        Box::pin(async move { replay_result(output, "explorer::contract_metadata") })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;

    fn replayer_with(output: serde_json::Value) -> CassetteReplayer {
        CassetteReplayer::new(&Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            version: "0.1.0".into(),
            interactions: vec![Interaction {
                seq: 0,
                port: "explorer".into(),
                method: "contract_metadata".into(),
                input: json!({"address": "0x2222222222222222222222222222222222222222"}),
                output,
            }],
        })
    }

    #[tokio::test]
    async fn replays_metadata() {
        let explorer = ReplayingExplorerClient::new(replayer_with(json!({"ok": {
            "contract_name": "Pool",
            "compiler_version": "v0.8.20",
            "proxy": true,
            "implementation": "0x3333333333333333333333333333333333333333"
        }})));
        let addr: Address = "0x2222222222222222222222222222222222222222".parse().unwrap();
        let meta = explorer.contract_metadata(&addr).await.unwrap();
        assert_eq!(meta.contract_name, "Pool");
        assert!(meta.proxy);
        assert_eq!(
            meta.implementation.unwrap().as_str(),
            "0x3333333333333333333333333333333333333333"
        );
    }

    #[tokio::test]
    async fn replays_error() {
        let explorer = ReplayingExplorerClient::new(replayer_with(json!({"err": "NOTOK"})));
        let addr: Address = "0x2222222222222222222222222222222222222222".parse().unwrap();
        let err = explorer.contract_metadata(&addr).await.unwrap_err();
        assert_eq!(err.to_string(), "NOTOK");
    }
}
