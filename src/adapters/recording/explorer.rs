//! Recording adapter for the `ExplorerClient` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::address::Address;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{ExplorerClient, ExplorerFuture};

/// Records explorer lookups while delegating to an inner implementation.
pub struct RecordingExplorerClient {
    inner: Box<dyn ExplorerClient>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingExplorerClient {
    /// Creates a new recording explorer client wrapping the given implementation.
    pub fn new(inner: Box<dyn ExplorerClient>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct AddressInput<'a> {
    address: &'a Address,
}

impl ExplorerClient for RecordingExplorerClient {
    fn contract_metadata(&self, address: &Address) -> ExplorerFuture<'_> {
        let address = address.clone();
        let recorder = Arc::clone(&self.recorder);

        Box::pin(async move {
            let result = self.inner.contract_metadata(&address).await;
            let input = AddressInput { address: &address };
            record_result(&recorder, "explorer", "contract_metadata", &input, &result);
            result
        })
    }
}
