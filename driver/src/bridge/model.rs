use crate::workflow::runner::ScanResult;
use serde::{Deserialize, Serialize};

/// Most recent extraction served by the live endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BridgeState {
    pub latest: Option<ScanResult>,
    pub served: usize,
}

impl BridgeState {
    pub fn record(&mut self, result: ScanResult) {
        self.latest = Some(result);
        self.served += 1;
    }
}
