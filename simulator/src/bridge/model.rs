use serde::{Deserialize, Serialize};
use wisenscore::store::{DashboardSnapshot, SensorStateStore};

/// Payload served to the GUI: store snapshot plus ingest counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgePayload {
    pub snapshot: DashboardSnapshot,
    pub frames_applied: usize,
    pub frames_dropped: usize,
    pub steps_applied: usize,
}

impl BridgePayload {
    pub fn from_store(store: &SensorStateStore) -> Self {
        let (frames_applied, frames_dropped, steps_applied) = store.metrics().snapshot();
        Self {
            snapshot: store.snapshot(),
            frames_applied,
            frames_dropped,
            steps_applied,
        }
    }
}
