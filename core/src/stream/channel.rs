use crate::config::WiSensConfig;
use crate::store::SensorStateStore;
use crate::wire::ChannelEvent;
use rand::Rng;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

/// Buffered events per subscriber. The channel does not coalesce: a
/// producer outrunning the view fills the buffer and lagged subscribers
/// skip ahead to the freshest events.
const CHANNEL_CAPACITY: usize = 256;

/// Duplex push channel between the telemetry source and the dashboard.
///
/// Created once at startup and shared by handle; it outlives any single
/// subscriber, so detaching a listener never closes it.
#[derive(Clone)]
pub struct TelemetryChannel {
    sender: broadcast::Sender<ChannelEvent>,
}

impl TelemetryChannel {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Publishes an event to every attached listener.
    ///
    /// With no listener attached the event is discarded, matching a source
    /// that keeps sending while the view is unmounted.
    pub fn publish(&self, event: ChannelEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChannelEvent> {
        self.sender.subscribe()
    }
}

impl Default for TelemetryChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Explicitly owned wiring for one dashboard instance.
///
/// Replaces the ambient channel singleton and module-scope config of the
/// reference UI: everything is constructed here and passed down.
pub struct DashboardContext {
    config: WiSensConfig,
    channel: TelemetryChannel,
    store: Arc<RwLock<SensorStateStore>>,
}

impl DashboardContext {
    /// Builds the context at startup: seeded store plus telemetry channel.
    pub fn new<R: Rng>(config: WiSensConfig, rng: &mut R) -> Self {
        let store = SensorStateStore::from_config(&config, rng);
        Self {
            config,
            channel: TelemetryChannel::new(),
            store: Arc::new(RwLock::new(store)),
        }
    }

    pub fn config(&self) -> &WiSensConfig {
        &self.config
    }

    pub fn channel(&self) -> &TelemetryChannel {
        &self.channel
    }

    pub fn store(&self) -> Arc<RwLock<SensorStateStore>> {
        self.store.clone()
    }
}
