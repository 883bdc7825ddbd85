use crate::store::SensorStateStore;
use crate::stream::DashboardContext;
use crate::telemetry::LogManager;
use crate::wire::ChannelEvent;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::broadcast::Receiver;

/// Applies inbound channel events to the shared store in delivery order.
///
/// Dropping the client detaches the listener; the channel itself stays
/// open for the next subscriber.
pub struct StreamClient {
    receiver: Receiver<ChannelEvent>,
    store: Arc<RwLock<SensorStateStore>>,
    logger: LogManager,
}

impl StreamClient {
    pub fn attach(context: &DashboardContext) -> Self {
        Self {
            receiver: context.channel().subscribe(),
            store: context.store(),
            logger: LogManager::new(),
        }
    }

    /// Drains events until the channel closes.
    pub async fn run(mut self) {
        loop {
            match self.receiver.recv().await {
                Ok(event) => self.apply(event),
                Err(RecvError::Lagged(skipped)) => {
                    self.logger
                        .record(&format!("listener lagged, skipped {} events", skipped));
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    /// Applies any already-queued events without waiting.
    ///
    /// Suits a single-threaded UI loop that polls between redraws, and
    /// keeps the reducer testable without a runtime.
    pub fn drain_pending(&mut self) {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => self.apply(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    self.logger
                        .record(&format!("listener lagged, skipped {} events", skipped));
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }

    fn apply(&self, event: ChannelEvent) {
        if let Ok(mut store) = self.store.write() {
            store.apply_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SensorId, WiSensConfig};
    use crate::store::ConnectionStatus;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn context_2x2() -> DashboardContext {
        let config = WiSensConfig::from_json(
            r#"{
                "vizOptions": { "pitch": 20 },
                "sensors": [ { "id": 1, "startCoord": [0, 0], "endCoord": [1, 1] } ]
            }"#,
        )
        .unwrap();
        DashboardContext::new(config, &mut StdRng::seed_from_u64(3))
    }

    #[test]
    fn streamed_frame_and_step_reach_the_store() {
        let context = context_2x2();
        let mut client = StreamClient::attach(&context);

        context.channel().publish(ChannelEvent::Connect);
        context
            .channel()
            .publish(ChannelEvent::SensorData(r#"{"1": [[0.0, 0.0], [0.0, 0.0]]}"#.into()));
        context.channel().publish(ChannelEvent::Step(7));
        client.drain_pending();

        let store = context.store();
        let guard = store.read().unwrap();
        assert_eq!(guard.connection(), ConnectionStatus::Connected);
        assert_eq!(guard.step(), 7);
        assert!(guard
            .grid(&SensorId::from("1"))
            .unwrap()
            .iter()
            .all(|&v| v == 0.0));
    }

    #[test]
    fn events_apply_in_delivery_order() {
        let context = context_2x2();
        let mut client = StreamClient::attach(&context);

        context.channel().publish(ChannelEvent::Step(5));
        context.channel().publish(ChannelEvent::Step(3));
        client.drain_pending();

        let store = context.store();
        assert_eq!(store.read().unwrap().step(), 3);
    }

    #[test]
    fn malformed_payload_degrades_silently() {
        let context = context_2x2();
        let mut client = StreamClient::attach(&context);
        let id = SensorId::from("1");

        let before = context.store().read().unwrap().grid(&id).unwrap().clone();
        context
            .channel()
            .publish(ChannelEvent::SensorData("definitely not json".into()));
        client.drain_pending();

        let store = context.store();
        let guard = store.read().unwrap();
        assert_eq!(guard.grid(&id).unwrap(), &before);
        assert_eq!(guard.metrics().snapshot().1, 1);
    }

    #[test]
    fn detaching_leaves_the_channel_usable() {
        let context = context_2x2();
        let client = StreamClient::attach(&context);
        drop(client);

        // A fresh subscriber still receives events.
        let mut replacement = StreamClient::attach(&context);
        context.channel().publish(ChannelEvent::Step(11));
        replacement.drain_pending();
        let store = context.store();
        assert_eq!(store.read().unwrap().step(), 11);
    }
}
