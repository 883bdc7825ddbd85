use crate::bridge::model::BridgePayload;
use serde_json::json;
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};
use wisenscore::config::WiSensConfig;
use wisenscore::store::SensorStateStore;
use wisenscore::stream::{DashboardContext, TelemetryChannel};
use wisenscore::wire::ChannelEvent;

fn bridge_bind_address(config: &WiSensConfig) -> SocketAddr {
    let ip = config
        .viz_options
        .local_ip
        .as_deref()
        .and_then(|raw| raw.parse::<IpAddr>().ok())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
    SocketAddr::new(ip, 9000)
}

/// Bridge that serves dashboard snapshots and accepts pushed telemetry.
///
/// Everything received over HTTP goes through the telemetry channel, so
/// external pushes and the local generator share one ingest path.
pub struct GuiBridge {
    channel: TelemetryChannel,
    store: Arc<RwLock<SensorStateStore>>,
}

impl GuiBridge {
    pub fn new(context: &DashboardContext) -> Self {
        let store = context.store();
        let channel = context.channel().clone();
        let config = context.config().clone();
        let address = bridge_bind_address(&config);

        let store_for_filter = store.clone();
        let store_filter = warp::any().map(move || store_for_filter.clone());
        let channel_for_filter = channel.clone();
        let channel_filter = warp::any().map(move || channel_for_filter.clone());

        let snapshot_route = warp::path("snapshot")
            .and(warp::get())
            .and(store_filter)
            .map(|store: Arc<RwLock<SensorStateStore>>| {
                let guard = store.read().unwrap();
                warp::reply::json(&BridgePayload::from_store(&guard))
            });

        let config_route = warp::path("config")
            .and(warp::get())
            .map(move || warp::reply::json(&config));

        let ingest_route = warp::path("ingest")
            .and(warp::post())
            .and(warp::body::json())
            .and(channel_filter.clone())
            .map(|frame: serde_json::Value, channel: TelemetryChannel| {
                channel.publish(ChannelEvent::SensorData(frame.to_string()));
                warp::reply::with_status(
                    warp::reply::json(&json!({"status": "ok"})),
                    StatusCode::OK,
                )
            });

        let step_route = warp::path("step")
            .and(warp::post())
            .and(warp::body::json())
            .and(channel_filter)
            .map(|step: i64, channel: TelemetryChannel| {
                channel.publish(ChannelEvent::Step(step));
                warp::reply::with_status(
                    warp::reply::json(&json!({"status": "ok"})),
                    StatusCode::OK,
                )
            });

        thread::spawn(move || {
            let routes = snapshot_route
                .or(config_route)
                .or(ingest_route)
                .or(step_route);
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build runtime");
            runtime.block_on(async move {
                warp::serve(routes).run(address).await;
            });
        });

        Self { channel, store }
    }

    /// Publishes a frame payload on behalf of the local generator.
    pub fn publish_frame(&self, payload: String) {
        self.channel.publish(ChannelEvent::SensorData(payload));
    }

    pub fn publish_step(&self, step: i64) {
        self.channel.publish(ChannelEvent::Step(step));
    }

    pub fn publish_status(&self, message: &str) {
        println!("[bridge] {}", message);
    }

    pub fn payload(&self) -> BridgePayload {
        match self.store.read() {
            Ok(guard) => BridgePayload::from_store(&guard),
            Err(_) => BridgePayload::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use wisenscore::stream::StreamClient;

    #[test]
    fn bridge_serves_published_frames() {
        let config = WiSensConfig::from_json(
            r#"{
                "vizOptions": { "pitch": 20 },
                "sensors": [ { "id": 1, "startCoord": [0, 0], "endCoord": [1, 1] } ]
            }"#,
        )
        .unwrap();
        let context = DashboardContext::new(config, &mut StdRng::seed_from_u64(1));
        let bridge = GuiBridge::new(&context);
        let mut client = StreamClient::attach(&context);

        bridge.publish_frame(r#"{"1": [[0.0, 0.0], [0.0, 0.0]]}"#.into());
        bridge.publish_step(7);
        client.drain_pending();

        let payload = bridge.payload();
        assert_eq!(payload.snapshot.step, 7);
        assert_eq!(payload.frames_applied, 1);
        assert_eq!(payload.frames_dropped, 0);
    }
}
