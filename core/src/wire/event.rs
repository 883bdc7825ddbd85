/// Inbound events delivered by the duplex telemetry channel.
///
/// Lifecycle events carry no payload; `sensor_data` arrives as a
/// JSON-encoded string and is decoded by the listener, not the channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    Connect,
    Disconnect,
    SensorData(String),
    Step(i64),
}
