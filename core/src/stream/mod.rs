pub mod channel;
pub mod client;

pub use channel::{DashboardContext, TelemetryChannel};
pub use client::StreamClient;
