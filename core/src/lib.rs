//! Core state reconciliation and interaction logic for the WiSens tactile
//! dashboard.
//!
//! The modules mirror the browser dashboard they replace while providing
//! explicitly owned stores, a push-based telemetry channel, and pure update
//! paths that are testable without a rendering harness.

pub mod config;
pub mod math;
pub mod prelude;
pub mod store;
pub mod stream;
pub mod telemetry;
pub mod wire;

pub use prelude::{GridDims, VizError, VizResult};
