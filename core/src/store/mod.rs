pub mod overlay;
pub mod state;

pub use overlay::{InteractionOverlay, Mode};
pub use state::{ConnectionStatus, DashboardSnapshot, SensorStateStore};
