pub mod patterns;
pub mod scenario;

pub use patterns::{FrameGenerator, Pattern};
pub use scenario::ScenarioConfig;
