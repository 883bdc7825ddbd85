pub mod http;
pub mod model;

pub use http::GuiBridge;
pub use model::BridgePayload;
