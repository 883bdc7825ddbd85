pub mod event;
pub mod frame;

pub use event::ChannelEvent;
pub use frame::{decode_frame, FramePayload};
