use log::{info, warn};

pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, message: &str) {
        info!("{}", message);
    }

    pub fn record_drop(&self, reason: &str) {
        warn!("frame dropped: {}", reason);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
