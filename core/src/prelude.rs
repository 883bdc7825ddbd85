use serde::{Deserialize, Serialize};

/// Grid dimensions derived from a sensor's coordinate span.
///
/// Fixed for the lifetime of the dashboard; every incoming matrix for the
/// sensor is checked against these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDims {
    pub rows: usize,
    pub cols: usize,
}

/// Common error type for the dashboard core.
#[derive(thiserror::Error, Debug)]
pub enum VizError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("frame decode error: {0}")]
    FrameDecode(String),
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
}

pub type VizResult<T> = Result<T, VizError>;
