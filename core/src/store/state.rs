use crate::config::{seed_grids, SensorId, WiSensConfig};
use crate::math::{grid_from_rows, rows_from_grid};
use crate::prelude::{GridDims, VizError, VizResult};
use crate::telemetry::{LogManager, MetricsRecorder};
use crate::wire::{decode_frame, ChannelEvent, FramePayload};
use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Connection status reported by the channel lifecycle events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionStatus {
    Connected,
    #[default]
    Disconnected,
}

/// Serializable view of the store consumed by the bridge and the renderer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub grids: BTreeMap<SensorId, Vec<Vec<f32>>>,
    pub step: i64,
    pub connection: ConnectionStatus,
}

/// Latest matrix per sensor plus the step counter.
///
/// Frames are applied as full per-sensor replacements; there is no
/// element-wise merge and no history.
pub struct SensorStateStore {
    dims: BTreeMap<SensorId, GridDims>,
    grids: BTreeMap<SensorId, Array2<f32>>,
    step: i64,
    connection: ConnectionStatus,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl SensorStateStore {
    /// Seeds the store from a validated configuration.
    pub fn from_config<R: Rng>(config: &WiSensConfig, rng: &mut R) -> Self {
        let dims = config
            .sensors
            .iter()
            .map(|sensor| (sensor.id.clone(), sensor.grid_dims()))
            .collect();
        Self {
            dims,
            grids: seed_grids(config, rng),
            step: 0,
            connection: ConnectionStatus::Disconnected,
            logger: LogManager::new(),
            metrics: MetricsRecorder::new(),
        }
    }

    pub fn dims(&self, id: &SensorId) -> Option<GridDims> {
        self.dims.get(id).copied()
    }

    pub fn grid(&self, id: &SensorId) -> Option<&Array2<f32>> {
        self.grids.get(id)
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    pub fn connection(&self) -> ConnectionStatus {
        self.connection
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    /// Applies one frame as an atomic replacement, last write wins.
    ///
    /// The whole frame is rejected when any entry names an unknown sensor or
    /// carries a matrix that does not match the derived dimensions, so a
    /// frame either applies in full or not at all.
    pub fn apply_frame(&mut self, frame: FramePayload) -> VizResult<()> {
        let mut staged = Vec::with_capacity(frame.len());
        for (id, rows) in frame {
            let dims = self
                .dims
                .get(&id)
                .copied()
                .ok_or_else(|| VizError::ShapeMismatch(format!("unknown sensor {id}")))?;
            let grid = grid_from_rows(&rows, dims)
                .map_err(|err| VizError::ShapeMismatch(format!("sensor {id}: {err}")))?;
            staged.push((id, grid));
        }
        for (id, grid) in staged {
            self.grids.insert(id, grid);
        }
        self.metrics.record_frame_applied();
        Ok(())
    }

    /// Overwrites the step counter verbatim; no monotonicity is enforced.
    pub fn apply_step(&mut self, step: i64) {
        self.step = step;
        self.metrics.record_step();
    }

    /// Single reducer for inbound channel events.
    ///
    /// Malformed or mismatched `sensor_data` payloads are dropped and the
    /// previous grids retained; connect/disconnect only touch the
    /// connection status, never sensor or step state.
    pub fn apply_event(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::Connect => {
                self.connection = ConnectionStatus::Connected;
                self.logger.record("channel connected");
            }
            ChannelEvent::Disconnect => {
                self.connection = ConnectionStatus::Disconnected;
                self.logger.record("channel disconnected");
            }
            ChannelEvent::SensorData(payload) => match decode_frame(&payload) {
                Ok(frame) => {
                    if let Err(err) = self.apply_frame(frame) {
                        self.metrics.record_frame_dropped();
                        self.logger.record_drop(&err.to_string());
                    }
                }
                Err(err) => {
                    self.metrics.record_frame_dropped();
                    self.logger.record_drop(&err.to_string());
                }
            },
            ChannelEvent::Step(step) => self.apply_step(step),
        }
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            grids: self
                .grids
                .iter()
                .map(|(id, grid)| (id.clone(), rows_from_grid(grid)))
                .collect(),
            step: self.step,
            connection: self.connection,
        }
    }
}
