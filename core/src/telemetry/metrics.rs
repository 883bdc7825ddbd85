use std::sync::Mutex;

/// Counters for the silent-degrade paths, so dropped frames stay observable.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Default, Clone, Copy)]
struct Metrics {
    frames_applied: usize,
    frames_dropped: usize,
    steps_applied: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_frame_applied(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.frames_applied += 1;
        }
    }

    pub fn record_frame_dropped(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.frames_dropped += 1;
        }
    }

    pub fn record_step(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.steps_applied += 1;
        }
    }

    /// Returns `(frames_applied, frames_dropped, steps_applied)`.
    pub fn snapshot(&self) -> (usize, usize, usize) {
        if let Ok(metrics) = self.inner.lock() {
            (
                metrics.frames_applied,
                metrics.frames_dropped,
                metrics.steps_applied,
            )
        } else {
            (0, 0, 0)
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
