use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use wisenscore::prelude::GridDims;

/// Pressure pattern shapes the generator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    Random,
    Circle,
    Wave,
    Footprint,
}

/// Synthesizes frames for one sensor tile in wire-row format.
///
/// Readings land in `[0, 1]`; the RNG is seeded so scenarios replay
/// identically.
pub struct FrameGenerator {
    dims: GridDims,
    pattern: Pattern,
    noise: f32,
    rng: StdRng,
    frame_index: usize,
}

impl FrameGenerator {
    pub fn new(dims: GridDims, pattern: Pattern, noise: f32, seed: u64) -> Self {
        Self {
            dims,
            pattern,
            noise,
            rng: StdRng::seed_from_u64(seed),
            frame_index: 0,
        }
    }

    pub fn next_frame(&mut self) -> Vec<Vec<f32>> {
        let time_step = self.frame_index as f32 * 0.15;
        let mut rows = Vec::with_capacity(self.dims.rows);
        for row in 0..self.dims.rows {
            let mut values = Vec::with_capacity(self.dims.cols);
            for col in 0..self.dims.cols {
                let base = match self.pattern {
                    Pattern::Random => self.random_cell(),
                    Pattern::Circle => self.circle_cell(row, col),
                    Pattern::Wave => Self::wave_cell(col, self.dims.cols, time_step),
                    Pattern::Footprint => self.footprint_cell(row, col),
                };
                let jitter = if self.noise > 0.0 {
                    self.rng.gen_range(-self.noise..self.noise)
                } else {
                    0.0
                };
                values.push((base + jitter).clamp(0.0, 1.0));
            }
            rows.push(values);
        }
        self.frame_index += 1;
        rows
    }

    /// Exponential-ish pressure with blank regions, like a tile at rest.
    fn random_cell(&mut self) -> f32 {
        if self.rng.gen::<f32>() > 0.7 {
            return 0.0;
        }
        let uniform: f32 = self.rng.gen_range(0.0..1.0);
        (-(1.0 - uniform).ln() * 0.25).min(1.0)
    }

    /// Gaussian falloff around the tile center.
    fn circle_cell(&self, row: usize, col: usize) -> f32 {
        let center_row = (self.dims.rows as f32 - 1.0) / 2.0;
        let center_col = (self.dims.cols as f32 - 1.0) / 2.0;
        let radius = (self.dims.rows.min(self.dims.cols) as f32 / 4.0).max(1.0);
        let delta_row = row as f32 - center_row;
        let delta_col = col as f32 - center_col;
        let distance_sq = delta_row * delta_row + delta_col * delta_col;
        (-distance_sq / (2.0 * (radius / 2.0).powi(2))).exp()
    }

    /// Travelling sine across the columns.
    fn wave_cell(col: usize, cols: usize, time_step: f32) -> f32 {
        let frequency = 2.0 / cols.max(1) as f32;
        (1.0 + (2.0 * PI * frequency * col as f32 + time_step).sin()) / 2.0
    }

    /// Elliptical contact patch with linear falloff.
    fn footprint_cell(&self, row: usize, col: usize) -> f32 {
        let center_row = (self.dims.rows as f32 - 1.0) / 2.0;
        let center_col = (self.dims.cols as f32 - 1.0) / 2.0;
        let half_height = (self.dims.rows as f32 / 2.0).max(1.0);
        let half_width = (self.dims.cols as f32 / 3.0).max(1.0);
        let ellipse = ((row as f32 - center_row) / half_height).powi(2)
            + ((col as f32 - center_col) / half_width).powi(2);
        if ellipse <= 1.0 {
            1.0 - ellipse
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIMS: GridDims = GridDims { rows: 6, cols: 9 };

    #[test]
    fn frames_honor_the_configured_shape() {
        for pattern in [
            Pattern::Random,
            Pattern::Circle,
            Pattern::Wave,
            Pattern::Footprint,
        ] {
            let mut generator = FrameGenerator::new(DIMS, pattern, 0.05, 9);
            let frame = generator.next_frame();
            assert_eq!(frame.len(), 6);
            assert!(frame.iter().all(|row| row.len() == 9));
        }
    }

    #[test]
    fn readings_stay_in_unit_range() {
        let mut generator = FrameGenerator::new(DIMS, Pattern::Random, 0.2, 4);
        for _ in 0..20 {
            let frame = generator.next_frame();
            assert!(frame
                .iter()
                .flatten()
                .all(|&value| (0.0..=1.0).contains(&value)));
        }
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        let mut first = FrameGenerator::new(DIMS, Pattern::Random, 0.1, 77);
        let mut second = FrameGenerator::new(DIMS, Pattern::Random, 0.1, 77);
        assert_eq!(first.next_frame(), second.next_frame());
        assert_eq!(first.next_frame(), second.next_frame());
    }

    #[test]
    fn wave_advances_between_frames() {
        let mut generator = FrameGenerator::new(DIMS, Pattern::Wave, 0.0, 0);
        assert_ne!(generator.next_frame(), generator.next_frame());
    }
}
