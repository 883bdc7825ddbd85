pub mod matrix;
pub mod stats;

pub use matrix::{grid_from_rows, rows_from_grid};
pub use stats::GridStats;
