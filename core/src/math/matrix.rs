use crate::prelude::{GridDims, VizError, VizResult};
use ndarray::Array2;

/// Builds a dense grid from wire-format rows, checking the expected shape.
pub fn grid_from_rows(rows: &[Vec<f32>], dims: GridDims) -> VizResult<Array2<f32>> {
    if rows.len() != dims.rows || rows.iter().any(|row| row.len() != dims.cols) {
        return Err(VizError::ShapeMismatch(format!(
            "expected {}x{}, got {}x{}",
            dims.rows,
            dims.cols,
            rows.len(),
            rows.first().map_or(0, Vec::len)
        )));
    }
    let flat: Vec<f32> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((dims.rows, dims.cols), flat)
        .map_err(|err| VizError::ShapeMismatch(err.to_string()))
}

/// Wire-format rows for a stored grid.
pub fn rows_from_grid(grid: &Array2<f32>) -> Vec<Vec<f32>> {
    grid.rows().into_iter().map(|row| row.to_vec()).collect()
}
