use crate::config::SensorId;
use crate::prelude::GridDims;
use std::collections::HashSet;

/// Exclusive pointer-interaction mode.
///
/// A single enum rather than per-mode flags, so Select and Erase can never
/// be active at the same time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    Select,
    Erase,
}

/// A single grid cell on one sensor surface.
pub type Cell = (SensorId, usize, usize);

/// Maps pointer gestures onto grid cells and owns selection/erase state.
///
/// The overlay consumes pointer events exclusively; the hosting surface is
/// expected to suppress native drag gestures so nothing else sees them.
#[derive(Debug, Default)]
pub struct InteractionOverlay {
    mode: Mode,
    selected: HashSet<Cell>,
    erased: HashSet<Cell>,
}

impl InteractionOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Toggles Select; entering it leaves whatever mode was active.
    pub fn toggle_select(&mut self) {
        self.mode = match self.mode {
            Mode::Select => Mode::Normal,
            _ => Mode::Select,
        };
    }

    /// Toggles Erase; entering it leaves whatever mode was active.
    pub fn toggle_erase(&mut self) {
        self.mode = match self.mode {
            Mode::Erase => Mode::Normal,
            _ => Mode::Erase,
        };
    }

    /// Maps a pixel offset over a sensor surface to a grid cell.
    ///
    /// The row index comes from the x offset and the column index from the
    /// y offset, both floored by the pitch. Offsets outside the grid are
    /// ignored rather than clamped, so a drag that leaves the surface
    /// simply stops producing cells.
    pub fn cell_at(offset_x: f32, offset_y: f32, pitch: f32, dims: GridDims) -> Option<(usize, usize)> {
        if pitch <= 0.0 || offset_x < 0.0 || offset_y < 0.0 {
            return None;
        }
        let row = (offset_x / pitch).floor() as usize;
        let col = (offset_y / pitch).floor() as usize;
        (row < dims.rows && col < dims.cols).then_some((row, col))
    }

    /// Applies a pointer event on a cell under the current mode.
    ///
    /// Select toggles membership in the selection set. Erase removes the
    /// cell from the selection and masks it out of the display; the two
    /// never interact beyond that. Normal ignores the event.
    pub fn pointer_event(&mut self, sensor: &SensorId, row: usize, col: usize) {
        let cell = (sensor.clone(), row, col);
        match self.mode {
            Mode::Normal => {}
            Mode::Select => {
                if !self.selected.remove(&cell) {
                    self.selected.insert(cell);
                }
            }
            Mode::Erase => {
                self.selected.remove(&cell);
                self.erased.insert(cell);
            }
        }
    }

    pub fn is_selected(&self, sensor: &SensorId, row: usize, col: usize) -> bool {
        self.selected.contains(&(sensor.clone(), row, col))
    }

    pub fn is_erased(&self, sensor: &SensorId, row: usize, col: usize) -> bool {
        self.erased.contains(&(sensor.clone(), row, col))
    }

    pub fn selection_count(&self) -> usize {
        self.selected.len()
    }

    /// Selected cells on one sensor surface, keyed `(row, col)`.
    pub fn selected_cells(&self, sensor: &SensorId) -> HashSet<(usize, usize)> {
        self.selected
            .iter()
            .filter(|(id, _, _)| id == sensor)
            .map(|&(_, row, col)| (row, col))
            .collect()
    }

    /// Erased cells on one sensor surface, keyed `(row, col)`.
    pub fn erased_cells(&self, sensor: &SensorId) -> HashSet<(usize, usize)> {
        self.erased
            .iter()
            .filter(|(id, _, _)| id == sensor)
            .map(|&(_, row, col)| (row, col))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sensor() -> SensorId {
        SensorId::from("1")
    }

    #[test]
    fn double_toggle_restores_each_flag() {
        let mut overlay = InteractionOverlay::new();
        overlay.toggle_select();
        overlay.toggle_select();
        assert_eq!(overlay.mode(), Mode::Normal);
        overlay.toggle_erase();
        overlay.toggle_erase();
        assert_eq!(overlay.mode(), Mode::Normal);
    }

    #[test]
    fn modes_are_mutually_exclusive() {
        let mut overlay = InteractionOverlay::new();
        overlay.toggle_select();
        assert_eq!(overlay.mode(), Mode::Select);
        overlay.toggle_erase();
        assert_eq!(overlay.mode(), Mode::Erase);
        overlay.toggle_select();
        assert_eq!(overlay.mode(), Mode::Select);
    }

    #[test]
    fn pixel_offsets_floor_to_cells() {
        let dims = GridDims { rows: 4, cols: 4 };
        assert_eq!(
            InteractionOverlay::cell_at(45.0, 5.0, 20.0, dims),
            Some((2, 0))
        );
        assert_eq!(
            InteractionOverlay::cell_at(0.0, 79.9, 20.0, dims),
            Some((0, 3))
        );
    }

    #[test]
    fn out_of_range_offsets_are_ignored() {
        let dims = GridDims { rows: 2, cols: 2 };
        assert_eq!(InteractionOverlay::cell_at(45.0, 5.0, 20.0, dims), None);
        assert_eq!(InteractionOverlay::cell_at(-1.0, 5.0, 20.0, dims), None);
        assert_eq!(InteractionOverlay::cell_at(5.0, 5.0, 0.0, dims), None);
    }

    #[test]
    fn select_toggles_membership() {
        let mut overlay = InteractionOverlay::new();
        overlay.toggle_select();
        overlay.pointer_event(&sensor(), 2, 0);
        assert!(overlay.is_selected(&sensor(), 2, 0));
        overlay.pointer_event(&sensor(), 2, 0);
        assert!(!overlay.is_selected(&sensor(), 2, 0));
    }

    #[test]
    fn erase_unselects_and_masks() {
        let mut overlay = InteractionOverlay::new();
        overlay.toggle_select();
        overlay.pointer_event(&sensor(), 1, 1);
        overlay.toggle_erase();
        overlay.pointer_event(&sensor(), 1, 1);
        assert!(!overlay.is_selected(&sensor(), 1, 1));
        assert!(overlay.is_erased(&sensor(), 1, 1));
        assert_eq!(overlay.selection_count(), 0);
    }

    #[test]
    fn normal_mode_ignores_pointer_events() {
        let mut overlay = InteractionOverlay::new();
        overlay.pointer_event(&sensor(), 0, 0);
        assert!(!overlay.is_selected(&sensor(), 0, 0));
        assert!(!overlay.is_erased(&sensor(), 0, 0));
    }
}
