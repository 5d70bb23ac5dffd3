//! The 2-D gear grid
//!
//! A rectangular, row-major container of gears with uniform teeth and layer
//! counts. The grid owns its cells outright; renderers get `&Gear` views and
//! scenario builders mutate through the checked accessors between ticks.
//! `Clone` is a deep copy and is the snapshot/reset mechanism.

use thiserror::Error;

use super::gear::{Gear, GearKind};

/// Grid construction and access failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid dimensions must be non-zero (rows={rows}, cols={cols}, layers={layers}, teeth={teeth})")]
    InvalidDimensions {
        rows: usize,
        cols: usize,
        layers: usize,
        teeth: usize,
    },
    #[error("teeth count {0} is not divisible by 4; cardinal mesh positions would be ill-defined")]
    TeethNotMeshable(usize),
    #[error("cell ({row}, {col}) is outside the grid")]
    OutOfBounds { row: usize, col: usize },
    #[error("layer {layer} or slot {slot} is out of range for this grid")]
    BadToothIndex { layer: usize, slot: usize },
}

/// A rectangular grid of multi-layer gears
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    num_layers: usize,
    num_teeth: usize,
    /// Row-major cells, exclusively owned
    cells: Vec<Gear>,
}

impl Grid {
    /// Build a grid of Driven gears with all teeth absent and spin direction
    /// alternating in a checkerboard: +1 where `(row + col)` is odd, -1 where
    /// it is even. Adjacent gears always spin opposite ways.
    pub fn new(
        rows: usize,
        cols: usize,
        num_layers: usize,
        num_teeth: usize,
    ) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 || num_layers == 0 || num_teeth == 0 {
            return Err(GridError::InvalidDimensions {
                rows,
                cols,
                layers: num_layers,
                teeth: num_teeth,
            });
        }
        if num_teeth % 4 != 0 {
            return Err(GridError::TeethNotMeshable(num_teeth));
        }

        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                let direction = if (row + col) % 2 == 1 { 1 } else { -1 };
                cells.push(Gear::new(num_teeth, num_layers, GearKind::Driven, direction));
            }
        }

        Ok(Self {
            rows,
            cols,
            num_layers,
            num_teeth,
            cells,
        })
    }

    /// Grid with the default 8 tooth slots per gear.
    pub fn with_defaults(rows: usize, cols: usize, num_layers: usize) -> Result<Self, GridError> {
        Self::new(rows, cols, num_layers, crate::consts::DEFAULT_TEETH)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn num_layers(&self) -> usize {
        self.num_layers
    }

    #[inline]
    pub fn num_teeth(&self) -> usize {
        self.num_teeth
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    /// Read-only cell access.
    pub fn gear(&self, row: usize, col: usize) -> Option<&Gear> {
        self.index(row, col).map(|i| &self.cells[i])
    }

    /// Mutable cell access for editors and the propagation engine.
    pub fn gear_mut(&mut self, row: usize, col: usize) -> Option<&mut Gear> {
        self.index(row, col).map(move |i| &mut self.cells[i])
    }

    /// Set a cell's role. Errors on out-of-range coordinates; callers must not
    /// rely on wraparound.
    pub fn set_kind(&mut self, row: usize, col: usize, kind: GearKind) -> Result<(), GridError> {
        let gear = self
            .gear_mut(row, col)
            .ok_or(GridError::OutOfBounds { row, col })?;
        gear.kind = kind;
        Ok(())
    }

    /// Set or clear one tooth flag.
    pub fn set_tooth(
        &mut self,
        row: usize,
        col: usize,
        layer: usize,
        slot: usize,
        present: bool,
    ) -> Result<(), GridError> {
        let gear = self
            .gear_mut(row, col)
            .ok_or(GridError::OutOfBounds { row, col })?;
        if !gear.set_tooth(layer, slot, present) {
            return Err(GridError::BadToothIndex { layer, slot });
        }
        Ok(())
    }

    /// Iterate cells in row-major order with their coordinates.
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, &Gear)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, gear)| (i / self.cols, i % self.cols, gear))
    }

    /// Cells currently flagged to rotate.
    pub fn flagged_count(&self) -> usize {
        self.cells.iter().filter(|g| g.will_rotate).count()
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Gear] {
        &mut self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_checkerboard_directions() {
        let grid = Grid::with_defaults(3, 3, 2).unwrap();
        for (row, col, gear) in grid.iter_cells() {
            let expected = if (row + col) % 2 == 1 { 1 } else { -1 };
            assert_eq!(gear.direction, expected, "at ({row}, {col})");
            assert_eq!(gear.kind, GearKind::Driven);
            assert!(!gear.has_any_tooth());
        }
    }

    #[test]
    fn test_adjacent_directions_differ() {
        let grid = Grid::with_defaults(4, 5, 1).unwrap();
        for (row, col, gear) in grid.iter_cells() {
            if col + 1 < grid.cols() {
                let right = grid.gear(row, col + 1).unwrap();
                assert_ne!(gear.direction, right.direction);
            }
            if row + 1 < grid.rows() {
                let below = grid.gear(row + 1, col).unwrap();
                assert_ne!(gear.direction, below.direction);
            }
        }
    }

    #[test]
    fn test_rejects_unmeshable_teeth() {
        assert_eq!(
            Grid::new(2, 2, 1, 6).unwrap_err(),
            GridError::TeethNotMeshable(6)
        );
        assert!(Grid::new(2, 2, 1, 12).is_ok());
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        assert!(matches!(
            Grid::new(0, 2, 1, 8),
            Err(GridError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Grid::new(2, 2, 0, 8),
            Err(GridError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_out_of_bounds_mutators_error() {
        let mut grid = Grid::with_defaults(2, 2, 1).unwrap();
        assert_eq!(
            grid.set_kind(2, 0, GearKind::Driver),
            Err(GridError::OutOfBounds { row: 2, col: 0 })
        );
        assert_eq!(
            grid.set_tooth(0, 5, 0, 0, true),
            Err(GridError::OutOfBounds { row: 0, col: 5 })
        );
        assert_eq!(
            grid.set_tooth(0, 0, 3, 0, true),
            Err(GridError::BadToothIndex { layer: 3, slot: 0 })
        );
    }

    #[test]
    fn test_clone_is_deep() {
        let mut grid = Grid::with_defaults(2, 2, 1).unwrap();
        grid.set_tooth(0, 0, 0, 0, true).unwrap();
        let snapshot = grid.clone();

        grid.set_tooth(0, 0, 0, 0, false).unwrap();
        grid.set_kind(1, 1, GearKind::Driver).unwrap();

        assert!(snapshot.gear(0, 0).unwrap().tooth(0, 0));
        assert_eq!(snapshot.gear(1, 1).unwrap().kind, GearKind::Driven);
    }
}
