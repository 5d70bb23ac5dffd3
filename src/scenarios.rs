//! Hand-authored and seeded demo configurations
//!
//! These builders poke individual tooth flags to wire up demonstration
//! circuits before the first tick: a signal wire with periodic re-drive
//! linkages, an OR gate built from three mirrored stages, and a seeded random
//! grid. Randomness always comes from a caller-supplied `Pcg32`; the engine
//! itself never sees an RNG.

use rand::Rng;
use rand_pcg::Pcg32;

use crate::sim::{GearKind, Grid, GridError};
use crate::wrap_slot;

/// One gear edit: activate `slots` on `layer` of the cell at `(row, col)`,
/// optionally promoting the cell to a Driver.
#[derive(Debug, Clone)]
pub struct Placement {
    pub row: usize,
    pub col: usize,
    pub layer: usize,
    pub slots: Vec<usize>,
    pub driver: bool,
}

impl Placement {
    pub fn new(row: usize, col: usize, layer: usize, slots: &[usize]) -> Self {
        Self {
            row,
            col,
            layer,
            slots: slots.to_vec(),
            driver: false,
        }
    }

    pub fn driver(mut self) -> Self {
        self.driver = true;
        self
    }
}

/// Apply a batch of placements, shifted by `(row_offset, col_offset)`.
pub fn apply_placements(
    grid: &mut Grid,
    placements: &[Placement],
    row_offset: usize,
    col_offset: usize,
) -> Result<(), GridError> {
    for p in placements {
        let row = p.row + row_offset;
        let col = p.col + col_offset;
        if p.driver {
            grid.set_kind(row, col, GearKind::Driver)?;
        }
        for &slot in &p.slots {
            grid.set_tooth(row, col, p.layer, slot, true)?;
        }
    }
    Ok(())
}

/// Every slot index of an `n`-tooth gear (a fully toothed layer meshes with
/// any neighbor that has a tooth at the shared edge).
fn full_circle(n: usize) -> Vec<usize> {
    (0..n).collect()
}

/// A two-cell linkage that re-drives a signal line: the line cell at
/// `(row, col)` gets a left-facing tooth on layer 0 plus arc patterns on
/// layers 1 and 2, and the cell above it becomes a Driver with the matching
/// arcs phase-shifted by `phase`.
fn drive_linkage(grid: &mut Grid, row: usize, col: usize, phase: i64) -> Result<(), GridError> {
    let n = grid.num_teeth();

    grid.set_tooth(row, col, 0, 4, true)?;
    grid.set_kind(row - 1, col, GearKind::Driver)?;

    for i in 0..4i64 {
        grid.set_tooth(row, col, 1, wrap_slot(i - 1, n), true)?;
        grid.set_tooth(row - 1, col, 1, wrap_slot(i - 5 + phase, n), true)?;
    }
    for i in 0..3i64 {
        grid.set_tooth(row, col, 2, wrap_slot(i + 3, n), true)?;
        grid.set_tooth(row - 1, col, 2, wrap_slot(i + phase, n), true)?;
    }
    Ok(())
}

/// A 10x20, 4-layer grid carrying a single signal wire along row 1, re-driven
/// by linkages hanging off row 0.
pub fn wire() -> Result<Grid, GridError> {
    let mut grid = Grid::with_defaults(10, 20, 4)?;
    let n = grid.num_teeth();

    grid.set_tooth(1, 1, 0, 7, true)?;
    grid.set_kind(1, 1, GearKind::Driver)?;
    grid.set_tooth(1, 2, 0, 0, true)?;
    grid.set_tooth(1, 2, 0, 4, true)?;

    drive_linkage(&mut grid, 1, 3, 0)?;
    for col in [6, 8, 10, 12] {
        drive_linkage(&mut grid, 1, col, -1)?;
    }

    for col in [4, 5, 7, 9, 11] {
        for slot in 0..n {
            grid.set_tooth(1, col, 0, slot, true)?;
        }
    }

    log::info!("built wire scenario ({}x{})", grid.rows(), grid.cols());
    Ok(grid)
}

/// An 8x20, 4-layer grid with three OR-gate stages side by side. Each stage
/// has two driver inputs feeding a shared output column; the rightmost stages
/// use phase-shifted input arcs.
pub fn or_gate() -> Result<Grid, GridError> {
    let mut grid = Grid::with_defaults(8, 20, 4)?;
    let n = grid.num_teeth();

    let mut stage = vec![
        Placement::new(2, 2, 0, &full_circle(n)).driver(),
        Placement::new(3, 2, 0, &[1, 3, 5, 7]),
        Placement::new(3, 2, 1, &[0, 2, 4, 6]),
        Placement::new(3, 1, 1, &[1]),
        Placement::new(3, 1, 2, &[5, 4]),
        Placement::new(3, 0, 2, &[1, 2]).driver(),
        Placement::new(4, 2, 0, &full_circle(n)),
        Placement::new(5, 2, 0, &full_circle(n)),
        Placement::new(6, 2, 0, &full_circle(n)),
        Placement::new(6, 2, 1, &[2]),
        Placement::new(3, 3, 1, &[5]),
        Placement::new(3, 3, 2, &[0, 1]),
        Placement::new(3, 4, 2, &[1, 2]).driver(),
    ];

    apply_placements(&mut grid, &stage, 0, 2)?;
    stage[5].slots = vec![6, 7];
    apply_placements(&mut grid, &stage, 0, 8)?;
    stage[12].slots = vec![6, 7];
    apply_placements(&mut grid, &stage, 0, 14)?;

    log::info!("built OR-gate scenario ({}x{})", grid.rows(), grid.cols());
    Ok(grid)
}

/// A grid with IID random tooth flags (3-in-7 density, matching the original
/// demo content) and the four corner gears promoted to Drivers. Deterministic
/// for a given RNG state.
pub fn random_grid(
    rows: usize,
    cols: usize,
    num_layers: usize,
    rng: &mut Pcg32,
) -> Result<Grid, GridError> {
    let mut grid = Grid::with_defaults(rows, cols, num_layers)?;
    let num_teeth = grid.num_teeth();

    for row in 0..rows {
        for col in 0..cols {
            for layer in 0..num_layers {
                for slot in 0..num_teeth {
                    if rng.random_ratio(3, 7) {
                        grid.set_tooth(row, col, layer, slot, true)?;
                    }
                }
            }
        }
    }

    for (row, col) in [
        (0, 0),
        (0, cols - 1),
        (rows - 1, 0),
        (rows - 1, cols - 1),
    ] {
        grid.set_kind(row, col, GearKind::Driver)?;
    }

    Ok(grid)
}

/// Count the Driver gears in a grid (handy sanity check for scenarios).
pub fn driver_count(grid: &Grid) -> usize {
    grid.iter_cells()
        .filter(|(_, _, g)| g.kind == GearKind::Driver)
        .count()
}
