//! Per-tick propagation and rotation
//!
//! One simulation tick:
//! 1. `prepare_iteration` clears every `will_rotate` flag and seeds the flags
//!    of Driver gears.
//! 2. `iterate` expands the flagged set to a fixed point: an active gear with
//!    a tooth at a mesh position activates the in-bounds neighbor that has a
//!    tooth at the same layer and the opposite position. Coupling needs teeth
//!    on both sides of the shared edge.
//! 3. `rotate_flagged` turns exactly the flagged gears.
//!
//! Flags only ever flip false -> true during `iterate`, so the sweep loop is a
//! monotone closure over a finite set: it terminates within `rows * cols`
//! sweeps and the fixed point does not depend on visitation order.

use super::gear::GearKind;
use super::grid::Grid;
use super::mesh::MeshPosition;

/// Clear all rotation flags, then flag every Driver gear.
pub fn prepare_iteration(grid: &mut Grid) {
    for gear in grid.cells_mut() {
        gear.will_rotate = gear.kind == GearKind::Driver;
    }
}

/// One full pass over `order`, propagating flags from active gears to meshed
/// neighbors. Returns true if any gear was newly activated.
fn sweep(grid: &mut Grid, order: &[(usize, usize)]) -> bool {
    let num_teeth = grid.num_teeth();
    let num_layers = grid.num_layers();
    let mut changed = false;

    for &(row, col) in order {
        let Some(gear) = grid.gear(row, col) else {
            continue;
        };
        if !gear.will_rotate {
            continue;
        }

        for layer in 0..num_layers {
            for pos in MeshPosition::ALL {
                if !grid
                    .gear(row, col)
                    .is_some_and(|g| g.tooth(layer, pos.slot(num_teeth)))
                {
                    continue;
                }
                let Some((nr, nc)) = pos.neighbor(row, col, grid.rows(), grid.cols()) else {
                    continue;
                };
                let opposite_slot = pos.opposite().slot(num_teeth);
                if let Some(neighbor) = grid.gear_mut(nr, nc) {
                    if neighbor.tooth(layer, opposite_slot) && !neighbor.will_rotate {
                        neighbor.will_rotate = true;
                        changed = true;
                    }
                }
            }
        }
    }

    changed
}

/// Expand the flagged set to its least fixed point. Returns the number of
/// sweeps performed (at least 1, at most `rows * cols + 1`).
pub fn iterate(grid: &mut Grid) -> usize {
    let order: Vec<(usize, usize)> = (0..grid.rows())
        .flat_map(|r| (0..grid.cols()).map(move |c| (r, c)))
        .collect();

    let mut sweeps = 0;
    loop {
        sweeps += 1;
        if !sweep(grid, &order) {
            break;
        }
    }
    log::debug!(
        "propagation reached fixed point after {} sweeps, {} gears active",
        sweeps,
        grid.flagged_count()
    );
    sweeps
}

/// Rotate every flagged gear by `steps` tooth slots.
pub fn rotate_flagged(grid: &mut Grid, steps: usize) {
    for gear in grid.cells_mut() {
        if gear.will_rotate {
            gear.rotate(steps);
        }
    }
}

/// Run one complete tick (prepare, propagate, rotate by `steps`).
/// Returns the number of gears that rotated.
pub fn tick(grid: &mut Grid, steps: usize) -> usize {
    prepare_iteration(grid);
    iterate(grid);
    let rotated = grid.flagged_count();
    rotate_flagged(grid, steps);
    rotated
}
