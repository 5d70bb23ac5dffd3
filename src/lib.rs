//! Gear Grid - a deterministic multi-layer gear simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (gears, grid topology, rotation propagation)
//! - `persistence`: Versioned JSON save/load with shape validation
//! - `scenarios`: Hand-authored and seeded demo configurations
//!
//! A grid holds meshed, multi-layer toothed gears. Driver gears are forced to
//! spin every tick; rotation propagates to neighbors only where tooth patterns
//! mesh across a shared edge. One tick = clear flags, seed from Drivers, expand
//! to a fixed point, rotate the flagged gears by one tooth slot.

pub mod persistence;
pub mod scenarios;
pub mod sim;

pub use sim::{Gear, GearKind, Grid, GridError, MeshPosition};

/// Simulation constants
pub mod consts {
    /// Default number of tooth slots per gear. Must stay a multiple of 4 so
    /// the four cardinal mesh positions land on whole slots.
    pub const DEFAULT_TEETH: usize = 8;
}

/// Wrap a signed slot offset into `[0, num_teeth)`.
#[inline]
pub fn wrap_slot(slot: i64, num_teeth: usize) -> usize {
    slot.rem_euclid(num_teeth as i64) as usize
}
