//! A single multi-layer gear and its rotation operator
//!
//! Each gear carries one tooth pattern per layer: a circular sequence of
//! booleans, one per tooth slot. Slot 0 is the fixed "right" reference
//! orientation; slots increase in the gear's own angular convention.

use serde::{Deserialize, Serialize};

use crate::wrap_slot;

/// Gear role. Drivers are externally forced to spin every tick; Driven gears
/// spin only when mechanically coupled to an active neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GearKind {
    Driver,
    #[default]
    Driven,
}

impl GearKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GearKind::Driver => "Driver",
            GearKind::Driven => "Driven",
        }
    }
}

/// One cell's gear state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gear {
    /// Number of tooth slots arranged circularly
    pub num_teeth: usize,
    /// Number of independent tooth patterns stacked on this gear
    pub num_layers: usize,
    /// Per layer, per slot: is a tooth present
    pub layers_teeth_flags: Vec<Vec<bool>>,
    /// Driver or Driven
    pub kind: GearKind,
    /// Spin direction, +1 or -1, fixed at creation
    pub direction: i8,
    /// Transient per-tick flag: this gear rotates at the end of the tick
    pub will_rotate: bool,
}

impl Gear {
    /// Create a gear with all teeth absent.
    pub fn new(num_teeth: usize, num_layers: usize, kind: GearKind, direction: i8) -> Self {
        Self {
            num_teeth,
            num_layers,
            layers_teeth_flags: vec![vec![false; num_teeth]; num_layers],
            kind,
            direction,
            will_rotate: false,
        }
    }

    /// Tooth flag at `(layer, slot)`. Out-of-range coordinates read as absent.
    #[inline]
    pub fn tooth(&self, layer: usize, slot: usize) -> bool {
        self.layers_teeth_flags
            .get(layer)
            .and_then(|l| l.get(slot))
            .copied()
            .unwrap_or(false)
    }

    /// Set or clear the tooth flag at `(layer, slot)`.
    /// Returns false (and changes nothing) when the coordinates are out of range.
    pub fn set_tooth(&mut self, layer: usize, slot: usize, present: bool) -> bool {
        match self
            .layers_teeth_flags
            .get_mut(layer)
            .and_then(|l| l.get_mut(slot))
        {
            Some(flag) => {
                *flag = present;
                true
            }
            None => false,
        }
    }

    /// True if any layer has any tooth present.
    pub fn has_any_tooth(&self) -> bool {
        self.layers_teeth_flags
            .iter()
            .any(|layer| layer.iter().any(|&t| t))
    }

    /// Circularly shift one layer's tooth sequence by `direction * steps`
    /// slots. After rotation, slot `k` holds what was at slot
    /// `(k - direction * steps) mod num_teeth`. Out-of-range `layer` is a
    /// deliberate no-op, not a fault.
    pub fn rotate_layer(&mut self, layer: usize, steps: usize) {
        let Some(flags) = self.layers_teeth_flags.get_mut(layer) else {
            return;
        };
        if flags.is_empty() {
            return;
        }
        let n = flags.len();
        let shift = i64::from(self.direction) * steps as i64;
        let rotated: Vec<bool> = (0..n)
            .map(|k| flags[wrap_slot(k as i64 - shift, n)])
            .collect();
        *flags = rotated;
    }

    /// Rotate every layer by the same number of steps.
    pub fn rotate(&mut self, steps: usize) {
        for layer in 0..self.num_layers {
            self.rotate_layer(layer, steps);
        }
    }
}
