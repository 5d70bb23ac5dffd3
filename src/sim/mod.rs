//! Deterministic simulation module
//!
//! All grid logic lives here. This module must be pure and deterministic:
//! - Discrete logical steps only (no continuous dynamics)
//! - No randomness anywhere in the engine
//! - Stable row-major iteration order
//! - No rendering or platform dependencies

pub mod gear;
pub mod grid;
pub mod mesh;
pub mod tick;

pub use gear::{Gear, GearKind};
pub use grid::{Grid, GridError};
pub use mesh::MeshPosition;
