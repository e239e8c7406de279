//! Force-directed particle lattice.
//!
//! A fixed set of nodes relaxes under two competing forces: attraction to
//! the viewport center and mutual many-body repulsion. Strengths are
//! retuned on every classifier emission and the simulation is re-heated so
//! the new balance visibly reshapes the layout.

mod forces;
mod system;

// Re-export public types
pub use forces::{apply_center, apply_many_body};
pub use system::Simulation;

use glam::Vec2;

/// Point mass in screen space (pixels)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Node {
    pub position: Vec2,
    /// Velocity accumulator, integrated and damped each tick
    pub velocity: Vec2,
}

impl Node {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
        }
    }
}
