//! Parameter definitions with physical units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Units (pixels, seconds, samples)
//! - Documented ranges and meanings
//! - The exact values the lattice was tuned with

mod audio;
mod lattice;
mod render;

// Re-export all types
pub use audio::{audio_constants, ExtractorConfig};
pub use lattice::{glyph_constants, SimulationParams};
pub use render::RenderConfig;
