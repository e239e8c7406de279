//! Resonant Lattice library - breath-driven force-directed particle lattice

pub mod audio;
pub mod binder;
pub mod broadcast;
pub mod cli;
pub mod error;
pub mod glyph;
pub mod lattice;
pub mod params;
pub mod rendering;
pub mod rite;
pub mod scribe;
pub mod simulation;
