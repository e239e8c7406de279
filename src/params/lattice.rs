//! Particle simulation parameters and glyph classification constants.

/// Force-directed simulation parameters
#[derive(Debug, Clone)]
pub struct SimulationParams {
    /// Number of lattice nodes (fixed for the lifetime of a lattice)
    pub node_count: usize,

    /// Many-body strength before the first audio sample arrives
    /// Negative = repulsion
    pub initial_charge: f32,

    /// Center force strength before the first audio sample arrives
    pub initial_center_strength: f32,

    /// Alpha assigned when new forces arrive
    pub reheat_alpha: f32,

    /// Simulation stops ticking once alpha falls below this
    pub alpha_min: f32,

    /// Per-tick fraction by which alpha approaches its target
    /// 1 - 0.001^(1/300) = settles in ~300 ticks
    pub alpha_decay: f32,

    /// Alpha the simulation cools towards
    pub alpha_target: f32,

    /// Fraction of velocity lost per tick (friction)
    pub velocity_decay: f32,

    /// Minimum pair distance for many-body force (pixels)
    /// Prevents singular forces between overlapping nodes
    pub distance_min: f32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            node_count: 150,
            initial_charge: -50.0,
            initial_center_strength: 0.1,
            reheat_alpha: 0.3,
            alpha_min: 0.001,
            alpha_decay: 1.0 - 0.001_f32.powf(1.0 / 300.0),
            alpha_target: 0.0,
            velocity_decay: 0.4,
            distance_min: 1.0,
        }
    }
}

/// Classification constants. Reproduced exactly; these define the rite.
pub mod glyph_constants {
    /// AudioSample value that maps to fully chaotic (normalized = 1)
    pub const LOUDNESS_FULL_SCALE: f32 = 128.0;

    /// Cohesion above this selects the gold theme
    pub const GOLD_THRESHOLD: f32 = 0.85;

    /// Cohesion above this (and not gold) selects the emerald theme
    pub const EMERALD_THRESHOLD: f32 = 0.6;

    /// Center strength at perfect calm
    pub const CENTER_STRENGTH_MAX: f32 = 0.1;

    /// Repulsion at perfect calm
    pub const REPULSION_BASE: f32 = -5.0;

    /// Additional repulsion at full loudness
    pub const REPULSION_SCALE: f32 = 150.0;

    /// Node radius at cohesion 0 (pixels)
    pub const RADIUS_BASE: f32 = 1.0;

    /// Additional radius at cohesion 1 (pixels)
    pub const RADIUS_SCALE: f32 = 4.0;

    /// Soft blur radius applied to gold nodes (pixels)
    pub const GOLD_BLUR_PX: f32 = 0.5;

    pub const VIOLET_PALETTE: [u32; 4] = [0x4c1d95, 0x5b21b6, 0x6d28d9, 0xa78bfa];
    pub const EMERALD_PALETTE: [u32; 4] = [0x064e3b, 0x059669, 0x34d399, 0xa7f3d0];
    pub const GOLD_PALETTE: [u32; 4] = [0xf59e0b, 0xfacc15, 0xfef08a, 0xfde047];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_decay_settles_in_300_ticks() {
        let params = SimulationParams::default();
        let mut alpha = 1.0_f32;
        for _ in 0..300 {
            alpha += (params.alpha_target - alpha) * params.alpha_decay;
        }
        assert!((alpha - params.alpha_min).abs() < 1e-4);
    }
}
