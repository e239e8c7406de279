//! State classification: loudness → cohesion, theme, forces and visuals.
//!
//! Everything here is a pure function of a single AudioSample. Calm breath
//! (low loudness) yields high cohesion, strong centering and warm gold;
//! sharp breath yields chaos, strong repulsion and violet.

use glam::Vec4;
use rand::Rng;

use crate::audio::AudioSample;
use crate::params::glyph_constants::*;

/// Dominant color theme of the lattice
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorTheme {
    #[default]
    Violet,
    Emerald,
    Gold,
}

impl ColorTheme {
    /// Select theme from cohesion (strict thresholds, first match wins)
    pub fn from_cohesion(cohesion: f32) -> Self {
        if cohesion > GOLD_THRESHOLD {
            Self::Gold
        } else if cohesion > EMERALD_THRESHOLD {
            Self::Emerald
        } else {
            Self::Violet
        }
    }

    pub fn palette(self) -> &'static [u32; 4] {
        match self {
            Self::Violet => &VIOLET_PALETTE,
            Self::Emerald => &EMERALD_PALETTE,
            Self::Gold => &GOLD_PALETTE,
        }
    }

    /// Uniformly pick one palette entry as sRGB RGBA
    pub fn sample_color<R: Rng + ?Sized>(self, rng: &mut R) -> Vec4 {
        let palette = self.palette();
        hex_to_rgba(palette[rng.random_range(0..palette.len())])
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Violet => "violet",
            Self::Emerald => "emerald",
            Self::Gold => "gold",
        }
    }
}

impl std::fmt::Display for ColorTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Externally reported summary of the lattice
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GlyphState {
    /// Organization in [0, 1] (the cohesion factor)
    pub complexity: f32,
    pub color: ColorTheme,
}

/// Force strengths for one update
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceConfig {
    /// Attraction towards the viewport center
    pub center_strength: f32,
    /// Many-body charge (negative = repulsion)
    pub repulsion_strength: f32,
}

/// Per-node visual targets for one update
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualParams {
    pub theme: ColorTheme,
    /// pixels
    pub radius: f32,
    /// Soft edge radius in pixels (0 = crisp)
    pub blur: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Classification {
    pub force: ForceConfig,
    pub glyph: GlyphState,
    pub visual: VisualParams,
}

/// Loudness mapped to [0, 1]; NaN and negative input count as silence
pub fn normalize(sample: AudioSample) -> f32 {
    let value = sample.value();
    if value.is_nan() {
        return 0.0;
    }
    (value / LOUDNESS_FULL_SCALE).clamp(0.0, 1.0)
}

pub fn force_config(normalized: f32) -> ForceConfig {
    ForceConfig {
        center_strength: (1.0 - normalized) * CENTER_STRENGTH_MAX,
        repulsion_strength: REPULSION_BASE - normalized * REPULSION_SCALE,
    }
}

pub fn visual_params(cohesion: f32) -> VisualParams {
    VisualParams {
        theme: ColorTheme::from_cohesion(cohesion),
        radius: RADIUS_BASE + cohesion * RADIUS_SCALE,
        blur: if cohesion > GOLD_THRESHOLD {
            GOLD_BLUR_PX
        } else {
            0.0
        },
    }
}

pub fn classify(sample: AudioSample) -> Classification {
    let normalized = normalize(sample);
    let cohesion = 1.0 - normalized;
    let visual = visual_params(cohesion);

    Classification {
        force: force_config(normalized),
        glyph: GlyphState {
            complexity: cohesion,
            color: visual.theme,
        },
        visual,
    }
}

/// 0xRRGGBB → opaque RGBA in [0, 1] (sRGB encoded)
pub fn hex_to_rgba(hex: u32) -> Vec4 {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    Vec4::new(channel(16), channel(8), channel(0), 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_theme_boundaries_are_strict() {
        assert_eq!(ColorTheme::from_cohesion(0.86), ColorTheme::Gold);
        assert_eq!(ColorTheme::from_cohesion(0.85), ColorTheme::Emerald);
        assert_eq!(ColorTheme::from_cohesion(0.61), ColorTheme::Emerald);
        assert_eq!(ColorTheme::from_cohesion(0.6), ColorTheme::Violet);
        assert_eq!(ColorTheme::from_cohesion(0.0), ColorTheme::Violet);
        assert_eq!(ColorTheme::from_cohesion(1.0), ColorTheme::Gold);
    }

    #[test]
    fn test_force_endpoints() {
        let calm = force_config(0.0);
        assert!((calm.center_strength - 0.1).abs() < 1e-6);
        assert_eq!(calm.repulsion_strength, -5.0);

        let chaos = force_config(1.0);
        assert_eq!(chaos.center_strength, 0.0);
        assert_eq!(chaos.repulsion_strength, -155.0);
    }

    #[test]
    fn test_quiet_input_is_gold() {
        let c = classify(AudioSample::SILENT);
        assert_eq!(c.glyph.color, ColorTheme::Gold);
        assert_eq!(c.glyph.complexity, 1.0);
        assert_eq!(c.visual.radius, 5.0);
        assert_eq!(c.visual.blur, GOLD_BLUR_PX);
    }

    #[test]
    fn test_loud_input_is_violet() {
        let c = classify(AudioSample(256.0));
        assert_eq!(c.glyph.color, ColorTheme::Violet);
        assert_eq!(c.glyph.complexity, 0.0);
        assert_eq!(c.visual.radius, 1.0);
        assert_eq!(c.visual.blur, 0.0);
        assert_eq!(c.force.repulsion_strength, -155.0);
    }

    #[test]
    fn test_normalize_clamps() {
        assert_eq!(normalize(AudioSample(64.0)), 0.5);
        assert_eq!(normalize(AudioSample(1e9)), 1.0);
        assert_eq!(normalize(AudioSample(-3.0)), 0.0);
        assert_eq!(normalize(AudioSample(f32::NAN)), 0.0);
    }

    #[test]
    fn test_hex_to_rgba() {
        let c = hex_to_rgba(0xff8000);
        assert_eq!(c, Vec4::new(1.0, 128.0 / 255.0, 0.0, 1.0));
    }

    #[test]
    fn test_sampled_colors_stay_in_palette() {
        let mut rng = StdRng::seed_from_u64(7);
        let allowed: Vec<Vec4> = EMERALD_PALETTE.iter().map(|&h| hex_to_rgba(h)).collect();
        for _ in 0..64 {
            let color = ColorTheme::Emerald.sample_color(&mut rng);
            assert!(allowed.contains(&color));
        }
    }

    proptest! {
        #[test]
        fn prop_theme_follows_complexity(sample in 0.0f32..400.0) {
            let c = classify(AudioSample(sample));
            prop_assert!((0.0..=1.0).contains(&c.glyph.complexity));
            prop_assert_eq!(c.glyph.color, ColorTheme::from_cohesion(c.glyph.complexity));
            prop_assert!(c.force.center_strength.is_finite());
            prop_assert!((-155.0..=-5.0).contains(&c.force.repulsion_strength));
        }

        #[test]
        fn prop_forces_are_continuous(n in 0.0f32..0.999) {
            let a = force_config(n);
            let b = force_config(n + 0.001);
            prop_assert!((a.center_strength - b.center_strength).abs() < 1e-3);
            prop_assert!((a.repulsion_strength - b.repulsion_strength).abs() < 0.2);
        }
    }
}
