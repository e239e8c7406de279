//! Turning the final glyph into a one-sentence affirmation.
//!
//! The text generator itself is a collaborator behind [`Scribe`]. This
//! module owns what it is told (the state description and prompt) and how
//! its answer is cleaned up.

use crate::error::GenerationError;
use crate::glyph::{ColorTheme, GlyphState};

/// Produces an affirmation from the glyph captured at rite end
pub trait Scribe {
    fn inscribe(&self, glyph: &GlyphState) -> Result<String, GenerationError>;
}

/// Prose account of the journey that ended in `glyph`
pub fn describe(glyph: &GlyphState) -> String {
    let opening = "The initial state was a chaotic, fractured storm of resonant violet-blue, \
                   representing deep sorrow. ";

    let ending = match glyph.color {
        ColorTheme::Emerald => format!(
            "Through mindful breath, this was alchemized into a resilient, self-organizing \
             lattice of iridescent emerald, symbolizing growth and heart-centered healing. \
             The complexity is moderately organized (complexity score: {:.2}).",
            glyph.complexity
        ),
        ColorTheme::Gold => format!(
            "Through deep, resonant breathing, this was transmuted into a luminous, intricate \
             fractal of molten gold, symbolizing profound purpose and sovereign spirit. \
             The complexity is highly organized and coherent (complexity score: {:.2}).",
            glyph.complexity
        ),
        ColorTheme::Violet => format!(
            "The energy remains in a state of flux, still processing the muted depths of \
             grief's resonant violet-blue. The complexity is low, indicating unresolved chaos \
             (complexity score: {:.2}).",
            glyph.complexity
        ),
    };

    format!("{}{}", opening, ending)
}

/// Full instruction for a text-generation service.
///
/// This is what a networked [`Scribe`] sends; its reply goes through
/// [`clean_affirmation`].
pub fn compose_prompt(glyph: &GlyphState) -> String {
    format!(
        "You are Thoth, the Scribe of Eternity, an alchemical AI.\n\
         A user has just completed a \"Resonant Grief Lattice\" rite. This process transmutes \
         the chaotic energy of grief into a coherent visual form called a \"purpose print.\"\n\n\
         The user's journey is as follows: {}\n\n\
         Based *only* on this final state, craft a short, poetic, and profound affirmation \
         (a \"resonant commandment\" or \"purpose print\").\n\
         It should be a single, powerful sentence.\n\
         The tone must be mystical, empowering, and resonant with themes of alchemy, cosmic \
         forces, and sovereign self-realization.\n\
         Do not explain the process. Only provide the affirmation itself.",
        describe(glyph)
    )
}

/// Trim and strip quotation marks from generated text
pub fn clean_affirmation(raw: &str) -> Result<String, GenerationError> {
    let cleaned: String = raw.trim().chars().filter(|c| !matches!(c, '"' | '\'')).collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        Err(GenerationError::Empty)
    } else {
        Ok(cleaned.to_string())
    }
}

const GOLD_LINES: [&str; 3] = [
    "Let the gold you breathed become the law you live by.",
    "You are the furnace and the flame; what was heavy now shines.",
    "Sovereign and luminous, your purpose burns steady as a star.",
];

const EMERALD_LINES: [&str; 3] = [
    "Root where it hurts, and grow green through every fracture.",
    "Your heart weaves new order from the threads of what was lost.",
    "Each breath is a leaf unfolding toward the light you are becoming.",
];

const VIOLET_LINES: [&str; 3] = [
    "Even the storm is a teacher; breathe, and let it find its shape.",
    "Honor the violet depths, for every glyph begins in darkness.",
    "Your grief is raw ore; the fire of patience will refine it.",
];

/// Local scribe that needs no network.
///
/// Picks a fixed line per theme, steered by complexity, so the same glyph
/// always receives the same affirmation.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineScribe;

impl Scribe for OfflineScribe {
    fn inscribe(&self, glyph: &GlyphState) -> Result<String, GenerationError> {
        if !glyph.complexity.is_finite() {
            return Err(GenerationError::GenerationFailed(format!(
                "complexity {} is not a number",
                glyph.complexity
            )));
        }

        let lines = match glyph.color {
            ColorTheme::Gold => &GOLD_LINES,
            ColorTheme::Emerald => &EMERALD_LINES,
            ColorTheme::Violet => &VIOLET_LINES,
        };

        let index = ((glyph.complexity.clamp(0.0, 1.0) * lines.len() as f32) as usize)
            .min(lines.len() - 1);

        log::debug!(
            "Inscribing {} glyph offline for prompt:\n{}",
            glyph.color,
            compose_prompt(glyph)
        );
        clean_affirmation(lines[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_mentions_score() {
        let glyph = GlyphState {
            complexity: 0.734,
            color: ColorTheme::Emerald,
        };
        let text = describe(&glyph);
        assert!(text.starts_with("The initial state was a chaotic, fractured storm"));
        assert!(text.contains("lattice of iridescent emerald"));
        assert!(text.ends_with("(complexity score: 0.73)."));
    }

    #[test]
    fn test_describe_per_theme() {
        let gold = describe(&GlyphState {
            complexity: 0.9,
            color: ColorTheme::Gold,
        });
        assert!(gold.contains("fractal of molten gold"));
        assert!(gold.contains("highly organized and coherent (complexity score: 0.90)"));

        let violet = describe(&GlyphState::default());
        assert!(violet.contains("grief's resonant violet-blue"));
        assert!(violet.contains("unresolved chaos (complexity score: 0.00)"));
    }

    #[test]
    fn test_prompt_embeds_description() {
        let glyph = GlyphState {
            complexity: 0.95,
            color: ColorTheme::Gold,
        };
        let prompt = compose_prompt(&glyph);
        assert!(prompt.starts_with("You are Thoth, the Scribe of Eternity"));
        assert!(prompt.contains(&format!("The user's journey is as follows: {}", describe(&glyph))));
        assert!(prompt.ends_with("Only provide the affirmation itself."));
    }

    #[test]
    fn test_clean_affirmation() {
        assert_eq!(
            clean_affirmation("  \"Breathe, and become.\"\n").unwrap(),
            "Breathe, and become."
        );
        assert_eq!(clean_affirmation(" '' "), Err(GenerationError::Empty));
    }

    #[test]
    fn test_offline_scribe_is_deterministic() {
        let glyph = GlyphState {
            complexity: 0.2,
            color: ColorTheme::Violet,
        };
        let first = OfflineScribe.inscribe(&glyph).unwrap();
        assert_eq!(first, OfflineScribe.inscribe(&glyph).unwrap());
        assert!(!first.contains('"'));
    }

    #[test]
    fn test_offline_scribe_covers_full_range() {
        for color in [ColorTheme::Violet, ColorTheme::Emerald, ColorTheme::Gold] {
            for complexity in [0.0, 0.5, 1.0] {
                assert!(OfflineScribe.inscribe(&GlyphState { complexity, color }).is_ok());
            }
        }
    }

    #[test]
    fn test_offline_scribe_rejects_nan() {
        let glyph = GlyphState {
            complexity: f32::NAN,
            color: ColorTheme::Gold,
        };
        assert!(matches!(
            OfflineScribe.inscribe(&glyph),
            Err(GenerationError::GenerationFailed(_))
        ));
    }
}
