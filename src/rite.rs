//! Rite lifecycle: begin, calibrate, seal, receive the affirmation.

use crate::glyph::GlyphState;
use crate::scribe::Scribe;

/// Shown when the scribe fails; the rite returns to idle
pub const SEAL_FAILED_MESSAGE: &str =
    "The astral connection faltered. The aether is unstable. Please try again.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RiteState {
    #[default]
    Idle,
    /// Breath is shaping the lattice
    Calibrating,
    /// Waiting on the scribe
    Processing,
    Complete,
}

#[derive(Debug, Default)]
pub struct Rite {
    state: RiteState,

    /// Latest glyph seen while calibrating; handed to the scribe on seal
    glyph: GlyphState,

    /// Whether breath is reaching the lattice; sealing waits for it
    listening: bool,

    affirmation: Option<String>,
    error: Option<String>,
}

impl Rite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RiteState {
        self.state
    }

    pub fn glyph(&self) -> GlyphState {
        self.glyph
    }

    pub fn affirmation(&self) -> Option<&str> {
        self.affirmation.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_calibrating(&self) -> bool {
        self.state == RiteState::Calibrating
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Report whether the microphone is live for this rite
    pub fn set_listening(&mut self, listening: bool) {
        self.listening = listening && self.is_calibrating();
    }

    /// Whether the lattice should exist in this state
    pub fn shows_lattice(&self) -> bool {
        matches!(self.state, RiteState::Calibrating | RiteState::Processing)
    }

    /// Start calibrating. Only an idle rite can begin; a completed one
    /// must be reset first.
    pub fn begin(&mut self) -> bool {
        if self.state != RiteState::Idle {
            return false;
        }
        self.state = RiteState::Calibrating;
        self.glyph = GlyphState::default();
        self.listening = false;
        self.affirmation = None;
        self.error = None;
        log::info!("Rite begun");
        true
    }

    /// Retain the latest glyph; ignored outside calibration
    pub fn record(&mut self, glyph: GlyphState) {
        if self.is_calibrating() {
            self.glyph = glyph;
        }
    }

    /// Enter processing. Returns the glyph to inscribe, or `None` when not
    /// calibrating or while no breath is reaching the lattice.
    pub fn seal(&mut self) -> Option<GlyphState> {
        if !self.is_calibrating() {
            return None;
        }
        if !self.listening {
            log::debug!("Seal ignored: microphone not live");
            return None;
        }
        self.state = RiteState::Processing;
        self.listening = false;
        log::info!(
            "Rite sealed: {} glyph, complexity {:.2}",
            self.glyph.color,
            self.glyph.complexity
        );
        Some(self.glyph)
    }

    /// Resolve processing with the scribe's answer
    pub fn finish(&mut self, scribe: &dyn Scribe) {
        if self.state != RiteState::Processing {
            return;
        }

        match scribe.inscribe(&self.glyph) {
            Ok(text) => {
                self.affirmation = Some(text);
                self.state = RiteState::Complete;
            }
            Err(e) => {
                log::warn!("Scribe failed: {}", e);
                self.error = Some(SEAL_FAILED_MESSAGE.to_string());
                self.state = RiteState::Idle;
            }
        }
    }

    /// Return to idle from any state, abandoning a rite in progress
    pub fn reset(&mut self) {
        self.state = RiteState::Idle;
        self.glyph = GlyphState::default();
        self.listening = false;
        self.affirmation = None;
        self.error = None;
    }

    /// One-line status for the window title
    pub fn status(&self) -> String {
        match (self.state, &self.affirmation, &self.error) {
            (RiteState::Idle, _, Some(error)) => error.clone(),
            (RiteState::Idle, _, None) => "Press Space to begin the rite".to_string(),
            (RiteState::Calibrating, _, _) if !self.listening => {
                "Initializing aether... - R to abandon the rite".to_string()
            }
            (RiteState::Calibrating, _, _) => format!(
                "Breathe... {} ({:.2}) - Enter to seal the glyph",
                self.glyph.color, self.glyph.complexity
            ),
            (RiteState::Processing, _, _) => "Processing...".to_string(),
            (RiteState::Complete, Some(text), _) => format!("{} - R to begin anew", text),
            (RiteState::Complete, None, _) => "Rite complete - R to begin anew".to_string(),
        }
    }
}
