//! The lattice: classifier, simulation and binder composed behind one
//! per-frame entry point.
//!
//! Subscribes to AudioSample events and publishes a GlyphState for every
//! sample it applies. Within a frame, each sample is classified, its forces
//! applied, its visual transition started, its glyph published, and only
//! then is the simulation re-heated.

use crossbeam_channel::Receiver;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::audio::AudioSample;
use crate::binder::{Primitive, RenderBinder};
use crate::broadcast::Broadcast;
use crate::glyph::{classify, GlyphState};
use crate::params::{RenderConfig, SimulationParams};
use crate::simulation::Simulation;

/// Glyphs each subscriber may fall behind by before the oldest are dropped
pub const GLYPH_QUEUE_CAPACITY: usize = 64;

pub struct Lattice {
    simulation: Simulation,
    binder: RenderBinder,

    /// Palette sampling for per-node shimmer
    rng: StdRng,

    audio: Receiver<AudioSample>,
    glyphs: Broadcast<GlyphState>,

    latest: Option<GlyphState>,
}

impl Lattice {
    /// Mount a lattice filling `viewport`, fed by `audio`
    pub fn new(
        viewport: Vec2,
        params: SimulationParams,
        render_config: &RenderConfig,
        audio: Receiver<AudioSample>,
        seed: u64,
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let simulation = Simulation::new(viewport, params, &mut rng);
        let binder = RenderBinder::new(simulation.nodes(), render_config);

        log::info!("Lattice mounted with {} nodes", simulation.nodes().len());

        Self {
            simulation,
            binder,
            rng,
            audio,
            glyphs: Broadcast::new(GLYPH_QUEUE_CAPACITY),
            latest: None,
        }
    }

    /// Receiver of every GlyphState published from now on
    pub fn subscribe_glyphs(&mut self) -> Receiver<GlyphState> {
        self.glyphs.subscribe()
    }

    /// Last published glyph, if any sample has been applied
    pub fn latest_glyph(&self) -> Option<GlyphState> {
        self.latest
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn primitives(&self) -> &[Primitive] {
        self.binder.primitives()
    }

    pub fn resize(&mut self, viewport: Vec2) {
        self.simulation.set_viewport(viewport);
        self.simulation.reheat();
    }

    /// Run one frame at `now_s`.
    ///
    /// Pending samples are applied in arrival order while `calibrating`,
    /// discarded otherwise. Returns the number of samples applied.
    pub fn frame(&mut self, now_s: f32, calibrating: bool) -> usize {
        // Progress transitions started on earlier frames before retargeting
        self.binder.advance(now_s);

        let mut applied = 0;
        while let Ok(sample) = self.audio.try_recv() {
            if calibrating {
                self.apply(sample, now_s);
                applied += 1;
            }
        }

        if self.simulation.tick() {
            self.binder.sync_positions(self.simulation.nodes());
        }

        applied
    }

    fn apply(&mut self, sample: AudioSample, now_s: f32) {
        let classification = classify(sample);

        self.simulation.set_forces(classification.force);
        self.binder
            .transition_to(&classification.visual, now_s, &mut self.rng);

        let glyph = classification.glyph;
        self.latest = Some(glyph);
        self.glyphs.publish(glyph);

        log::trace!(
            "sample {:.1} -> {} complexity {:.2}, center {:.3}, charge {:.1}",
            sample.value(),
            glyph.color,
            glyph.complexity,
            classification.force.center_strength,
            classification.force.repulsion_strength
        );

        self.simulation.reheat();
    }
}

impl Drop for Lattice {
    fn drop(&mut self) {
        self.simulation.stop();
        log::info!("Lattice unmounted");
    }
}
