//! Simulation state: node set, alpha cooling and per-tick integration.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::forces::{apply_center, apply_many_body};
use super::Node;
use crate::glyph::ForceConfig;
use crate::params::SimulationParams;

/// Force-directed relaxation over a fixed node set
pub struct Simulation {
    nodes: Vec<Node>,
    forces: ForceConfig,
    params: SimulationParams,

    /// Attraction target (viewport center, pixels)
    center: Vec2,

    /// Kinetic temperature; force contributions scale with it
    alpha: f32,

    running: bool,

    /// Source for coincident-node jiggle
    rng: StdRng,
}

impl Simulation {
    /// Scatter `params.node_count` nodes uniformly over the viewport and
    /// start ticking at full heat.
    pub fn new<R: Rng + ?Sized>(viewport: Vec2, params: SimulationParams, rng: &mut R) -> Self {
        let nodes = (0..params.node_count)
            .map(|_| {
                Node::at(Vec2::new(
                    rng.random::<f32>() * viewport.x,
                    rng.random::<f32>() * viewport.y,
                ))
            })
            .collect();

        let forces = ForceConfig {
            center_strength: params.initial_center_strength,
            repulsion_strength: params.initial_charge,
        };

        log::debug!(
            "Simulation created: {} nodes in {}x{}",
            params.node_count,
            viewport.x,
            viewport.y
        );

        Self {
            nodes,
            forces,
            params,
            center: viewport / 2.0,
            alpha: 1.0,
            running: true,
            rng: StdRng::seed_from_u64(rng.random()),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn forces(&self) -> ForceConfig {
        self.forces
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Replace force strengths in place. Takes effect on the next tick.
    pub fn set_forces(&mut self, forces: ForceConfig) {
        self.forces = forces;
    }

    /// Move the attraction target; nodes keep their positions
    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.center = viewport / 2.0;
    }

    /// Raise alpha so new forces reshape the layout, and resume ticking
    pub fn reheat(&mut self) {
        self.alpha = self.params.reheat_alpha;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advance one tick. Returns false (and does nothing) once cooled or stopped.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }

        self.alpha += (self.params.alpha_target - self.alpha) * self.params.alpha_decay;

        apply_many_body(
            &mut self.nodes,
            self.forces.repulsion_strength,
            self.alpha,
            self.params.distance_min,
            &mut self.rng,
        );
        apply_center(&mut self.nodes, self.center, self.forces.center_strength);

        let retain = 1.0 - self.params.velocity_decay;
        for node in &mut self.nodes {
            node.velocity *= retain;
            node.position += node.velocity;
        }

        if self.alpha < self.params.alpha_min {
            self.running = false;
            log::debug!("Simulation cooled");
        }

        true
    }

    /// Mean distance of nodes from the attraction target (pixels)
    pub fn spread(&self) -> f32 {
        if self.nodes.is_empty() {
            return 0.0;
        }
        self.nodes
            .iter()
            .map(|n| n.position.distance(self.center))
            .sum::<f32>()
            / self.nodes.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::{classify, force_config};
    use crate::audio::AudioSample;

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    fn simulation(seed: u64) -> Simulation {
        let mut rng = StdRng::seed_from_u64(seed);
        Simulation::new(VIEWPORT, SimulationParams::default(), &mut rng)
    }

    fn settle(sim: &mut Simulation, forces: ForceConfig, ticks: usize) {
        sim.set_forces(forces);
        sim.reheat();
        for _ in 0..ticks {
            sim.tick();
        }
    }

    #[test]
    fn test_initial_nodes_inside_viewport() {
        let sim = simulation(3);
        assert_eq!(sim.nodes().len(), 150);
        for node in sim.nodes() {
            assert!((0.0..=VIEWPORT.x).contains(&node.position.x));
            assert!((0.0..=VIEWPORT.y).contains(&node.position.y));
            assert_eq!(node.velocity, Vec2::ZERO);
        }
        assert_eq!(sim.center(), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_cools_and_stops() {
        let mut sim = simulation(4);
        let mut ticks = 0;
        while sim.tick() {
            ticks += 1;
            assert!(ticks < 1000, "simulation never cooled");
        }
        assert!(!sim.is_running());
        assert!(sim.alpha() < 0.001);
        // ~300 ticks from alpha 1
        assert!((290..=310).contains(&ticks));
    }

    #[test]
    fn test_reheat_restarts() {
        let mut sim = simulation(5);
        sim.stop();
        assert!(!sim.tick());

        sim.reheat();
        assert!(sim.is_running());
        assert_eq!(sim.alpha(), 0.3);
        assert!(sim.tick());
    }

    #[test]
    fn test_reheat_keeps_node_identity() {
        let mut sim = simulation(6);
        sim.tick();
        let before: Vec<Vec2> = sim.nodes().iter().map(|n| n.position).collect();

        sim.set_forces(force_config(1.0));
        sim.reheat();
        assert_eq!(sim.nodes().len(), before.len());
        let after: Vec<Vec2> = sim.nodes().iter().map(|n| n.position).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_calm_clusters_and_chaos_disperses() {
        let mut calm = simulation(7);
        settle(&mut calm, classify(AudioSample::SILENT).force, 300);

        let mut chaos = simulation(7);
        settle(&mut chaos, classify(AudioSample(256.0)).force, 300);

        assert!(
            calm.spread() < chaos.spread(),
            "calm spread {} vs chaos spread {}",
            calm.spread(),
            chaos.spread()
        );
    }

    #[test]
    fn test_positions_stay_finite_under_noisy_forces() {
        let mut sim = simulation(8);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..240 {
            let sample = AudioSample(rng.random::<f32>() * 256.0);
            sim.set_forces(classify(sample).force);
            sim.reheat();
            sim.tick();
        }
        assert_eq!(sim.nodes().len(), 150);
        assert!(sim.nodes().iter().all(|n| n.position.is_finite()));
    }
}
