//! Center and many-body forces.

use glam::Vec2;
use rand::Rng;

use super::Node;

/// Tiny random offset separating coincident nodes
fn jiggle<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    (rng.random::<f32>() - 0.5) * 1e-6
}

/// Charge-like force between every node pair.
///
/// Negative strength repels. Adds to velocities only; positions are
/// untouched until integration, so pair order does not matter.
pub fn apply_many_body<R: Rng + ?Sized>(
    nodes: &mut [Node],
    strength: f32,
    alpha: f32,
    distance_min: f32,
    rng: &mut R,
) {
    let distance_min2 = distance_min * distance_min;

    for i in 0..nodes.len() {
        let origin = nodes[i].position;
        let mut impulse = Vec2::ZERO;

        for (j, other) in nodes.iter().enumerate() {
            if i == j {
                continue;
            }

            let mut delta = other.position - origin;
            if delta.x == 0.0 {
                delta.x = jiggle(rng);
            }
            if delta.y == 0.0 {
                delta.y = jiggle(rng);
            }

            let mut l = delta.length_squared();
            if l == 0.0 {
                continue;
            }
            if l < distance_min2 {
                l = (distance_min2 * l).sqrt();
            }

            impulse += delta * (strength * alpha / l);
        }

        nodes[i].velocity += impulse;
    }
}

/// Translate all nodes so their centroid moves toward `center`.
///
/// Acts on positions directly and preserves relative layout.
pub fn apply_center(nodes: &mut [Node], center: Vec2, strength: f32) {
    if nodes.is_empty() {
        return;
    }

    let centroid = nodes.iter().map(|n| n.position).sum::<Vec2>() / nodes.len() as f32;
    let shift = (centroid - center) * strength;

    for node in nodes.iter_mut() {
        node.position -= shift;
    }
}
