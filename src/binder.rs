//! Render binder: the only writer of drawable primitives.
//!
//! Positions follow the simulation every tick. Radius, color and blur
//! move to each new classifier emission over a short eased transition
//! instead of jumping. Transitions begin at the emission time and are
//! first evaluated on the following frame.

use glam::{Vec2, Vec4};
use rand::Rng;

use crate::glyph::{hex_to_rgba, ColorTheme, VisualParams};
use crate::params::RenderConfig;
use crate::simulation::Node;

/// Drawable circle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Primitive {
    /// Center (pixels)
    pub position: Vec2,
    pub style: Style,
}

/// Interpolatable visual attributes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Style {
    /// pixels
    pub radius: f32,
    /// sRGB RGBA
    pub color: Vec4,
    /// Soft edge radius (pixels)
    pub blur: f32,
}

impl Style {
    fn lerp(&self, to: &Style, t: f32) -> Style {
        Style {
            radius: self.radius + (to.radius - self.radius) * t,
            color: self.color.lerp(to.color, t),
            blur: self.blur + (to.blur - self.blur) * t,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Transition {
    from: Style,
    to: Style,
    start_s: f32,
}

/// Cubic ease-out on [0, 1].
/// Retargeted every frame it still closes most of the gap within the duration.
pub fn ease_cubic_out(t: f32) -> f32 {
    let t = 1.0 - t.clamp(0.0, 1.0);
    1.0 - t * t * t
}

pub struct RenderBinder {
    primitives: Vec<Primitive>,
    transitions: Vec<Option<Transition>>,
    duration_s: f32,
}

impl RenderBinder {
    /// One primitive per node, in node order
    pub fn new(nodes: &[Node], config: &RenderConfig) -> Self {
        let initial = Style {
            radius: config.initial_radius,
            color: hex_to_rgba(ColorTheme::Violet.palette()[0]),
            blur: 0.0,
        };

        Self {
            primitives: nodes
                .iter()
                .map(|n| Primitive {
                    position: n.position,
                    style: initial,
                })
                .collect(),
            transitions: vec![None; nodes.len()],
            duration_s: config.transition_s,
        }
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitions.iter().any(Option::is_some)
    }

    /// Copy simulated positions onto primitives
    pub fn sync_positions(&mut self, nodes: &[Node]) {
        for (primitive, node) in self.primitives.iter_mut().zip(nodes) {
            primitive.position = node.position;
        }
    }

    /// Start a transition on every primitive toward `visual`.
    ///
    /// Each primitive draws its own color from the theme palette. A running
    /// transition is interrupted and the new one starts from wherever the
    /// style currently is.
    pub fn transition_to<R: Rng + ?Sized>(&mut self, visual: &VisualParams, now_s: f32, rng: &mut R) {
        for (primitive, slot) in self.primitives.iter().zip(self.transitions.iter_mut()) {
            *slot = Some(Transition {
                from: primitive.style,
                to: Style {
                    radius: visual.radius,
                    color: visual.theme.sample_color(rng),
                    blur: visual.blur,
                },
                start_s: now_s,
            });
        }
    }

    /// Evaluate running transitions at `now_s`
    pub fn advance(&mut self, now_s: f32) {
        for (primitive, slot) in self.primitives.iter_mut().zip(self.transitions.iter_mut()) {
            let Some(transition) = slot else {
                continue;
            };

            let progress = if self.duration_s > 0.0 {
                (now_s - transition.start_s) / self.duration_s
            } else {
                1.0
            };

            if progress >= 1.0 {
                primitive.style = transition.to;
                *slot = None;
            } else {
                let t = ease_cubic_out(progress.max(0.0));
                primitive.style = transition.from.lerp(&transition.to, t);
            }
        }
    }
}
