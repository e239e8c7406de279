//! Rendering configuration.

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Duration of radius/color/blur transitions (seconds)
    pub transition_s: f32,

    /// Radius every primitive starts with before the first emission (pixels)
    pub initial_radius: f32,

    /// Background clear color (linear RGB)
    pub clear_color: [f64; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            transition_s: 0.2,
            initial_radius: 2.0,
            clear_color: [0.004, 0.003, 0.003], // stone-950, near black
        }
    }
}

impl RenderConfig {
    pub fn viewport(&self) -> glam::Vec2 {
        glam::Vec2::new(self.window_width as f32, self.window_height as f32)
    }
}
