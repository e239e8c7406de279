//! Resonant Lattice - breathe a storm of particles into a glyph
//!
//! Calm breath draws the lattice into warm, cohesive gold; sharp breath
//! scatters it into violet chaos. Sealing the glyph yields an affirmation.

use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use crossbeam_channel::Receiver;
use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use resonant_lattice::audio::Microphone;
use resonant_lattice::cli::Args;
use resonant_lattice::glyph::GlyphState;
use resonant_lattice::lattice::Lattice;
use resonant_lattice::params::{ExtractorConfig, RenderConfig, SimulationParams};
use resonant_lattice::rendering::RenderSystem;
use resonant_lattice::rite::Rite;
use resonant_lattice::scribe::OfflineScribe;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Core systems
    microphone: Microphone,
    lattice: Option<Lattice>,
    glyphs: Option<Receiver<GlyphState>>,

    // Lifecycle
    rite: Rite,
    scribe: OfflineScribe,

    // Configuration
    render_config: RenderConfig,
    simulation_params: SimulationParams,
    seed: u64,
    rites_begun: u64,

    // Time tracking
    start_time: Instant,
    title: String,
}

impl App {
    fn new(args: &Args) -> Self {
        let extractor_config = ExtractorConfig::default();
        let microphone = Microphone::new(args.audio_input(&extractor_config), &extractor_config);

        Self {
            window: None,
            render_system: None,
            microphone,
            lattice: None,
            glyphs: None,
            rite: Rite::new(),
            scribe: OfflineScribe,
            render_config: args.render_config(),
            simulation_params: SimulationParams::default(),
            seed: args.seed(),
            rites_begun: 0,
            start_time: Instant::now(),
            title: String::new(),
        }
    }

    fn viewport(&self) -> Vec2 {
        match &self.window {
            Some(window) => {
                let size = window.inner_size();
                Vec2::new(size.width.max(1) as f32, size.height.max(1) as f32)
            }
            None => self.render_config.viewport(),
        }
    }

    /// Mount or unmount the lattice to match the rite state
    fn sync_lattice(&mut self) {
        if self.rite.shows_lattice() && self.lattice.is_none() {
            let mut lattice = Lattice::new(
                self.viewport(),
                self.simulation_params.clone(),
                &self.render_config,
                self.microphone.subscribe(),
                self.seed.wrapping_add(self.rites_begun),
            );
            self.glyphs = Some(lattice.subscribe_glyphs());
            self.lattice = Some(lattice);
        } else if !self.rite.shows_lattice() && self.lattice.is_some() {
            self.glyphs = None;
            self.lattice = None;
        }
    }

    fn begin_rite(&mut self) {
        if !self.rite.begin() {
            return;
        }
        self.rites_begun += 1;

        if let Err(e) = self.microphone.start() {
            println!("Microphone inactive ({}). The glyph cannot be sealed; R abandons the rite.", e);
        }
        self.rite.set_listening(self.microphone.is_active());
        self.sync_lattice();
    }

    fn seal_rite(&mut self) {
        if !self.rite.is_calibrating() || !self.rite.is_listening() {
            return;
        }

        // Stop first so no late sample can change the sealed glyph
        self.microphone.stop();
        self.drain_glyphs();

        if self.rite.seal().is_none() {
            return;
        }
        self.sync_lattice();
        self.update_title();

        self.rite.finish(&self.scribe);
        match (self.rite.affirmation(), self.rite.error()) {
            (Some(text), _) => println!("\n  {}\n", text),
            (None, Some(error)) => println!("{}", error),
            (None, None) => {}
        }
        self.sync_lattice();
    }

    fn reset_rite(&mut self) {
        self.microphone.stop();
        self.rite.reset();
        self.sync_lattice();
    }

    fn drain_glyphs(&mut self) {
        if let Some(glyphs) = &self.glyphs {
            for glyph in glyphs.try_iter() {
                self.rite.record(glyph);
            }
        }
    }

    fn update_title(&mut self) {
        let title = format!("Resonant Lattice - {}", self.rite.status());
        if title != self.title {
            if let Some(window) = &self.window {
                window.set_title(&title);
            }
            self.title = title;
        }
    }

    /// Render a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let time_s = self.start_time.elapsed().as_secs_f32();

        // Sample → classify → retune → re-heat → tick, in that order
        self.microphone.on_frame();
        if let Some(lattice) = self.lattice.as_mut() {
            lattice.frame(time_s, self.rite.is_calibrating());
        }
        self.drain_glyphs();
        self.update_title();

        let Some(render_system) = self.render_system.as_mut() else {
            return;
        };

        match &self.lattice {
            Some(lattice) => render_system.update_primitives(lattice.primitives()),
            None => render_system.update_primitives(&[]),
        }

        match render_system.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_system.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title("Resonant Lattice")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let render_system = match pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            self.simulation_params.node_count,
            self.render_config.clear_color,
        )) {
            Ok(render_system) => render_system,
            Err(e) => {
                log::error!("Failed to initialize rendering: {}", e);
                event_loop.exit();
                return;
            }
        };

        println!("\nResonant Lattice is running!");
        println!("Space: begin the rite   Enter: seal the glyph   R: abandon / begin anew   Esc: quit\n");

        self.window = Some(window);
        self.render_system = Some(render_system);
        self.update_title();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(render_system) = self.render_system.as_mut() {
                    render_system.resize(size.width, size.height);
                }
                if let Some(lattice) = self.lattice.as_mut() {
                    if size.width > 0 && size.height > 0 {
                        lattice.resize(Vec2::new(size.width as f32, size.height as f32));
                    }
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        repeat: false,
                        ..
                    },
                ..
            } => match code {
                KeyCode::Escape => event_loop.exit(),
                KeyCode::Space => self.begin_rite(),
                KeyCode::Enter | KeyCode::NumpadEnter => self.seal_rite(),
                KeyCode::KeyR => self.reset_rite(),
                _ => {}
            },
            WindowEvent::RedrawRequested => {
                self.render_frame(event_loop);
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.microphone.stop();
        self.lattice = None;
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    println!("Resonant Lattice - an instrument for breath");
    println!("Initializing systems...\n");

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            return;
        }
    };

    let mut app = App::new(&args);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
    }
}
