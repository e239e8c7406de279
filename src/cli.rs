//! Command-line argument parsing.

use clap::Parser;

use crate::audio::{AudioInput, CpalInput, SyntheticBreath};
use crate::params::{ExtractorConfig, RenderConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Resonant Lattice")]
#[command(about = "Breath-driven particle lattice", long_about = None)]
pub struct Args {
    /// Window width (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "1280")]
    pub width: u32,

    /// Window height (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "720")]
    pub height: u32,

    /// Seed for node placement and color shimmer (random if omitted)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Drive the lattice with a synthetic breathing tone instead of the microphone
    #[arg(long)]
    pub synthetic: bool,
}

impl Args {
    /// Render configuration with the requested window size
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width.max(1),
            window_height: self.height.max(1),
            ..RenderConfig::default()
        }
    }

    /// Audio input selected on the command line
    pub fn audio_input(&self, config: &ExtractorConfig) -> Box<dyn AudioInput> {
        if self.synthetic {
            log::info!("Input: synthetic breath ({}s period)", config.synthetic_period_s);
            Box::new(SyntheticBreath::new(config))
        } else {
            log::info!("Input: default microphone");
            Box::new(CpalInput::new(config))
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["resonant-lattice"]);
        assert_eq!(args.width, 1280);
        assert_eq!(args.height, 720);
        assert_eq!(args.seed, None);
        assert!(!args.synthetic);
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "resonant-lattice",
            "--width",
            "640",
            "--height",
            "0",
            "--seed",
            "9",
            "--synthetic",
        ]);
        let config = args.render_config();
        assert_eq!(config.window_width, 640);
        assert_eq!(config.window_height, 1);
        assert_eq!(args.seed(), 9);
        assert!(args.synthetic);
    }
}
