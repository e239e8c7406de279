//! Signal extraction configuration and constants.

/// Loudness extraction configuration
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Number of most recent time-domain samples reduced per frame
    /// (matches a web analyser's default frequencyBinCount)
    pub window_len: usize,

    /// Channel capacity for published samples before the oldest is dropped
    pub queue_capacity: usize,

    /// Breathing period of the synthetic input (seconds)
    pub synthetic_period_s: f32,

    /// Nominal frame rate used to advance the synthetic input (frames per second)
    pub synthetic_frame_rate: f32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            window_len: 1024,
            queue_capacity: 16,
            synthetic_period_s: 8.0,
            synthetic_frame_rate: 60.0,
        }
    }
}

/// Audio constants (fixed by the byte-domain analyser convention)
pub mod audio_constants {
    /// Byte value of a silent sample
    pub const BYTE_CENTER: f32 = 128.0;

    /// Scale applied to RMS deviation to produce an AudioSample
    /// 1.0 RMS (full-scale square wave) = 256
    pub const SAMPLE_SCALE: f32 = 256.0;
}
