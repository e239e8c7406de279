//! Microphone capture and loudness extraction.
//!
//! Reduces each frame's most recent time-domain buffer to a single
//! RMS loudness value and publishes it to subscribers.

mod input;
mod system;

// Re-export public types
pub use input::{AudioInput, CpalInput, SyntheticBreath};
pub use system::Microphone;

use crate::params::audio_constants::{BYTE_CENTER, SAMPLE_SCALE};

/// Instantaneous loudness: RMS deviation of a byte-domain buffer scaled by 256.
///
/// Range is [0, ∞) in type, roughly 0-256 in practice.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct AudioSample(pub f32);

impl AudioSample {
    pub const SILENT: Self = Self(0.0);

    /// Extract loudness from a byte-domain buffer (0-255, centered at 128).
    /// Empty buffers are silent.
    pub fn from_time_domain(bytes: &[u8]) -> Self {
        Self(rms(bytes) * SAMPLE_SCALE)
    }

    pub fn value(self) -> f32 {
        self.0
    }
}

/// Root-mean-square deviation from center: sqrt(mean((b/128 - 1)^2))
pub fn rms(bytes: &[u8]) -> f32 {
    if bytes.is_empty() {
        return 0.0;
    }

    let sum: f32 = bytes
        .iter()
        .map(|&b| {
            let deviation = b as f32 / BYTE_CENTER - 1.0;
            deviation * deviation
        })
        .sum();

    (sum / bytes.len() as f32).sqrt()
}

/// Convert a float sample in [-1, 1] to the analyser byte domain
pub fn sample_to_byte(sample: f32) -> u8 {
    (BYTE_CENTER * (sample + 1.0)).floor().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_silent_buffer() {
        assert_eq!(rms(&[128; 1024]), 0.0);
        assert_eq!(AudioSample::from_time_domain(&[128; 64]), AudioSample::SILENT);
    }

    #[test]
    fn test_empty_buffer_is_silent() {
        assert_eq!(AudioSample::from_time_domain(&[]), AudioSample::SILENT);
    }

    #[test]
    fn test_full_scale_square_wave() {
        // 0 and 256 are both one full unit from center; 255 is just shy
        let bytes: Vec<u8> = (0..1024).map(|i| if i % 2 == 0 { 0 } else { 255 }).collect();
        let sample = AudioSample::from_time_domain(&bytes);
        assert!(sample.value() > 254.0 && sample.value() <= 256.0);
    }

    #[test]
    fn test_sample_to_byte() {
        assert_eq!(sample_to_byte(0.0), 128);
        assert_eq!(sample_to_byte(-1.0), 0);
        assert_eq!(sample_to_byte(1.0), 255);
        assert_eq!(sample_to_byte(4.0), 255);
        assert_eq!(sample_to_byte(-0.5), 64);
    }

    proptest! {
        #[test]
        fn prop_rms_is_bounded(bytes in prop::collection::vec(any::<u8>(), 1..2048)) {
            let value = rms(&bytes);
            prop_assert!((0.0..=1.0).contains(&value));
        }

        #[test]
        fn prop_loudness_grows_with_deviation(amplitude in 0u8..127, extra in 1u8..64) {
            let quiet = [128 + amplitude, 128 - amplitude];
            let louder_amp = (amplitude as u16 + extra as u16).min(127) as u8;
            prop_assume!(louder_amp > amplitude);
            let loud = [128 + louder_amp, 128 - louder_amp];

            let a = AudioSample::from_time_domain(&quiet);
            let b = AudioSample::from_time_domain(&loud);
            prop_assert!(b > a);
        }
    }
}
