//! Audio input devices feeding the loudness extractor.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Sample, SizedSample};
use std::collections::VecDeque;
use std::f32::consts::TAU;
use std::sync::{Arc, Mutex};

use super::sample_to_byte;
use crate::error::AudioError;
use crate::params::ExtractorConfig;

/// Source of time-domain audio for the extractor.
///
/// `read_time_domain` fills `out` with the most recent buffer in the
/// analyser byte domain (0-255, 128 = silence). An input that has nothing
/// to offer leaves `out` empty.
pub trait AudioInput {
    fn open(&mut self) -> Result<(), AudioError>;
    fn read_time_domain(&mut self, out: &mut Vec<u8>);
    fn close(&mut self);
}

/// System default microphone captured through cpal
pub struct CpalInput {
    window_len: usize,

    /// Most recent mono samples, written by the cpal callback thread
    ring: Arc<Mutex<VecDeque<f32>>>,

    /// Live input stream (dropping it releases the device)
    stream: Option<cpal::Stream>,
}

impl CpalInput {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            window_len: config.window_len,
            ring: Arc::new(Mutex::new(VecDeque::with_capacity(config.window_len))),
            stream: None,
        }
    }

    fn build_stream<T>(
        &self,
        device: &cpal::Device,
        config: &cpal::StreamConfig,
    ) -> Result<cpal::Stream, AudioError>
    where
        T: SizedSample,
        f32: cpal::FromSample<T>,
    {
        let ring = Arc::clone(&self.ring);
        let window_len = self.window_len;
        let channels = (config.channels as usize).max(1);

        device
            .build_input_stream(
                config,
                move |data: &[T], _: &cpal::InputCallbackInfo| {
                    let Ok(mut ring) = ring.lock() else {
                        return;
                    };

                    // Downmix interleaved frames to mono
                    for frame in data.chunks(channels) {
                        let sum: f32 = frame.iter().map(|&s| f32::from_sample(s)).sum();
                        ring.push_back(sum / frame.len() as f32);
                    }

                    let excess = ring.len().saturating_sub(window_len);
                    ring.drain(..excess);
                },
                |err| log::warn!("Audio input stream error: {}", err),
                None,
            )
            .map_err(map_build_error)
    }
}

impl AudioInput for CpalInput {
    fn open(&mut self) -> Result<(), AudioError> {
        if self.stream.is_some() {
            return Ok(());
        }

        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| AudioError::DeviceUnavailable("no default input device".into()))?;

        let supported = device.default_input_config().map_err(map_config_error)?;

        log::info!(
            "Microphone: {} @ {}Hz, {} channel(s), {:?}",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            supported.sample_rate().0,
            supported.channels(),
            supported.sample_format()
        );

        let sample_format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();

        let stream = match sample_format {
            cpal::SampleFormat::F32 => self.build_stream::<f32>(&device, &config)?,
            cpal::SampleFormat::I16 => self.build_stream::<i16>(&device, &config)?,
            cpal::SampleFormat::U16 => self.build_stream::<u16>(&device, &config)?,
            other => return Err(AudioError::UnsupportedFormat(format!("{:?}", other))),
        };

        stream.play().map_err(map_play_error)?;
        self.stream = Some(stream);
        Ok(())
    }

    fn read_time_domain(&mut self, out: &mut Vec<u8>) {
        out.clear();
        if self.stream.is_none() {
            return;
        }
        if let Ok(ring) = self.ring.lock() {
            out.extend(ring.iter().map(|&s| sample_to_byte(s)));
        }
    }

    fn close(&mut self) {
        if self.stream.take().is_some() {
            log::debug!("Microphone stream released");
        }
        if let Ok(mut ring) = self.ring.lock() {
            ring.clear();
        }
    }
}

/// Map a backend message to the closest audio error.
/// Platforms report refused microphone consent only through backend text.
fn backend_error(description: String) -> AudioError {
    let lower = description.to_lowercase();
    if lower.contains("permission") || lower.contains("denied") || lower.contains("not authorized")
    {
        AudioError::PermissionDenied
    } else {
        AudioError::DeviceUnavailable(description)
    }
}

fn map_config_error(err: cpal::DefaultStreamConfigError) -> AudioError {
    match err {
        cpal::DefaultStreamConfigError::DeviceNotAvailable => {
            AudioError::DeviceUnavailable("device disconnected".into())
        }
        cpal::DefaultStreamConfigError::StreamTypeNotSupported => {
            AudioError::UnsupportedFormat("input stream type".into())
        }
        cpal::DefaultStreamConfigError::BackendSpecific { err } => backend_error(err.description),
    }
}

fn map_build_error(err: cpal::BuildStreamError) -> AudioError {
    match err {
        cpal::BuildStreamError::DeviceNotAvailable => {
            AudioError::DeviceUnavailable("device disconnected".into())
        }
        cpal::BuildStreamError::StreamConfigNotSupported => {
            AudioError::UnsupportedFormat("stream config".into())
        }
        cpal::BuildStreamError::BackendSpecific { err } => backend_error(err.description),
        other => AudioError::StreamFailed(other.to_string()),
    }
}

fn map_play_error(err: cpal::PlayStreamError) -> AudioError {
    match err {
        cpal::PlayStreamError::DeviceNotAvailable => {
            AudioError::DeviceUnavailable("device disconnected".into())
        }
        cpal::PlayStreamError::BackendSpecific { err } => backend_error(err.description),
    }
}

/// Carrier tone of the synthetic breath (Hz at 44.1kHz)
const SYNTHETIC_CARRIER_HZ: f32 = 220.0;
const SYNTHETIC_SAMPLE_RATE_HZ: f32 = 44100.0;

/// Deterministic stand-in for a microphone.
///
/// Produces a sine tone whose amplitude swells and fades like slow
/// breathing, advancing one frame per read. Used when no microphone is
/// wanted (`--synthetic`) and by tests.
pub struct SyntheticBreath {
    window_len: usize,
    period_s: f32,
    frame_rate: f32,
    frame: u64,

    /// Fixed amplitude instead of the breathing envelope
    hold: Option<f32>,

    open: bool,
}

impl SyntheticBreath {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            window_len: config.window_len,
            period_s: config.synthetic_period_s,
            frame_rate: config.synthetic_frame_rate,
            frame: 0,
            hold: None,
            open: false,
        }
    }

    /// Input that always plays the same amplitude (0 = silence, 1 = full scale)
    pub fn steady(config: &ExtractorConfig, amplitude: f32) -> Self {
        Self {
            hold: Some(amplitude.clamp(0.0, 1.0)),
            ..Self::new(config)
        }
    }

    /// Breathing envelope in [0, 1]: silent at the start of each period
    fn envelope(&self) -> f32 {
        if let Some(amplitude) = self.hold {
            return amplitude;
        }
        let t = self.frame as f32 / self.frame_rate;
        0.5 - 0.5 * (TAU * t / self.period_s).cos()
    }
}

impl AudioInput for SyntheticBreath {
    fn open(&mut self) -> Result<(), AudioError> {
        self.open = true;
        Ok(())
    }

    fn read_time_domain(&mut self, out: &mut Vec<u8>) {
        out.clear();
        if !self.open {
            return;
        }

        let amplitude = self.envelope();
        let step = TAU * SYNTHETIC_CARRIER_HZ / SYNTHETIC_SAMPLE_RATE_HZ;
        out.extend((0..self.window_len).map(|i| sample_to_byte(amplitude * (step * i as f32).sin())));
        self.frame += 1;
    }

    fn close(&mut self) {
        self.open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioSample;

    #[test]
    fn test_synthetic_closed_reads_nothing() {
        let mut input = SyntheticBreath::new(&ExtractorConfig::default());
        let mut buf = vec![1, 2, 3];
        input.read_time_domain(&mut buf);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_synthetic_breath_starts_silent_and_swells() {
        let config = ExtractorConfig::default();
        let mut input = SyntheticBreath::new(&config);
        input.open().unwrap();

        let mut buf = Vec::new();
        input.read_time_domain(&mut buf);
        assert_eq!(buf.len(), config.window_len);
        let first = AudioSample::from_time_domain(&buf);
        assert!(first.value() < 1.0);

        // Half a period later the breath peaks
        let half_period_frames = (config.synthetic_period_s * config.synthetic_frame_rate) as usize / 2;
        for _ in 1..half_period_frames {
            input.read_time_domain(&mut buf);
        }
        input.read_time_domain(&mut buf);
        let peak = AudioSample::from_time_domain(&buf);
        assert!(peak.value() > 128.0, "peak loudness {}", peak.value());
    }

    #[test]
    fn test_steady_amplitude() {
        let config = ExtractorConfig::default();
        let mut input = SyntheticBreath::steady(&config, 0.0);
        input.open().unwrap();

        let mut buf = Vec::new();
        input.read_time_domain(&mut buf);
        assert_eq!(AudioSample::from_time_domain(&buf), AudioSample::SILENT);
    }

    #[test]
    fn test_backend_error_detects_permission() {
        assert_eq!(
            backend_error("Microphone permission denied by user".into()),
            AudioError::PermissionDenied
        );
        assert!(matches!(
            backend_error("ALSA function failed".into()),
            AudioError::DeviceUnavailable(_)
        ));
    }
}
