//! Microphone lifecycle and per-frame loudness publishing.

use crossbeam_channel::Receiver;

use super::input::AudioInput;
use super::AudioSample;
use crate::broadcast::Broadcast;
use crate::error::AudioError;
use crate::params::ExtractorConfig;

/// Signal extractor: owns the input device and publishes one AudioSample
/// per frame while active.
pub struct Microphone {
    input: Box<dyn AudioInput>,
    active: bool,

    /// Last published loudness (0 while inactive)
    current: AudioSample,

    /// Scratch buffer for the byte-domain window
    buffer: Vec<u8>,

    /// One bounded queue per subscriber
    subscribers: Broadcast<AudioSample>,
}

impl Microphone {
    pub fn new(input: Box<dyn AudioInput>, config: &ExtractorConfig) -> Self {
        Self {
            input,
            active: false,
            current: AudioSample::SILENT,
            buffer: Vec::with_capacity(config.window_len),
            subscribers: Broadcast::new(config.queue_capacity),
        }
    }

    /// Acquire the input device and begin sampling.
    ///
    /// A failure leaves the microphone inactive; callers treat it as a
    /// muted session rather than an error.
    pub fn start(&mut self) -> Result<(), AudioError> {
        if self.active {
            return Ok(());
        }

        match self.input.open() {
            Ok(()) => {
                self.active = true;
                log::info!("Microphone active");
                Ok(())
            }
            Err(e) => {
                self.input.close();
                self.active = false;
                log::warn!("Microphone inactive: {}", e);
                Err(e)
            }
        }
    }

    /// Release the device and discard any samples not yet consumed.
    ///
    /// Idempotent. Once this returns no sample from before the call can
    /// reach a subscriber.
    pub fn stop(&mut self) {
        self.input.close();
        self.subscribers.clear();

        if self.active {
            log::info!("Microphone stopped");
        }
        self.active = false;
        self.current = AudioSample::SILENT;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Most recently published loudness
    pub fn audio_sample(&self) -> AudioSample {
        self.current
    }

    /// Receiver of every sample published from now on, in emission order
    pub fn subscribe(&mut self) -> Receiver<AudioSample> {
        self.subscribers.subscribe()
    }

    /// Per-frame hook: read the latest window, publish its loudness.
    /// Returns `None` while inactive.
    pub fn on_frame(&mut self) -> Option<AudioSample> {
        if !self.active {
            return None;
        }

        self.input.read_time_domain(&mut self.buffer);
        let sample = AudioSample::from_time_domain(&self.buffer);
        self.current = sample;
        self.subscribers.publish(sample);
        Some(sample)
    }
}

impl Drop for Microphone {
    fn drop(&mut self) {
        self.stop();
    }
}
