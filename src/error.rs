//! Error types for audio capture, rendering and affirmation generation.

use thiserror::Error;

/// Failures while acquiring or running the audio input device.
///
/// None of these are fatal: the microphone simply stays inactive and the
/// lattice idles.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AudioError {
    #[error("microphone access was denied")]
    PermissionDenied,

    #[error("audio input device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("unsupported input sample format: {0}")]
    UnsupportedFormat(String),

    #[error("audio input stream failed: {0}")]
    StreamFailed(String),
}

/// Failures from the text-generation collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("affirmation generation failed: {0}")]
    GenerationFailed(String),

    #[error("affirmation generation returned no text")]
    Empty,
}

/// Failures while bringing up the GPU pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("failed to find suitable GPU adapter")]
    NoAdapter,

    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}
