// src/error.rs
//
// Error types for the frame analysis and feature engine.

use thiserror::Error;

/// Errors raised by the feature engine
///
/// Only invalid parameters and malformed buffers are errors. Degenerate
/// numeric states such as pure silence yield `0.0` from the extractors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("hop length must be at least 1 (got {0})")]
    InvalidHopLength(usize),

    #[error("frame size must be at least {min} (got {got})")]
    InvalidFrameSize { got: usize, min: usize },

    #[error("window length must be greater than 1 (got {0})")]
    InvalidWindowLength(usize),

    #[error("sample rate must be positive")]
    InvalidSampleRate,

    #[error("signal must have at least one channel")]
    EmptyChannels,

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("unknown feature `{0}`")]
    UnknownFeature(String),

    #[error("FFT failed: {0}")]
    Fft(String),
}

pub type Result<T> = std::result::Result<T, FeatureError>;

impl FeatureError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
