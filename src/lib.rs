//! audiofeatr - Frame analysis and spectral features for decoded audio
//!
//! Turns a multi-channel sample buffer into frame grids, short-time spectra
//! and per-frame feature matrices.
//!
//! ## Module Structure
//!
//! - `core` - Signal buffers, DSP engine, feature extractors, decoding
//! - `cli` - Command-line interface
//! - `config` - Analysis parameters and presets
//! - `testgen` - Synthetic signals and WAV fixtures
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use audiofeatr::core::{features, Signal};
//!
//! let signal = Signal::from_channels(vec![left, right])?;
//! let rms = features::rms(&signal, 2048, 512)?;              // [2, T]
//! let centroid = features::spectral_centroid(&signal, 22050, 2048, 512)?;
//! let times = audiofeatr::core::frames_to_time(&rms, 512, 22050)?;
//! ```
//!
//! ## Features
//!
//! | Feature            | Input            | Degenerate input       |
//! |--------------------|------------------|------------------------|
//! | RMS                | frames           | always >= 0            |
//! | Zero-crossing rate | frames           | constant sign gives 0  |
//! | Spectral centroid  | STFT magnitude   | silence gives 0        |
//! | Spectral bandwidth | STFT magnitude   | silence gives 0        |
//! | Spectral rolloff   | STFT magnitude   | silence gives 0        |
//! | Spectral flatness  | STFT magnitude   | magnitudes floored     |

// Core analysis functionality
pub mod core;

// Command-line interface
pub mod cli;

// Configuration and presets
pub mod config;

// Error types
pub mod error;

// Test signal generation
pub mod testgen;

pub use self::config::{ConfigPreset, FeatureConfig, FeatureConfigBuilder, FeatureKind};
pub use self::core::{
    AnalyzerBuilder, DecodedAudio, FeatureAnalyzer, FeatureMatrix, FeatureReport, Signal,
    Spectrogram,
};
pub use self::error::{FeatureError, Result};
