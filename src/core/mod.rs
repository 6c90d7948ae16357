//! Core analysis modules
//!
//! - `buffer` - sample and feature buffers
//! - `dsp` - framing, windowing, STFT and axis mapping
//! - `features` - RMS, zero-crossing rate and spectral descriptors
//! - `decoder` / `resample` - turning files into analysis-ready signals
//! - `analyzer` - configured end-to-end extraction

pub mod analyzer;
pub mod buffer;
pub mod decoder;
pub mod dsp;
pub mod features;
pub mod resample;

pub use analyzer::{AnalyzerBuilder, FeatureAnalyzer, FeatureReport, FeatureSummary};
pub use buffer::{FeatureMatrix, Signal};
pub use decoder::{decode_audio, downmix_mono, DecodedAudio};
pub use dsp::{frames_to_time, frequency_bins, stft, FrameGrid, Spectrogram};
pub use resample::resample;
