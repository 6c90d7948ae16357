//! Feature extractors
//!
//! Time-domain features reduce raw frames; spectral features reduce the
//! STFT magnitude. Every extractor returns one value per (channel, frame)
//! and has an overall variant over the whole channel.

pub mod spectral;
pub mod temporal;

pub use spectral::{
    bandwidth_of, centroid_of, flatness_of, overall_spectrum, rolloff_of, spectral_bandwidth,
    spectral_bandwidth_from, spectral_bandwidth_overall, spectral_centroid,
    spectral_centroid_from, spectral_centroid_overall, spectral_flatness, spectral_flatness_from,
    spectral_flatness_overall, spectral_rolloff, spectral_rolloff_from, spectral_rolloff_overall,
    DEFAULT_AMIN, DEFAULT_BANDWIDTH_POWER, DEFAULT_FLATNESS_POWER, DEFAULT_ROLLOFF_THRESHOLD,
};
pub use temporal::{
    rms, rms_from_grid, rms_of, rms_overall, zero_crossing_rate, zero_crossing_rate_from_grid,
    zero_crossing_rate_overall, zero_crossings,
};
