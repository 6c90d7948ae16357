// src/core/features/temporal.rs
//
// Time-domain features: RMS energy and zero-crossing rate.

use rayon::prelude::*;

use crate::core::buffer::{FeatureMatrix, Signal};
use crate::core::dsp::framing::{frame, FrameGrid};
use crate::error::Result;

/// Root mean square of a slice, 0 for an empty slice
pub fn rms_of(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f64).sqrt()
}

/// Adjacent sample pairs whose product is strictly negative
///
/// A zero sample never counts as a crossing on either side.
pub fn zero_crossings(samples: &[f64]) -> usize {
    samples.windows(2).filter(|w| w[0] * w[1] < 0.0).count()
}

/// Frame-wise RMS, shape `[channels, frames]`
pub fn rms(signal: &Signal, frame_size: usize, hop_length: usize) -> Result<FeatureMatrix> {
    rms_from_grid(&frame(signal, frame_size, hop_length)?)
}

/// Frame-wise RMS over an existing frame grid
pub fn rms_from_grid(grid: &FrameGrid) -> Result<FeatureMatrix> {
    reduce_frames(grid, rms_of)
}

/// RMS over each whole channel
pub fn rms_overall(signal: &Signal) -> Vec<f64> {
    signal.iter_channels().map(rms_of).collect()
}

/// Frame-wise zero-crossing rate, crossings divided by `frame_size`
pub fn zero_crossing_rate(
    signal: &Signal,
    frame_size: usize,
    hop_length: usize,
) -> Result<FeatureMatrix> {
    zero_crossing_rate_from_grid(&frame(signal, frame_size, hop_length)?)
}

/// Frame-wise zero-crossing rate over an existing frame grid
pub fn zero_crossing_rate_from_grid(grid: &FrameGrid) -> Result<FeatureMatrix> {
    let divisor = grid.frame_size() as f64;
    reduce_frames(grid, |f| zero_crossings(f) as f64 / divisor)
}

/// Zero-crossing rate of each whole channel, crossings divided by the
/// channel's sample count
pub fn zero_crossing_rate_overall(signal: &Signal) -> Vec<f64> {
    signal
        .iter_channels()
        .map(|ch| {
            if ch.is_empty() {
                0.0
            } else {
                zero_crossings(ch) as f64 / ch.len() as f64
            }
        })
        .collect()
}

/// Apply `reduce` to every frame of every channel
fn reduce_frames<F>(grid: &FrameGrid, reduce: F) -> Result<FeatureMatrix>
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    let frames = grid.frame_count();
    let rows: Vec<Vec<f64>> = (0..grid.padded().channels())
        .into_par_iter()
        .map(|ch| (0..frames).map(|t| reduce(grid.frame(ch, t))).collect::<Vec<f64>>())
        .collect();
    FeatureMatrix::from_rows(rows)
}
