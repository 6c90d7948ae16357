// src/core/features/spectral.rs
//
// Spectral shape descriptors computed from non-negative-bin magnitudes.
//
// Each descriptor comes in three forms:
// - a kernel over one magnitude vector (`*_of`)
// - a framed version over an STFT magnitude (`*_from`, and the
//   signal-level wrapper that runs the STFT itself)
// - an overall version over the whole-signal magnitude spectrum

use rayon::prelude::*;

use crate::core::buffer::{FeatureMatrix, Signal};
use crate::core::dsp::fft::{magnitude_spectrum, stft, MagnitudeSpectrogram};
use crate::core::dsp::frequency::frequency_bins;
use crate::error::{FeatureError, Result};

/// Fraction of total magnitude that the rolloff frequency must reach
pub const DEFAULT_ROLLOFF_THRESHOLD: f64 = 0.85;

/// Exponent applied to frequency deviations in the bandwidth
pub const DEFAULT_BANDWIDTH_POWER: f64 = 2.0;

/// Exponent applied to magnitudes before computing flatness
pub const DEFAULT_FLATNESS_POWER: f64 = 2.0;

/// Floor applied to magnitudes before flatness exponentiation
pub const DEFAULT_AMIN: f64 = 1e-10;

// ============================================================================
// Kernels
// ============================================================================

/// Magnitude-weighted mean frequency, 0 for an all-zero spectrum
pub fn centroid_of(magnitudes: &[f64], freqs: &[f64]) -> f64 {
    let total: f64 = magnitudes.iter().sum();
    if total == 0.0 {
        return 0.0;
    }
    let weighted: f64 = magnitudes.iter().zip(freqs).map(|(m, f)| m * f).sum();
    weighted / total
}

/// Magnitude-weighted `power`-th order deviation around `centroid`
pub fn bandwidth_of(magnitudes: &[f64], freqs: &[f64], centroid: f64, power: f64) -> f64 {
    let total: f64 = magnitudes.iter().sum();
    if total == 0.0 {
        return 0.0;
    }
    let spread: f64 = magnitudes
        .iter()
        .zip(freqs)
        .map(|(m, f)| m * (f - centroid).abs().powf(power))
        .sum();
    (spread / total).powf(1.0 / power)
}

/// Lowest frequency whose cumulative magnitude reaches `threshold` of the
/// total
///
/// Returns 0 for an all-zero spectrum and the top bin when rounding keeps
/// the cumulative sum just under the target.
pub fn rolloff_of(magnitudes: &[f64], freqs: &[f64], threshold: f64) -> f64 {
    let total: f64 = magnitudes.iter().sum();
    if total == 0.0 {
        return 0.0;
    }
    let target = threshold * total;
    let mut cumulative = 0.0;
    for (m, f) in magnitudes.iter().zip(freqs) {
        cumulative += m;
        if cumulative >= target {
            return *f;
        }
    }
    freqs.last().copied().unwrap_or(0.0)
}

/// Geometric over arithmetic mean of `max(magnitude, amin)^power`
pub fn flatness_of(magnitudes: &[f64], power: f64, amin: f64) -> f64 {
    if magnitudes.is_empty() {
        return 0.0;
    }
    let n = magnitudes.len() as f64;
    let (log_sum, sum) = magnitudes.iter().fold((0.0, 0.0), |(log_sum, sum), &m| {
        let p = m.max(amin).powf(power);
        (log_sum + p.ln(), sum + p)
    });
    let geometric_mean = (log_sum / n).exp();
    let arithmetic_mean = sum / n;
    geometric_mean / arithmetic_mean
}

// ============================================================================
// Parameter checks
// ============================================================================

fn check_sample_rate(sample_rate: u32) -> Result<()> {
    if sample_rate == 0 {
        return Err(FeatureError::InvalidSampleRate);
    }
    Ok(())
}

pub(crate) fn check_threshold(threshold: f64) -> Result<()> {
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(FeatureError::invalid(
            "threshold",
            format!("must be in (0, 1], got {}", threshold),
        ));
    }
    Ok(())
}

pub(crate) fn check_power(name: &'static str, power: f64) -> Result<()> {
    if !(power > 0.0 && power.is_finite()) {
        return Err(FeatureError::invalid(
            name,
            format!("must be a positive finite number, got {}", power),
        ));
    }
    Ok(())
}

pub(crate) fn check_amin(amin: f64) -> Result<()> {
    if !(amin > 0.0) {
        return Err(FeatureError::invalid(
            "amin",
            format!("must be positive, got {}", amin),
        ));
    }
    Ok(())
}

// ============================================================================
// Framed features over a precomputed STFT magnitude
// ============================================================================

/// Apply `reduce` to the spectrum of every (channel, frame)
fn reduce_spectra<F>(mag: &MagnitudeSpectrogram, reduce: F) -> Result<FeatureMatrix>
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    let frames = mag.frames();
    let rows: Vec<Vec<f64>> = (0..mag.channels())
        .into_par_iter()
        .map(|ch| (0..frames).map(|t| reduce(mag.spectrum(ch, t))).collect::<Vec<f64>>())
        .collect();
    FeatureMatrix::from_rows(rows)
}

fn check_freqs(mag: &MagnitudeSpectrogram, freqs: &[f64]) -> Result<()> {
    if freqs.len() != mag.bins() {
        return Err(FeatureError::ShapeMismatch(format!(
            "{} frequencies for {} spectrogram bins",
            freqs.len(),
            mag.bins()
        )));
    }
    Ok(())
}

pub fn spectral_centroid_from(mag: &MagnitudeSpectrogram, freqs: &[f64]) -> Result<FeatureMatrix> {
    check_freqs(mag, freqs)?;
    reduce_spectra(mag, |s| centroid_of(s, freqs))
}

pub fn spectral_bandwidth_from(
    mag: &MagnitudeSpectrogram,
    freqs: &[f64],
    power: f64,
) -> Result<FeatureMatrix> {
    check_freqs(mag, freqs)?;
    check_power("power", power)?;
    reduce_spectra(mag, |s| bandwidth_of(s, freqs, centroid_of(s, freqs), power))
}

pub fn spectral_rolloff_from(
    mag: &MagnitudeSpectrogram,
    freqs: &[f64],
    threshold: f64,
) -> Result<FeatureMatrix> {
    check_freqs(mag, freqs)?;
    check_threshold(threshold)?;
    reduce_spectra(mag, |s| rolloff_of(s, freqs, threshold))
}

/// Flatness of every frame, reducing over the frequency axis
pub fn spectral_flatness_from(
    mag: &MagnitudeSpectrogram,
    power: f64,
    amin: f64,
) -> Result<FeatureMatrix> {
    check_power("power", power)?;
    check_amin(amin)?;
    reduce_spectra(mag, |s| flatness_of(s, power, amin))
}

// ============================================================================
// Framed features from a signal
// ============================================================================

fn stft_with_freqs(
    signal: &Signal,
    sample_rate: u32,
    frame_size: usize,
    hop_length: usize,
) -> Result<(MagnitudeSpectrogram, Vec<f64>)> {
    check_sample_rate(sample_rate)?;
    let mag = stft(signal, frame_size, hop_length)?.magnitude();
    Ok((mag, frequency_bins(frame_size, sample_rate)?))
}

/// Frame-wise spectral centroid in Hz
pub fn spectral_centroid(
    signal: &Signal,
    sample_rate: u32,
    frame_size: usize,
    hop_length: usize,
) -> Result<FeatureMatrix> {
    let (mag, freqs) = stft_with_freqs(signal, sample_rate, frame_size, hop_length)?;
    spectral_centroid_from(&mag, &freqs)
}

/// Frame-wise spectral bandwidth in Hz
pub fn spectral_bandwidth(
    signal: &Signal,
    sample_rate: u32,
    frame_size: usize,
    hop_length: usize,
    power: f64,
) -> Result<FeatureMatrix> {
    check_power("power", power)?;
    let (mag, freqs) = stft_with_freqs(signal, sample_rate, frame_size, hop_length)?;
    spectral_bandwidth_from(&mag, &freqs, power)
}

/// Frame-wise rolloff frequency in Hz
pub fn spectral_rolloff(
    signal: &Signal,
    sample_rate: u32,
    frame_size: usize,
    hop_length: usize,
    threshold: f64,
) -> Result<FeatureMatrix> {
    check_threshold(threshold)?;
    let (mag, freqs) = stft_with_freqs(signal, sample_rate, frame_size, hop_length)?;
    spectral_rolloff_from(&mag, &freqs, threshold)
}

/// Frame-wise spectral flatness in `[0, 1]`
pub fn spectral_flatness(
    signal: &Signal,
    frame_size: usize,
    hop_length: usize,
    power: f64,
    amin: f64,
) -> Result<FeatureMatrix> {
    check_power("power", power)?;
    check_amin(amin)?;
    let mag = stft(signal, frame_size, hop_length)?.magnitude();
    spectral_flatness_from(&mag, power, amin)
}

// ============================================================================
// Overall (unframed) features
// ============================================================================

/// Whole-signal magnitude spectrum per channel and its bin frequencies
pub fn overall_spectrum(signal: &Signal, sample_rate: u32) -> Result<(Vec<Vec<f64>>, Vec<f64>)> {
    check_sample_rate(sample_rate)?;
    let mags = magnitude_spectrum(signal)?;
    Ok((mags, frequency_bins(signal.len(), sample_rate)?))
}

pub fn spectral_centroid_overall(signal: &Signal, sample_rate: u32) -> Result<Vec<f64>> {
    let (mags, freqs) = overall_spectrum(signal, sample_rate)?;
    Ok(mags.iter().map(|m| centroid_of(m, &freqs)).collect())
}

pub fn spectral_bandwidth_overall(
    signal: &Signal,
    sample_rate: u32,
    power: f64,
) -> Result<Vec<f64>> {
    check_power("power", power)?;
    let (mags, freqs) = overall_spectrum(signal, sample_rate)?;
    Ok(mags
        .iter()
        .map(|m| bandwidth_of(m, &freqs, centroid_of(m, &freqs), power))
        .collect())
}

pub fn spectral_rolloff_overall(
    signal: &Signal,
    sample_rate: u32,
    threshold: f64,
) -> Result<Vec<f64>> {
    check_threshold(threshold)?;
    let (mags, freqs) = overall_spectrum(signal, sample_rate)?;
    Ok(mags.iter().map(|m| rolloff_of(m, &freqs, threshold)).collect())
}

pub fn spectral_flatness_overall(signal: &Signal, power: f64, amin: f64) -> Result<Vec<f64>> {
    check_power("power", power)?;
    check_amin(amin)?;
    let mags = magnitude_spectrum(signal)?;
    Ok(mags.iter().map(|m| flatness_of(m, power, amin)).collect())
}
