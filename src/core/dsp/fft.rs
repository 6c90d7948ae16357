//! FFT processing with windowing
//!
//! `stft` and `magnitude_spectrum` use a real-input transform and keep only
//! the `n/2 + 1` non-negative frequency bins. `fft` is the full complex
//! transform of a whole channel.

use std::sync::Arc;

use num_complex::Complex64;
use rayon::prelude::*;
use realfft::{RealFftPlanner, RealToComplex};
use rustfft::FftPlanner;

use super::framing::{frame, FrameGrid};
use super::windows::{hann_window, Window};
use crate::core::buffer::Signal;
use crate::error::{FeatureError, Result};

/// Complex short-time spectrum of shape `[channels, bins, frames]`
///
/// Stored frame-contiguous, so `spectrum(ch, t)` is a plain slice of
/// `bins` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    data: Vec<Complex64>,
    channels: usize,
    bins: usize,
    frames: usize,
}

impl Spectrogram {
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.channels, self.bins, self.frames)
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Value at `[ch, bin, frame]`
    pub fn get(&self, ch: usize, bin: usize, frame: usize) -> Complex64 {
        self.spectrum(ch, frame)[bin]
    }

    /// All bins of one frame of one channel
    pub fn spectrum(&self, ch: usize, frame: usize) -> &[Complex64] {
        let start = (ch * self.frames + frame) * self.bins;
        &self.data[start..start + self.bins]
    }

    pub fn magnitude(&self) -> MagnitudeSpectrogram {
        MagnitudeSpectrogram {
            data: self.data.iter().map(|c| c.norm()).collect(),
            channels: self.channels,
            bins: self.bins,
            frames: self.frames,
        }
    }
}

/// Absolute values of a [`Spectrogram`], same layout
#[derive(Debug, Clone, PartialEq)]
pub struct MagnitudeSpectrogram {
    data: Vec<f64>,
    channels: usize,
    bins: usize,
    frames: usize,
}

impl MagnitudeSpectrogram {
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.channels, self.bins, self.frames)
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn get(&self, ch: usize, bin: usize, frame: usize) -> f64 {
        self.spectrum(ch, frame)[bin]
    }

    pub fn spectrum(&self, ch: usize, frame: usize) -> &[f64] {
        let start = (ch * self.frames + frame) * self.bins;
        &self.data[start..start + self.bins]
    }
}

/// Windowed real-input transform shared across worker threads
struct RealTransform {
    fft: Arc<dyn RealToComplex<f64>>,
    window: Window,
}

impl RealTransform {
    fn new(size: usize) -> Result<Self> {
        let window = hann_window(size)?;
        let fft = RealFftPlanner::<f64>::new().plan_fft_forward(size);
        Ok(Self { fft, window })
    }

    fn process(&self, samples: &[f64]) -> Result<Vec<Complex64>> {
        let mut input = self.window.apply(samples);
        let mut output = self.fft.make_output_vec();
        self.fft
            .process(&mut input, &mut output)
            .map_err(|e| FeatureError::Fft(e.to_string()))?;
        Ok(output)
    }
}

/// Short-time Fourier transform with a Hann window
///
/// Returns `frame_size / 2 + 1` bins for each of the frames laid out by
/// [`frame`].
pub fn stft(signal: &Signal, frame_size: usize, hop_length: usize) -> Result<Spectrogram> {
    stft_from_grid(&frame(signal, frame_size, hop_length)?)
}

/// Short-time Fourier transform of the frames in an existing grid
pub fn stft_from_grid(grid: &FrameGrid) -> Result<Spectrogram> {
    let frame_size = grid.frame_size();
    let transform = RealTransform::new(frame_size)?;
    let channels = grid.padded().channels();
    let frames = grid.frame_count();
    let bins = frame_size / 2 + 1;

    let spectra = (0..channels * frames)
        .into_par_iter()
        .map(|idx| transform.process(grid.frame(idx / frames, idx % frames)))
        .collect::<Result<Vec<_>>>()?;

    log::debug!(
        "stft: {} channels x {} bins x {} frames",
        channels,
        bins,
        frames
    );

    Ok(Spectrogram {
        data: spectra.into_iter().flatten().collect(),
        channels,
        bins,
        frames,
    })
}

/// Full complex FFT of each Hann-windowed channel, no bin truncation
pub fn fft(signal: &Signal) -> Result<Vec<Vec<Complex64>>> {
    let window = hann_window(signal.len())?;
    let plan = FftPlanner::<f64>::new().plan_fft_forward(signal.len());

    Ok(signal
        .iter_channels()
        .map(|ch| {
            let mut buffer: Vec<Complex64> = window
                .apply(ch)
                .into_iter()
                .map(|s| Complex64::new(s, 0.0))
                .collect();
            plan.process(&mut buffer);
            buffer
        })
        .collect())
}

/// Magnitude of the non-negative bins of each Hann-windowed channel
///
/// Each row has `len / 2 + 1` values; pair with
/// `frequency_bins(signal.len(), sample_rate)`.
pub fn magnitude_spectrum(signal: &Signal) -> Result<Vec<Vec<f64>>> {
    let transform = RealTransform::new(signal.len())?;
    signal
        .iter_channels()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|ch| {
            transform
                .process(ch)
                .map(|spec| spec.iter().map(|c| c.norm()).collect())
        })
        .collect()
}
