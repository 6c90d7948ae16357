//! Bin-to-frequency and frame-to-time mapping

use super::fft::{MagnitudeSpectrogram, Spectrogram};
use super::framing::FrameGrid;
use crate::core::buffer::FeatureMatrix;
use crate::error::{FeatureError, Result};

/// Anything with a frame (time) axis
pub trait FrameAxis {
    fn frame_count(&self) -> usize;
}

impl FrameAxis for usize {
    fn frame_count(&self) -> usize {
        *self
    }
}

impl FrameAxis for FeatureMatrix {
    fn frame_count(&self) -> usize {
        self.frames()
    }
}

impl FrameAxis for Spectrogram {
    fn frame_count(&self) -> usize {
        self.frames()
    }
}

impl FrameAxis for MagnitudeSpectrogram {
    fn frame_count(&self) -> usize {
        self.frames()
    }
}

impl FrameAxis for FrameGrid {
    fn frame_count(&self) -> usize {
        self.ranges().len()
    }
}

/// Center frequency in Hz of each of the `frame_size / 2 + 1` bins
pub fn frequency_bins(frame_size: usize, sample_rate: u32) -> Result<Vec<f64>> {
    if frame_size == 0 {
        return Err(FeatureError::InvalidFrameSize {
            got: frame_size,
            min: 1,
        });
    }
    if sample_rate == 0 {
        return Err(FeatureError::InvalidSampleRate);
    }
    let resolution = sample_rate as f64 / frame_size as f64;
    Ok((0..=frame_size / 2).map(|k| k as f64 * resolution).collect())
}

/// Start time in seconds of every frame
pub fn frames_to_time<A: FrameAxis + ?Sized>(
    frames: &A,
    hop_length: usize,
    sample_rate: u32,
) -> Result<Vec<f64>> {
    if sample_rate == 0 {
        return Err(FeatureError::InvalidSampleRate);
    }
    let step = hop_length as f64 / sample_rate as f64;
    Ok((0..frames.frame_count()).map(|t| t as f64 * step).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_bins() {
        let freqs = frequency_bins(2048, 22050).unwrap();
        assert_eq!(freqs.len(), 1025);
        assert_eq!(freqs[0], 0.0);
        assert!((freqs[1] - 22050.0 / 2048.0).abs() < 1e-9);
        assert!((freqs[1024] - 11025.0).abs() < 1e-9);
    }

    #[test]
    fn test_frames_to_time() {
        let times = frames_to_time(&40usize, 512, 22050).unwrap();
        assert_eq!(times.len(), 40);
        assert_eq!(times[0], 0.0);
        for (t, time) in times.iter().enumerate() {
            assert!((time - t as f64 * 512.0 / 22050.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_frames_to_time_from_matrix() {
        let matrix = FeatureMatrix::from_rows(vec![vec![0.0; 7], vec![1.0; 7]]).unwrap();
        let times = frames_to_time(&matrix, 256, 16000).unwrap();
        assert_eq!(times.len(), 7);
        assert!((times[6] - 6.0 * 256.0 / 16000.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_axes_are_rejected() {
        assert_eq!(
            frequency_bins(0, 22050).unwrap_err(),
            FeatureError::InvalidFrameSize { got: 0, min: 1 }
        );
        assert_eq!(frequency_bins(2048, 0).unwrap_err(), FeatureError::InvalidSampleRate);
        assert_eq!(
            frames_to_time(&10usize, 512, 0).unwrap_err(),
            FeatureError::InvalidSampleRate
        );
    }
}
