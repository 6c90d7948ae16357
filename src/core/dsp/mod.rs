//! Digital Signal Processing utilities
//!
//! Framing, windowing, short-time spectra and the frequency/time axes that
//! the feature extractors are built on.

pub mod fft;
pub mod framing;
pub mod frequency;
pub mod windows;

pub use fft::{
    fft, magnitude_spectrum, stft, stft_from_grid, MagnitudeSpectrogram, Spectrogram,
};
pub use framing::{
    build_ranges, frame, frame_count, pad_amount, pad_right, FrameGrid, DEFAULT_FRAME_SIZE,
    DEFAULT_HOP_LENGTH,
};
pub use frequency::{frames_to_time, frequency_bins, FrameAxis};
pub use windows::{hann_window, Window};
