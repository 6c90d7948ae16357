//! Frame grid construction: right padding and hop-spaced frame ranges

use std::ops::Range;

use crate::core::buffer::Signal;
use crate::error::{FeatureError, Result};

/// Default analysis frame length in samples
pub const DEFAULT_FRAME_SIZE: usize = 2048;

/// Default hop between frame starts in samples
pub const DEFAULT_HOP_LENGTH: usize = 512;

/// Padded signal plus the sample ranges of every analysis frame
#[derive(Debug, Clone)]
pub struct FrameGrid {
    padded: Signal,
    ranges: Vec<Range<usize>>,
    frame_size: usize,
    hop_length: usize,
}

impl FrameGrid {
    pub fn padded(&self) -> &Signal {
        &self.padded
    }

    pub fn padded_length(&self) -> usize {
        self.padded.len()
    }

    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    pub fn frame_count(&self) -> usize {
        self.ranges.len()
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn hop_length(&self) -> usize {
        self.hop_length
    }

    /// Samples of frame `index` in channel `ch`
    pub fn frame(&self, ch: usize, index: usize) -> &[f64] {
        &self.padded.channel(ch)[self.ranges[index].clone()]
    }
}

/// Number of frames needed to cover `signal_length` samples, at least one
pub fn frame_count(signal_length: usize, frame_size: usize, hop_length: usize) -> usize {
    if signal_length <= frame_size {
        return 1;
    }
    (signal_length - frame_size).div_ceil(hop_length) + 1
}

/// Zero samples to append so the last frame ends exactly at the signal end
pub fn pad_amount(signal_length: usize, frame_size: usize, hop_length: usize) -> usize {
    let frames = frame_count(signal_length, frame_size, hop_length);
    let padded_length = (frames - 1) * hop_length + frame_size;
    padded_length - signal_length
}

/// Append `pad_count` columns of `fill` to every channel
pub fn pad_right(signal: &Signal, pad_count: usize, fill: f64) -> Signal {
    signal.pad_right(pad_count, fill)
}

/// Hop-spaced `[start, start + frame_size)` ranges that fit in `padded_length`
pub fn build_ranges(
    padded_length: usize,
    frame_size: usize,
    hop_length: usize,
) -> Vec<Range<usize>> {
    (0..)
        .step_by(hop_length.max(1))
        .take_while(|start| start + frame_size <= padded_length)
        .map(|start| start..start + frame_size)
        .collect()
}

/// Pad `signal` and lay out its analysis frames
pub fn frame(signal: &Signal, frame_size: usize, hop_length: usize) -> Result<FrameGrid> {
    if hop_length < 1 {
        return Err(FeatureError::InvalidHopLength(hop_length));
    }
    if frame_size < 1 {
        return Err(FeatureError::InvalidFrameSize {
            got: frame_size,
            min: 1,
        });
    }

    let pad = pad_amount(signal.len(), frame_size, hop_length);
    let padded = pad_right(signal, pad, 0.0);
    let ranges = build_ranges(padded.len(), frame_size, hop_length);

    log::debug!(
        "framed {} samples x {} channels into {} frames (frame={}, hop={}, pad={})",
        signal.len(),
        signal.channels(),
        ranges.len(),
        frame_size,
        hop_length,
        pad
    );

    Ok(FrameGrid {
        padded,
        ranges,
        frame_size,
        hop_length,
    })
}
