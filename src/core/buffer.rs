// src/core/buffer.rs
//
// Rectangular sample and feature buffers shared by the engine.

use serde::{Serialize, Serializer};

use crate::error::{FeatureError, Result};

/// Multi-channel sample buffer of shape `[channels, samples]`
///
/// Samples are stored channel-major: all of channel 0, then all of
/// channel 1, and so on. Values are conventionally in `[-1.0, 1.0]` but
/// are never clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    data: Vec<f64>,
    channels: usize,
    samples: usize,
}

impl Signal {
    /// Build a signal from channel-major data
    pub fn new(data: Vec<f64>, channels: usize) -> Result<Self> {
        if channels == 0 {
            return Err(FeatureError::EmptyChannels);
        }
        if data.len() % channels != 0 {
            return Err(FeatureError::ShapeMismatch(format!(
                "{} samples cannot be split evenly into {} channels",
                data.len(),
                channels
            )));
        }
        let samples = data.len() / channels;
        Ok(Self {
            data,
            channels,
            samples,
        })
    }

    /// Single-channel signal
    pub fn mono(samples: Vec<f64>) -> Self {
        let len = samples.len();
        Self {
            data: samples,
            channels: 1,
            samples: len,
        }
    }

    /// Build a signal from one vector per channel; all must share a length
    pub fn from_channels(channels: Vec<Vec<f64>>) -> Result<Self> {
        let first_len = channels.first().ok_or(FeatureError::EmptyChannels)?.len();
        if let Some((idx, ch)) = channels
            .iter()
            .enumerate()
            .find(|(_, ch)| ch.len() != first_len)
        {
            return Err(FeatureError::ShapeMismatch(format!(
                "channel {} has {} samples, expected {}",
                idx,
                ch.len(),
                first_len
            )));
        }
        let count = channels.len();
        let data = channels.into_iter().flatten().collect();
        Ok(Self {
            data,
            channels: count,
            samples: first_len,
        })
    }

    /// Deinterleave `[L, R, L, R, ...]` style samples
    pub fn from_interleaved(interleaved: &[f32], channels: usize) -> Result<Self> {
        if channels == 0 {
            return Err(FeatureError::EmptyChannels);
        }
        if interleaved.len() % channels != 0 {
            return Err(FeatureError::ShapeMismatch(format!(
                "{} interleaved samples is not a multiple of {} channels",
                interleaved.len(),
                channels
            )));
        }
        let samples = interleaved.len() / channels;
        let mut data = vec![0.0f64; interleaved.len()];
        for (i, frame) in interleaved.chunks_exact(channels).enumerate() {
            for (ch, &s) in frame.iter().enumerate() {
                data[ch * samples + i] = s as f64;
            }
        }
        Ok(Self {
            data,
            channels,
            samples,
        })
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of samples per channel
    pub fn len(&self) -> usize {
        self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples == 0
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.channels, self.samples)
    }

    pub fn channel(&self, ch: usize) -> &[f64] {
        &self.data[ch * self.samples..(ch + 1) * self.samples]
    }

    pub fn iter_channels(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.channels).map(move |ch| self.channel(ch))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn into_channels(self) -> Vec<Vec<f64>> {
        if self.samples == 0 {
            return vec![Vec::new(); self.channels];
        }
        self.data
            .chunks_exact(self.samples)
            .map(|c| c.to_vec())
            .collect()
    }

    /// Copy with `count` columns of `fill` appended to every channel
    pub fn pad_right(&self, count: usize, fill: f64) -> Signal {
        if count == 0 {
            return self.clone();
        }
        let padded_len = self.samples + count;
        let mut data = Vec::with_capacity(self.channels * padded_len);
        for ch in self.iter_channels() {
            data.extend_from_slice(ch);
            data.extend(std::iter::repeat(fill).take(count));
        }
        Signal {
            data,
            channels: self.channels,
            samples: padded_len,
        }
    }
}

/// Feature values of shape `[channels, frames]`
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    data: Vec<f64>,
    channels: usize,
    frames: usize,
}

impl FeatureMatrix {
    /// Assemble from per-channel rows of equal length
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let frames = rows.first().ok_or(FeatureError::EmptyChannels)?.len();
        if rows.iter().any(|r| r.len() != frames) {
            return Err(FeatureError::ShapeMismatch(
                "feature rows must all have the same number of frames".to_string(),
            ));
        }
        let channels = rows.len();
        Ok(Self {
            data: rows.into_iter().flatten().collect(),
            channels,
            frames,
        })
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.channels, self.frames)
    }

    pub fn row(&self, ch: usize) -> &[f64] {
        &self.data[ch * self.frames..(ch + 1) * self.frames]
    }

    pub fn get(&self, ch: usize, frame: usize) -> f64 {
        self.data[ch * self.frames + frame]
    }

    pub fn rows(&self) -> Vec<Vec<f64>> {
        (0..self.channels).map(|ch| self.row(ch).to_vec()).collect()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

/// Serialized as one array of frame values per channel
impl Serialize for FeatureMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq((0..self.channels).map(|ch| self.row(ch)))
    }
}
