// src/core/analyzer.rs
//
// High-level feature extraction API with builder pattern.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use super::buffer::{FeatureMatrix, Signal};
use super::decoder::{decode_audio, downmix_mono};
use super::dsp::fft::stft_from_grid;
use super::dsp::framing::frame;
use super::dsp::frequency::{frames_to_time, frequency_bins};
use super::features::spectral::{
    spectral_bandwidth_from, spectral_bandwidth_overall, spectral_centroid_from,
    spectral_centroid_overall, spectral_flatness_from, spectral_flatness_overall,
    spectral_rolloff_from, spectral_rolloff_overall,
};
use super::features::temporal::{
    rms_from_grid, rms_overall, zero_crossing_rate_from_grid, zero_crossing_rate_overall,
};
use super::resample::resample;
use crate::config::{ConfigPreset, FeatureConfig, FeatureKind};
use crate::error::{FeatureError, Result};

/// Per-channel summary of one framed feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureSummary {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl FeatureSummary {
    pub fn of(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self {
                mean: 0.0,
                std_dev: 0.0,
                min: 0.0,
                max: 0.0,
            };
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Self {
            mean,
            std_dev: variance.sqrt(),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// Everything computed for one signal
#[derive(Debug, Clone, Serialize)]
pub struct FeatureReport {
    /// File the signal was decoded from, if any
    pub source: Option<String>,
    pub sample_rate: u32,
    pub channels: usize,
    pub samples: usize,
    pub duration_secs: f64,
    pub frame_size: usize,
    pub hop_length: usize,
    pub frame_count: usize,
    /// Start time in seconds of every frame
    pub times: Vec<f64>,
    /// `[channels, frames]` matrices keyed by feature
    pub framed: BTreeMap<FeatureKind, FeatureMatrix>,
    /// Whole-signal value per channel keyed by feature
    pub overall: BTreeMap<FeatureKind, Vec<f64>>,
    /// Per-channel statistics of each framed feature
    pub summary: BTreeMap<FeatureKind, Vec<FeatureSummary>>,
}

impl FeatureReport {
    pub fn feature(&self, kind: FeatureKind) -> Option<&FeatureMatrix> {
        self.framed.get(&kind)
    }

    pub fn overall(&self, kind: FeatureKind) -> Option<&[f64]> {
        self.overall.get(&kind).map(Vec::as_slice)
    }
}

/// Builder for FeatureAnalyzer configuration
pub struct AnalyzerBuilder {
    config: FeatureConfig,
    target_sample_rate: Option<u32>,
    mono: bool,
}

impl AnalyzerBuilder {
    pub fn new() -> Self {
        Self {
            config: FeatureConfig::default(),
            target_sample_rate: None,
            mono: false,
        }
    }

    pub fn config(mut self, config: FeatureConfig) -> Self {
        self.config = config;
        self
    }

    pub fn preset(mut self, preset: ConfigPreset) -> Self {
        self.config = FeatureConfig::from_preset(preset);
        self
    }

    pub fn frame_size(mut self, frame_size: usize) -> Self {
        self.config.frame_size = frame_size;
        self
    }

    pub fn hop_length(mut self, hop_length: usize) -> Self {
        self.config.hop_length = hop_length;
        self
    }

    pub fn features(mut self, features: impl IntoIterator<Item = FeatureKind>) -> Self {
        self.config.features = features.into_iter().collect();
        self.config.features.sort();
        self.config.features.dedup();
        self
    }

    /// Resample decoded files to this rate before analysis
    pub fn resample_to(mut self, sample_rate: u32) -> Self {
        self.target_sample_rate = Some(sample_rate);
        self
    }

    /// Downmix decoded files to a single channel before analysis
    pub fn mono(mut self, mono: bool) -> Self {
        self.mono = mono;
        self
    }

    pub fn build(self) -> Result<FeatureAnalyzer> {
        self.config.validate()?;
        if self.target_sample_rate == Some(0) {
            return Err(FeatureError::InvalidSampleRate);
        }
        Ok(FeatureAnalyzer {
            config: self.config,
            target_sample_rate: self.target_sample_rate,
            mono: self.mono,
        })
    }
}

impl Default for AnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the configured feature set over signals or files
#[derive(Debug, Clone)]
pub struct FeatureAnalyzer {
    config: FeatureConfig,
    target_sample_rate: Option<u32>,
    mono: bool,
}

impl FeatureAnalyzer {
    /// Analyzer with the standard configuration
    pub fn new() -> Self {
        Self {
            config: FeatureConfig::default(),
            target_sample_rate: None,
            mono: false,
        }
    }

    pub fn with_config(config: FeatureConfig) -> Result<Self> {
        AnalyzerBuilder::new().config(config).build()
    }

    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Compute every enabled feature for `signal`
    pub fn analyze(&self, signal: &Signal, sample_rate: u32) -> Result<FeatureReport> {
        if sample_rate == 0 {
            return Err(FeatureError::InvalidSampleRate);
        }
        let cfg = &self.config;
        let grid = frame(signal, cfg.frame_size, cfg.hop_length)?;
        let mut framed = BTreeMap::new();

        if cfg.is_enabled(FeatureKind::Rms) {
            framed.insert(FeatureKind::Rms, rms_from_grid(&grid)?);
        }
        if cfg.is_enabled(FeatureKind::ZeroCrossingRate) {
            framed.insert(FeatureKind::ZeroCrossingRate, zero_crossing_rate_from_grid(&grid)?);
        }

        if cfg.needs_stft() {
            let mag = stft_from_grid(&grid)?.magnitude();
            let freqs = frequency_bins(cfg.frame_size, sample_rate)?;
            for kind in cfg.features.iter().copied().filter(FeatureKind::is_spectral) {
                let matrix = match kind {
                    FeatureKind::SpectralCentroid => spectral_centroid_from(&mag, &freqs)?,
                    FeatureKind::SpectralBandwidth => {
                        spectral_bandwidth_from(&mag, &freqs, cfg.bandwidth_power)?
                    }
                    FeatureKind::SpectralRolloff => {
                        spectral_rolloff_from(&mag, &freqs, cfg.rolloff_threshold)?
                    }
                    FeatureKind::SpectralFlatness => {
                        spectral_flatness_from(&mag, cfg.flatness_power, cfg.amin)?
                    }
                    FeatureKind::Rms | FeatureKind::ZeroCrossingRate => continue,
                };
                framed.insert(kind, matrix);
            }
        }

        let overall = if cfg.include_overall {
            self.overall_features(signal, sample_rate)?
        } else {
            BTreeMap::new()
        };

        let summary: BTreeMap<FeatureKind, Vec<FeatureSummary>> = framed
            .iter()
            .map(|(kind, matrix)| {
                let stats = (0..matrix.channels())
                    .map(|ch| FeatureSummary::of(matrix.row(ch)))
                    .collect::<Vec<_>>();
                (*kind, stats)
            })
            .collect();

        log::debug!(
            "analyzed {} ch x {} samples: {} framed features over {} frames",
            signal.channels(),
            signal.len(),
            framed.len(),
            grid.frame_count()
        );

        Ok(FeatureReport {
            source: None,
            sample_rate,
            channels: signal.channels(),
            samples: signal.len(),
            duration_secs: signal.len() as f64 / sample_rate as f64,
            frame_size: cfg.frame_size,
            hop_length: cfg.hop_length,
            frame_count: grid.frame_count(),
            times: frames_to_time(&grid, cfg.hop_length, sample_rate)?,
            framed,
            overall,
            summary,
        })
    }

    fn overall_features(
        &self,
        signal: &Signal,
        sample_rate: u32,
    ) -> Result<BTreeMap<FeatureKind, Vec<f64>>> {
        let cfg = &self.config;
        let mut overall = BTreeMap::new();
        for kind in cfg.features.iter().copied() {
            if kind.is_spectral() && signal.len() < 2 {
                log::warn!(
                    "signal has {} samples, skipping overall {}",
                    signal.len(),
                    kind.name()
                );
                continue;
            }
            let values = match kind {
                FeatureKind::Rms => rms_overall(signal),
                FeatureKind::ZeroCrossingRate => zero_crossing_rate_overall(signal),
                FeatureKind::SpectralCentroid => spectral_centroid_overall(signal, sample_rate)?,
                FeatureKind::SpectralBandwidth => {
                    spectral_bandwidth_overall(signal, sample_rate, cfg.bandwidth_power)?
                }
                FeatureKind::SpectralRolloff => {
                    spectral_rolloff_overall(signal, sample_rate, cfg.rolloff_threshold)?
                }
                FeatureKind::SpectralFlatness => {
                    spectral_flatness_overall(signal, cfg.flatness_power, cfg.amin)?
                }
            };
            overall.insert(kind, values);
        }
        Ok(overall)
    }

    /// Decode, optionally resample and downmix, then analyze a file
    pub fn analyze_file(&self, path: &Path) -> anyhow::Result<FeatureReport> {
        let audio = decode_audio(path)?;
        let mut signal = audio.signal;
        let mut sample_rate = audio.sample_rate;

        if let Some(target) = self.target_sample_rate {
            signal = resample(&signal, sample_rate, target)?;
            sample_rate = target;
        }
        if self.mono {
            signal = downmix_mono(&signal);
        }

        let mut report = self.analyze(&signal, sample_rate)?;
        report.source = Some(path.display().to_string());
        Ok(report)
    }
}

impl Default for FeatureAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
