//! CLI argument parsing with preset support

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use crate::config::{ConfigPreset, FeatureConfig, FeatureConfigBuilder, FeatureKind};

/// Parsed CLI arguments
#[derive(Parser, Debug)]
#[command(name = "audiofeatr")]
#[command(about = "Extract RMS, zero-crossing and spectral shape features from audio files")]
pub struct Args {
    /// Input file or directory
    pub input: PathBuf,

    /// Parameter preset (standard, speech, highres)
    #[arg(short, long, default_value = "standard")]
    pub preset: String,

    /// JSON configuration file; overrides the preset
    #[arg(short, long, env = "AUDIOFEATR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Analysis frame length in samples
    #[arg(long)]
    pub frame_size: Option<usize>,

    /// Hop between frames in samples
    #[arg(long)]
    pub hop_length: Option<usize>,

    /// Comma-separated features (rms, zcr, centroid, bandwidth, rolloff, flatness)
    #[arg(short, long, value_delimiter = ',')]
    pub features: Vec<String>,

    /// Rolloff energy fraction
    #[arg(long)]
    pub rolloff_threshold: Option<f64>,

    /// Resample to this rate before analysis
    #[arg(short = 'r', long)]
    pub sample_rate: Option<u32>,

    /// Downmix to mono before analysis
    #[arg(long)]
    pub mono: bool,

    /// Skip whole-signal features
    #[arg(long)]
    pub no_overall: bool,

    /// Emit JSON instead of a text summary
    #[arg(long)]
    pub json: bool,

    /// Include per-frame values in JSON output
    #[arg(long)]
    pub frames: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Resolve preset, config file and flag overrides into one configuration
    pub fn feature_config(&self) -> Result<FeatureConfig> {
        let base = match &self.config {
            Some(path) => FeatureConfig::from_json_file(path)?,
            None => match ConfigPreset::from_name(&self.preset) {
                Some(preset) => FeatureConfig::from_preset(preset),
                None => bail!(
                    "Unknown preset '{}' (expected standard, speech or highres)",
                    self.preset
                ),
            },
        };

        let mut builder = FeatureConfigBuilder::from_preset(base.base_preset);
        builder = builder
            .frame_size(self.frame_size.unwrap_or(base.frame_size))
            .hop_length(self.hop_length.unwrap_or(base.hop_length))
            .rolloff_threshold(self.rolloff_threshold.unwrap_or(base.rolloff_threshold))
            .bandwidth_power(base.bandwidth_power)
            .flatness_power(base.flatness_power)
            .amin(base.amin)
            .include_overall(base.include_overall && !self.no_overall);

        builder = if self.features.is_empty() {
            builder.features(base.features)
        } else {
            let kinds = self
                .features
                .iter()
                .map(|name| FeatureKind::from_name(name))
                .collect::<Result<Vec<_>, _>>()?;
            builder.features(kinds)
        };

        Ok(builder.build()?)
    }
}
