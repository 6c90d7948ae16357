// src/config/params.rs
//
// Analysis parameters, presets and feature selection.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::dsp::framing::{DEFAULT_FRAME_SIZE, DEFAULT_HOP_LENGTH};
use crate::core::features::spectral::{
    check_amin, check_power, check_threshold, DEFAULT_AMIN, DEFAULT_BANDWIDTH_POWER,
    DEFAULT_FLATNESS_POWER, DEFAULT_ROLLOFF_THRESHOLD,
};
use crate::error::{FeatureError, Result};

/// Features the analyzer can compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Rms,
    ZeroCrossingRate,
    SpectralCentroid,
    SpectralBandwidth,
    SpectralRolloff,
    SpectralFlatness,
}

impl FeatureKind {
    pub fn all() -> Vec<Self> {
        vec![
            Self::Rms,
            Self::ZeroCrossingRate,
            Self::SpectralCentroid,
            Self::SpectralBandwidth,
            Self::SpectralRolloff,
            Self::SpectralFlatness,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Rms => "rms",
            Self::ZeroCrossingRate => "zero_crossing_rate",
            Self::SpectralCentroid => "spectral_centroid",
            Self::SpectralBandwidth => "spectral_bandwidth",
            Self::SpectralRolloff => "spectral_rolloff",
            Self::SpectralFlatness => "spectral_flatness",
        }
    }

    /// Parse a feature name; short aliases such as `zcr` and `centroid` work
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().replace('-', "_").as_str() {
            "rms" => Ok(Self::Rms),
            "zcr" | "zero_crossing_rate" => Ok(Self::ZeroCrossingRate),
            "centroid" | "spectral_centroid" => Ok(Self::SpectralCentroid),
            "bandwidth" | "spectral_bandwidth" => Ok(Self::SpectralBandwidth),
            "rolloff" | "spectral_rolloff" => Ok(Self::SpectralRolloff),
            "flatness" | "spectral_flatness" => Ok(Self::SpectralFlatness),
            _ => Err(FeatureError::UnknownFeature(name.to_string())),
        }
    }

    /// Whether the feature needs the STFT
    pub fn is_spectral(&self) -> bool {
        !matches!(self, Self::Rms | Self::ZeroCrossingRate)
    }
}

/// Preset parameter sets for common material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigPreset {
    /// 2048-sample frames, 512 hop
    Standard,
    /// Short frames for speech, 512-sample frames, 128 hop
    Speech,
    /// Fine frequency resolution, 4096-sample frames, 1024 hop
    HighResolution,
    /// User-defined settings
    Custom,
}

impl ConfigPreset {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "standard" | "default" => Some(Self::Standard),
            "speech" | "voice" => Some(Self::Speech),
            "highres" | "high_resolution" | "hires" => Some(Self::HighResolution),
            _ => None,
        }
    }
}

/// Complete analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Preset this was derived from
    pub base_preset: ConfigPreset,
    /// Analysis frame length in samples
    pub frame_size: usize,
    /// Hop between frame starts in samples
    pub hop_length: usize,
    /// Fraction of total magnitude for the rolloff frequency
    pub rolloff_threshold: f64,
    /// Deviation exponent for the bandwidth
    pub bandwidth_power: f64,
    /// Magnitude exponent for the flatness
    pub flatness_power: f64,
    /// Magnitude floor for the flatness
    pub amin: f64,
    /// Features to compute; reports list them in `FeatureKind` order
    pub features: Vec<FeatureKind>,
    /// Also compute whole-signal values
    pub include_overall: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self::from_preset(ConfigPreset::Standard)
    }
}

impl FeatureConfig {
    pub fn from_preset(preset: ConfigPreset) -> Self {
        let (frame_size, hop_length) = match preset {
            ConfigPreset::Standard | ConfigPreset::Custom => {
                (DEFAULT_FRAME_SIZE, DEFAULT_HOP_LENGTH)
            }
            ConfigPreset::Speech => (512, 128),
            ConfigPreset::HighResolution => (4096, 1024),
        };
        Self {
            base_preset: preset,
            frame_size,
            hop_length,
            rolloff_threshold: DEFAULT_ROLLOFF_THRESHOLD,
            bandwidth_power: DEFAULT_BANDWIDTH_POWER,
            flatness_power: DEFAULT_FLATNESS_POWER,
            amin: DEFAULT_AMIN,
            features: FeatureKind::all(),
            include_overall: true,
        }
    }

    pub fn builder() -> FeatureConfigBuilder {
        FeatureConfigBuilder::new()
    }

    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config JSON in {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject parameters the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.hop_length < 1 {
            return Err(FeatureError::InvalidHopLength(self.hop_length));
        }
        // Spectral features need a Hann window, which is undefined below 2
        if self.frame_size < 2 {
            return Err(FeatureError::InvalidFrameSize {
                got: self.frame_size,
                min: 2,
            });
        }
        check_threshold(self.rolloff_threshold)?;
        check_power("bandwidth_power", self.bandwidth_power)?;
        check_power("flatness_power", self.flatness_power)?;
        check_amin(self.amin)?;
        if self.features.is_empty() {
            return Err(FeatureError::invalid("features", "at least one feature is required"));
        }
        Ok(())
    }

    pub fn is_enabled(&self, kind: FeatureKind) -> bool {
        self.features.contains(&kind)
    }

    pub fn needs_stft(&self) -> bool {
        self.features.iter().any(FeatureKind::is_spectral)
    }
}

/// Builder for custom configurations
pub struct FeatureConfigBuilder {
    config: FeatureConfig,
}

impl FeatureConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: FeatureConfig::default(),
        }
    }

    pub fn from_preset(preset: ConfigPreset) -> Self {
        Self {
            config: FeatureConfig::from_preset(preset),
        }
    }

    pub fn frame_size(mut self, frame_size: usize) -> Self {
        self.config.frame_size = frame_size;
        self
    }

    pub fn hop_length(mut self, hop_length: usize) -> Self {
        self.config.hop_length = hop_length;
        self
    }

    pub fn rolloff_threshold(mut self, threshold: f64) -> Self {
        self.config.rolloff_threshold = threshold;
        self
    }

    pub fn bandwidth_power(mut self, power: f64) -> Self {
        self.config.bandwidth_power = power;
        self
    }

    pub fn flatness_power(mut self, power: f64) -> Self {
        self.config.flatness_power = power;
        self
    }

    pub fn amin(mut self, amin: f64) -> Self {
        self.config.amin = amin;
        self
    }

    /// Replace the feature selection
    pub fn features(mut self, features: impl IntoIterator<Item = FeatureKind>) -> Self {
        self.config.features = Vec::new();
        for kind in features {
            if !self.config.features.contains(&kind) {
                self.config.features.push(kind);
            }
        }
        self
    }

    pub fn disable(mut self, kind: FeatureKind) -> Self {
        self.config.features.retain(|k| *k != kind);
        self
    }

    pub fn include_overall(mut self, include: bool) -> Self {
        self.config.include_overall = include;
        self
    }

    pub fn build(mut self) -> Result<FeatureConfig> {
        if self.config != FeatureConfig::from_preset(self.config.base_preset) {
            self.config.base_preset = ConfigPreset::Custom;
        }
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for FeatureConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FeatureConfig::default();
        assert_eq!(config.frame_size, 2048);
        assert_eq!(config.hop_length, 512);
        assert_eq!(config.rolloff_threshold, 0.85);
        assert_eq!(config.amin, 1e-10);
        assert_eq!(config.features.len(), 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_rejects_bad_values() {
        assert_eq!(
            FeatureConfig::builder().hop_length(0).build().unwrap_err(),
            FeatureError::InvalidHopLength(0)
        );
        assert_eq!(
            FeatureConfig::builder().frame_size(1).build().unwrap_err(),
            FeatureError::InvalidFrameSize { got: 1, min: 2 }
        );
        assert!(FeatureConfig::builder().rolloff_threshold(0.0).build().is_err());
        assert!(FeatureConfig::builder().amin(-1.0).build().is_err());
        assert!(FeatureConfig::builder().features([]).build().is_err());
    }

    #[test]
    fn test_builder_marks_custom() {
        let config = FeatureConfigBuilder::from_preset(ConfigPreset::Speech)
            .disable(FeatureKind::SpectralFlatness)
            .build()
            .unwrap();
        assert_eq!(config.base_preset, ConfigPreset::Custom);
        assert_eq!(config.frame_size, 512);
        assert!(!config.is_enabled(FeatureKind::SpectralFlatness));

        let untouched = FeatureConfigBuilder::from_preset(ConfigPreset::Speech).build().unwrap();
        assert_eq!(untouched.base_preset, ConfigPreset::Speech);
    }

    #[test]
    fn test_feature_names() {
        for kind in FeatureKind::all() {
            assert_eq!(FeatureKind::from_name(kind.name()).unwrap(), kind);
        }
        assert_eq!(FeatureKind::from_name("ZCR").unwrap(), FeatureKind::ZeroCrossingRate);
        assert!(FeatureKind::from_name("mfcc").is_err());
        assert!(!FeatureKind::Rms.is_spectral());
        assert!(FeatureKind::SpectralRolloff.is_spectral());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: FeatureConfig =
            serde_json::from_str(
                r#"{ "frame_size": 1024, "features": ["rms", "spectral_rolloff"] }"#,
            )
                .unwrap();
        assert_eq!(config.frame_size, 1024);
        assert_eq!(config.hop_length, 512);
        assert_eq!(
            config.features,
            vec![FeatureKind::Rms, FeatureKind::SpectralRolloff]
        );
        assert!(config.needs_stft());
    }
}
