//! Configuration module for audiofeatr

mod params;

pub use params::{ConfigPreset, FeatureConfig, FeatureConfigBuilder, FeatureKind};
