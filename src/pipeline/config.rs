//! Feature engineering configuration

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::features::{DurationCategory, DurationOver, PartOfDay};
use super::similarity::SimilarityConfig;

/// All tunable parameters of the flight preprocessor.
///
/// Every field has a default, so a JSON file only needs the values it
/// changes, e.g. `{"similarity": {"gamma": 0.05}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// RBF percentile similarity on `duration`
    pub similarity: SimilarityConfig,
    /// Hour boundaries for departure / arrival buckets
    pub part_of_day: PartOfDay,
    /// Short / medium duration thresholds in minutes
    pub duration: DurationCategory,
    /// Threshold for the `duration_over_{value}` flag
    pub long_duration: DurationOver,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            similarity: SimilarityConfig::default(),
            part_of_day: PartOfDay::default(),
            duration: DurationCategory::default(),
            long_duration: DurationOver::default(),
        }
    }
}

impl FeatureConfig {
    /// Check every parameter group.
    pub fn validate(&self) -> super::Result<()> {
        self.similarity.validate()?;
        self.part_of_day.validate()?;
        self.duration.validate()?;
        Ok(())
    }

    /// Load a configuration file and validate it.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: FeatureConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        Ok(config)
    }
}
