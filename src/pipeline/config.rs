//! Pipeline configuration

use crate::error::{OceanError, Result};
use crate::preprocessing::PreprocessingConfig;
use crate::survey::{self, COUNTRY_COLUMN, DEFAULT_TARGET};
use crate::training::{SplitConfig, TrainingConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which rows the preprocessing statistics are fitted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitScope {
    /// Means, skew decisions and categories come from every row, before the split
    Global,
    /// Split raw rows first, fit on training rows, apply to test rows
    TrainOnly,
}

impl std::str::FromStr for FitScope {
    type Err = OceanError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "global" => Ok(FitScope::Global),
            "train" | "train_only" => Ok(FitScope::TrainOnly),
            other => Err(OceanError::ConfigError(format!(
                "invalid fit scope '{}', expected 'global' or 'train'",
                other
            ))),
        }
    }
}

/// Full pipeline configuration.
///
/// Defaults reproduce the survey notebook: tab-separated input, `EXT1` as
/// target, skew threshold 0.75, a 70/30 unseeded split and global fitting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Field delimiter of the input file
    pub delimiter: char,
    pub categorical_column: String,
    pub target_column: String,
    /// Numeric item columns in feature order
    pub feature_columns: Vec<String>,
    pub fit_scope: FitScope,
    pub preprocessing: PreprocessingConfig,
    pub split: SplitConfig,
    pub training: TrainingConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            delimiter: '\t',
            categorical_column: COUNTRY_COLUMN.to_string(),
            target_column: DEFAULT_TARGET.to_string(),
            feature_columns: survey::item_columns(),
            fit_scope: FitScope::Global,
            preprocessing: PreprocessingConfig::default(),
            split: SplitConfig::default(),
            training: TrainingConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON file; missing keys keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.split.seed = seed;
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target_column = target.into();
        self
    }

    pub fn with_fit_scope(mut self, scope: FitScope) -> Self {
        self.fit_scope = scope;
        self
    }

    pub fn with_preprocessing(mut self, preprocessing: PreprocessingConfig) -> Self {
        self.preprocessing = preprocessing;
        self
    }

    pub fn with_training(mut self, training: TrainingConfig) -> Self {
        self.training = training;
        self
    }

    /// Delimiter as the single byte the CSV reader expects
    pub fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(|b| b.is_ascii())
            .ok_or_else(|| {
                OceanError::ConfigError(format!(
                    "delimiter {:?} is not a single ASCII character",
                    self.delimiter
                ))
            })
    }

    pub fn validate(&self) -> Result<()> {
        self.delimiter_byte()?;

        if self.feature_columns.is_empty() {
            return Err(OceanError::ConfigError("no feature columns configured".to_string()));
        }
        if !self.feature_columns.contains(&self.target_column) {
            return Err(OceanError::ConfigError(format!(
                "target '{}' is not among the feature columns",
                self.target_column
            )));
        }
        if self.feature_columns.contains(&self.categorical_column) {
            return Err(OceanError::ConfigError(format!(
                "'{}' cannot be both categorical and numeric",
                self.categorical_column
            )));
        }
        if !self.preprocessing.skew_threshold.is_finite() {
            return Err(OceanError::InvalidParameter {
                name: "skew_threshold".to_string(),
                value: self.preprocessing.skew_threshold.to_string(),
                reason: "must be finite".to_string(),
            });
        }
        if self.training.max_iter == 0 {
            return Err(OceanError::InvalidParameter {
                name: "max_iter".to_string(),
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        let lr = self.training.learning_rate;
        if lr.is_nan() || lr <= 0.0 {
            return Err(OceanError::InvalidParameter {
                name: "learning_rate".to_string(),
                value: self.training.learning_rate.to_string(),
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_survey_notebook() {
        let config = PipelineConfig::default();
        assert_eq!(config.delimiter_byte().unwrap(), b'\t');
        assert_eq!(config.target_column, "EXT1");
        assert_eq!(config.feature_columns.len(), 50);
        assert_eq!(config.fit_scope, FitScope::Global);
        assert_eq!(config.split.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_file() {
        let mut tmp = tempfile::NamedTempFile::with_suffix(".json").unwrap();
        write!(
            tmp,
            r#"{{"target_column": "EXT2", "fit_scope": "train_only", "split": {{"seed": 9}}}}"#
        )
        .unwrap();

        let config = PipelineConfig::from_json_file(tmp.path()).unwrap();
        assert_eq!(config.target_column, "EXT2");
        assert_eq!(config.fit_scope, FitScope::TrainOnly);
        assert_eq!(config.split.seed, Some(9));
        assert_eq!(config.split.train_weight, 0.7);
    }

    #[test]
    fn test_invalid_target() {
        let config = PipelineConfig::default().with_target("age");
        assert!(matches!(config.validate(), Err(OceanError::ConfigError(_))));
    }

    #[test]
    fn test_non_ascii_delimiter() {
        let config = PipelineConfig { delimiter: '→', ..PipelineConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fit_scope_from_str() {
        assert_eq!("global".parse::<FitScope>().unwrap(), FitScope::Global);
        assert_eq!("train".parse::<FitScope>().unwrap(), FitScope::TrainOnly);
        assert!("test".parse::<FitScope>().is_err());
    }
}
