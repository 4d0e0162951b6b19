//! Preprocessing configuration

use serde::{Deserialize, Serialize};
use super::ImputeStrategy;

/// Configuration for survey preprocessing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    /// Strategy for filling missing numeric values
    pub impute_strategy: ImputeStrategy,

    /// Columns whose skewness exceeds this get `log(1 + x)`
    pub skew_threshold: f64,

    /// Drop the target item from the assembled feature vector.
    /// Off by default, so the target also appears among the features.
    pub exclude_target_from_features: bool,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            impute_strategy: ImputeStrategy::Mean,
            skew_threshold: 0.75,
            exclude_target_from_features: false,
        }
    }
}

impl PreprocessingConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the impute strategy
    pub fn with_impute_strategy(mut self, strategy: ImputeStrategy) -> Self {
        self.impute_strategy = strategy;
        self
    }

    /// Builder method to set the skew threshold
    pub fn with_skew_threshold(mut self, threshold: f64) -> Self {
        self.skew_threshold = threshold;
        self
    }

    /// Builder method to keep the target out of the feature vector
    pub fn with_exclude_target(mut self, exclude: bool) -> Self {
        self.exclude_target_from_features = exclude;
        self
    }
}
