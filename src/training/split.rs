//! Random train/test splitting

use crate::error::{OceanError, Result};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Split weights and optional seed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub train_weight: f64,
    pub test_weight: f64,
    /// Without a seed every run draws a different partition
    pub seed: Option<u64>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            train_weight: 0.7,
            test_weight: 0.3,
            seed: None,
        }
    }
}

/// Row indices of each partition, ascending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl SplitIndices {
    /// Fail when either partition drew no rows
    pub fn ensure_non_empty(&self) -> Result<()> {
        let total_rows = self.train.len() + self.test.len();
        for (partition, rows) in [("training", &self.train), ("test", &self.test)] {
            if rows.is_empty() {
                return Err(OceanError::EmptySplit {
                    partition: partition.to_string(),
                    total_rows,
                });
            }
        }
        Ok(())
    }

    /// `true` at every training row, `false` at every test row
    pub fn train_mask(&self) -> Vec<bool> {
        let mut mask = vec![false; self.train.len() + self.test.len()];
        for &i in &self.train {
            mask[i] = true;
        }
        mask
    }
}

/// Assigns each row independently to train or test.
///
/// One uniform draw per row against the normalized training weight, so only
/// the expected proportions are guaranteed.
#[derive(Debug, Clone)]
pub struct RandomSplitter {
    train_fraction: f64,
    seed: Option<u64>,
}

impl RandomSplitter {
    pub fn new(train_weight: f64, test_weight: f64) -> Result<Self> {
        for (name, weight) in [("train_weight", train_weight), ("test_weight", test_weight)] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(OceanError::InvalidParameter {
                    name: name.to_string(),
                    value: weight.to_string(),
                    reason: "must be a non-negative number".to_string(),
                });
            }
        }
        let total = train_weight + test_weight;
        if total <= 0.0 {
            return Err(OceanError::InvalidParameter {
                name: "split weights".to_string(),
                value: format!("{} + {}", train_weight, test_weight),
                reason: "must sum to a positive value".to_string(),
            });
        }

        Ok(Self {
            train_fraction: train_weight / total,
            seed: None,
        })
    }

    pub fn from_config(config: &SplitConfig) -> Result<Self> {
        Ok(Self::new(config.train_weight, config.test_weight)?.with_seed(config.seed))
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn train_fraction(&self) -> f64 {
        self.train_fraction
    }

    pub fn split(&self, n_rows: usize) -> SplitIndices {
        let mut rng = match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let mut train = Vec::with_capacity((n_rows as f64 * self.train_fraction) as usize + 1);
        let mut test = Vec::new();
        for i in 0..n_rows {
            let draw: f64 = rng.gen();
            if draw < self.train_fraction {
                train.push(i);
            } else {
                test.push(i);
            }
        }

        SplitIndices { train, test }
    }
}
