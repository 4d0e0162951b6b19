//! Ocean Pipeline - Big Five survey classification
//!
//! Loads a delimited survey export, cleans and transforms it, and fits a
//! multinomial logistic regression that predicts one questionnaire item from
//! the respondent's country and their other answers.
//!
//! # Modules
//!
//! - [`survey`] - Questionnaire layout and schema checks
//! - [`preprocessing`] - Casting, imputation, skew correction, encoding, assembly
//! - [`training`] - Train/test split, logistic regression, accuracy
//! - [`pipeline`] - End-to-end runner, configuration and run report
//! - [`cli`] - Command-line interface
//! - [`utils`] - Data loading and descriptive statistics

pub mod error;
pub mod survey;
pub mod utils;

pub mod preprocessing;
pub mod training;
pub mod pipeline;

pub mod cli;

pub use error::{OceanError, Result};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{OceanError, Result};
    pub use crate::pipeline::{FitScope, Pipeline, PipelineConfig, PipelineReport};
    pub use crate::preprocessing::{DataPreprocessor, ImputeStrategy, PreprocessingConfig};
    pub use crate::training::{SplitConfig, TrainEngine, TrainingConfig};
    pub use crate::utils::DataLoader;
}
