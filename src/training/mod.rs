//! Model training
//!
//! Random train/test splitting, multinomial logistic regression and accuracy
//! evaluation.

mod classes;
mod config;
mod engine;
pub mod linear_models;
mod metrics;
pub mod split;

pub use classes::ClassIndex;
pub use config::TrainingConfig;
pub use engine::{FittedClassifier, TrainEngine};
pub use linear_models::MultinomialLogisticRegression;
pub use metrics::{accuracy, ClassificationMetrics};
pub use split::{RandomSplitter, SplitConfig, SplitIndices};
