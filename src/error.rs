//! Error types for the survey pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, OceanError>;

/// Main error type for the pipeline
#[derive(Error, Debug)]
pub enum OceanError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("Column '{column}' has no non-missing values, cannot compute a mean")]
    EmptyColumn { column: String },

    #[error("Unknown category '{value}' in column '{column}'")]
    UnknownCategory { column: String, value: String },

    #[error("Empty {partition} partition after split ({total_rows} rows drawn)")]
    EmptySplit {
        partition: String,
        total_rows: usize,
    },

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },
}

impl From<polars::error::PolarsError> for OceanError {
    fn from(err: polars::error::PolarsError) -> Self {
        OceanError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for OceanError {
    fn from(err: serde_json::Error) -> Self {
        OceanError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for OceanError {
    fn from(err: ndarray::ShapeError) -> Self {
        OceanError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
