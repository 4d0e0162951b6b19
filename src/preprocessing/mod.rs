//! Survey preprocessing
//!
//! Turns the raw questionnaire frame into a numeric feature matrix:
//! - Type normalization of the item columns to `Float64`
//! - Missing value imputation (mean by default)
//! - `log1p` skew correction for right-skewed items
//! - One-hot encoding of the country column
//! - Vector assembly (one-hot dimensions first, then items in declared order)

mod assembler;
mod caster;
mod config;
mod encoder;
mod imputer;
mod pipeline;
pub mod transforms;

pub use assembler::VectorAssembler;
pub use caster::TypeNormalizer;
pub use config::PreprocessingConfig;
pub use encoder::OneHotEncoder;
pub use imputer::{FillValue, ImputeStrategy, Imputer};
pub use pipeline::{DataPreprocessor, PreparedData};
pub use transforms::{ColumnSkew, SkewCorrector};

use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Summary statistics for one numeric column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureStats {
    pub name: String,
    pub count: usize,
    pub null_count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl FeatureStats {
    /// Compute statistics from a numeric column, casting to `Float64` first
    pub fn from_column(column: &Column) -> Result<Self> {
        let series = column.as_materialized_series().cast(&DataType::Float64)?;
        let ca = series.f64()?;

        Ok(Self {
            name: column.name().to_string(),
            count: ca.len(),
            null_count: ca.null_count(),
            mean: ca.mean(),
            std: ca.std(1),
            min: ca.min(),
            max: ca.max(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_stats() {
        let column = Column::new("EXT1".into(), &[Some(1.0), None, Some(3.0)]);
        let stats = FeatureStats::from_column(&column).unwrap();

        assert_eq!(stats.name, "EXT1");
        assert_eq!(stats.count, 3);
        assert_eq!(stats.null_count, 1);
        assert_eq!(stats.mean, Some(2.0));
        assert_eq!(stats.min, Some(1.0));
        assert_eq!(stats.max, Some(3.0));
    }

    #[test]
    fn test_feature_stats_from_strings() {
        let column = Column::new("EXT2".into(), &["2", "x", "4"]);
        let stats = FeatureStats::from_column(&column).unwrap();
        assert_eq!(stats.null_count, 1);
        assert_eq!(stats.mean, Some(3.0));
    }
}
