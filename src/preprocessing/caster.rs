//! Type normalization for the numeric survey items

use crate::error::{OceanError, Result};
use polars::prelude::*;
use tracing::debug;

/// Casts named columns to `Float64`.
///
/// Values that fail to parse, and parsed values that are not finite, become
/// null. Other columns pass through untouched.
#[derive(Debug, Clone)]
pub struct TypeNormalizer {
    columns: Vec<String>,
}

impl TypeNormalizer {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut result = df.clone();

        for name in &self.columns {
            let column = df
                .column(name)
                .map_err(|_| OceanError::FeatureNotFound(name.clone()))?;
            let nulls_before = column.null_count();

            let casted = column.as_materialized_series().cast(&DataType::Float64)?;
            let cleaned: Float64Chunked = casted
                .f64()?
                .into_iter()
                .map(|opt| opt.filter(|v| v.is_finite()))
                .collect();

            let nulls_after = cleaned.null_count();
            if nulls_after > nulls_before {
                debug!(
                    column = %name,
                    coerced = nulls_after - nulls_before,
                    "Unparseable values became null"
                );
            }

            result.with_column(cleaned.with_name(name.as_str().into()).into_series())?;
        }

        Ok(result)
    }
}
