//! Missing value imputation

use crate::error::{OceanError, Result};
use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Strategy for imputing missing values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputeStrategy {
    /// Replace with the column mean
    Mean,
    /// Replace with the column median
    Median,
}

/// Fill value computed for one column during fit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillValue {
    pub column: String,
    pub value: f64,
    /// Nulls seen in the column when the imputer was fitted
    pub missing: usize,
}

/// Per-column imputer for `Float64` columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Imputer {
    strategy: ImputeStrategy,
    fill_values: Vec<FillValue>,
    is_fitted: bool,
}

impl Imputer {
    /// Create a new imputer with the specified strategy
    pub fn new(strategy: ImputeStrategy) -> Self {
        Self {
            strategy,
            fill_values: Vec::new(),
            is_fitted: false,
        }
    }

    /// Fit the imputer to the data.
    ///
    /// Each column's statistic is computed independently over its non-null
    /// values. A column with no values at all is an error.
    pub fn fit(&mut self, df: &DataFrame, columns: &[String]) -> Result<&mut Self> {
        let strategy = self.strategy;
        self.fill_values = columns
            .par_iter()
            .map(|name| Self::compute_fill_value(df, name, strategy))
            .collect::<Result<Vec<_>>>()?;

        self.is_fitted = true;
        Ok(self)
    }

    /// Replace nulls in every fitted column with its fill value
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(OceanError::ModelNotFitted);
        }

        let mut result = df.clone();

        for fill in &self.fill_values {
            let column = df
                .column(&fill.column)
                .map_err(|_| OceanError::FeatureNotFound(fill.column.clone()))?;
            let ca = column.f64()?;

            let filled: Float64Chunked = ca
                .into_iter()
                .map(|opt| Some(opt.unwrap_or(fill.value)))
                .collect();

            result.with_column(filled.with_name(fill.column.as_str().into()).into_series())?;
        }

        Ok(result)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[String]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    /// Fill values in fit order
    pub fn fill_values(&self) -> &[FillValue] {
        &self.fill_values
    }

    /// Fill value for one column
    pub fn fill_value(&self, column: &str) -> Option<f64> {
        self.fill_values
            .iter()
            .find(|f| f.column == column)
            .map(|f| f.value)
    }

    fn compute_fill_value(df: &DataFrame, name: &str, strategy: ImputeStrategy) -> Result<FillValue> {
        let column = df
            .column(name)
            .map_err(|_| OceanError::FeatureNotFound(name.to_string()))?;
        let ca = column.f64().map_err(|_| {
            OceanError::DataError(format!(
                "column '{}' is {}, expected Float64",
                name,
                column.dtype()
            ))
        })?;

        let value = match strategy {
            ImputeStrategy::Mean => ca.mean(),
            ImputeStrategy::Median => ca.median(),
        };

        match value {
            Some(value) if value.is_finite() => Ok(FillValue {
                column: name.to_string(),
                value,
                missing: ca.null_count(),
            }),
            _ => Err(OceanError::EmptyColumn {
                column: name.to_string(),
            }),
        }
    }
}
