//! Skew correction
//!
//! Columns whose population skewness exceeds a threshold are replaced by
//! `log(1 + x)`. The decision is made once at fit time and replayed on every
//! transform.

use crate::error::{OceanError, Result};
use crate::utils::stats;
use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Skewness measured for one column at fit time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSkew {
    pub column: String,
    /// `None` when the column has zero variance
    pub skewness: Option<f64>,
    pub transformed: bool,
}

/// Log1p transformer for right-skewed columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkewCorrector {
    threshold: f64,
    columns: Vec<ColumnSkew>,
    is_fitted: bool,
}

impl SkewCorrector {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            columns: Vec::new(),
            is_fitted: false,
        }
    }

    /// Measure skewness for each column and decide which ones to transform
    pub fn fit(&mut self, df: &DataFrame, columns: &[String]) -> Result<&mut Self> {
        let threshold = self.threshold;
        self.columns = columns
            .par_iter()
            .map(|name| {
                let values = column_values(df, name)?;
                let skewness = stats::skewness(&values);
                Ok(ColumnSkew {
                    column: name.clone(),
                    skewness,
                    transformed: skewness.is_some_and(|s| s > threshold),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        self.is_fitted = true;
        Ok(self)
    }

    /// Apply `log1p` to the columns selected at fit time
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(OceanError::ModelNotFitted);
        }

        let mut result = df.clone();
        for name in self.skewed_columns() {
            let column = df
                .column(name)
                .map_err(|_| OceanError::FeatureNotFound(name.to_string()))?;

            let transformed: Float64Chunked = column
                .f64()?
                .into_iter()
                .map(|opt| opt.map(f64::ln_1p))
                .collect();

            if transformed.into_iter().flatten().any(|v| !v.is_finite()) {
                return Err(OceanError::DataError(format!(
                    "log1p produced non-finite values in '{}', values must be > -1",
                    name
                )));
            }

            result.with_column(transformed.with_name(name.into()).into_series())?;
        }

        Ok(result)
    }

    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[String]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    /// Names of the columns that receive `log1p`, in fit order
    pub fn skewed_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| c.transformed)
            .map(|c| c.column.as_str())
    }

    /// Per-column skewness recorded at fit time
    pub fn column_skew(&self) -> &[ColumnSkew] {
        &self.columns
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

/// Non-null values of a `Float64` column
pub(crate) fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .map_err(|_| OceanError::FeatureNotFound(name.to_string()))?;
    Ok(column.f64()?.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn right_skewed() -> Vec<f64> {
        // Geometric-like tail: many small values, a few large ones
        let mut values = Vec::new();
        for (value, count) in [(1.0, 40), (2.0, 20), (3.0, 10), (5.0, 5), (9.0, 3), (20.0, 1)] {
            values.extend(std::iter::repeat(value).take(count));
        }
        values
    }

    #[test]
    fn test_selects_only_skewed_columns() {
        let df = df!(
            "skewed" => right_skewed(),
            "flat" => (0..79).map(|i| (i % 5) as f64 + 1.0).collect::<Vec<_>>()
        )
        .unwrap();

        let mut corrector = SkewCorrector::new(0.75);
        corrector
            .fit(&df, &["skewed".to_string(), "flat".to_string()])
            .unwrap();

        let skewed: Vec<&str> = corrector.skewed_columns().collect();
        assert_eq!(skewed, vec!["skewed"]);
    }

    #[test]
    fn test_log1p_reduces_skewness() {
        let values = right_skewed();
        let before = stats::skewness(&values).unwrap();
        assert!(before > 0.75);

        let df = df!("x" => values).unwrap();
        let mut corrector = SkewCorrector::new(0.75);
        let out = corrector.fit_transform(&df, &["x".to_string()]).unwrap();

        let after = stats::skewness(&column_values(&out, "x").unwrap()).unwrap();
        assert!(after < before, "before {before}, after {after}");
    }

    #[test]
    fn test_transform_is_deterministic() {
        let df = df!("x" => right_skewed()).unwrap();
        let mut corrector = SkewCorrector::new(0.75);
        corrector.fit(&df, &["x".to_string()]).unwrap();

        let a = corrector.transform(&df).unwrap();
        let b = corrector.transform(&df).unwrap();
        assert!(a.equals(&b));
    }

    #[test]
    fn test_constant_column_untouched() {
        let df = df!("c" => &[3.0, 3.0, 3.0]).unwrap();
        let mut corrector = SkewCorrector::new(0.75);
        let out = corrector.fit_transform(&df, &["c".to_string()]).unwrap();

        assert!(corrector.column_skew()[0].skewness.is_none());
        assert_eq!(out.column("c").unwrap().f64().unwrap().get(0), Some(3.0));
    }
}
