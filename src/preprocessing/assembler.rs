//! Feature vector assembly

use crate::error::{OceanError, Result};
use ndarray::{s, Array2};
use polars::prelude::*;

/// Concatenates one-hot dimensions and numeric columns into a feature matrix.
///
/// Layout per row: the encoded categorical dimensions in index order, then the
/// numeric columns in declared order.
#[derive(Debug, Clone)]
pub struct VectorAssembler {
    numeric_columns: Vec<String>,
}

impl VectorAssembler {
    pub fn new(numeric_columns: Vec<String>) -> Self {
        Self { numeric_columns }
    }

    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric_columns
    }

    /// Width of the assembled vector for a given number of categories
    pub fn output_width(&self, n_categories: usize) -> usize {
        n_categories + self.numeric_columns.len()
    }

    pub fn assemble(&self, df: &DataFrame, one_hot: &Array2<f64>) -> Result<Array2<f64>> {
        let n_rows = df.height();
        if one_hot.nrows() != n_rows {
            return Err(OceanError::ShapeError {
                expected: format!("{} encoded rows", n_rows),
                actual: format!("{}", one_hot.nrows()),
            });
        }

        let n_cat = one_hot.ncols();
        let mut features = Array2::zeros((n_rows, self.output_width(n_cat)));
        features.slice_mut(s![.., ..n_cat]).assign(one_hot);

        for (j, name) in self.numeric_columns.iter().enumerate() {
            let column = df
                .column(name)
                .map_err(|_| OceanError::FeatureNotFound(name.clone()))?;

            for (i, value) in column.f64()?.into_iter().enumerate() {
                features[[i, n_cat + j]] = value.ok_or_else(|| {
                    OceanError::DataError(format!(
                        "null in '{}' at row {} reached vector assembly",
                        name, i
                    ))
                })?;
            }
        }

        Ok(features)
    }
}
