//! Categorical encoding: frequency-ordered string indexing plus one-hot expansion

use crate::error::{OceanError, Result};
use ndarray::{Array2, ArrayView1};
use polars::prelude::*;
use std::collections::HashMap;

/// One-hot encoder for a single string column.
///
/// Categories are indexed by descending frequency; ties keep first-seen order.
/// Every category gets its own dimension.
#[derive(Debug, Clone)]
pub struct OneHotEncoder {
    column: String,
    /// Categories in index order
    categories: Vec<String>,
    /// Occurrences of each category at fit time, same order as `categories`
    counts: Vec<usize>,
    index: HashMap<String, usize>,
    is_fitted: bool,
}

impl OneHotEncoder {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            categories: Vec::new(),
            counts: Vec::new(),
            index: HashMap::new(),
            is_fitted: false,
        }
    }

    /// Build the category index from the data
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        let values = self.string_values(df)?;

        // category -> (count, first position)
        let mut seen: HashMap<&str, (usize, usize)> = HashMap::new();
        for (pos, value) in values.iter().enumerate() {
            seen.entry(value.as_str()).or_insert((0, pos)).0 += 1;
        }

        let mut ordered: Vec<(&str, usize, usize)> = seen
            .into_iter()
            .map(|(cat, (count, first))| (cat, count, first))
            .collect();
        ordered.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        self.categories = ordered.iter().map(|(cat, _, _)| cat.to_string()).collect();
        self.counts = ordered.iter().map(|(_, count, _)| *count).collect();
        self.rebuild_index();
        self.is_fitted = true;
        Ok(self)
    }

    /// Index of every row's category
    pub fn transform_indices(&self, df: &DataFrame) -> Result<Vec<usize>> {
        if !self.is_fitted {
            return Err(OceanError::ModelNotFitted);
        }
        self.string_values(df)?
            .iter()
            .map(|value| self.index_of(value))
            .collect()
    }

    /// One-hot matrix, one row per input row and one column per category
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        let indices = self.transform_indices(df)?;
        let mut encoded = Array2::zeros((indices.len(), self.categories.len()));
        for (row, idx) in indices.into_iter().enumerate() {
            encoded[[row, idx]] = 1.0;
        }
        Ok(encoded)
    }

    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<Array2<f64>> {
        self.fit(df)?;
        self.transform(df)
    }

    /// Index assigned to a category, unseen categories are an error
    pub fn index_of(&self, value: &str) -> Result<usize> {
        self.index
            .get(value)
            .copied()
            .ok_or_else(|| OceanError::UnknownCategory {
                column: self.column.clone(),
                value: value.to_string(),
            })
    }

    /// Recover the category from a one-hot row
    pub fn decode(&self, row: ArrayView1<f64>) -> Result<&str> {
        if row.len() != self.categories.len() {
            return Err(OceanError::ShapeError {
                expected: format!("{} one-hot dimensions", self.categories.len()),
                actual: format!("{}", row.len()),
            });
        }

        let hot: Vec<usize> = row
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0.0)
            .map(|(i, _)| i)
            .collect();

        match hot.as_slice() {
            [idx] if row[*idx] == 1.0 => Ok(&self.categories[*idx]),
            _ => Err(OceanError::DataError(format!(
                "row is not a valid one-hot vector for '{}'",
                self.column
            ))),
        }
    }

    /// Categories in index order
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Fit-time frequency of each category, in index order
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// Output dimension names, `country_US` style
    pub fn feature_names(&self) -> Vec<String> {
        self.categories
            .iter()
            .map(|cat| format!("{}_{}", self.column, cat))
            .collect()
    }

    pub fn n_categories(&self) -> usize {
        self.categories.len()
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .categories
            .iter()
            .enumerate()
            .map(|(i, cat)| (cat.clone(), i))
            .collect();
    }

    fn string_values(&self, df: &DataFrame) -> Result<Vec<String>> {
        let column = df
            .column(&self.column)
            .map_err(|_| OceanError::FeatureNotFound(self.column.clone()))?;
        let series = column.as_materialized_series().cast(&DataType::String)?;

        series
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, opt)| {
                opt.map(|s| s.to_string()).ok_or_else(|| {
                    OceanError::DataError(format!(
                        "missing value in categorical column '{}' at row {}",
                        self.column, row
                    ))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn countries() -> DataFrame {
        df!("country" => &["GB", "US", "FR", "US", "GB", "US", "DE"]).unwrap()
    }

    #[test]
    fn test_frequency_order_with_first_seen_ties() {
        let mut encoder = OneHotEncoder::new("country");
        encoder.fit(&countries()).unwrap();

        // US x3, GB x2, then FR and DE once each in first-seen order
        assert_eq!(encoder.categories(), &["US", "GB", "FR", "DE"]);
        assert_eq!(encoder.counts(), &[3, 2, 1, 1]);
    }

    #[test]
    fn test_onehot_rows_have_single_one() {
        let mut encoder = OneHotEncoder::new("country");
        let encoded = encoder.fit_transform(&countries()).unwrap();

        assert_eq!(encoded.dim(), (7, 4));
        for row in encoded.rows() {
            assert_eq!(row.iter().filter(|&&v| v == 1.0).count(), 1);
            assert_eq!(row.iter().filter(|&&v| v == 0.0).count(), 3);
        }
    }

    #[test]
    fn test_decode_round_trip() {
        let df = countries();
        let mut encoder = OneHotEncoder::new("country");
        let encoded = encoder.fit_transform(&df).unwrap();

        let original = df.column("country").unwrap().str().unwrap().clone();
        for (i, row) in encoded.rows().into_iter().enumerate() {
            assert_eq!(Some(encoder.decode(row).unwrap()), original.get(i));
        }
    }

    #[test]
    fn test_decode_rejects_invalid_rows() {
        let mut encoder = OneHotEncoder::new("country");
        encoder.fit(&countries()).unwrap();

        let two_hot = ndarray::array![1.0, 1.0, 0.0, 0.0];
        assert!(encoder.decode(two_hot.view()).is_err());
        let none_hot = ndarray::array![0.0, 0.0, 0.0, 0.0];
        assert!(encoder.decode(none_hot.view()).is_err());
    }

    #[test]
    fn test_unknown_category_is_fatal() {
        let mut encoder = OneHotEncoder::new("country");
        encoder.fit(&countries()).unwrap();

        let unseen = df!("country" => &["US", "JP"]).unwrap();
        let err = encoder.transform(&unseen).unwrap_err();
        assert!(matches!(err, OceanError::UnknownCategory { ref value, .. } if value == "JP"));
    }

    #[test]
    fn test_null_category_is_rejected() {
        let df = DataFrame::new(vec![Column::new("country".into(), &[Some("US"), None])]).unwrap();
        let mut encoder = OneHotEncoder::new("country");
        assert!(encoder.fit(&df).is_err());
    }

    #[test]
    fn test_feature_names() {
        let mut encoder = OneHotEncoder::new("country");
        encoder.fit(&countries()).unwrap();
        assert_eq!(encoder.feature_names()[0], "country_US");
    }
}
