//! Survey preprocessing pipeline

use crate::error::{OceanError, Result};
use super::{
    assembler::VectorAssembler,
    caster::TypeNormalizer,
    config::PreprocessingConfig,
    encoder::OneHotEncoder,
    imputer::Imputer,
    transforms::SkewCorrector,
};
use ndarray::{Array2, Axis};
use polars::prelude::*;
use std::time::Instant;
use tracing::{debug, info};

/// Feature matrix and labels ready for training
#[derive(Debug, Clone)]
pub struct PreparedData {
    /// One row per respondent
    pub features: Array2<f64>,
    /// Target item truncated to an integer class
    pub labels: Vec<i64>,
    /// Name of each feature dimension
    pub feature_names: Vec<String>,
}

impl PreparedData {
    pub fn n_rows(&self) -> usize {
        self.features.nrows()
    }

    /// Subset of rows, in the order given
    pub fn select_rows(&self, rows: &[usize]) -> PreparedData {
        PreparedData {
            features: self.features.select(Axis(0), rows),
            labels: rows.iter().map(|&i| self.labels[i]).collect(),
            feature_names: self.feature_names.clone(),
        }
    }
}

/// Cast, impute, skew-correct, encode and assemble in one fitted unit.
///
/// `fit` learns the column means, the skewed column set and the category
/// index; `transform` replays them on any frame with the same columns.
#[derive(Debug, Clone)]
pub struct DataPreprocessor {
    config: PreprocessingConfig,
    categorical_column: String,
    numeric_columns: Vec<String>,
    target_column: String,
    normalizer: TypeNormalizer,
    imputer: Imputer,
    skew: SkewCorrector,
    encoder: OneHotEncoder,
    assembler: VectorAssembler,
    is_fitted: bool,
    /// Seconds spent in the last fit call
    fit_time: Option<f64>,
}

impl DataPreprocessor {
    pub fn new(
        config: PreprocessingConfig,
        categorical_column: impl Into<String>,
        numeric_columns: Vec<String>,
        target_column: impl Into<String>,
    ) -> Result<Self> {
        let categorical_column = categorical_column.into();
        let target_column = target_column.into();

        if !numeric_columns.contains(&target_column) {
            return Err(OceanError::ConfigError(format!(
                "target '{}' must be one of the numeric columns",
                target_column
            )));
        }

        let assembled: Vec<String> = if config.exclude_target_from_features {
            numeric_columns
                .iter()
                .filter(|c| **c != target_column)
                .cloned()
                .collect()
        } else {
            numeric_columns.clone()
        };

        Ok(Self {
            normalizer: TypeNormalizer::new(numeric_columns.clone()),
            imputer: Imputer::new(config.impute_strategy),
            skew: SkewCorrector::new(config.skew_threshold),
            encoder: OneHotEncoder::new(categorical_column.clone()),
            assembler: VectorAssembler::new(assembled),
            config,
            categorical_column,
            numeric_columns,
            target_column,
            is_fitted: false,
            fit_time: None,
        })
    }

    /// Learn imputation values, skewed columns and the category index
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        let start = Instant::now();

        let cast = self.normalizer.transform(df)?;
        let imputed = self.imputer.fit_transform(&cast, &self.numeric_columns)?;
        debug!(columns = self.numeric_columns.len(), "Fitted imputer");

        self.skew.fit(&imputed, &self.numeric_columns)?;
        for col in self.skew.column_skew().iter().filter(|c| c.transformed) {
            info!(
                column = %col.column,
                skewness = col.skewness.unwrap_or_default(),
                "Column exceeds skew threshold, applying log1p"
            );
        }

        self.encoder.fit(&imputed)?;
        info!(
            column = %self.categorical_column,
            categories = self.encoder.n_categories(),
            "Indexed categorical column"
        );

        self.is_fitted = true;
        self.fit_time = Some(start.elapsed().as_secs_f64());
        Ok(self)
    }

    /// Produce the feature matrix and labels for a frame
    pub fn transform(&self, df: &DataFrame) -> Result<PreparedData> {
        if !self.is_fitted {
            return Err(OceanError::ModelNotFitted);
        }

        let cast = self.normalizer.transform(df)?;
        let imputed = self.imputer.transform(&cast)?;

        // Labels come from the imputed target before any log1p
        let labels: Vec<i64> = imputed
            .column(&self.target_column)?
            .f64()?
            .into_iter()
            .map(|v| v.map(|x| x.trunc() as i64))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| {
                OceanError::DataError(format!("null label in '{}'", self.target_column))
            })?;

        let corrected = self.skew.transform(&imputed)?;
        let one_hot = self.encoder.transform(&corrected)?;
        let features = self.assembler.assemble(&corrected, &one_hot)?;

        Ok(PreparedData {
            features,
            labels,
            feature_names: self.feature_names(),
        })
    }

    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<PreparedData> {
        self.fit(df)?;
        self.transform(df)
    }

    /// Names of the assembled dimensions
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = self.encoder.feature_names();
        names.extend(self.assembler.numeric_columns().iter().cloned());
        names
    }

    /// Width of the assembled feature vector
    pub fn n_features(&self) -> usize {
        self.assembler.output_width(self.encoder.n_categories())
    }

    pub fn config(&self) -> &PreprocessingConfig {
        &self.config
    }

    pub fn imputer(&self) -> &Imputer {
        &self.imputer
    }

    pub fn skew_corrector(&self) -> &SkewCorrector {
        &self.skew
    }

    pub fn encoder(&self) -> &OneHotEncoder {
        &self.encoder
    }

    pub fn target_column(&self) -> &str {
        &self.target_column
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    pub fn fit_time(&self) -> Option<f64> {
        self.fit_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("country".into(), &["US", "GB", "US", "FR"]),
            Column::new("q1".into(), &["1", "NULL", "5", "3"]),
            Column::new("q2".into(), &[Some(2i64), Some(2), None, Some(4)]),
        ])
        .unwrap()
    }

    fn preprocessor(config: PreprocessingConfig) -> DataPreprocessor {
        DataPreprocessor::new(config, "country", vec!["q1".into(), "q2".into()], "q1").unwrap()
    }

    #[test]
    fn test_fit_transform_shapes() {
        let mut pre = preprocessor(PreprocessingConfig::default());
        let data = pre.fit_transform(&small_frame()).unwrap();

        assert_eq!(data.features.dim(), (4, 3 + 2));
        assert_eq!(data.labels.len(), 4);
        assert_eq!(
            data.feature_names,
            vec!["country_US", "country_GB", "country_FR", "q1", "q2"]
        );
    }

    #[test]
    fn test_labels_use_imputed_mean() {
        let mut pre = preprocessor(PreprocessingConfig::default());
        let data = pre.fit_transform(&small_frame()).unwrap();

        // q1 mean over [1, 5, 3] = 3
        assert_eq!(data.labels, vec![1, 3, 5, 3]);
    }

    #[test]
    fn test_exclude_target() {
        let mut pre = preprocessor(PreprocessingConfig::default().with_exclude_target(true));
        let data = pre.fit_transform(&small_frame()).unwrap();

        assert_eq!(data.features.ncols(), 4);
        assert!(!data.feature_names.contains(&"q1".to_string()));
        assert_eq!(pre.n_features(), 4);
    }

    #[test]
    fn test_target_must_be_numeric() {
        let err = DataPreprocessor::new(
            PreprocessingConfig::default(),
            "country",
            vec!["q1".into()],
            "q9",
        )
        .unwrap_err();
        assert!(matches!(err, OceanError::ConfigError(_)));
    }

    #[test]
    fn test_transform_before_fit() {
        let pre = preprocessor(PreprocessingConfig::default());
        assert!(matches!(pre.transform(&small_frame()), Err(OceanError::ModelNotFitted)));
    }

    #[test]
    fn test_select_rows() {
        let mut pre = preprocessor(PreprocessingConfig::default());
        let data = pre.fit_transform(&small_frame()).unwrap();
        let subset = data.select_rows(&[2, 0]);

        assert_eq!(subset.n_rows(), 2);
        assert_eq!(subset.labels, vec![5, 1]);
        assert_eq!(subset.features.row(0), data.features.row(2));
    }
}
