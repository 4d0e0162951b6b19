//! End-to-end run: load → clean → transform → split → train → evaluate

mod config;
mod report;

pub use config::{FitScope, PipelineConfig};
pub use report::PipelineReport;

use crate::error::Result;
use crate::preprocessing::{DataPreprocessor, PreparedData};
use crate::survey;
use crate::training::{
    ClassificationMetrics, FittedClassifier, RandomSplitter, SplitIndices, TrainEngine,
};
use crate::utils::DataLoader;
use polars::prelude::*;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Runs every stage exactly once over one dataset
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Loader configured with this pipeline's delimiter
    pub fn loader(&self) -> Result<DataLoader> {
        Ok(DataLoader::new().with_delimiter(self.config.delimiter_byte()?))
    }

    /// Load a survey export from disk and run it
    pub fn run(&self, path: impl AsRef<Path>) -> Result<PipelineReport> {
        let df = self.loader()?.load(path.as_ref())?;
        info!(
            path = %path.as_ref().display(),
            rows = df.height(),
            cols = df.width(),
            "Loaded survey data"
        );
        self.run_frame(&df)
    }

    /// Run every stage on an already loaded frame
    pub fn run_frame(&self, df: &DataFrame) -> Result<PipelineReport> {
        let start = Instant::now();
        let config = &self.config;

        survey::validate_columns(df, &config.categorical_column, &config.feature_columns)?;

        let mut preprocessor = DataPreprocessor::new(
            config.preprocessing.clone(),
            config.categorical_column.clone(),
            config.feature_columns.clone(),
            config.target_column.clone(),
        )?;
        let splitter = RandomSplitter::from_config(&config.split)?;

        let (split, train, test) = match config.fit_scope {
            FitScope::Global => {
                let prepared = preprocessor.fit_transform(df)?;
                let split = splitter.split(prepared.n_rows());
                split.ensure_non_empty()?;
                let train = prepared.select_rows(&split.train);
                let test = prepared.select_rows(&split.test);
                (split, train, test)
            }
            FitScope::TrainOnly => {
                let split = splitter.split(df.height());
                split.ensure_non_empty()?;
                let (train_df, test_df) = partition_frame(df, &split)?;
                let train = preprocessor.fit_transform(&train_df)?;
                let test = preprocessor.transform(&test_df)?;
                (split, train, test)
            }
        };
        info!(
            train_rows = split.train.len(),
            test_rows = split.test.len(),
            features = train.features.ncols(),
            "Split dataset"
        );

        let classifier = TrainEngine::new(config.training.clone())
            .fit(&train.features, &train.labels)?;
        let metrics = classifier.evaluate(test.features.view(), &test.labels)?;
        info!(
            accuracy = metrics.accuracy,
            correct = metrics.n_correct,
            total = metrics.n_total,
            "Evaluated on test partition"
        );

        Ok(build_report(
            config,
            df.height(),
            &split,
            &preprocessor,
            &train,
            &classifier,
            &metrics,
            start.elapsed().as_secs_f64(),
        ))
    }
}

/// Split a raw frame by the drawn row indices, keeping row order
fn partition_frame(df: &DataFrame, split: &SplitIndices) -> Result<(DataFrame, DataFrame)> {
    let mask = split.train_mask();
    let train_mask: BooleanChunked = mask.iter().copied().collect();
    let test_mask: BooleanChunked = mask.iter().map(|m| !m).collect();
    Ok((df.filter(&train_mask)?, df.filter(&test_mask)?))
}

#[allow(clippy::too_many_arguments)]
fn build_report(
    config: &PipelineConfig,
    total_rows: usize,
    split: &SplitIndices,
    preprocessor: &DataPreprocessor,
    train: &PreparedData,
    classifier: &FittedClassifier,
    metrics: &ClassificationMetrics,
    elapsed_secs: f64,
) -> PipelineReport {
    let skew = preprocessor.skew_corrector();
    PipelineReport {
        total_rows,
        train_rows: split.train.len(),
        test_rows: split.test.len(),
        fit_scope: config.fit_scope,
        seed: config.split.seed,
        target_column: config.target_column.clone(),
        fill_values: preprocessor.imputer().fill_values().to_vec(),
        skewness: skew.column_skew().to_vec(),
        skewed_columns: skew.skewed_columns().map(str::to_string).collect(),
        categories: preprocessor.encoder().categories().to_vec(),
        feature_names: train.feature_names.clone(),
        classes: classifier.classes.labels().to_vec(),
        iterations: classifier.model.n_iter,
        converged: classifier.model.converged,
        final_loss: classifier.model.final_loss,
        accuracy: metrics.accuracy,
        n_correct: metrics.n_correct,
        elapsed_secs,
    }
}
