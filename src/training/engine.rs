//! Training engine: label remapping, fitting and evaluation

use crate::error::{OceanError, Result};
use super::{
    accuracy, ClassIndex, ClassificationMetrics, MultinomialLogisticRegression, TrainingConfig,
};
use ndarray::{Array2, ArrayView2};
use std::time::Instant;
use tracing::info;

/// Fits a classifier on integer survey labels
#[derive(Debug, Clone)]
pub struct TrainEngine {
    config: TrainingConfig,
}

impl TrainEngine {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Remap labels to class indices and fit the model
    pub fn fit(&self, x: &Array2<f64>, labels: &[i64]) -> Result<FittedClassifier> {
        if x.nrows() == 0 {
            return Err(OceanError::EmptySplit {
                partition: "training".to_string(),
                total_rows: 0,
            });
        }

        let start = Instant::now();
        let classes = ClassIndex::fit(labels);
        let y: Vec<usize> = labels
            .iter()
            .map(|&l| classes.encode(l).ok_or_else(|| {
                OceanError::TrainingError(format!("label {} missing from class index", l))
            }))
            .collect::<Result<_>>()?;

        let mut model = MultinomialLogisticRegression::from_config(&self.config);
        model.fit(x, &y, classes.len())?;

        let training_time_secs = start.elapsed().as_secs_f64();
        info!(
            rows = x.nrows(),
            features = x.ncols(),
            classes = classes.len(),
            iterations = model.n_iter,
            converged = model.converged,
            secs = training_time_secs,
            "Trained multinomial logistic regression"
        );

        Ok(FittedClassifier {
            classes,
            model,
            training_time_secs,
        })
    }
}

/// A fitted model together with its label mapping
#[derive(Debug, Clone)]
pub struct FittedClassifier {
    pub classes: ClassIndex,
    pub model: MultinomialLogisticRegression,
    pub training_time_secs: f64,
}

impl FittedClassifier {
    /// Predicted survey answer per row
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Vec<i64>> {
        self.model
            .predict(x)?
            .into_iter()
            .map(|class| {
                self.classes.decode(class).ok_or_else(|| {
                    OceanError::TrainingError(format!("class {} out of range", class))
                })
            })
            .collect()
    }

    /// Class probabilities, columns ordered as `classes.labels()`
    pub fn predict_proba(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        self.model.predict_proba(x)
    }

    /// Score a labelled partition; an empty partition is an error
    pub fn evaluate(&self, x: ArrayView2<f64>, labels: &[i64]) -> Result<ClassificationMetrics> {
        if x.nrows() == 0 {
            return Err(OceanError::EmptySplit {
                partition: "test".to_string(),
                total_rows: 0,
            });
        }
        let predicted = self.predict(x)?;
        accuracy(labels, &predicted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_labels_round_trip_through_classes() {
        let x = array![[1.0], [1.2], [5.0], [5.3], [9.0], [9.1]];
        let labels = vec![2, 2, 4, 4, 5, 5];

        let fitted = TrainEngine::new(TrainingConfig::default().with_max_iter(1000))
            .fit(&x, &labels)
            .unwrap();

        assert_eq!(fitted.classes.labels(), &[2, 4, 5]);
        let predicted = fitted.predict(x.view()).unwrap();
        assert!(predicted.iter().all(|p| [2, 4, 5].contains(p)));
        assert_eq!(fitted.predict_proba(x.view()).unwrap().ncols(), 3);
    }

    #[test]
    fn test_empty_training_set() {
        let x = Array2::<f64>::zeros((0, 3));
        let err = TrainEngine::new(TrainingConfig::default()).fit(&x, &[]).unwrap_err();
        assert!(matches!(err, OceanError::EmptySplit { .. }));
    }

    #[test]
    fn test_empty_test_set() {
        let x = array![[0.0], [1.0]];
        let fitted = TrainEngine::new(TrainingConfig::default()).fit(&x, &[1, 2]).unwrap();
        let empty = Array2::<f64>::zeros((0, 1));
        let err = fitted.evaluate(empty.view(), &[]).unwrap_err();
        assert!(matches!(err, OceanError::EmptySplit { ref partition, .. } if partition == "test"));
    }
}
