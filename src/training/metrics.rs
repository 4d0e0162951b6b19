//! Evaluation metrics

use crate::error::{OceanError, Result};
use serde::{Deserialize, Serialize};

/// Classification outcome on a scored partition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub accuracy: f64,
    pub n_correct: usize,
    pub n_total: usize,
}

/// `correct / total` over paired labels.
///
/// An empty input is an error rather than a vacuous 0/0.
pub fn accuracy(y_true: &[i64], y_pred: &[i64]) -> Result<ClassificationMetrics> {
    if y_true.len() != y_pred.len() {
        return Err(OceanError::ShapeError {
            expected: format!("{} predictions", y_true.len()),
            actual: format!("{}", y_pred.len()),
        });
    }
    if y_true.is_empty() {
        return Err(OceanError::DataError(
            "cannot compute accuracy over zero rows".to_string(),
        ));
    }

    let n_correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    Ok(ClassificationMetrics {
        accuracy: n_correct as f64 / y_true.len() as f64,
        n_correct,
        n_total: y_true.len(),
    })
}
