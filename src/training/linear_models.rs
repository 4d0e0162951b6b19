//! Multinomial logistic regression

use crate::error::{OceanError, Result};
use super::TrainingConfig;
use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Standard deviations below this are treated as constant features
const MIN_SCALE: f64 = 1e-12;

/// Row-wise softmax with max subtraction for numerical stability
fn softmax_rows(mut logits: Array2<f64>) -> Array2<f64> {
    for mut row in logits.rows_mut() {
        let max = row.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        row /= sum;
    }
    logits
}

/// Mean negative log-likelihood of the true classes
fn cross_entropy(probs: &Array2<f64>, y: &[usize]) -> f64 {
    let total: f64 = y
        .iter()
        .enumerate()
        .map(|(i, &class)| -probs[[i, class]].max(1e-15).ln())
        .sum();
    total / y.len() as f64
}

/// Softmax classifier over `n_classes` contiguous class indices.
///
/// Features are standardized with training statistics before fitting; the
/// stored coefficients live in that standardized space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultinomialLogisticRegression {
    /// Fitted coefficients, `(n_features, n_classes)`
    pub coefficients: Option<Array2<f64>>,
    /// Fitted intercepts, one per class
    pub intercepts: Option<Array1<f64>>,
    feature_means: Option<Array1<f64>>,
    feature_scales: Option<Array1<f64>>,
    pub n_classes: usize,
    /// L2 regularization strength
    pub alpha: f64,
    pub max_iter: usize,
    pub tol: f64,
    pub learning_rate: f64,
    /// Iterations run by the last fit
    pub n_iter: usize,
    /// Loss at the last iteration
    pub final_loss: Option<f64>,
    pub converged: bool,
    pub is_fitted: bool,
}

impl Default for MultinomialLogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl MultinomialLogisticRegression {
    pub fn new() -> Self {
        Self::from_config(&TrainingConfig::default())
    }

    pub fn from_config(config: &TrainingConfig) -> Self {
        Self {
            coefficients: None,
            intercepts: None,
            feature_means: None,
            feature_scales: None,
            n_classes: 0,
            alpha: config.alpha,
            max_iter: config.max_iter,
            tol: config.tol,
            learning_rate: config.learning_rate,
            n_iter: 0,
            final_loss: None,
            converged: false,
            is_fitted: false,
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Fit with full-batch gradient descent on the mean cross-entropy.
    ///
    /// Hitting `max_iter` is not an error: the model keeps the last weights
    /// and `converged` stays `false`.
    pub fn fit(&mut self, x: &Array2<f64>, y: &[usize], n_classes: usize) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(OceanError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(OceanError::TrainingError("no training rows".to_string()));
        }
        if n_classes == 0 {
            return Err(OceanError::InvalidParameter {
                name: "n_classes".to_string(),
                value: "0".to_string(),
                reason: "need at least one class".to_string(),
            });
        }
        if let Some(&bad) = y.iter().find(|&&c| c >= n_classes) {
            return Err(OceanError::InvalidParameter {
                name: "y".to_string(),
                value: bad.to_string(),
                reason: format!("class index must be < {}", n_classes),
            });
        }

        let means = x.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(n_features));
        let scales = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s > MIN_SCALE { s } else { 1.0 });
        let xs = (x - &means) / &scales;

        let mut targets = Array2::<f64>::zeros((n_samples, n_classes));
        for (i, &class) in y.iter().enumerate() {
            targets[[i, class]] = 1.0;
        }

        let mut weights = Array2::<f64>::zeros((n_features, n_classes));
        let mut bias = Array1::<f64>::zeros(n_classes);
        let mut lr = self.learning_rate;
        let mut prev_loss = f64::INFINITY;
        let n = n_samples as f64;

        self.converged = false;
        self.n_iter = 0;

        for iter in 0..self.max_iter {
            let probs = softmax_rows(xs.dot(&weights) + &bias);
            let loss = cross_entropy(&probs, y)
                + 0.5 * self.alpha * weights.mapv(|w| w * w).sum();
            self.n_iter = iter + 1;

            if prev_loss.is_finite()
                && (prev_loss - loss).abs() <= self.tol * prev_loss.abs().max(1.0)
            {
                self.converged = true;
                prev_loss = loss;
                break;
            }
            if loss > prev_loss {
                lr *= 0.5;
                debug!(iteration = iter, learning_rate = lr, "Loss increased, halving step");
            }
            prev_loss = loss;

            let errors = &probs - &targets;
            let grad_w = xs.t().dot(&errors) / n + &weights * self.alpha;
            let grad_b = errors.sum_axis(Axis(0)) / n;

            weights.scaled_add(-lr, &grad_w);
            bias.scaled_add(-lr, &grad_b);
        }

        if !self.converged {
            warn!(
                iterations = self.n_iter,
                loss = prev_loss,
                "Logistic regression hit the iteration cap before converging"
            );
        }

        self.coefficients = Some(weights);
        self.intercepts = Some(bias);
        self.feature_means = Some(means);
        self.feature_scales = Some(scales);
        self.n_classes = n_classes;
        self.final_loss = Some(prev_loss);
        self.is_fitted = true;

        Ok(self)
    }

    /// Class probabilities, `(n_samples, n_classes)`, rows sum to 1
    pub fn predict_proba(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        let (Some(weights), Some(bias), Some(means), Some(scales)) = (
            self.coefficients.as_ref(),
            self.intercepts.as_ref(),
            self.feature_means.as_ref(),
            self.feature_scales.as_ref(),
        ) else {
            return Err(OceanError::ModelNotFitted);
        };

        if x.ncols() != weights.nrows() {
            return Err(OceanError::ShapeError {
                expected: format!("{} features", weights.nrows()),
                actual: format!("{} features", x.ncols()),
            });
        }

        let xs = (&x - means) / scales;
        Ok(softmax_rows(xs.dot(weights) + bias))
    }

    /// Most probable class index per row
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Vec<usize>> {
        let proba = self.predict_proba(x)?;
        Ok(proba
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .fold((0, f64::NEG_INFINITY), |best, (i, &p)| {
                        if p > best.1 { (i, p) } else { best }
                    })
                    .0
            })
            .collect())
    }

    /// Fraction of rows whose predicted class matches `y`; zero rows is an error
    pub fn score(&self, x: ArrayView2<f64>, y: &[usize]) -> Result<f64> {
        if x.nrows() != y.len() {
            return Err(OceanError::ShapeError {
                expected: format!("{} labels", x.nrows()),
                actual: format!("{} labels", y.len()),
            });
        }
        if y.is_empty() {
            return Err(OceanError::DataError(
                "cannot compute accuracy over zero rows".to_string(),
            ));
        }
        let y_pred = self.predict(x)?;
        let correct = y_pred.iter().zip(y).filter(|(p, t)| p == t).count();
        Ok(correct as f64 / y.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn three_blobs() -> (Array2<f64>, Vec<usize>) {
        let centers = [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)];
        let offsets = [(-0.5, 0.2), (0.3, -0.4), (0.1, 0.6), (-0.2, -0.3), (0.4, 0.1)];
        let mut rows = Vec::new();
        let mut y = Vec::new();
        for (class, (cx, cy)) in centers.iter().enumerate() {
            for (dx, dy) in offsets {
                rows.push(cx + dx);
                rows.push(cy + dy);
                y.push(class);
            }
        }
        (Array2::from_shape_vec((y.len(), 2), rows).unwrap(), y)
    }

    #[test]
    fn test_separable_three_classes() {
        let (x, y) = three_blobs();
        let mut model = MultinomialLogisticRegression::new().with_max_iter(500);
        model.fit(&x, &y, 3).unwrap();

        assert!(model.is_fitted);
        let accuracy = model.score(x.view(), &y).unwrap();
        assert!(accuracy >= 0.9, "Accuracy should be >= 0.9, got {}", accuracy);
    }

    #[test]
    fn test_predict_proba_rows_sum_to_one() {
        let (x, y) = three_blobs();
        let mut model = MultinomialLogisticRegression::new().with_max_iter(50);
        model.fit(&x, &y, 3).unwrap();

        let proba = model.predict_proba(x.view()).unwrap();
        assert_eq!(proba.dim(), (15, 3));
        for row in proba.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-9);
            assert!(row.iter().all(|&p| (0.0..=1.0).contains(&p)));
        }
    }

    #[test]
    fn test_iteration_cap_is_not_an_error() {
        let (x, y) = three_blobs();
        let mut model = MultinomialLogisticRegression::new().with_max_iter(2);
        model.fit(&x, &y, 3).unwrap();

        assert!(model.is_fitted);
        assert!(!model.converged);
        assert_eq!(model.n_iter, 2);
    }

    #[test]
    fn test_constant_feature_is_harmless() {
        let x = array![[1.0, 0.0], [1.0, 1.0], [1.0, 5.0], [1.0, 6.0]];
        let y = vec![0, 0, 1, 1];
        let mut model = MultinomialLogisticRegression::new();
        model.fit(&x, &y, 2).unwrap();

        let proba = model.predict_proba(x.view()).unwrap();
        assert!(proba.iter().all(|p| p.is_finite()));
        assert_eq!(model.predict(x.view()).unwrap(), vec![0, 0, 1, 1]);
    }

    #[test]
    fn test_rejects_bad_labels() {
        let x = array![[1.0], [2.0]];
        let mut model = MultinomialLogisticRegression::new();
        assert!(model.fit(&x, &[0, 3], 2).is_err());
        assert!(model.fit(&x, &[0], 2).is_err());
    }

    #[test]
    fn test_score_on_empty_input_is_error() {
        let (x, y) = three_blobs();
        let mut model = MultinomialLogisticRegression::new().with_max_iter(50);
        model.fit(&x, &y, 3).unwrap();

        let empty = Array2::<f64>::zeros((0, 2));
        assert!(matches!(model.score(empty.view(), &[]), Err(OceanError::DataError(_))));
        assert!(matches!(model.score(x.view(), &y[..3]), Err(OceanError::ShapeError { .. })));
    }

    #[test]
    fn test_l2_penalty_shrinks_coefficients() {
        let (x, y) = three_blobs();
        let norm = |m: &MultinomialLogisticRegression| {
            m.coefficients.as_ref().unwrap().mapv(|w| w * w).sum()
        };

        let mut plain = MultinomialLogisticRegression::new().with_max_iter(200);
        plain.fit(&x, &y, 3).unwrap();
        let mut ridge = MultinomialLogisticRegression::new()
            .with_max_iter(200)
            .with_alpha(1.0);
        ridge.fit(&x, &y, 3).unwrap();

        assert_eq!(ridge.alpha, 1.0);
        assert!(norm(&ridge) < norm(&plain));
    }

    #[test]
    fn test_smaller_step_moves_less() {
        let (x, y) = three_blobs();
        let mut model = MultinomialLogisticRegression::new()
            .with_max_iter(5)
            .with_learning_rate(0.01);
        model.fit(&x, &y, 3).unwrap();

        let mut fast = MultinomialLogisticRegression::new().with_max_iter(5);
        fast.fit(&x, &y, 3).unwrap();

        assert_eq!(model.learning_rate, 0.01);
        assert!(model.final_loss.unwrap() > fast.final_loss.unwrap());
    }

    #[test]
    fn test_predict_before_fit() {
        let model = MultinomialLogisticRegression::new();
        let x = array![[1.0]];
        assert!(matches!(model.predict(x.view()), Err(OceanError::ModelNotFitted)));
    }

    #[test]
    fn test_feature_count_mismatch() {
        let (x, y) = three_blobs();
        let mut model = MultinomialLogisticRegression::new().with_max_iter(5);
        model.fit(&x, &y, 3).unwrap();

        let wrong = array![[1.0, 2.0, 3.0]];
        assert!(matches!(
            model.predict_proba(wrong.view()),
            Err(OceanError::ShapeError { .. })
        ));
    }
}
