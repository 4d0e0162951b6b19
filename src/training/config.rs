//! Classifier training configuration

use serde::{Deserialize, Serialize};

/// Hyperparameters for the multinomial logistic regression solver
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Iteration cap for gradient descent
    pub max_iter: usize,
    /// Relative loss change that counts as converged
    pub tol: f64,
    /// Initial step size, halved whenever the loss goes up
    pub learning_rate: f64,
    /// L2 regularization strength
    pub alpha: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            max_iter: 300,
            tol: 1e-6,
            learning_rate: 0.5,
            alpha: 0.0,
        }
    }
}

impl TrainingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
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
}
