//! Run report

use crate::error::Result;
use crate::preprocessing::{ColumnSkew, FillValue};
use serde::{Deserialize, Serialize};
use std::path::Path;
use super::FitScope;

/// Everything a run decided and measured
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub total_rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub fit_scope: FitScope,
    pub seed: Option<u64>,
    pub target_column: String,
    /// Imputation value per numeric column
    pub fill_values: Vec<FillValue>,
    /// Skewness per numeric column and whether it was log-transformed
    pub skewness: Vec<ColumnSkew>,
    pub skewed_columns: Vec<String>,
    /// Category index of the categorical column
    pub categories: Vec<String>,
    pub feature_names: Vec<String>,
    /// Label values, in class-index order
    pub classes: Vec<i64>,
    pub iterations: usize,
    pub converged: bool,
    pub final_loss: Option<f64>,
    pub accuracy: f64,
    pub n_correct: usize,
    pub elapsed_secs: f64,
}

impl PipelineReport {
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// The single result line, `Accuracy = 0.979021`
    pub fn accuracy_line(&self) -> String {
        format!("Accuracy = {}", format_general(self.accuracy))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// `%g` style: six significant digits, trailing zeros removed, exponent form
/// below 1e-4 or from 1e6 up
fn format_general(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return value.to_string();
    }

    // Rounding to six digits first can bump the exponent (9.999999e-5 -> 1e-4)
    let sci = format!("{:.5e}", value);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return sci;
    };

    if exp < -4 || exp >= 6 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_zeros(mantissa), sign, exp.abs())
    } else {
        let digits = (5 - exp).max(0) as usize;
        trim_zeros(&format!("{:.*}", digits, value)).to_string()
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
