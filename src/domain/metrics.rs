use super::errors::PipelineError;
use serde::{Deserialize, Serialize};

/// Out-of-sample error summary for a set of predictions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub rmse: f64,
    pub r2: f64,
    pub mae: f64,
    pub n_samples: usize,
}

impl RegressionMetrics {
    pub fn calculate(y_true: &[f64], y_pred: &[f64]) -> Result<Self, PipelineError> {
        if y_true.len() != y_pred.len() {
            return Err(PipelineError::DimensionMismatch {
                expected: y_true.len(),
                got: y_pred.len(),
            });
        }
        if y_true.is_empty() {
            return Err(PipelineError::DimensionMismatch {
                expected: 1,
                got: 0,
            });
        }

        Ok(Self {
            rmse: root_mean_squared_error(y_true, y_pred),
            r2: r_squared(y_true, y_pred),
            mae: mean_absolute_error(y_true, y_pred),
            n_samples: y_true.len(),
        })
    }
}

pub fn root_mean_squared_error(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let sq_err: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    (sq_err / y_true.len() as f64).sqrt()
}

pub fn mean_absolute_error(y_true: &[f64], y_pred: &[f64]) -> f64 {
    y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).abs())
        .sum::<f64>()
        / y_true.len() as f64
}

/// R² = 1 - SS_res / SS_tot.
///
/// A perfect fit scores exactly 1, even on a constant target. A constant
/// target that is not matched exactly scores 0.
pub fn r_squared(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    if ss_res == 0.0 {
        return 1.0;
    }

    let mean = y_true.iter().sum::<f64>() / y_true.len() as f64;
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return 0.0;
    }

    1.0 - ss_res / ss_tot
}
