//! Ordinary least squares with the intercept fixed at zero.
//!
//! Solves the normal equations `(XᵀX) β = Xᵀy` by Gaussian elimination with
//! partial pivoting. The system is first rescaled to a unit diagonal, so each
//! pivot is measured against its own column and the price level of the
//! series does not affect the rank check. A vanishing pivot means the
//! training matrix is rank-deficient.

use super::errors::PipelineError;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Pivots of the unit-diagonal system at or below this are treated as zero.
const RANK_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZeroInterceptOls {
    coefficients: Vec<f64>,
}

impl ZeroInterceptOls {
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>) -> Result<Self, PipelineError> {
        if x.nrows() != y.len() {
            return Err(PipelineError::DimensionMismatch {
                expected: x.nrows(),
                got: y.len(),
            });
        }
        if x.nrows() < x.ncols() {
            return Err(PipelineError::NumericalDegeneracy {
                reason: format!(
                    "{} training rows cannot determine {} coefficients",
                    x.nrows(),
                    x.ncols()
                ),
            });
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(PipelineError::NumericalDegeneracy {
                reason: "training data contains non-finite values".to_string(),
            });
        }

        let xt = x.t();
        let xtx = xt.dot(x);
        let xty = xt.dot(y);

        let beta = solve_normal_equations(xtx, xty)?;
        Ok(Self {
            coefficients: beta.to_vec(),
        })
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, PipelineError> {
        if x.ncols() != self.coefficients.len() {
            return Err(PipelineError::DimensionMismatch {
                expected: self.coefficients.len(),
                got: x.ncols(),
            });
        }
        let beta = Array1::from(self.coefficients.clone());
        Ok(x.dot(&beta))
    }
}

fn solve_normal_equations(
    mut a: Array2<f64>,
    mut b: Array1<f64>,
) -> Result<Array1<f64>, PipelineError> {
    let n = a.nrows();

    // Jacobi scaling: D^-1/2 A D^-1/2 has a unit diagonal
    let mut scale = Array1::<f64>::zeros(n);
    for i in 0..n {
        let diag = a[[i, i]];
        if diag <= 0.0 {
            return Err(PipelineError::NumericalDegeneracy {
                reason: format!("feature column {} is zero", i),
            });
        }
        scale[i] = diag.sqrt().recip();
    }
    for i in 0..n {
        for j in 0..n {
            a[[i, j]] *= scale[i] * scale[j];
        }
        b[i] *= scale[i];
    }

    // Forward elimination
    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))
            .unwrap_or(col);
        if a[[pivot_row, col]].abs() <= RANK_TOLERANCE {
            return Err(PipelineError::NumericalDegeneracy {
                reason: format!("feature column {} is linearly dependent", col),
            });
        }
        if pivot_row != col {
            for k in 0..n {
                a.swap([col, k], [pivot_row, k]);
            }
            b.swap(col, pivot_row);
        }

        for row in (col + 1)..n {
            let factor = a[[row, col]] / a[[col, col]];
            for k in col..n {
                a[[row, k]] -= factor * a[[col, k]];
            }
            b[row] -= factor * b[col];
        }
    }

    // Back substitution
    let mut beta = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum -= a[[i, j]] * beta[j];
        }
        beta[i] = sum / a[[i, i]];
    }

    Ok(beta * &scale)
}
