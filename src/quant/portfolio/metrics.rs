//! # Portfolio Metrics
//!
//! $$
//! \mu_p = \mathbf{w}^\top \boldsymbol{\mu}, \qquad \sigma_p = \sqrt{\mathbf{w}^\top \Sigma \mathbf{w}}
//! $$
//!
//! Return and risk of a weight vector against expected returns and a covariance matrix.

use crate::error::Error;
use crate::error::Result;

/// Variances down to this value are treated as floating-point noise around zero.
pub(crate) const VARIANCE_CLAMP: f64 = 1e-12;

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
  a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

pub(crate) fn mat_vec_mul(mat: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
  mat
    .iter()
    .map(|row| row.iter().zip(v.iter()).map(|(a, b)| a * b).sum())
    .collect()
}

/// Check that `cov` is square.
pub(crate) fn check_square(cov: &[Vec<f64>]) -> Result<()> {
  let rows = cov.len();
  for (row, values) in cov.iter().enumerate() {
    if values.len() != rows {
      return Err(Error::NonSquareCovariance {
        rows,
        row,
        cols: values.len(),
      });
    }
  }
  Ok(())
}

/// Uniform allocation `1/n` per asset.
pub fn uniform_weights(n: usize) -> Vec<f64> {
  if n == 0 {
    return Vec::new();
  }
  vec![1.0 / n as f64; n]
}

/// Expected portfolio return `w · er`.
pub fn portfolio_return(weights: &[f64], expected_returns: &[f64]) -> Result<f64> {
  if expected_returns.is_empty() {
    return Err(Error::EmptyInput("expected returns"));
  }
  if weights.len() != expected_returns.len() {
    return Err(Error::DimensionMismatch {
      what: "weights",
      expected: expected_returns.len(),
      actual: weights.len(),
    });
  }
  Ok(dot(weights, expected_returns))
}

/// Portfolio variance `wᵀ Σ w`, clamped at zero for round-off negatives.
pub fn portfolio_variance(weights: &[f64], cov: &[Vec<f64>]) -> Result<f64> {
  if cov.is_empty() {
    return Err(Error::EmptyInput("covariance matrix"));
  }
  check_square(cov)?;
  if weights.len() != cov.len() {
    return Err(Error::DimensionMismatch {
      what: "weights",
      expected: cov.len(),
      actual: weights.len(),
    });
  }

  let variance = dot(weights, &mat_vec_mul(cov, weights));
  if variance < -VARIANCE_CLAMP {
    return Err(Error::InvalidInput(format!(
      "negative portfolio variance {variance:.3e}; covariance matrix is not positive semidefinite"
    )));
  }
  Ok(variance.max(0.0))
}

/// Portfolio volatility `sqrt(wᵀ Σ w)`.
pub fn portfolio_volatility(weights: &[f64], cov: &[Vec<f64>]) -> Result<f64> {
  portfolio_variance(weights, cov).map(f64::sqrt)
}
