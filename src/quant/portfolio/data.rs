//! # Portfolio Data Utilities
//!
//! $$
//! \hat\Sigma_{ij} = \frac{1}{T-1}\sum_{t=1}^{T}(r_{it}-\bar r_i)(r_{jt}-\bar r_j)
//! $$
//!
//! Named return tables and the estimators that turn them into optimizer inputs.

use std::collections::HashSet;

use crate::error::Error;
use crate::error::Result;
use crate::quant::risk::annualize_rets;

/// A statistic attached to the column it was computed from.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedValue {
  pub name: String,
  pub value: f64,
}

/// Aligned per-period returns for a set of named assets, one column per asset.
#[derive(Clone, Debug)]
pub struct ReturnTable {
  names: Vec<String>,
  columns: Vec<Vec<f64>>,
}

fn sample_mean(xs: &[f64]) -> f64 {
  if xs.is_empty() {
    0.0
  } else {
    xs.iter().sum::<f64>() / xs.len() as f64
  }
}

impl ReturnTable {
  /// Build a table; every column must have the same, non-zero length and finite values.
  pub fn new<S: Into<String>>(names: Vec<S>, columns: Vec<Vec<f64>>) -> Result<Self> {
    let names: Vec<String> = names.into_iter().map(Into::into).collect();
    if columns.is_empty() {
      return Err(Error::EmptyInput("return table"));
    }
    if names.len() != columns.len() {
      return Err(Error::DimensionMismatch {
        what: "column names",
        expected: columns.len(),
        actual: names.len(),
      });
    }

    let mut seen = HashSet::new();
    for name in &names {
      if !seen.insert(name.as_str()) {
        return Err(Error::InvalidInput(format!("duplicate column name '{name}'")));
      }
    }

    let n_periods = columns[0].len();
    if n_periods == 0 {
      return Err(Error::EmptyInput("return series"));
    }
    for (name, col) in names.iter().zip(columns.iter()) {
      if col.len() != n_periods {
        return Err(Error::DimensionMismatch {
          what: "return series length",
          expected: n_periods,
          actual: col.len(),
        });
      }
      if col.iter().any(|r| !r.is_finite()) {
        return Err(Error::InvalidInput(format!("non-finite return in '{name}'")));
      }
    }

    Ok(Self { names, columns })
  }

  pub fn names(&self) -> &[String] {
    &self.names
  }

  pub fn columns(&self) -> &[Vec<f64>] {
    &self.columns
  }

  pub fn n_assets(&self) -> usize {
    self.columns.len()
  }

  pub fn n_periods(&self) -> usize {
    self.columns[0].len()
  }

  /// Column by name.
  pub fn column(&self, name: &str) -> Option<&[f64]> {
    self
      .names
      .iter()
      .position(|n| n == name)
      .map(|i| self.columns[i].as_slice())
  }

  /// Sub-table with the given columns, in the given order.
  pub fn select(&self, names: &[&str]) -> Result<Self> {
    let mut columns = Vec::with_capacity(names.len());
    for name in names {
      let col = self
        .column(name)
        .ok_or_else(|| Error::InvalidInput(format!("unknown column '{name}'")))?;
      columns.push(col.to_vec());
    }
    Self::new(names.to_vec(), columns)
  }

  /// Apply a single-series statistic to every column.
  pub fn aggregate<F>(&self, f: F) -> Result<Vec<NamedValue>>
  where
    F: Fn(&[f64]) -> Result<f64>,
  {
    self
      .names
      .iter()
      .zip(self.columns.iter())
      .map(|(name, col)| {
        Ok(NamedValue {
          name: name.clone(),
          value: f(col)?,
        })
      })
      .collect()
  }

  /// Per-period arithmetic mean of each column.
  pub fn mean_returns(&self) -> Vec<f64> {
    self.columns.iter().map(|c| sample_mean(c)).collect()
  }

  /// Compounded annual return of each column.
  pub fn annualized_returns(&self, periods_per_year: f64) -> Result<Vec<f64>> {
    self
      .columns
      .iter()
      .map(|c| annualize_rets(c, periods_per_year))
      .collect()
  }

  /// Sample covariance matrix (`T - 1` denominator).
  pub fn covariance(&self) -> Result<Vec<Vec<f64>>> {
    let t = self.n_periods();
    if t < 2 {
      return Err(Error::InsufficientData {
        required: 2,
        actual: t,
      });
    }

    let means = self.mean_returns();
    let n = self.n_assets();
    let mut cov = vec![vec![0.0; n]; n];
    for i in 0..n {
      for j in i..n {
        let c = self.columns[i]
          .iter()
          .zip(self.columns[j].iter())
          .map(|(x, y)| (x - means[i]) * (y - means[j]))
          .sum::<f64>()
          / (t - 1) as f64;
        cov[i][j] = c;
        cov[j][i] = c;
      }
    }
    Ok(cov)
  }

  /// Pearson correlation matrix.
  pub fn correlation(&self) -> Result<Vec<Vec<f64>>> {
    Ok(corr_from_cov(&self.covariance()?))
  }
}

/// Simple per-period returns `p_t / p_{t-1} - 1`. Every price must be positive and finite so
/// that the returns stay aligned with the price dates.
pub fn simple_returns_series(prices: &[f64]) -> Result<Vec<f64>> {
  if let Some((i, p)) = prices
    .iter()
    .enumerate()
    .find(|(_, p)| !(p.is_finite() && **p > 0.0))
  {
    return Err(Error::InvalidInput(format!(
      "price {p} at index {i} is not positive"
    )));
  }
  Ok(prices.windows(2).map(|w| w[1] / w[0] - 1.0).collect())
}

/// Align multiple return series to common tail length.
pub fn align_return_series(all_returns: &[Vec<f64>]) -> Vec<Vec<f64>> {
  let min_len = all_returns.iter().map(|r| r.len()).min().unwrap_or(0);
  all_returns
    .iter()
    .map(|r| r[r.len() - min_len..].to_vec())
    .collect()
}

/// Covariance matrix `Σ_ij = σ_i σ_j ρ_ij` from volatilities and a correlation matrix.
pub fn covariance_from_correlation(sigmas: &[f64], corr: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
  let n = sigmas.len();
  if corr.len() != n {
    return Err(Error::DimensionMismatch {
      what: "correlation matrix",
      expected: n,
      actual: corr.len(),
    });
  }
  if let Some((row, cols)) = corr.iter().map(|r| r.len()).enumerate().find(|(_, c)| *c != n) {
    return Err(Error::NonSquareCovariance { rows: n, row, cols });
  }

  Ok(
    (0..n)
      .map(|i| (0..n).map(|j| sigmas[i] * sigmas[j] * corr[i][j]).collect())
      .collect(),
  )
}

fn corr_from_cov(cov: &[Vec<f64>]) -> Vec<Vec<f64>> {
  let n = cov.len();
  let sd: Vec<f64> = (0..n).map(|i| cov[i][i].max(0.0).sqrt()).collect();
  let mut corr = vec![vec![0.0; n]; n];

  for i in 0..n {
    for j in 0..n {
      let denom = sd[i] * sd[j];
      corr[i][j] = if i == j {
        1.0
      } else if denom > 1e-15 {
        (cov[i][j] / denom).clamp(-1.0, 1.0)
      } else {
        0.0
      };
    }
  }

  corr
}
