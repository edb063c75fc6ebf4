//! # Minimum-Volatility Portfolio
//!
//! $$
//! \mathbf{w}^\*(r^\*) = \arg\min_{\mathbf{w}} \sqrt{\mathbf{w}^\top \Sigma \mathbf{w}}
//! \quad \text{s.t.} \quad \mathbf{w}^\top\boldsymbol\mu = r^\*,\ \mathbf{1}^\top\mathbf{w} = 1,\ 0 \le w_i \le 1
//! $$
//!
//! Long-only minimum-volatility weights for a target return.
//!
//! A target equal to the largest (smallest) expected return can only be earned by the assets
//! that carry it, so every other weight is pinned to zero and the remaining budget problem is
//! solved on its own. Targets beyond that range are reported as infeasible together with the
//! nearest attainable edge portfolio.

use tracing::debug;

use super::metrics::check_square;
use super::metrics::dot;
use super::metrics::portfolio_volatility;
use super::metrics::VARIANCE_CLAMP;
use super::qp::solve_long_only;
use super::qp::Equality;
use super::qp::QpConfig;
use super::qp::QpReport;
use super::types::ConvergenceStatus;
use super::types::OptimizationResult;
use crate::error::Error;
use crate::error::Result;

/// Relative asymmetry tolerated in a covariance matrix.
const SYMMETRY_TOL: f64 = 1e-10;

/// Targets within this fraction of the return scale of an extreme expected return sit on the edge.
const EDGE_TOL: f64 = 1e-10;

/// Validates expected returns against the covariance matrix: matching dimensions, square,
/// finite and symmetric.
pub fn validate_market(expected_returns: &[f64], cov: &[Vec<f64>]) -> Result<()> {
  if expected_returns.is_empty() {
    return Err(Error::EmptyInput("expected returns"));
  }
  check_square(cov)?;
  if cov.len() != expected_returns.len() {
    return Err(Error::DimensionMismatch {
      what: "covariance matrix",
      expected: expected_returns.len(),
      actual: cov.len(),
    });
  }
  if expected_returns.iter().any(|r| !r.is_finite()) {
    return Err(Error::InvalidInput("expected returns must be finite".into()));
  }
  if cov.iter().flatten().any(|c| !c.is_finite()) {
    return Err(Error::InvalidInput("covariance entries must be finite".into()));
  }

  let n = cov.len();
  for i in 0..n {
    if cov[i][i] < -VARIANCE_CLAMP {
      return Err(Error::InvalidInput(format!(
        "negative variance {:.3e} on the diagonal at {i}",
        cov[i][i]
      )));
    }
    for j in (i + 1)..n {
      let scale = cov[i][j].abs().max(cov[j][i].abs()).max(1.0);
      if (cov[i][j] - cov[j][i]).abs() > SYMMETRY_TOL * scale {
        return Err(Error::InvalidInput(format!(
          "covariance matrix is not symmetric at ({i}, {j})"
        )));
      }
    }
  }
  Ok(())
}

/// Minimum-volatility weights achieving `target_return` with default solver settings.
pub fn minimize_volatility(
  target_return: f64,
  expected_returns: &[f64],
  cov: &[Vec<f64>],
) -> Result<OptimizationResult> {
  minimize_volatility_with(target_return, expected_returns, cov, &QpConfig::default())
}

/// [`minimize_volatility`] with explicit solver settings.
pub fn minimize_volatility_with(
  target_return: f64,
  expected_returns: &[f64],
  cov: &[Vec<f64>],
  config: &QpConfig,
) -> Result<OptimizationResult> {
  validate_market(expected_returns, cov)?;
  if !target_return.is_finite() {
    return Err(Error::InvalidInput("target return must be finite".into()));
  }
  minimize_prepared(target_return, expected_returns, cov, config)
}

/// Minimum-variance mix of the assets whose expected return lies within `slack` of `edge`.
fn edge_portfolio(
  edge: f64,
  slack: f64,
  expected_returns: &[f64],
  cov: &[Vec<f64>],
  config: &QpConfig,
) -> Result<QpReport> {
  let members: Vec<usize> = expected_returns
    .iter()
    .enumerate()
    .filter(|(_, r)| (*r - edge).abs() <= slack)
    .map(|(i, _)| i)
    .collect();
  let mut x = vec![0.0; expected_returns.len()];

  if members.len() == 1 {
    x[members[0]] = 1.0;
    return Ok(QpReport {
      x,
      iterations: 0,
      status: ConvergenceStatus::Converged,
    });
  }

  let sub: Vec<Vec<f64>> = members
    .iter()
    .map(|&i| members.iter().map(|&j| cov[i][j]).collect())
    .collect();
  let report = solve_long_only(
    &sub,
    &[Equality::new(vec![1.0; members.len()], 1.0)],
    config,
  )?;
  for (&i, w) in members.iter().zip(report.x.iter()) {
    x[i] = *w;
  }
  Ok(QpReport { x, ..report })
}

/// Solve on already validated inputs.
pub(crate) fn minimize_prepared(
  target_return: f64,
  expected_returns: &[f64],
  cov: &[Vec<f64>],
  config: &QpConfig,
) -> Result<OptimizationResult> {
  let lo = expected_returns
    .iter()
    .copied()
    .fold(f64::INFINITY, f64::min);
  let hi = expected_returns
    .iter()
    .copied()
    .fold(f64::NEG_INFINITY, f64::max);
  let slack = EDGE_TOL * (hi - lo).max(hi.abs()).max(lo.abs());

  let report = if target_return > hi + slack || target_return < lo - slack {
    let edge = if target_return > hi { hi } else { lo };
    debug!(target_return, edge, "target return outside the attainable range");
    QpReport {
      status: ConvergenceStatus::Infeasible,
      ..edge_portfolio(edge, slack, expected_returns, cov, config)?
    }
  } else if target_return >= hi - slack {
    edge_portfolio(hi, slack, expected_returns, cov, config)?
  } else if target_return <= lo + slack {
    edge_portfolio(lo, slack, expected_returns, cov, config)?
  } else {
    let n = expected_returns.len();
    let equalities = [
      Equality::new(vec![1.0; n], 1.0),
      Equality::new(expected_returns.to_vec(), target_return),
    ];
    solve_long_only(cov, &equalities, config)?
  };

  Ok(OptimizationResult {
    target_return,
    expected_return: dot(&report.x, expected_returns),
    volatility: portfolio_volatility(&report.x, cov)?,
    weights: report.x,
    iterations: report.iterations,
    status: report.status,
  })
}
