//! # Portfolio Types
//!
//! $$
//! \mathcal{F} = \{(\sigma_p(\mathbf{w}^\*_k), \mu_p(\mathbf{w}^\*_k))\}_{k=1}^{K}
//! $$
//!
//! Shared enums and result containers for frontier construction.

use std::fmt::Display;

/// Outcome of a single constrained minimization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConvergenceStatus {
  /// Tolerances met at a feasible point.
  #[default]
  Converged,
  /// Iteration cap reached; weights are the last iterate and may miss the constraints.
  MaxIterations,
  /// Solver stopped short of the requested accuracy.
  Stalled,
  /// Target return not reachable by a long-only, fully invested portfolio.
  Infeasible,
}

impl Display for ConvergenceStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ConvergenceStatus::Converged => write!(f, "converged"),
      ConvergenceStatus::MaxIterations => write!(f, "max iterations"),
      ConvergenceStatus::Stalled => write!(f, "stalled"),
      ConvergenceStatus::Infeasible => write!(f, "infeasible"),
    }
  }
}

/// Output of one minimum-volatility solve.
#[derive(Clone, Debug, Default)]
pub struct OptimizationResult {
  /// Requested portfolio return.
  pub target_return: f64,
  /// Final portfolio weights.
  pub weights: Vec<f64>,
  /// Achieved portfolio return.
  pub expected_return: f64,
  /// Achieved portfolio volatility.
  pub volatility: f64,
  /// Interior-point iterations spent.
  pub iterations: usize,
  pub status: ConvergenceStatus,
}

impl OptimizationResult {
  pub fn is_converged(&self) -> bool {
    self.status == ConvergenceStatus::Converged
  }
}

/// One point of the efficient frontier.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrontierPoint {
  pub volatility: f64,
  pub expected_return: f64,
  pub weights: Vec<f64>,
  pub status: ConvergenceStatus,
}

impl FrontierPoint {
  pub fn is_converged(&self) -> bool {
    self.status == ConvergenceStatus::Converged
  }
}

/// Frontier points ordered by ascending target return.
#[derive(Clone, Debug, Default)]
pub struct Frontier {
  pub points: Vec<FrontierPoint>,
}

impl Frontier {
  pub fn len(&self) -> usize {
    self.points.len()
  }

  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }

  /// Points whose solve converged, in frontier order.
  pub fn converged(&self) -> impl Iterator<Item = &FrontierPoint> {
    self.points.iter().filter(|p| p.is_converged())
  }

  /// Number of points flagged as not converged.
  pub fn n_failed(&self) -> usize {
    self.points.len() - self.converged().count()
  }

  /// Volatilities of all points.
  pub fn volatilities(&self) -> Vec<f64> {
    self.points.iter().map(|p| p.volatility).collect()
  }

  /// Expected returns of all points.
  pub fn returns(&self) -> Vec<f64> {
    self.points.iter().map(|p| p.expected_return).collect()
  }

  /// Lowest-volatility converged point.
  pub fn min_volatility_point(&self) -> Option<&FrontierPoint> {
    self
      .converged()
      .min_by(|a, b| a.volatility.total_cmp(&b.volatility))
  }
}
