//! # Long-Only Quadratic Program
//!
//! $$
//! \min_{\mathbf{w}} \tfrac{1}{2}\mathbf{w}^\top \Sigma \mathbf{w}
//! \quad \text{s.t.} \quad E\mathbf{w} = \mathbf{d},\ \mathbf{0} \le \mathbf{w} \le \mathbf{1}
//! $$
//!
//! Interior-point solve with `clarabel`. Variance and volatility share their minimizer, so the
//! weights returned here are the minimum-volatility weights.
//!
//! The covariance and every equality row are divided by their largest absolute entry before the
//! solve. The weights are unchanged by this and the solver tolerances then mean the same thing for
//! daily, monthly and annual inputs.

use clarabel::algebra::CscMatrix;
use clarabel::solver::DefaultSettingsBuilder;
use clarabel::solver::DefaultSolver;
use clarabel::solver::IPSolver;
use clarabel::solver::SolverStatus;
use clarabel::solver::SupportedConeT;
use tracing::debug;

use super::types::ConvergenceStatus;
use crate::error::Error;
use crate::error::Result;

/// Interior-point settings.
#[derive(Clone, Copy, Debug)]
pub struct QpConfig {
  /// Iteration cap.
  pub max_iters: u32,
  /// Duality-gap (absolute and relative) and feasibility tolerance on the scaled problem.
  pub tolerance: f64,
}

impl Default for QpConfig {
  fn default() -> Self {
    Self {
      max_iters: 200,
      tolerance: 1e-9,
    }
  }
}

/// Linear equality `coefficients · w = rhs`.
#[derive(Clone, Debug)]
pub(crate) struct Equality {
  pub coefficients: Vec<f64>,
  pub rhs: f64,
}

impl Equality {
  pub fn new(coefficients: Vec<f64>, rhs: f64) -> Self {
    Self { coefficients, rhs }
  }
}

#[derive(Clone, Debug)]
pub(crate) struct QpReport {
  pub x: Vec<f64>,
  pub iterations: usize,
  pub status: ConvergenceStatus,
}

/// Largest absolute value, or 1 when every value is zero.
fn unit_scale(values: impl Iterator<Item = f64>) -> f64 {
  let m = values.fold(0.0_f64, |acc, v| acc.max(v.abs()));
  if m > 0.0 && m.is_finite() {
    m
  } else {
    1.0
  }
}

pub(crate) fn convergence_status(status: SolverStatus) -> ConvergenceStatus {
  match status {
    SolverStatus::Solved => ConvergenceStatus::Converged,
    SolverStatus::MaxIterations | SolverStatus::MaxTime => ConvergenceStatus::MaxIterations,
    SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => {
      ConvergenceStatus::Infeasible
    }
    _ => ConvergenceStatus::Stalled,
  }
}

/// Minimum-variance weights in `[0, 1]` satisfying `equalities`. `cov` must already be validated
/// as square, finite and symmetric.
pub(crate) fn solve_long_only(
  cov: &[Vec<f64>],
  equalities: &[Equality],
  config: &QpConfig,
) -> Result<QpReport> {
  let n = cov.len();
  let m = equalities.len();
  if let Some(eq) = equalities.iter().find(|e| e.coefficients.len() != n) {
    return Err(Error::DimensionMismatch {
      what: "equality coefficients",
      expected: n,
      actual: eq.coefficients.len(),
    });
  }

  // P: upper triangle of the scaled covariance, column by column
  let p_scale = unit_scale(cov.iter().flatten().copied());
  let mut p_colptr = Vec::with_capacity(n + 1);
  let mut p_rowval = Vec::new();
  let mut p_nzval = Vec::new();
  p_colptr.push(0);
  for j in 0..n {
    for (i, row) in cov.iter().enumerate().take(j + 1) {
      let v = row[j] / p_scale;
      if v != 0.0 {
        p_rowval.push(i);
        p_nzval.push(v);
      }
    }
    p_colptr.push(p_nzval.len());
  }
  let p = CscMatrix::new(n, n, p_colptr, p_rowval, p_nzval);
  let q = vec![0.0; n];

  // A: [E; -I; I] so that s = b - Aw lies in {0}^m x R+^n x R+^n
  let row_scales: Vec<f64> = equalities
    .iter()
    .map(|e| unit_scale(e.coefficients.iter().copied()))
    .collect();
  let mut a_colptr = Vec::with_capacity(n + 1);
  let mut a_rowval = Vec::new();
  let mut a_nzval = Vec::new();
  a_colptr.push(0);
  for j in 0..n {
    for (k, (eq, scale)) in equalities.iter().zip(row_scales.iter()).enumerate() {
      let v = eq.coefficients[j] / scale;
      if v != 0.0 {
        a_rowval.push(k);
        a_nzval.push(v);
      }
    }
    a_rowval.push(m + j);
    a_nzval.push(-1.0);
    a_rowval.push(m + n + j);
    a_nzval.push(1.0);
    a_colptr.push(a_nzval.len());
  }
  let a = CscMatrix::new(m + 2 * n, n, a_colptr, a_rowval, a_nzval);

  let mut b: Vec<f64> = equalities
    .iter()
    .zip(row_scales.iter())
    .map(|(e, scale)| e.rhs / scale)
    .collect();
  b.extend(std::iter::repeat(0.0).take(n));
  b.extend(std::iter::repeat(1.0).take(n));

  let cones = [
    SupportedConeT::ZeroConeT(m),
    SupportedConeT::NonnegativeConeT(n),
    SupportedConeT::NonnegativeConeT(n),
  ];

  let settings = DefaultSettingsBuilder::default()
    .max_iter(config.max_iters)
    .tol_gap_abs(config.tolerance)
    .tol_gap_rel(config.tolerance)
    .tol_feas(config.tolerance)
    .verbose(false)
    .build()
    .map_err(|e| Error::Solver(format!("invalid settings: {e}")))?;

  let mut solver = DefaultSolver::new(&p, &q, &a, &b, &cones, settings)
    .map_err(|e| Error::Solver(format!("setup failed: {e:?}")))?;
  solver.solve();

  let solution = &solver.solution;
  debug!(
    assets = n,
    iterations = solution.iterations,
    status = ?solution.status,
    "quadratic program solved"
  );

  Ok(QpReport {
    // interior iterates sit a hair inside the box
    x: solution.x.iter().map(|w| w.clamp(0.0, 1.0)).collect(),
    iterations: solution.iterations as usize,
    status: convergence_status(solution.status),
  })
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;

  use super::*;

  fn budget(n: usize) -> Equality {
    Equality::new(vec![1.0; n], 1.0)
  }

  #[test]
  fn solver_statuses_map_onto_convergence() {
    assert_eq!(
      convergence_status(SolverStatus::Solved),
      ConvergenceStatus::Converged
    );
    assert_eq!(
      convergence_status(SolverStatus::MaxIterations),
      ConvergenceStatus::MaxIterations
    );
    assert_eq!(
      convergence_status(SolverStatus::PrimalInfeasible),
      ConvergenceStatus::Infeasible
    );
    assert_eq!(
      convergence_status(SolverStatus::AlmostSolved),
      ConvergenceStatus::Stalled
    );
    assert_eq!(
      convergence_status(SolverStatus::NumericalError),
      ConvergenceStatus::Stalled
    );
  }

  #[test]
  fn budget_only_problem_weights_by_inverse_variance() {
    let cov = vec![vec![1.0, 0.0], vec![0.0, 4.0]];
    let report = solve_long_only(&cov, &[budget(2)], &QpConfig::default()).unwrap();
    assert_eq!(report.status, ConvergenceStatus::Converged);
    assert_abs_diff_eq!(report.x[0], 0.8, epsilon = 1e-7);
    assert_abs_diff_eq!(report.x[1], 0.2, epsilon = 1e-7);
  }

  #[test]
  fn weights_do_not_depend_on_units() {
    let cov = vec![
      vec![0.04, 0.006, 0.0],
      vec![0.006, 0.09, 0.018],
      vec![0.0, 0.018, 0.16],
    ];
    let er = [0.05, 0.08, 0.12];
    let annual = solve_long_only(
      &cov,
      &[budget(3), Equality::new(er.to_vec(), 0.085)],
      &QpConfig::default(),
    )
    .unwrap();

    // daily-sized covariance and returns
    let tiny_cov: Vec<Vec<f64>> = cov
      .iter()
      .map(|row| row.iter().map(|c| c * 1e-6).collect())
      .collect();
    let tiny_er: Vec<f64> = er.iter().map(|r| r * 1e-3).collect();
    let daily = solve_long_only(
      &tiny_cov,
      &[budget(3), Equality::new(tiny_er, 0.085e-3)],
      &QpConfig::default(),
    )
    .unwrap();

    assert_eq!(daily.status, ConvergenceStatus::Converged);
    for (a, d) in annual.x.iter().zip(daily.x.iter()) {
      assert_abs_diff_eq!(*a, *d, epsilon = 1e-7);
    }
  }

  #[test]
  fn unreachable_return_is_infeasible() {
    let cov = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
    let report = solve_long_only(
      &cov,
      &[budget(2), Equality::new(vec![0.05, 0.08], 0.2)],
      &QpConfig::default(),
    )
    .unwrap();
    assert_eq!(report.status, ConvergenceStatus::Infeasible);
  }

  #[test]
  fn iteration_cap_is_reported() {
    let cov = vec![vec![1.0, 0.2], vec![0.2, 2.0]];
    let config = QpConfig {
      max_iters: 1,
      ..QpConfig::default()
    };
    let report = solve_long_only(&cov, &[budget(2)], &config).unwrap();
    assert!(report.iterations <= 1);
    assert_eq!(report.status, ConvergenceStatus::MaxIterations);
  }

  #[test]
  fn mismatched_equality_is_rejected() {
    let cov = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
    assert!(matches!(
      solve_long_only(&cov, &[budget(3)], &QpConfig::default()),
      Err(Error::DimensionMismatch { .. })
    ));
  }
}
