//! # Efficient Frontier
//!
//! $$
//! r^\*_k = \min\boldsymbol\mu + \frac{k}{K-1}\left(\max\boldsymbol\mu - \min\boldsymbol\mu\right),
//! \qquad k = 0,\dots,K-1
//! $$
//!
//! Samples target returns across the asset universe, solves the minimum-volatility problem
//! at each one and maps the weights to (volatility, return) pairs.

use tracing::debug;
use tracing::warn;

use super::metrics::dot;
use super::metrics::portfolio_volatility;
use super::minimizer::minimize_prepared;
use super::minimizer::validate_market;
use super::qp::QpConfig;
use super::types::ConvergenceStatus;
use super::types::Frontier;
use super::types::FrontierPoint;
use super::types::OptimizationResult;
use crate::error::Error;
use crate::error::Result;

/// How the frontier is traced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrontierStrategy {
  /// Sweep the single free weight of a two-asset universe.
  TwoAssetSweep,
  /// One constrained minimization per target return.
  Optimized,
}

impl FrontierStrategy {
  /// Strategy for a universe of `n_assets`.
  pub fn for_assets(n_assets: usize) -> Self {
    if n_assets == 2 {
      Self::TwoAssetSweep
    } else {
      Self::Optimized
    }
  }

  /// Trace the frontier with this strategy.
  pub fn compute(
    self,
    n_points: usize,
    expected_returns: &[f64],
    cov: &[Vec<f64>],
    config: &QpConfig,
  ) -> Result<Frontier> {
    match self {
      Self::TwoAssetSweep => efficient_frontier_two_asset(n_points, expected_returns, cov),
      Self::Optimized => optimized_frontier(n_points, expected_returns, cov, config),
    }
  }
}

/// `n` evenly spaced values from `start` to `end`, both included.
pub(crate) fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
  match n {
    0 => Vec::new(),
    1 => vec![start],
    _ => {
      let step = (end - start) / (n - 1) as f64;
      let mut out: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
      out[n - 1] = end;
      out
    }
  }
}

/// Evenly spaced target returns between the smallest and largest expected return.
pub fn target_returns(n_points: usize, expected_returns: &[f64]) -> Result<Vec<f64>> {
  if expected_returns.is_empty() {
    return Err(Error::EmptyInput("expected returns"));
  }
  let lo = expected_returns.iter().copied().fold(f64::INFINITY, f64::min);
  let hi = expected_returns
    .iter()
    .copied()
    .fold(f64::NEG_INFINITY, f64::max);
  Ok(linspace(lo, hi, n_points))
}

fn check_frontier_inputs(n_points: usize, expected_returns: &[f64], cov: &[Vec<f64>]) -> Result<()> {
  if n_points == 0 {
    return Err(Error::InvalidInput("number of frontier points must be positive".into()));
  }
  validate_market(expected_returns, cov)?;
  if expected_returns.len() < 2 {
    return Err(Error::DegenerateUniverse {
      required: 2,
      assets: expected_returns.len(),
    });
  }
  Ok(())
}

/// Minimum-volatility solutions for `n_points` targets, ascending in target return.
pub fn optimal_weights(
  n_points: usize,
  expected_returns: &[f64],
  cov: &[Vec<f64>],
) -> Result<Vec<OptimizationResult>> {
  optimal_weights_with(n_points, expected_returns, cov, &QpConfig::default())
}

/// [`optimal_weights`] with explicit solver settings.
pub fn optimal_weights_with(
  n_points: usize,
  expected_returns: &[f64],
  cov: &[Vec<f64>],
  config: &QpConfig,
) -> Result<Vec<OptimizationResult>> {
  check_frontier_inputs(n_points, expected_returns, cov)?;

  target_returns(n_points, expected_returns)?
    .into_iter()
    .map(|target| {
      let res = minimize_prepared(target, expected_returns, cov, config)?;
      debug!(
        target_return = target,
        volatility = res.volatility,
        iterations = res.iterations,
        "frontier target solved"
      );
      Ok(res)
    })
    .collect()
}

/// Efficient frontier with default solver settings; the strategy is chosen by asset count.
pub fn efficient_frontier(
  n_points: usize,
  expected_returns: &[f64],
  cov: &[Vec<f64>],
) -> Result<Frontier> {
  efficient_frontier_with(n_points, expected_returns, cov, &QpConfig::default())
}

/// [`efficient_frontier`] with explicit solver settings.
pub fn efficient_frontier_with(
  n_points: usize,
  expected_returns: &[f64],
  cov: &[Vec<f64>],
  config: &QpConfig,
) -> Result<Frontier> {
  FrontierStrategy::for_assets(expected_returns.len()).compute(n_points, expected_returns, cov, config)
}

fn optimized_frontier(
  n_points: usize,
  expected_returns: &[f64],
  cov: &[Vec<f64>],
  config: &QpConfig,
) -> Result<Frontier> {
  let solutions = optimal_weights_with(n_points, expected_returns, cov, config)?;

  let mut points = Vec::with_capacity(solutions.len());
  for res in solutions {
    if !res.is_converged() {
      warn!(
        target_return = res.target_return,
        status = %res.status,
        iterations = res.iterations,
        "frontier point did not converge"
      );
    }
    points.push(FrontierPoint {
      volatility: portfolio_volatility(&res.weights, cov)?,
      expected_return: dot(&res.weights, expected_returns),
      weights: res.weights,
      status: res.status,
    });
  }

  Ok(Frontier { points })
}

/// Two-asset frontier by sweeping the weight of the higher-return asset from 0 to 1.
pub fn efficient_frontier_two_asset(
  n_points: usize,
  expected_returns: &[f64],
  cov: &[Vec<f64>],
) -> Result<Frontier> {
  if expected_returns.len() != 2 {
    return Err(Error::TwoAssetsRequired {
      assets: expected_returns.len(),
    });
  }
  check_frontier_inputs(n_points, expected_returns, cov)?;

  let high = if expected_returns[1] >= expected_returns[0] { 1 } else { 0 };
  let points = linspace(0.0, 1.0, n_points)
    .into_iter()
    .map(|t| {
      let mut weights = vec![0.0; 2];
      weights[high] = t;
      weights[1 - high] = 1.0 - t;
      Ok(FrontierPoint {
        volatility: portfolio_volatility(&weights, cov)?,
        expected_return: dot(&weights, expected_returns),
        weights,
        status: ConvergenceStatus::Converged,
      })
    })
    .collect::<Result<Vec<_>>>()?;

  Ok(Frontier { points })
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use tracing_test::traced_test;

  use super::*;

  fn er3() -> Vec<f64> {
    vec![0.05, 0.08, 0.12]
  }

  fn cov3() -> Vec<Vec<f64>> {
    vec![
      vec![0.04, 0.006, 0.0],
      vec![0.006, 0.09, 0.018],
      vec![0.0, 0.018, 0.16],
    ]
  }

  fn er2() -> Vec<f64> {
    vec![0.08, 0.12]
  }

  fn cov2() -> Vec<Vec<f64>> {
    vec![vec![0.0064, 0.0008], vec![0.0008, 0.0144]]
  }

  #[test]
  fn linspace_includes_both_ends() {
    assert_eq!(linspace(0.0, 1.0, 0), Vec::<f64>::new());
    assert_eq!(linspace(0.3, 1.0, 1), vec![0.3]);
    let xs = linspace(0.05, 0.12, 8);
    assert_eq!(xs.len(), 8);
    assert_eq!(xs[0], 0.05);
    assert_eq!(xs[7], 0.12);
  }

  #[test]
  fn optimal_weights_spans_return_range() {
    let res = optimal_weights(5, &er3(), &cov3()).unwrap();
    assert_eq!(res.len(), 5);
    assert!(res.windows(2).all(|w| w[0].target_return < w[1].target_return));
    assert_abs_diff_eq!(res[0].target_return, 0.05, epsilon = 1e-12);
    assert_abs_diff_eq!(res[4].target_return, 0.12, epsilon = 1e-12);

    for r in &res {
      assert!(r.is_converged(), "{r:?}");
      assert!((r.expected_return - r.target_return).abs() < 1e-6);
      assert!((r.weights.iter().sum::<f64>() - 1.0).abs() < 1e-6);
    }
  }

  #[test]
  fn frontier_dispatches_on_asset_count() {
    assert_eq!(FrontierStrategy::for_assets(2), FrontierStrategy::TwoAssetSweep);
    assert_eq!(FrontierStrategy::for_assets(3), FrontierStrategy::Optimized);
    assert_eq!(FrontierStrategy::for_assets(30), FrontierStrategy::Optimized);
  }

  #[test]
  fn two_asset_sweep_finds_interior_minimum() {
    let frontier = efficient_frontier(11, &er2(), &cov2()).unwrap();
    assert_eq!(frontier.len(), 11);

    let returns = frontier.returns();
    assert!(returns.windows(2).all(|w| w[0] <= w[1]));

    let vols = frontier.volatilities();
    let best = frontier.min_volatility_point().unwrap();
    assert!(best.volatility < vols[0]);
    assert!(best.volatility < vols[10]);
    // analytic minimum sits at 0.708 on the low-volatility asset
    assert_abs_diff_eq!(best.weights[0], 0.7, epsilon = 1e-12);
    assert_abs_diff_eq!(best.volatility, 0.004768_f64.sqrt(), epsilon = 1e-12);
  }

  #[test]
  fn optimized_and_swept_two_asset_frontiers_agree() {
    let swept = efficient_frontier_two_asset(5, &er2(), &cov2()).unwrap();
    let optimized = FrontierStrategy::Optimized
      .compute(5, &er2(), &cov2(), &QpConfig::default())
      .unwrap();

    for (s, o) in swept.points.iter().zip(optimized.points.iter()) {
      assert!(o.is_converged());
      assert_abs_diff_eq!(s.expected_return, o.expected_return, epsilon = 1e-6);
      assert_abs_diff_eq!(s.volatility, o.volatility, epsilon = 1e-6);
    }
  }

  #[test]
  fn three_asset_frontier_is_convex_around_minimum() {
    let frontier = efficient_frontier(15, &er3(), &cov3()).unwrap();
    assert_eq!(frontier.len(), 15);
    assert_eq!(frontier.n_failed(), 0);

    let vols = frontier.volatilities();
    let argmin = vols
      .iter()
      .enumerate()
      .min_by(|a, b| a.1.total_cmp(b.1))
      .map(|(i, _)| i)
      .unwrap();
    assert!(vols[argmin..].windows(2).all(|w| w[0] <= w[1] + 1e-9));
    assert!(vols[..=argmin].windows(2).all(|w| w[0] + 1e-9 >= w[1]));
  }

  #[test]
  fn daily_scale_frontier_converges_and_bends_once() {
    // 18 assets, two factors, variances around 1e-4 per day
    let n = 18;
    let cov: Vec<Vec<f64>> = (0..n)
      .map(|i| {
        (0..n)
          .map(|j| {
            let bi = 0.7 + 0.03 * i as f64;
            let bj = 0.7 + 0.03 * j as f64;
            let gi = (0.9 * i as f64).cos() * 0.3;
            let gj = (0.9 * j as f64).cos() * 0.3;
            let d = if i == j { 0.2 + 0.05 * (i % 4) as f64 } else { 0.0 };
            1e-4 * (bi * bj + gi * gj + d)
          })
          .collect()
      })
      .collect();
    let er: Vec<f64> = (0..n)
      .map(|i| 2e-4 + 4e-5 * ((5 * i) % n) as f64)
      .collect();

    let frontier = efficient_frontier(20, &er, &cov).unwrap();
    assert_eq!(frontier.len(), 20);
    assert_eq!(frontier.n_failed(), 0);
    for p in &frontier.points {
      assert!((p.weights.iter().sum::<f64>() - 1.0).abs() < 1e-7);
      assert!(p.weights.iter().all(|&w| (0.0..=1.0).contains(&w)));
    }

    let vols = frontier.volatilities();
    let best = vols
      .iter()
      .enumerate()
      .min_by(|a, b| a.1.total_cmp(b.1))
      .map(|(i, _)| i)
      .unwrap();
    let tol = 1e-7 * vols[best];
    assert!(vols[best..].windows(2).all(|w| w[0] <= w[1] + tol));
    assert!(vols[..=best].windows(2).all(|w| w[0] + tol >= w[1]));
  }

  #[test]
  fn degenerate_inputs_are_fatal() {
    assert!(matches!(
      efficient_frontier(10, &[0.1], &[vec![0.04]]),
      Err(Error::DegenerateUniverse { assets: 1, .. })
    ));
    assert!(matches!(
      efficient_frontier(0, &er3(), &cov3()),
      Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
      efficient_frontier_two_asset(10, &er3(), &cov3()),
      Err(Error::TwoAssetsRequired { assets: 3 })
    ));
    assert!(matches!(
      optimal_weights(5, &er3(), &cov2()),
      Err(Error::DimensionMismatch { .. })
    ));
  }

  #[test]
  #[traced_test]
  fn failed_points_are_kept_and_logged() {
    let config = QpConfig {
      max_iters: 1,
      ..QpConfig::default()
    };
    let frontier = efficient_frontier_with(5, &er3(), &cov3(), &config).unwrap();

    assert_eq!(frontier.len(), 5);
    assert!(frontier.n_failed() > 0);
    assert!(logs_contain("frontier point did not converge"));
  }
}
