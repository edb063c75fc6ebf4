//! # Frontier Engine
//!
//! $$
//! (\boldsymbol\mu, \Sigma) \mapsto \{\mathbf{w}^\*(r^\*_k)\}_k \mapsto \mathcal{F}
//! $$
//!
//! Configured entry point over the minimizer, sampler and frontier assembler.

use super::data::ReturnTable;
use super::frontier::optimal_weights_with;
use super::frontier::FrontierStrategy;
use super::minimizer::minimize_volatility_with;
use super::qp::QpConfig;
use super::types::Frontier;
use super::types::OptimizationResult;
use crate::error::Result;

/// Runtime configuration for [`FrontierEngine`].
#[derive(Clone, Debug)]
pub struct FrontierConfig {
  /// Number of target returns sampled along the frontier.
  pub n_points: usize,
  /// Force a strategy instead of choosing by asset count.
  pub strategy: Option<FrontierStrategy>,
  /// Per-target solver settings.
  pub solver: QpConfig,
  /// Periods per year used when estimating inputs from a [`ReturnTable`].
  pub periods_per_year: f64,
}

impl Default for FrontierConfig {
  fn default() -> Self {
    Self {
      n_points: 25,
      strategy: None,
      solver: QpConfig::default(),
      periods_per_year: 12.0,
    }
  }
}

/// Single entry-point engine for frontier workflows.
#[derive(Clone, Debug, Default)]
pub struct FrontierEngine {
  config: FrontierConfig,
}

impl FrontierEngine {
  pub fn new(config: FrontierConfig) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &FrontierConfig {
    &self.config
  }

  /// Minimum-volatility weights for one target return.
  pub fn minimize_volatility(
    &self,
    target_return: f64,
    expected_returns: &[f64],
    cov: &[Vec<f64>],
  ) -> Result<OptimizationResult> {
    minimize_volatility_with(target_return, expected_returns, cov, &self.config.solver)
  }

  /// Minimum-volatility solutions across the configured number of targets.
  pub fn optimal_weights(
    &self,
    expected_returns: &[f64],
    cov: &[Vec<f64>],
  ) -> Result<Vec<OptimizationResult>> {
    optimal_weights_with(
      self.config.n_points,
      expected_returns,
      cov,
      &self.config.solver,
    )
  }

  /// Efficient frontier from expected returns and a covariance matrix.
  pub fn efficient_frontier(&self, expected_returns: &[f64], cov: &[Vec<f64>]) -> Result<Frontier> {
    let strategy = self
      .config
      .strategy
      .unwrap_or_else(|| FrontierStrategy::for_assets(expected_returns.len()));
    strategy.compute(
      self.config.n_points,
      expected_returns,
      cov,
      &self.config.solver,
    )
  }

  /// Efficient frontier from historical returns: annualized compounded returns and the
  /// sample covariance of the table.
  pub fn efficient_frontier_from_table(&self, table: &ReturnTable) -> Result<Frontier> {
    let er = table.annualized_returns(self.config.periods_per_year)?;
    let cov = table.covariance()?;
    self.efficient_frontier(&er, &cov)
  }
}
