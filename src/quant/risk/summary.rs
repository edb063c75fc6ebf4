//! # Risk Summary
//!
//! Every descriptive statistic of a return series in one record.

use tracing::debug;

use super::drawdown::max_drawdown;
use super::moments::kurtosis;
use super::moments::semideviation;
use super::moments::skewness;
use super::performance::annualize_rets;
use super::performance::annualize_vol;
use super::performance::sharpe_ratio;
use super::var::cvar_historic;
use super::var::var_gaussian;
use super::var::var_historic;
use super::var::DEFAULT_VAR_LEVEL;
use crate::error::Result;
use crate::quant::portfolio::data::ReturnTable;

/// Settings shared by every statistic in a [`RiskSummary`].
#[derive(Clone, Copy, Debug)]
pub struct RiskSummaryConfig {
  pub periods_per_year: f64,
  /// Annual risk-free rate for the Sharpe ratio.
  pub risk_free_rate: f64,
  /// VaR / CVaR tail level, in percent.
  pub var_level: f64,
}

impl Default for RiskSummaryConfig {
  fn default() -> Self {
    Self {
      periods_per_year: 12.0,
      risk_free_rate: 0.03,
      var_level: DEFAULT_VAR_LEVEL,
    }
  }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RiskSummary {
  pub annualized_return: f64,
  pub annualized_vol: f64,
  pub skewness: f64,
  pub kurtosis: f64,
  /// Cornish-Fisher VaR.
  pub modified_var: f64,
  pub historic_var: f64,
  pub gaussian_var: f64,
  pub historic_cvar: f64,
  pub semideviation: f64,
  pub sharpe_ratio: f64,
  pub max_drawdown: f64,
}

impl RiskSummary {
  pub fn from_series(r: &[f64], config: &RiskSummaryConfig) -> Result<Self> {
    let ppy = config.periods_per_year;
    let level = config.var_level;

    Ok(Self {
      annualized_return: annualize_rets(r, ppy)?,
      annualized_vol: annualize_vol(r, ppy)?,
      skewness: skewness(r)?,
      kurtosis: kurtosis(r)?,
      modified_var: var_gaussian(r, level, true)?,
      historic_var: var_historic(r, level)?,
      gaussian_var: var_gaussian(r, level, false)?,
      historic_cvar: cvar_historic(r, level)?,
      semideviation: semideviation(r)?,
      sharpe_ratio: sharpe_ratio(r, config.risk_free_rate, ppy)?,
      max_drawdown: max_drawdown(r)?,
    })
  }

  /// One summary per column, in column order.
  pub fn from_table(table: &ReturnTable, config: &RiskSummaryConfig) -> Result<Vec<(String, Self)>> {
    table
      .names()
      .iter()
      .zip(table.columns())
      .map(|(name, col)| {
        let summary = Self::from_series(col, config)?;
        debug!(column = %name, sharpe = summary.sharpe_ratio, "risk summary computed");
        Ok((name.clone(), summary))
      })
      .collect()
  }
}
