//! # Risk
//!
//! $$
//! \mathrm{CVaR}_\alpha = -\mathbb{E}\left[R \mid R \le -\mathrm{VaR}_\alpha\right]
//! $$
//!
//! Descriptive statistics of periodic return series. Every function takes a single series;
//! use [`ReturnTable::aggregate`](crate::quant::portfolio::data::ReturnTable::aggregate) to apply
//! one column by column.
pub mod drawdown;
pub mod moments;
pub mod performance;
pub mod summary;
pub mod var;

pub use drawdown::Drawdown;
pub use drawdown::drawdown;
pub use drawdown::max_drawdown;
pub use moments::JarqueBeraResult;
pub use moments::is_normal;
pub use moments::jarque_bera;
pub use moments::kurtosis;
pub use moments::semideviation;
pub use moments::skewness;
pub use moments::std_population;
pub use performance::annualize_rets;
pub use performance::annualize_vol;
pub use performance::sharpe_ratio;
pub use summary::RiskSummary;
pub use summary::RiskSummaryConfig;
pub use var::DEFAULT_VAR_LEVEL;
pub use var::cvar_historic;
pub use var::var_gaussian;
pub use var::var_historic;

use crate::error::Error;
use crate::error::Result;

/// Non-empty, finite, and no simple return below `-1`.
pub(crate) fn check_series(r: &[f64]) -> Result<()> {
  if r.is_empty() {
    return Err(Error::EmptyInput("return series"));
  }
  if r.iter().any(|x| !x.is_finite()) {
    return Err(Error::InvalidInput("return series contains non-finite values".into()));
  }
  if let Some(x) = r.iter().find(|&&x| x < -1.0) {
    return Err(Error::InvalidInput(format!(
      "return {x} loses more than the whole investment"
    )));
  }
  Ok(())
}
