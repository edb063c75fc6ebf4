//! # Drawdown
//!
//! $$
//! W_t = W_0\prod_{s\le t}(1+r_s),\qquad P_t = \max_{s\le t} W_s,\qquad D_t = \frac{W_t - P_t}{P_t}
//! $$

use super::check_series;
use crate::error::Result;

/// Starting wealth of the drawdown index.
pub const INITIAL_WEALTH: f64 = 1000.0;

/// Wealth index, running peaks and percentage drawdowns of a return series.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Drawdown {
  pub wealth: Vec<f64>,
  pub peaks: Vec<f64>,
  pub drawdowns: Vec<f64>,
}

impl Drawdown {
  /// Deepest drawdown (a non-positive fraction).
  pub fn max_drawdown(&self) -> f64 {
    self.drawdowns.iter().copied().fold(0.0, f64::min)
  }
}

pub fn drawdown(r: &[f64]) -> Result<Drawdown> {
  check_series(r)?;

  let mut out = Drawdown {
    wealth: Vec::with_capacity(r.len()),
    peaks: Vec::with_capacity(r.len()),
    drawdowns: Vec::with_capacity(r.len()),
  };
  let mut wealth = INITIAL_WEALTH;
  let mut peak = f64::NEG_INFINITY;
  for &x in r {
    wealth *= 1.0 + x;
    peak = peak.max(wealth);
    out.wealth.push(wealth);
    out.peaks.push(peak);
    // wiped out from the first period: no positive peak to measure against
    out.drawdowns.push(if peak > 0.0 { (wealth - peak) / peak } else { -1.0 });
  }
  Ok(out)
}

/// Deepest drawdown of `r`, e.g. `-0.25` for a 25% peak-to-trough loss.
pub fn max_drawdown(r: &[f64]) -> Result<f64> {
  Ok(drawdown(r)?.max_drawdown())
}
