//! # Annualized Performance
//!
//! $$
//! R_{ann} = \prod_{t=1}^{n}(1+r_t)^{p/n} - 1,\qquad
//! \sigma_{ann} = \hat\sigma\sqrt{p},\qquad
//! SR = \frac{R^{ex}_{ann}}{\sigma_{ann}}
//! $$
//!
//! `p` is the number of periods per year (12 for monthly data).

use super::check_series;
use crate::error::Error;
use crate::error::Result;

fn check_periods(periods_per_year: f64) -> Result<()> {
  if periods_per_year.is_finite() && periods_per_year > 0.0 {
    Ok(())
  } else {
    Err(Error::InvalidInput(format!(
      "periods per year must be positive, got {periods_per_year}"
    )))
  }
}

/// Compounded growth of `r` expressed per year.
pub fn annualize_rets(r: &[f64], periods_per_year: f64) -> Result<f64> {
  check_series(r)?;
  check_periods(periods_per_year)?;
  let growth: f64 = r.iter().map(|x| 1.0 + x).product();
  Ok(growth.powf(periods_per_year / r.len() as f64) - 1.0)
}

/// Sample standard deviation (ddof 1) scaled by `sqrt(periods_per_year)`.
pub fn annualize_vol(r: &[f64], periods_per_year: f64) -> Result<f64> {
  check_series(r)?;
  check_periods(periods_per_year)?;
  if r.len() < 2 {
    return Err(Error::InsufficientData {
      required: 2,
      actual: r.len(),
    });
  }

  let n = r.len() as f64;
  let mean = r.iter().sum::<f64>() / n;
  let var = r.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
  Ok(var.sqrt() * periods_per_year.sqrt())
}

/// Annualized excess return over annualized volatility; `risk_free_rate` is annual.
pub fn sharpe_ratio(r: &[f64], risk_free_rate: f64, periods_per_year: f64) -> Result<f64> {
  let vol = annualize_vol(r, periods_per_year)?;
  if vol == 0.0 {
    return Err(Error::InvalidInput("series has zero variance".into()));
  }

  let rf_per_period = (1.0 + risk_free_rate).powf(1.0 / periods_per_year) - 1.0;
  let excess: Vec<f64> = r.iter().map(|x| x - rf_per_period).collect();
  Ok(annualize_rets(&excess, periods_per_year)? / vol)
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;

  use super::*;

  const R: [f64; 5] = [0.05, -0.02, 0.03, -0.04, 0.01];

  #[test]
  fn monthly_series_annualized() {
    assert_abs_diff_eq!(annualize_rets(&R, 12.0).unwrap(), 0.06764899379533462, epsilon = 1e-12);
    assert_abs_diff_eq!(annualize_vol(&R, 12.0).unwrap(), 0.12633289357883007, epsilon = 1e-12);
  }

  #[test]
  fn sharpe_ratio_deducts_risk_free() {
    assert_abs_diff_eq!(sharpe_ratio(&R, 0.0, 12.0).unwrap(), 0.5354820259311367, epsilon = 1e-10);
    assert_abs_diff_eq!(sharpe_ratio(&R, 0.03, 12.0).unwrap(), 0.28993124700404227, epsilon = 1e-10);
  }

  #[test]
  fn one_year_of_constant_returns() {
    assert_abs_diff_eq!(annualize_rets(&[0.01; 12], 12.0).unwrap(), 1.01_f64.powi(12) - 1.0, epsilon = 1e-12);
  }

  #[test]
  fn bad_inputs() {
    assert!(matches!(annualize_vol(&[0.01], 12.0), Err(Error::InsufficientData { .. })));
    assert!(matches!(annualize_rets(&R, 0.0), Err(Error::InvalidInput(_))));
    assert!(matches!(sharpe_ratio(&[0.01; 4], 0.0, 12.0), Err(Error::InvalidInput(_))));
  }
}
