//! # Value at Risk
//!
//! $$
//! \mathrm{VaR}_\alpha = -(\bar r + \tilde z_\alpha\,\sigma),\qquad
//! \tilde z = z + \frac{(z^2-1)S}{6} + \frac{(z^3-3z)(K-3)}{24} - \frac{(2z^3-5z)S^2}{36}
//! $$
//!
//! Historic, Gaussian and Cornish-Fisher VaR plus historic CVaR. Levels are percentages in
//! `(0, 100)` and losses are reported as positive numbers.

use statrs::distribution::ContinuousCDF;
use statrs::distribution::Normal;

use super::check_series;
use super::moments::central_moments;
use crate::error::Error;
use crate::error::Result;

/// Default tail probability, in percent.
pub const DEFAULT_VAR_LEVEL: f64 = 5.0;

fn check_level(level: f64) -> Result<()> {
  if level > 0.0 && level < 100.0 {
    Ok(())
  } else {
    Err(Error::InvalidInput(format!(
      "VaR level must be in (0, 100), got {level}"
    )))
  }
}

/// `q`-th percentile with linear interpolation between order statistics.
pub(crate) fn percentile(r: &[f64], q: f64) -> f64 {
  let mut sorted = r.to_vec();
  sorted.sort_by(f64::total_cmp);

  let pos = (sorted.len() - 1) as f64 * q / 100.0;
  let lo = pos.floor() as usize;
  let hi = pos.ceil() as usize;
  sorted[lo] + (pos - lo as f64) * (sorted[hi] - sorted[lo])
}

/// Loss that `level` percent of the observed returns fall below.
pub fn var_historic(r: &[f64], level: f64) -> Result<f64> {
  check_series(r)?;
  check_level(level)?;
  Ok(-percentile(r, level))
}

/// Parametric VaR under a normal assumption; with `modified` the quantile is
/// Cornish-Fisher adjusted for the sample skewness and kurtosis.
///
/// The adjustment uses the textbook expansion
/// `z + (z²-1)S/6 + (z³-3z)(K-3)/24 - (2z³-5z)S²/36`. Some course notebooks write the skew terms
/// as `(z²+1)S/6` and `+(2z³-5z)S²/36`; for skewed series their modified VaR will differ from the
/// value computed here.
pub fn var_gaussian(r: &[f64], level: f64, modified: bool) -> Result<f64> {
  check_series(r)?;
  check_level(level)?;

  let normal = Normal::new(0.0, 1.0).map_err(|e| Error::InvalidInput(e.to_string()))?;
  let mut z = normal.inverse_cdf(level / 100.0);
  let (mean, m2, m3, m4) = central_moments(r);

  if modified {
    if m2 <= 0.0 {
      return Err(Error::InvalidInput("series has zero variance".into()));
    }
    let s = m3 / m2.powf(1.5);
    let k = m4 / (m2 * m2);
    z += (z * z - 1.0) * s / 6.0 + (z.powi(3) - 3.0 * z) * (k - 3.0) / 24.0
      - (2.0 * z.powi(3) - 5.0 * z) * s * s / 36.0;
  }

  Ok(-(mean + z * m2.sqrt()))
}

/// Average loss over the returns at or beyond the historic VaR.
pub fn cvar_historic(r: &[f64], level: f64) -> Result<f64> {
  let var = var_historic(r, level)?;
  let tail: Vec<f64> = r.iter().copied().filter(|x| *x <= -var).collect();
  // the minimum always lies at or below the interpolated percentile
  Ok(-tail.iter().sum::<f64>() / tail.len() as f64)
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;

  use super::*;

  const R: [f64; 5] = [0.05, -0.02, 0.03, -0.04, 0.01];

  #[test]
  fn historic_var_interpolates() {
    assert_abs_diff_eq!(var_historic(&R, DEFAULT_VAR_LEVEL).unwrap(), 0.036, epsilon = 1e-12);
    assert_abs_diff_eq!(var_historic(&R, 50.0).unwrap(), -0.01, epsilon = 1e-12);
    assert_abs_diff_eq!(cvar_historic(&R, DEFAULT_VAR_LEVEL).unwrap(), 0.04, epsilon = 1e-12);
  }

  #[test]
  fn gaussian_and_cornish_fisher_var() {
    assert_abs_diff_eq!(
      var_gaussian(&R, DEFAULT_VAR_LEVEL, false).unwrap(),
      0.04765350161133493,
      epsilon = 1e-8
    );
    assert_abs_diff_eq!(
      var_gaussian(&R, DEFAULT_VAR_LEVEL, true).unwrap(),
      0.04942125172147213,
      epsilon = 1e-8
    );
  }

  #[test]
  fn cvar_is_at_least_var() {
    let r = [0.02, -0.07, 0.01, -0.03, 0.04, -0.01, 0.0, 0.03, -0.05, 0.02];
    for level in [1.0, 5.0, 10.0, 25.0] {
      assert!(cvar_historic(&r, level).unwrap() >= var_historic(&r, level).unwrap() - 1e-15);
    }
  }

  #[test]
  fn levels_outside_open_interval_are_rejected() {
    assert!(matches!(var_historic(&R, 0.0), Err(Error::InvalidInput(_))));
    assert!(matches!(var_gaussian(&R, 100.0, false), Err(Error::InvalidInput(_))));
    assert!(matches!(cvar_historic(&[], 5.0), Err(Error::EmptyInput(_))));
  }
}
