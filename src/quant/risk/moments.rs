//! # Higher Moments and Normality
//!
//! $$
//! S = \frac{\mathbb{E}[(R-\bar R)^3]}{\sigma^3},\qquad
//! K = \frac{\mathbb{E}[(R-\bar R)^4]}{\sigma^4},\qquad
//! JB = \frac{n}{6}\left(S^2 + \frac{(K-3)^2}{4}\right)
//! $$
//!
//! Population (ddof 0) moments of a return series.

use statrs::distribution::ChiSquared;
use statrs::distribution::ContinuousCDF;

use super::check_series;
use crate::error::Error;
use crate::error::Result;

/// Level used by [`is_normal`] when none is given.
pub const DEFAULT_NORMALITY_LEVEL: f64 = 0.01;

/// Central moments `(mean, m2, m3, m4)` with a `1/n` denominator.
pub(crate) fn central_moments(r: &[f64]) -> (f64, f64, f64, f64) {
  let n = r.len() as f64;
  let mean = r.iter().sum::<f64>() / n;

  let mut m2 = 0.0;
  let mut m3 = 0.0;
  let mut m4 = 0.0;
  for &x in r {
    let d = x - mean;
    let d2 = d * d;
    m2 += d2;
    m3 += d2 * d;
    m4 += d2 * d2;
  }
  (mean, m2 / n, m3 / n, m4 / n)
}

fn nonzero_variance(m2: f64) -> Result<f64> {
  if m2 > 0.0 {
    Ok(m2)
  } else {
    Err(Error::InvalidInput("series has zero variance".into()))
  }
}

/// Population standard deviation.
pub fn std_population(r: &[f64]) -> Result<f64> {
  check_series(r)?;
  Ok(central_moments(r).1.sqrt())
}

/// Standard deviation of the strictly negative returns, `0` when there are none.
pub fn semideviation(r: &[f64]) -> Result<f64> {
  check_series(r)?;
  let losses: Vec<f64> = r.iter().copied().filter(|x| *x < 0.0).collect();
  if losses.is_empty() {
    return Ok(0.0);
  }
  Ok(central_moments(&losses).1.sqrt())
}

/// Skewness (third standardized moment).
pub fn skewness(r: &[f64]) -> Result<f64> {
  check_series(r)?;
  let (_, m2, m3, _) = central_moments(r);
  Ok(m3 / nonzero_variance(m2)?.powf(1.5))
}

/// Kurtosis (fourth standardized moment, not excess).
pub fn kurtosis(r: &[f64]) -> Result<f64> {
  check_series(r)?;
  let (_, m2, _, m4) = central_moments(r);
  let m2 = nonzero_variance(m2)?;
  Ok(m4 / (m2 * m2))
}

/// Result of the Jarque-Bera normality test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JarqueBeraResult {
  /// JB test statistic.
  pub statistic: f64,
  /// p-value under chi-square(2) asymptotics.
  pub p_value: f64,
}

/// Jarque-Bera test. A constant series is reported as maximally non-normal.
pub fn jarque_bera(r: &[f64]) -> Result<JarqueBeraResult> {
  check_series(r)?;
  let (_, m2, m3, m4) = central_moments(r);
  if m2 <= 0.0 {
    return Ok(JarqueBeraResult {
      statistic: f64::INFINITY,
      p_value: 0.0,
    });
  }

  let n = r.len() as f64;
  let skew = m3 / m2.powf(1.5);
  let excess = m4 / (m2 * m2) - 3.0;
  let statistic = (n / 6.0) * (skew * skew + 0.25 * excess * excess);

  let chi2 = ChiSquared::new(2.0).map_err(|e| Error::InvalidInput(e.to_string()))?;
  let p_value = (1.0 - chi2.cdf(statistic)).clamp(0.0, 1.0);

  Ok(JarqueBeraResult { statistic, p_value })
}

/// `true` when Jarque-Bera does not reject normality at `level`.
pub fn is_normal(r: &[f64], level: f64) -> Result<bool> {
  if !(level > 0.0 && level < 1.0) {
    return Err(Error::InvalidInput(format!(
      "normality level must be in (0, 1), got {level}"
    )));
  }
  Ok(jarque_bera(r)?.p_value > level)
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;

  use super::*;

  const R: [f64; 5] = [0.05, -0.02, 0.03, -0.04, 0.01];

  #[test]
  fn moments_of_small_sample() {
    assert_abs_diff_eq!(std_population(&R).unwrap(), 0.001064_f64.sqrt(), epsilon = 1e-15);
    assert_abs_diff_eq!(skewness(&R).unwrap(), -0.09127939038949097, epsilon = 1e-12);
    assert_abs_diff_eq!(kurtosis(&R).unwrap(), 1.5925433885465534, epsilon = 1e-12);
  }

  #[test]
  fn semideviation_uses_losses_only() {
    assert_abs_diff_eq!(semideviation(&R).unwrap(), 0.01, epsilon = 1e-15);
    assert_eq!(semideviation(&[0.01, 0.02]).unwrap(), 0.0);
  }

  #[test]
  fn jarque_bera_matches_closed_form() {
    let jb = jarque_bera(&R).unwrap();
    assert_abs_diff_eq!(jb.statistic, 0.41963787949240133, epsilon = 1e-12);
    // chi-square(2) survival is exp(-x / 2)
    assert_abs_diff_eq!(jb.p_value, (-jb.statistic / 2.0).exp(), epsilon = 1e-9);
    assert!(is_normal(&R, DEFAULT_NORMALITY_LEVEL).unwrap());
  }

  #[test]
  fn heavy_tails_are_not_normal() {
    let mut r = vec![0.001; 200];
    r[17] = 0.4;
    r[101] = -0.35;
    assert!(!is_normal(&r, DEFAULT_NORMALITY_LEVEL).unwrap());
  }

  #[test]
  fn degenerate_series() {
    assert!(matches!(skewness(&[]), Err(Error::EmptyInput(_))));
    assert!(matches!(kurtosis(&[0.01; 4]), Err(Error::InvalidInput(_))));
    assert_eq!(jarque_bera(&[0.01; 4]).unwrap().p_value, 0.0);
    assert!(is_normal(&R, 1.5).is_err());
  }
}
