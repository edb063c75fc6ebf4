//! # Errors
//!
//! $$
//! \text{inputs} \to \text{Result}\langle T, \text{Error} \rangle
//! $$
//!
//! Input validation failures shared by the metrics, optimizer and statistics modules.
//! Solver non-convergence is not an error: it is reported on the optimization result.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised before or while evaluating portfolio and risk computations.
#[derive(Error, Debug)]
pub enum Error {
  /// Two inputs that must share a length do not.
  #[error("dimension mismatch for {what}: expected {expected}, got {actual}")]
  DimensionMismatch {
    /// Name of the offending input.
    what: &'static str,
    /// Required length.
    expected: usize,
    /// Supplied length.
    actual: usize,
  },

  /// A covariance matrix row has the wrong number of columns.
  #[error("covariance matrix is not square: row {row} has {cols} columns, expected {rows}")]
  NonSquareCovariance {
    /// Number of rows.
    rows: usize,
    /// Index of the offending row.
    row: usize,
    /// Columns found in that row.
    cols: usize,
  },

  /// Too few assets to trace a frontier.
  #[error("degenerate universe: need at least {required} assets, got {assets}")]
  DegenerateUniverse {
    /// Minimum number of assets.
    required: usize,
    /// Supplied number of assets.
    assets: usize,
  },

  /// The two-asset sweep was asked to handle a different universe size.
  #[error("the two-asset frontier requires exactly 2 assets, got {assets}")]
  TwoAssetsRequired {
    /// Supplied number of assets.
    assets: usize,
  },

  /// A series or vector with no elements.
  #[error("{0} must not be empty")]
  EmptyInput(&'static str),

  /// Not enough observations for a statistic.
  #[error("insufficient data: need at least {required} observations, got {actual}")]
  InsufficientData {
    /// Minimum number of observations.
    required: usize,
    /// Supplied number of observations.
    actual: usize,
  },

  /// Anything else that makes an input unusable (non-finite values, bad levels, ...).
  #[error("invalid input: {0}")]
  InvalidInput(String),

  /// The quadratic solver rejected its settings or problem data.
  #[error("quadratic solver: {0}")]
  Solver(String),
}
