//! # riskkit-rs
//!
//! $$
//! \min_{\mathbf{w}} \sqrt{\mathbf{w}^\top\Sigma\mathbf{w}}
//! \quad \text{s.t.} \quad \mathbf{w}^\top\boldsymbol\mu = r^\*,\ \mathbf{1}^\top\mathbf{w} = 1,\ \mathbf{0} \le \mathbf{w} \le \mathbf{1}
//! $$
//!
//! Return-series risk statistics, portfolio metrics and long-only efficient frontiers.
//!
//! ```ignore
//! use riskkit_rs::quant::portfolio::efficient_frontier;
//!
//! let er = vec![0.05, 0.08, 0.12];
//! let cov = vec![
//!   vec![0.04, 0.006, 0.0],
//!   vec![0.006, 0.09, 0.018],
//!   vec![0.0, 0.018, 0.16],
//! ];
//! let frontier = efficient_frontier(25, &er, &cov)?;
//! ```

pub mod error;
pub mod quant;
pub mod visualization;

pub use error::Error;
pub use error::Result;
