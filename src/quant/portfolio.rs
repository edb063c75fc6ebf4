//! # Portfolio
//!
//! $$
//! \sigma_p^2 = \mathbf{w}^\top \Sigma \mathbf{w}
//! $$
//!
//! Mean-variance analytics: portfolio metrics, the long-only minimum-volatility solver and
//! efficient frontier construction.

pub mod data;
pub mod engine;
pub mod frontier;
pub mod metrics;
pub mod minimizer;
pub mod qp;
pub mod types;

pub use data::NamedValue;
pub use data::ReturnTable;
pub use data::align_return_series;
pub use data::covariance_from_correlation;
pub use data::simple_returns_series;
pub use engine::FrontierConfig;
pub use engine::FrontierEngine;
pub use frontier::FrontierStrategy;
pub use frontier::efficient_frontier;
pub use frontier::efficient_frontier_two_asset;
pub use frontier::efficient_frontier_with;
pub use frontier::optimal_weights;
pub use frontier::optimal_weights_with;
pub use frontier::target_returns;
pub use metrics::portfolio_return;
pub use metrics::portfolio_variance;
pub use metrics::portfolio_volatility;
pub use metrics::uniform_weights;
pub use minimizer::minimize_volatility;
pub use minimizer::minimize_volatility_with;
pub use minimizer::validate_market;
pub use qp::QpConfig;
pub use types::ConvergenceStatus;
pub use types::Frontier;
pub use types::FrontierPoint;
pub use types::OptimizationResult;
