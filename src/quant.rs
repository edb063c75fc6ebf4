//! # Quant
//!
//! $$
//! \mu_p = \mathbf{w}^\top\boldsymbol\mu,\qquad \sigma_p = \sqrt{\mathbf{w}^\top\Sigma\mathbf{w}}
//! $$
//!
pub mod portfolio;
pub mod risk;
