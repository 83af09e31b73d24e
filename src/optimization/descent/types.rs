//! descent::types — shared numeric aliases and step constants.
//!
//! Centralizes the `ndarray` aliases used across the descent loop and the
//! finite-difference step sizes, so the rest of the optimizer stays agnostic
//! to container details.
use ndarray::Array1;

/// Unconstrained parameter vector `θ`.
///
/// See [`crate::optimization::reparam`] for the layout.
pub type Theta = Array1<f64>;

/// Gradient of the objective with respect to `θ`; same shape as `Theta`.
pub type Grad = Array1<f64>;

/// Scalar objective value (always minimized).
pub type Cost = f64;

/// Central-difference step for a mean coordinate, as a fraction of the
/// domain width.
pub const MEAN_STEP_FRACTION: f64 = 1e-3;

/// Central-difference step for a log-scale coordinate.
pub const LOG_SCALE_STEP: f64 = 5e-3;

/// Central-difference step for a weight logit.
pub const LOGIT_STEP: f64 = 5e-3;
