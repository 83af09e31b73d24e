//! descent::finite_diff — central differences with per-coordinate steps.
//!
//! Purpose
//! -------
//! Approximate the gradient of a grid-based objective with respect to the
//! unconstrained parameter vector. The objective is only available as a
//! black box evaluated on a discretized grid, so analytic derivatives are
//! not offered; each coordinate is differenced with a step matched to its
//! role in the layout.
//!
//! Key behaviors
//! -------------
//! - [`fd_steps`] builds the step vector: mean coordinates use
//!   `MEAN_STEP_FRACTION × domain width`, log-scale coordinates use
//!   `LOG_SCALE_STEP`, and logits use `LOGIT_STEP`.
//! - [`central_diff`] computes `(f(θ + h eᵢ) − f(θ − h eᵢ)) / 2h` per
//!   coordinate, two objective evaluations each.
//!
//! Invariants & assumptions
//! ------------------------
//! - `steps.len() == theta.len()`, and every step is finite and > 0
//!   (guaranteed when steps come from [`fd_steps`] with a validated domain).
//! - NaN objective values flow into the gradient unchanged.
//!
//! Testing notes
//! -------------
//! - Unit tests check exactness on quadratics and the class-to-step
//!   mapping for both model kinds.
use crate::{
    density::grid::Domain,
    optimization::{
        descent::types::{Grad, LOG_SCALE_STEP, LOGIT_STEP, MEAN_STEP_FRACTION, Theta},
        reparam::{ModelKind, ParamClass},
    },
};
use ndarray::Array1;

/// Per-coordinate central-difference steps for `kind` on `domain`.
pub fn fd_steps(kind: ModelKind, domain: &Domain) -> Array1<f64> {
    let mean_step = MEAN_STEP_FRACTION * domain.width();
    kind.layout()
        .into_iter()
        .map(|class| match class {
            ParamClass::Mean => mean_step,
            ParamClass::LogScale => LOG_SCALE_STEP,
            ParamClass::Logit => LOGIT_STEP,
        })
        .collect()
}

/// Central-difference gradient of `f` at `theta` with per-coordinate `steps`.
///
/// Evaluates `f` exactly `2 · theta.len()` times. The perturbed vector is
/// reused across coordinates and restored after each one.
pub fn central_diff<F>(theta: &Theta, steps: &Array1<f64>, f: F) -> Grad
where
    F: Fn(&Theta) -> f64,
{
    let mut probe = theta.clone();
    let mut grad = Grad::zeros(theta.len());
    for (i, &h) in steps.iter().enumerate() {
        let origin = probe[i];
        probe[i] = origin + h;
        let forward = f(&probe);
        probe[i] = origin - h;
        let backward = f(&probe);
        probe[i] = origin;
        grad[i] = (forward - backward) / (2.0 * h);
    }
    grad
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use std::cell::Cell;

    #[test]
    // Purpose
    // -------
    // Central differences are exact (up to rounding) on quadratics,
    // regardless of step size.
    //
    // Given
    // -----
    // - f(θ) = 3θ₀² − 2θ₀θ₁ + θ₁ at θ = (1, −2), steps (0.1, 0.005).
    //
    // Expect
    // ------
    // - ∇f = (6θ₀ − 2θ₁, −2θ₀ + 1) = (10, −1).
    // - Four function evaluations.
    fn central_diff_is_exact_on_quadratic() {
        let calls = Cell::new(0usize);
        let f = |t: &Theta| {
            calls.set(calls.get() + 1);
            3.0 * t[0] * t[0] - 2.0 * t[0] * t[1] + t[1]
        };
        let g = central_diff(&array![1.0, -2.0], &array![0.1, 0.005], f);

        assert_abs_diff_eq!(g[0], 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(g[1], -1.0, epsilon = 1e-9);
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn steps_follow_parameter_classes() {
        let domain = Domain::new(-10.0, 10.0).unwrap();

        let single = fd_steps(ModelKind::SingleGaussian, &domain);
        assert_abs_diff_eq!(single[0], 0.02, epsilon = 1e-15);
        assert_eq!(single[1], LOG_SCALE_STEP);

        let mixture = fd_steps(ModelKind::Mixture(2), &domain);
        assert_eq!(mixture.len(), 6);
        assert_abs_diff_eq!(mixture[1], 0.02, epsilon = 1e-15);
        assert_eq!(mixture[3], LOG_SCALE_STEP);
        assert_eq!(mixture[5], LOGIT_STEP);
    }

    #[test]
    fn nan_objective_propagates() {
        let g = central_diff(&array![0.0], &array![0.01], |_| f64::NAN);
        assert!(g[0].is_nan());
    }
}
