//! Validation helpers for the descent loop.
//!
//! - **Configuration checks**: [`verify_step_count`], [`verify_learning_rate`]
//!   reject unusable [`FitOptions`](super::traits::FitOptions) values.
//! - **Gradient checks**: [`validate_grad`] enforces the gradient dimension;
//!   [`first_non_finite`] locates NaN/∞ entries for diagnostics without
//!   turning them into errors.
use crate::optimization::{
    descent::types::Grad,
    errors::{OptError, OptResult},
};

/// Require at least one descent step.
///
/// # Errors
/// [`OptError::InvalidStepCount`] if `steps == 0`.
pub fn verify_step_count(steps: usize) -> OptResult<()> {
    if steps == 0 {
        return Err(OptError::InvalidStepCount {
            steps,
            reason: "Step count must be greater than zero.",
        });
    }
    Ok(())
}

/// Require a finite, strictly positive learning rate.
///
/// # Errors
/// [`OptError::InvalidLearningRate`] if the value is non-finite or ≤ 0.0.
pub fn verify_learning_rate(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::InvalidLearningRate {
            value,
            reason: "Learning rate must be finite.",
        });
    }
    if value <= 0.0 {
        return Err(OptError::InvalidLearningRate {
            value,
            reason: "Learning rate must be positive.",
        });
    }
    Ok(())
}

/// Validate the dimension of a gradient vector.
///
/// Non-finite entries are allowed through: a NaN objective propagates into
/// the parameters and the recorded history rather than aborting the run.
///
/// # Errors
/// [`OptError::GradientDimMismatch`] if `grad.len() != dim`.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    Ok(())
}

/// Index and value of the first non-finite gradient entry, if any.
pub fn first_non_finite(grad: &Grad) -> Option<(usize, f64)> {
    grad.iter().enumerate().find(|(_, v)| !v.is_finite()).map(|(i, &v)| (i, v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn configuration_checks_reject_bad_values() {
        assert!(verify_step_count(1).is_ok());
        assert!(matches!(verify_step_count(0), Err(OptError::InvalidStepCount { steps: 0, .. })));

        assert!(verify_learning_rate(0.05).is_ok());
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                verify_learning_rate(bad),
                Err(OptError::InvalidLearningRate { .. })
            ));
        }
    }

    #[test]
    // Purpose
    // -------
    // Gradient validation checks shape only; non-finite entries are
    // reported separately.
    //
    // Given
    // -----
    // - A length-3 gradient containing NaN at index 1.
    //
    // Expect
    // ------
    // - `validate_grad(_, 3)` is `Ok`, `validate_grad(_, 2)` fails.
    // - `first_non_finite` returns index 1.
    fn grad_checks_shape_and_reports_nan() {
        let g = array![0.1, f64::NAN, -0.2];
        assert!(validate_grad(&g, 3).is_ok());
        assert_eq!(
            validate_grad(&g, 2),
            Err(OptError::GradientDimMismatch { expected: 2, found: 3 })
        );
        let (index, value) = first_non_finite(&g).unwrap();
        assert_eq!(index, 1);
        assert!(value.is_nan());
        assert!(first_non_finite(&array![1.0, 2.0]).is_none());
    }
}
