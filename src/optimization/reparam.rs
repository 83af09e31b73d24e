//! optimization::reparam — mixture ↔ unconstrained parameter vector.
//!
//! Purpose
//! -------
//! Give the optimizer a flat, unconstrained `θ` to differentiate while the
//! rest of the crate works with [`Mixture`] values. Scales are carried as
//! logarithms and weights as softmax logits, so every `θ` decodes to a valid
//! mixture.
//!
//! Layout
//! ------
//! - Single Gaussian: `θ = [mean, ln scale]`.
//! - `k`-component mixture: `θ = [mean_0..mean_k, ln scale_0..ln scale_k,
//!   logit_0..logit_k]`, length `3k`.
//!
//! Conventions
//! -----------
//! - Decoding floors scales at [`SCALE_FLOOR`] and maps logits through a
//!   max-shifted softmax, so decoded weights are non-negative and sum to 1.
//! - Encoding pads a short initial mixture with `{mean 0, scale 1,
//!   weight 1/k}` components and drops components beyond `k`.
//!
//! [`SCALE_FLOOR`]: crate::optimization::numerical_stability::transformations::SCALE_FLOOR
use crate::{
    density::mixture::{Component, Mixture, normalize_weights},
    optimization::{
        descent::types::Theta,
        errors::{OptError, OptResult},
        numerical_stability::transformations::{
            decode_log_scale, encode_log_scale, safe_softmax, weight_to_logit,
        },
    },
};
use ndarray::{Array1, s};

/// Which model family the optimizer is fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    SingleGaussian,
    /// Mixture with the given number of components (`>= 1`).
    Mixture(usize),
}

/// Role of one coordinate of `θ`; selects its finite-difference step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamClass {
    Mean,
    LogScale,
    Logit,
}

impl ModelKind {
    /// Reject `Mixture(0)`.
    ///
    /// # Errors
    /// [`OptError::InvalidComponentCount`] when the mixture has no components.
    pub fn validate(&self) -> OptResult<()> {
        if let ModelKind::Mixture(0) = self {
            return Err(OptError::InvalidComponentCount {
                count: 0,
                reason: "Mixture models need at least one component.",
            });
        }
        Ok(())
    }

    /// Number of Gaussian components.
    pub fn components(&self) -> usize {
        match self {
            ModelKind::SingleGaussian => 1,
            ModelKind::Mixture(k) => *k,
        }
    }

    /// Length of `θ` for this model.
    pub fn dim(&self) -> usize {
        match self {
            ModelKind::SingleGaussian => 2,
            ModelKind::Mixture(k) => 3 * k,
        }
    }

    /// Class of every coordinate of `θ`, in order.
    pub fn layout(&self) -> Vec<ParamClass> {
        let k = self.components();
        let mut classes = vec![ParamClass::Mean; k];
        classes.extend(std::iter::repeat(ParamClass::LogScale).take(k));
        if let ModelKind::Mixture(_) = self {
            classes.extend(std::iter::repeat(ParamClass::Logit).take(k));
        }
        classes
    }

    /// Check that `theta` has the length this layout expects.
    ///
    /// # Errors
    /// [`OptError::ThetaLengthMismatch`] otherwise.
    pub fn check_theta(&self, theta: &Theta) -> OptResult<()> {
        if theta.len() != self.dim() {
            return Err(OptError::ThetaLengthMismatch { expected: self.dim(), actual: theta.len() });
        }
        Ok(())
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelKind::SingleGaussian => write!(f, "single Gaussian"),
            ModelKind::Mixture(k) => write!(f, "{k}-component mixture"),
        }
    }
}

/// Encode `mixture` as an unconstrained parameter vector for `kind`.
///
/// For [`ModelKind::SingleGaussian`] only the first component's mean and
/// scale are used (an empty mixture encodes as `{0, 1}`). For
/// [`ModelKind::Mixture`] the first `k` components are kept, missing ones
/// are synthesized as `{0, 1, 1/k}`, and the kept weights are clamped and
/// renormalized before taking logs.
///
/// # Errors
/// - [`OptError::InvalidComponentCount`] for `Mixture(0)`.
/// - [`OptError::InvalidInitialComponent`] for a non-finite mean or a scale
///   that is not finite and positive.
pub fn pack(kind: ModelKind, mixture: &Mixture) -> OptResult<Theta> {
    kind.validate()?;
    let k = kind.components();
    let filler = Component::new(0.0, 1.0, 1.0 / k as f64);
    let mut kept: Vec<Component> = mixture.components().iter().take(k).copied().collect();
    kept.resize(k, filler);

    for (index, c) in kept.iter().enumerate() {
        if !c.mean.is_finite() {
            return Err(OptError::InvalidInitialComponent {
                index,
                value: c.mean,
                reason: "Mean must be finite.",
            });
        }
        if !c.scale.is_finite() || c.scale <= 0.0 {
            return Err(OptError::InvalidInitialComponent {
                index,
                value: c.scale,
                reason: "Scale must be finite and positive.",
            });
        }
    }

    let mut theta = Array1::zeros(kind.dim());
    for (i, c) in kept.iter().enumerate() {
        theta[i] = c.mean;
        theta[k + i] = encode_log_scale(c.scale);
    }
    if let ModelKind::Mixture(_) = kind {
        for (i, c) in normalize_weights(&kept).iter().enumerate() {
            theta[2 * k + i] = weight_to_logit(c.weight);
        }
    }
    Ok(theta)
}

/// Decode `theta` back into a mixture for `kind`.
///
/// Scales are floored at `SCALE_FLOOR`; weights come from a stable softmax
/// and sum to 1. A single Gaussian decodes with weight 1.
///
/// # Errors
/// - [`OptError::InvalidComponentCount`] for `Mixture(0)`.
/// - [`OptError::ThetaLengthMismatch`] if `theta.len() != kind.dim()`.
pub fn unpack(kind: ModelKind, theta: &Theta) -> OptResult<Mixture> {
    kind.validate()?;
    kind.check_theta(theta)?;
    Ok(unpack_unchecked(kind, theta))
}

/// Decode without validating `kind` or the length of `theta`.
pub(crate) fn unpack_unchecked(kind: ModelKind, theta: &Theta) -> Mixture {
    let k = kind.components();
    let weights = match kind {
        ModelKind::SingleGaussian => Array1::ones(1),
        ModelKind::Mixture(_) => safe_softmax(theta.slice(s![2 * k..3 * k])),
    };
    let components = (0..k)
        .map(|i| Component::new(theta[i], decode_log_scale(theta[k + i]), weights[i]))
        .collect();
    Mixture::new(components)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::numerical_stability::transformations::SCALE_FLOOR;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn layout_matches_dimension() {
        assert_eq!(ModelKind::SingleGaussian.layout(), vec![ParamClass::Mean, ParamClass::LogScale]);
        let layout = ModelKind::Mixture(2).layout();
        assert_eq!(layout.len(), ModelKind::Mixture(2).dim());
        assert_eq!(
            layout,
            vec![
                ParamClass::Mean,
                ParamClass::Mean,
                ParamClass::LogScale,
                ParamClass::LogScale,
                ParamClass::Logit,
                ParamClass::Logit,
            ]
        );
    }

    #[test]
    // Purpose
    // -------
    // Encoding then decoding a mixture returns the same components with
    // normalized weights.
    //
    // Given
    // -----
    // - Three components with weights (1, 2, 1).
    //
    // Expect
    // ------
    // - Means and scales reproduced; weights (0.25, 0.5, 0.25).
    fn mixture_round_trips_with_normalized_weights() {
        let m = Mixture::new(vec![
            Component::new(-2.0, 0.5, 1.0),
            Component::new(0.5, 1.5, 2.0),
            Component::new(3.0, 0.8, 1.0),
        ]);
        let theta = pack(ModelKind::Mixture(3), &m).unwrap();
        let back = unpack(ModelKind::Mixture(3), &theta).unwrap();

        let expected_weights = [0.25, 0.5, 0.25];
        for ((a, b), w) in m.components().iter().zip(back.components()).zip(expected_weights) {
            assert_abs_diff_eq!(a.mean, b.mean, epsilon = 1e-12);
            assert_abs_diff_eq!(a.scale, b.scale, epsilon = 1e-12);
            assert_abs_diff_eq!(b.weight, w, epsilon = 1e-12);
        }
    }

    #[test]
    fn single_gaussian_round_trips_and_ignores_extras() {
        let m = Mixture::new(vec![Component::new(1.5, 0.7, 0.3), Component::new(9.0, 9.0, 9.0)]);
        let theta = pack(ModelKind::SingleGaussian, &m).unwrap();
        assert_eq!(theta.len(), 2);
        assert_abs_diff_eq!(theta[1], 0.7_f64.ln(), epsilon = 1e-15);

        let back = unpack(ModelKind::SingleGaussian, &theta).unwrap();
        assert_eq!(back.len(), 1);
        assert_abs_diff_eq!(back.components()[0].mean, 1.5);
        assert_abs_diff_eq!(back.components()[0].scale, 0.7, epsilon = 1e-12);
        assert_eq!(back.components()[0].weight, 1.0);
    }

    #[test]
    // Purpose
    // -------
    // Short initial mixtures are padded, long ones truncated.
    //
    // Given
    // -----
    // - One component {2, 0.5, 1} packed as a 3-component mixture.
    // - Three components packed as a 2-component mixture.
    //
    // Expect
    // ------
    // - Padded components are {0, 1} and all weights are renormalized.
    // - Truncation keeps the first two components only.
    fn pack_pads_and_truncates() {
        let short = Mixture::single(2.0, 0.5);
        let back = unpack(ModelKind::Mixture(3), &pack(ModelKind::Mixture(3), &short).unwrap())
            .unwrap();
        assert_eq!(back.len(), 3);
        assert_abs_diff_eq!(back.components()[1].mean, 0.0);
        assert_abs_diff_eq!(back.components()[2].scale, 1.0, epsilon = 1e-12);
        // Raw weights (1, 1/3, 1/3) normalize to (0.6, 0.2, 0.2).
        assert_abs_diff_eq!(back.components()[0].weight, 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(back.components()[1].weight, 0.2, epsilon = 1e-12);

        let long = Mixture::new(vec![
            Component::new(-1.0, 1.0, 1.0),
            Component::new(1.0, 1.0, 1.0),
            Component::new(5.0, 1.0, 1.0),
        ]);
        let back =
            unpack(ModelKind::Mixture(2), &pack(ModelKind::Mixture(2), &long).unwrap()).unwrap();
        assert_eq!(back.len(), 2);
        assert_abs_diff_eq!(back.components()[1].mean, 1.0);
    }

    #[test]
    fn decoding_applies_scale_floor_and_softmax() {
        let theta = array![0.0, 1.0, -40.0, 0.0, 1000.0, 1000.0];
        let m = unpack(ModelKind::Mixture(2), &theta).unwrap();
        assert_eq!(m.components()[0].scale, SCALE_FLOOR);
        assert_abs_diff_eq!(m.components()[0].weight, 0.5, epsilon = 1e-15);
        let total: f64 = m.components().iter().map(|c| c.weight).sum();
        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-15);
    }

    #[test]
    fn invalid_layouts_are_rejected() {
        assert!(matches!(
            ModelKind::Mixture(0).validate(),
            Err(OptError::InvalidComponentCount { count: 0, .. })
        ));
        assert!(matches!(
            unpack(ModelKind::Mixture(2), &array![0.0, 1.0]),
            Err(OptError::ThetaLengthMismatch { expected: 6, actual: 2 })
        ));
        assert!(matches!(
            pack(ModelKind::SingleGaussian, &Mixture::single(0.0, -1.0)),
            Err(OptError::InvalidInitialComponent { index: 0, .. })
        ));
    }
}
