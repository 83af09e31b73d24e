//! Numerical stability utilities for the mixture reparameterization.
//!
//! Provides guarded versions of the transforms that map constrained mixture
//! parameters (positive scales, simplex weights) to and from unconstrained
//! optimizer coordinates. Naïve forms overflow (`exp` of large logits),
//! produce `-∞` (`ln 0`), or collapse scales to zero; the helpers here keep
//! `f64` arithmetic in a well-conditioned regime.
//!
//! # Provided items
//! - [`SCALE_FLOOR`]: smallest scale a decoded component can have (1e-3).
//! - [`LOGIT_EPS`]: floor applied to weights before taking logs (1e-12).
//! - [`encode_log_scale`] / [`decode_log_scale`]: `scale ↔ ln(scale)` with
//!   the floor applied on both sides.
//! - [`weight_to_logit`]: `w ↦ ln(max(w, LOGIT_EPS))`.
//! - [`safe_softmax`] / [`safe_softmax_into`]: max-shifted softmax.
//!
//! # Rationale
//! Plain gradient descent runs in an unconstrained space; constraints are
//! enforced only when decoding, so every vector the optimizer produces maps
//! to a valid mixture.
use ndarray::{Array1, ArrayView1, ArrayViewMut1};

/// Lower bound for decoded component scales.
///
/// Prevents a component from collapsing onto a single grid cell, where the
/// density would degenerate into a spike and the objective becomes
/// dominated by discretization error.
pub const SCALE_FLOOR: f64 = 1e-3;

/// Floor for weights before they are mapped to logits.
///
/// A zero weight would map to `-∞`; flooring keeps the logit finite while
/// softmax still returns a weight indistinguishable from zero.
pub const LOGIT_EPS: f64 = 1e-12;

/// Map a scale to optimizer space: `ln(max(scale, SCALE_FLOOR))`.
#[inline]
pub fn encode_log_scale(scale: f64) -> f64 {
    scale.max(SCALE_FLOOR).ln()
}

/// Map a log-scale coordinate back to a scale: `max(exp(x), SCALE_FLOOR)`.
///
/// NaN input stays NaN.
#[inline]
pub fn decode_log_scale(x: f64) -> f64 {
    let scale = x.exp();
    if scale < SCALE_FLOOR { SCALE_FLOOR } else { scale }
}

/// Map a (normalized) weight to a logit: `ln(max(w, LOGIT_EPS))`.
#[inline]
pub fn weight_to_logit(w: f64) -> f64 {
    w.max(LOGIT_EPS).ln()
}

/// Numerically stable softmax written into `out`.
///
/// Subtracts the maximum logit before exponentiating so that large logits
/// cannot overflow. `out` and `logits` must have the same length; empty
/// input leaves `out` untouched.
pub fn safe_softmax_into(out: &mut ArrayViewMut1<'_, f64>, logits: ArrayView1<'_, f64>) {
    if logits.is_empty() {
        return;
    }
    let max = logits.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
    let mut total = 0.0;
    for (o, &l) in out.iter_mut().zip(logits.iter()) {
        *o = (l - max).exp();
        total += *o;
    }
    out.mapv_inplace(|v| v / total);
}

/// Numerically stable softmax returning a fresh array.
pub fn safe_softmax(logits: ArrayView1<'_, f64>) -> Array1<f64> {
    let mut out = Array1::zeros(logits.len());
    safe_softmax_into(&mut out.view_mut(), logits);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Softmax agrees with the naïve formula on safe inputs and sums to one.
    //
    // Given
    // -----
    // - Logits (0, ln 2, ln 5).
    //
    // Expect
    // ------
    // - Weights (1/8, 2/8, 5/8).
    fn softmax_matches_naive_formula() {
        let logits = array![0.0, 2.0_f64.ln(), 5.0_f64.ln()];
        let w = safe_softmax(logits.view());
        assert_abs_diff_eq!(w[0], 0.125, epsilon = 1e-15);
        assert_abs_diff_eq!(w[1], 0.25, epsilon = 1e-15);
        assert_abs_diff_eq!(w[2], 0.625, epsilon = 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // The max shift keeps huge logits from overflowing.
    //
    // Given
    // -----
    // - Logits (1000, 1000, 0).
    //
    // Expect
    // ------
    // - Finite weights (0.5, 0.5, ~0).
    fn softmax_is_stable_for_large_logits() {
        let w = safe_softmax(array![1000.0, 1000.0, 0.0].view());
        assert!(w.iter().all(|v| v.is_finite()));
        assert_abs_diff_eq!(w[0], 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(w[2], 0.0, epsilon = 1e-300);
    }

    #[test]
    fn log_scale_codec_applies_floor() {
        assert_abs_diff_eq!(decode_log_scale(encode_log_scale(2.5)), 2.5, epsilon = 1e-14);
        assert_eq!(decode_log_scale(-50.0), SCALE_FLOOR);
        assert_eq!(encode_log_scale(0.0), SCALE_FLOOR.ln());
        assert!(decode_log_scale(f64::NAN).is_nan());
    }

    #[test]
    fn zero_weight_maps_to_finite_logit() {
        assert_eq!(weight_to_logit(0.0), LOGIT_EPS.ln());
        assert_abs_diff_eq!(weight_to_logit(0.25), 0.25_f64.ln());
    }
}
