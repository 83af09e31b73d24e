//! density::grid — uniform-grid integration primitives.
//!
//! Purpose
//! -------
//! Fix one discretization rule for every integral in the crate: a left
//! Riemann sum with uniform spacing `dx`. Normalization, cumulative
//! integration (CDFs), and scalar integration all go through this module,
//! so every divergence shares the same convention and cross-metric
//! comparisons stay meaningful.
//!
//! Key behaviors
//! -------------
//! - [`Grid`] stores validated bounds, spacing, and the sample positions
//!   `x_i = min + i·dx` (both ends included).
//! - [`Domain`] stores validated `[min, max]` bounds used to clamp means
//!   during optimization.
//! - [`integrate`] computes `Σ y_i · dx`.
//! - [`normalize`] divides by the integral when it is positive and returns
//!   the input unchanged otherwise (a zero density stays zero, never NaN).
//! - [`cumulative`] computes the running sum and rescales it so the final
//!   entry is exactly 1, absorbing discretization drift before the result
//!   is used as a CDF.
//!
//! Invariants & assumptions
//! ------------------------
//! - `dx` is finite and strictly positive; the public helpers check this
//!   and fail fast with [`DensityError::NonPositiveDx`].
//! - Arrays are non-empty; empty input is [`DensityError::EmptyDensity`].
//! - Values are not required to be finite; NaN propagates arithmetically.
//!
//! Conventions
//! -----------
//! - The checked public functions are thin wrappers around crate-internal
//!   unchecked kernels used on the optimizer hot path, where the grid has
//!   already been validated once.
use crate::density::errors::{DensityError, DensityResult};
use ndarray::{Array1, ArrayView1};

/// Density sampled on a uniform grid.
pub type Density = Array1<f64>;

/// Grid — validated uniform grid `x_i = min + i·dx`, `i = 0..n`.
///
/// Invariants
/// ----------
/// - `min < max`, both finite.
/// - `n >= 2`, so `dx = (max - min) / (n - 1)` is finite and > 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    min: f64,
    max: f64,
    dx: f64,
    points: Array1<f64>,
}

impl Grid {
    /// Build a grid of `n` points spanning `[min, max]` inclusive.
    ///
    /// # Errors
    /// - [`DensityError::InvalidGrid`] when a bound is non-finite, `min >= max`,
    ///   or `n < 2`.
    pub fn new(min: f64, max: f64, n: usize) -> DensityResult<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(DensityError::InvalidGrid {
                min,
                max,
                len: n,
                reason: "Grid bounds must be finite.",
            });
        }
        if min >= max {
            return Err(DensityError::InvalidGrid {
                min,
                max,
                len: n,
                reason: "Grid bounds must satisfy min < max.",
            });
        }
        if !(max - min).is_finite() {
            return Err(DensityError::InvalidGrid {
                min,
                max,
                len: n,
                reason: "Grid width overflows f64.",
            });
        }
        if n < 2 {
            return Err(DensityError::InvalidGrid {
                min,
                max,
                len: n,
                reason: "Grid needs at least two points.",
            });
        }
        let dx = (max - min) / (n - 1) as f64;
        let points = Array1::from_shape_fn(n, |i| min + i as f64 * dx);
        Ok(Self { min, max, dx, points })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; a valid grid holds at least two points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &Array1<f64> {
        &self.points
    }

    /// The grid extent as a clamping domain.
    pub fn domain(&self) -> Domain {
        Domain { min: self.min, max: self.max }
    }

    /// Fail with [`DensityError::LengthMismatch`] unless `y` matches the grid,
    /// or with [`DensityError::NonFiniteInput`] on the first NaN/±∞ entry.
    pub fn check_len(&self, y: ArrayView1<'_, f64>) -> DensityResult<()> {
        if y.len() != self.len() {
            return Err(DensityError::LengthMismatch { expected: self.len(), found: y.len() });
        }
        check_finite(y)
    }
}

/// Domain — validated interval `[min, max]` with `min < max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    /// # Errors
    /// [`DensityError::InvalidDomain`] if a bound is non-finite, `min >= max`,
    /// or the width overflows.
    pub fn new(min: f64, max: f64) -> DensityResult<Self> {
        if !min.is_finite() || !max.is_finite() || min >= max || !(max - min).is_finite() {
            return Err(DensityError::InvalidDomain { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }
}

/// Integrate a density with the left Riemann rule: `Σ y_i · dx`.
///
/// # Errors
/// - [`DensityError::NonPositiveDx`] if `dx` is not finite and > 0.
/// - [`DensityError::EmptyDensity`] if `y` is empty.
pub fn integrate(y: ArrayView1<'_, f64>, dx: f64) -> DensityResult<f64> {
    check_inputs(y, dx)?;
    Ok(riemann_sum(y, dx))
}

/// Rescale `y` to unit mass; zero-mass input is returned unchanged.
///
/// # Errors
/// Same as [`integrate`].
pub fn normalize(y: ArrayView1<'_, f64>, dx: f64) -> DensityResult<Density> {
    check_inputs(y, dx)?;
    Ok(normalize_unchecked(y, dx))
}

/// Cumulative integral of `y`, rescaled so that the last entry equals 1.
///
/// If the total mass is not positive the raw running sum is returned.
///
/// # Errors
/// Same as [`integrate`].
pub fn cumulative(y: ArrayView1<'_, f64>, dx: f64) -> DensityResult<Density> {
    check_inputs(y, dx)?;
    Ok(cumulative_unchecked(y, dx))
}

// ---- Unchecked kernels (grid already validated) ----

pub(crate) fn riemann_sum(y: ArrayView1<'_, f64>, dx: f64) -> f64 {
    y.sum() * dx
}

pub(crate) fn normalize_unchecked(y: ArrayView1<'_, f64>, dx: f64) -> Density {
    let mass = riemann_sum(y, dx);
    if mass > 0.0 { y.mapv(|v| v / mass) } else { y.to_owned() }
}

pub(crate) fn cumulative_unchecked(y: ArrayView1<'_, f64>, dx: f64) -> Density {
    let mut acc = 0.0;
    let mut c: Density = y
        .iter()
        .map(|&v| {
            acc += v * dx;
            acc
        })
        .collect();
    let total = c[c.len() - 1];
    if total > 0.0 {
        c.mapv_inplace(|v| v / total);
    }
    c
}

/// First NaN/±∞ entry of `y` as [`DensityError::NonFiniteInput`].
pub(crate) fn check_finite(y: ArrayView1<'_, f64>) -> DensityResult<()> {
    match y.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(DensityError::NonFiniteInput { index, value: y[index] }),
        None => Ok(()),
    }
}

fn check_inputs(y: ArrayView1<'_, f64>, dx: f64) -> DensityResult<()> {
    if !dx.is_finite() || dx <= 0.0 {
        return Err(DensityError::NonPositiveDx { dx });
    }
    if y.is_empty() {
        return Err(DensityError::EmptyDensity);
    }
    Ok(())
}
