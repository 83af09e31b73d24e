//! density::mixture — Gaussian mixtures evaluated on a uniform grid.
//!
//! Purpose
//! -------
//! Represent a finite Gaussian mixture as an immutable value and turn it
//! into a normalized density array on a [`Grid`]. This is the model side of
//! every fit: the optimizer decodes its parameter vector into a [`Mixture`]
//! and calls [`density_on_grid`] once per objective evaluation.
//!
//! Key behaviors
//! -------------
//! - [`pdf`] sums `weight · N(x; mean, scale)` over components; weights are
//!   used as given, so callers normalize first if they need a density.
//! - [`normalize_weights`] clamps weights to `>= 0` and divides by their
//!   sum; an all-zero sum yields all-zero weights (a degenerate mixture
//!   that downstream code tolerates).
//! - [`density_on_grid`] normalizes weights, evaluates the pdf at every
//!   grid point, then renormalizes the array with the grid rule.
//!
//! Invariants & assumptions
//! ------------------------
//! - Mixtures are never mutated in place by the fitting code; a fresh
//!   value is built per evaluation.
//! - Scales are expected to be positive. The reparameterization layer
//!   floors decoded scales at `SCALE_FLOOR`, so values reaching this
//!   module from the optimizer are always valid.
//!
//! Notes
//! -----
//! - The second normalization in [`density_on_grid`] silently redistributes
//!   probability mass that falls outside the truncated grid. It is an
//!   approximation: the result integrates to 1 on the grid, but it is not
//!   the exact restriction of the continuous mixture.
use crate::density::grid::{Density, Grid, normalize_unchecked};
use statrs::consts::SQRT_2PI;

/// One Gaussian component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Component {
    pub mean: f64,
    pub scale: f64,
    pub weight: f64,
}

impl Component {
    pub fn new(mean: f64, scale: f64, weight: f64) -> Self {
        Self { mean, scale, weight }
    }
}

/// Ordered sequence of Gaussian components.
///
/// Weights need not sum to one; see [`Mixture::normalized`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mixture {
    components: Vec<Component>,
}

impl Mixture {
    pub fn new(components: Vec<Component>) -> Self {
        Self { components }
    }

    /// Single component with weight 1.
    pub fn single(mean: f64, scale: f64) -> Self {
        Self { components: vec![Component::new(mean, scale, 1.0)] }
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Copy with weights clamped and rescaled; see [`normalize_weights`].
    pub fn normalized(&self) -> Self {
        Self { components: normalize_weights(&self.components) }
    }

    /// Evaluate the (unnormalized-weight) mixture density at `x`.
    pub fn pdf(&self, x: f64) -> f64 {
        pdf(x, &self.components)
    }
}

impl From<Vec<Component>> for Mixture {
    fn from(components: Vec<Component>) -> Self {
        Self::new(components)
    }
}

/// Normal density `N(x; mean, scale)`.
#[inline]
pub fn gaussian_kernel(x: f64, mean: f64, scale: f64) -> f64 {
    let z = (x - mean) / scale;
    (-0.5 * z * z).exp() / (scale * SQRT_2PI)
}

/// Weighted sum of Gaussian kernels at `x`.
pub fn pdf(x: f64, components: &[Component]) -> f64 {
    components.iter().map(|c| c.weight * gaussian_kernel(x, c.mean, c.scale)).sum()
}

/// Clamp weights to `>= 0` and divide by their sum.
///
/// When the clamped weights sum to exactly zero every weight becomes zero;
/// no division is performed.
pub fn normalize_weights(components: &[Component]) -> Vec<Component> {
    let total: f64 = components.iter().map(|c| c.weight.max(0.0)).sum();
    components
        .iter()
        .map(|c| {
            let weight = if total > 0.0 { c.weight.max(0.0) / total } else { 0.0 };
            Component { weight, ..*c }
        })
        .collect()
}

/// Evaluate a mixture on `grid` and renormalize the result to unit mass.
///
/// Weights are normalized first; a degenerate (all-zero) mixture yields an
/// all-zero array.
pub fn density_on_grid(mixture: &Mixture, grid: &Grid) -> Density {
    let components = normalize_weights(mixture.components());
    let raw = grid.points().mapv(|x| pdf(x, &components));
    normalize_unchecked(raw.view(), grid.dx())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::density::grid::integrate;
    use approx::assert_abs_diff_eq;

    #[test]
    fn gaussian_kernel_peak_matches_closed_form() {
        let peak = gaussian_kernel(1.0, 1.0, 2.0);
        assert_abs_diff_eq!(peak, 1.0 / (2.0 * SQRT_2PI), epsilon = 1e-15);
        assert_abs_diff_eq!(
            gaussian_kernel(0.0, 1.0, 2.0),
            gaussian_kernel(2.0, 1.0, 2.0),
            epsilon = 1e-15
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify weight clamping and rescaling, including the all-zero collapse.
    //
    // Given
    // -----
    // - Weights (2, -1, 6) and weights (0, -3).
    //
    // Expect
    // ------
    // - First set becomes (0.25, 0, 0.75).
    // - Second set becomes (0, 0) rather than NaN.
    fn normalize_weights_clamps_and_handles_zero_sum() {
        let comps = vec![
            Component::new(0.0, 1.0, 2.0),
            Component::new(1.0, 1.0, -1.0),
            Component::new(2.0, 1.0, 6.0),
        ];
        let n = normalize_weights(&comps);
        assert_abs_diff_eq!(n[0].weight, 0.25);
        assert_abs_diff_eq!(n[1].weight, 0.0);
        assert_abs_diff_eq!(n[2].weight, 0.75);
        assert_abs_diff_eq!(n[2].mean, 2.0);

        let zero = normalize_weights(&[Component::new(0.0, 1.0, 0.0), Component::new(0.0, 1.0, -3.0)]);
        assert!(zero.iter().all(|c| c.weight == 0.0));
    }

    #[test]
    // Purpose
    // -------
    // Confirm that grid evaluation produces a unit-mass density even when
    // part of the analytic mass lies outside the grid.
    //
    // Given
    // -----
    // - A two-component mixture whose right component is cut by the grid edge.
    //
    // Expect
    // ------
    // - The grid integral is 1 within 1e-12 and all values are non-negative.
    fn density_on_grid_has_unit_mass() {
        let grid = Grid::new(-4.0, 2.0, 601).unwrap();
        let mixture = Mixture::new(vec![
            Component::new(-1.0, 0.5, 3.0),
            Component::new(2.0, 1.0, 1.0),
        ]);

        let y = density_on_grid(&mixture, &grid);

        assert_abs_diff_eq!(integrate(y.view(), grid.dx()).unwrap(), 1.0, epsilon = 1e-12);
        assert!(y.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn degenerate_mixture_yields_zero_density() {
        let grid = Grid::new(-1.0, 1.0, 11).unwrap();
        let mixture = Mixture::new(vec![Component::new(0.0, 1.0, 0.0)]);
        let y = density_on_grid(&mixture, &grid);
        assert!(y.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn single_constructor_has_unit_weight() {
        let m = Mixture::single(0.5, 2.0);
        assert_eq!(m.len(), 1);
        assert_eq!(m.components()[0].weight, 1.0);
        assert_abs_diff_eq!(m.pdf(0.5), gaussian_kernel(0.5, 0.5, 2.0));
    }
}
