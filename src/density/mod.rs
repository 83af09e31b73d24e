//! density — uniform grids, Gaussian mixtures, and sampling helpers.
//!
//! Purpose
//! -------
//! Provide the numerical substrate shared by the divergence and
//! optimization layers: a single left-Riemann integration convention on a
//! uniform grid, closed-form Gaussian mixture densities evaluated on that
//! grid, and reproducible sampling/histogram utilities for display.
//!
//! Key behaviors
//! -------------
//! - [`grid`]: validated [`Grid`]/[`Domain`] types plus `integrate`,
//!   `normalize`, and drift-corrected `cumulative`.
//! - [`mixture`]: immutable [`Mixture`] values, weight normalization, and
//!   grid evaluation with a second renormalization pass.
//! - [`sampling`]: mixture sampling with an injected `rand::Rng` and
//!   fixed-width histograms.
//! - [`errors`]: [`DensityError`] / [`DensityResult`] for invalid
//!   configuration.
//!
//! Invariants & assumptions
//! ------------------------
//! - Grid spacing is validated once at construction; hot-path kernels
//!   assume it is finite and positive.
//! - Zero-mass densities are legal values and never produce NaN through
//!   normalization.
//!
//! Testing notes
//! -------------
//! - Unit tests in each submodule cover validation failures, unit-mass
//!   guarantees, and seeded sampling reproducibility.

pub mod errors;
pub mod grid;
pub mod mixture;
pub mod sampling;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{DensityError, DensityResult};
pub use self::grid::{Density, Domain, Grid, cumulative, integrate, normalize};
pub use self::mixture::{Component, Mixture, density_on_grid, normalize_weights, pdf};
pub use self::sampling::{Histogram, sample_mixture};

pub mod prelude {
    pub use super::errors::{DensityError, DensityResult};
    pub use super::grid::{Density, Domain, Grid};
    pub use super::mixture::{Component, Mixture, density_on_grid};
}
