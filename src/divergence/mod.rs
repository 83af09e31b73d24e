//! divergence — grid-based divergence metrics and optimizer objectives.
//!
//! Purpose
//! -------
//! Compare two densities sampled on the same uniform grid. The metrics here
//! are the building blocks of both the side-by-side comparison report and
//! the scalar objectives minimized by the optimization layer.
//!
//! Key behaviors
//! -------------
//! - [`metrics`]: [`DensityPair`] (validated pair of views plus `dx`), the
//!   individual metric kernels, and the all-at-once [`DivergenceReport`].
//! - [`objective`]: [`Metric`] selection (parseable from strings), weighted
//!   [`Objective`] combinations, and the resolved function-pointer form used
//!   in the descent loop.
//!
//! Invariants & assumptions
//! ------------------------
//! - `P` is the first argument and `Q` the second; during fitting `P` is the
//!   candidate model and `Q` the fixed target, so `KL(P‖Q)` is the
//!   mode-seeking direction.
//! - Every `ln(a / b)` is evaluated as `ln((a + ε) / (b + ε))` with
//!   `ε = DENSITY_EPS`; no metric returns NaN on zero-mass regions unless
//!   the inputs themselves contain NaN.
//!
//! Testing notes
//! -------------
//! - Unit tests check closed-form values (disjoint supports, shifted point
//!   masses, uniform entropy) and cross-metric identities such as
//!   `H(P, Q) = H(P) + KL(P‖Q)`.

pub mod metrics;
pub mod objective;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::metrics::{
    DENSITY_EPS, DensityPair, DivergenceReport, cross_entropy, entropy, hellinger, jensen_shannon,
    kl_divergence, total_variation, wasserstein,
};
pub use self::objective::{Metric, Objective, ResolvedObjective};

pub mod prelude {
    pub use super::metrics::{DensityPair, DivergenceReport};
    pub use super::objective::{Metric, Objective};
}
