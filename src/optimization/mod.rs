//! optimization — reparameterization, descent driver, and error surface.
//!
//! Purpose
//! -------
//! Fit Gaussian models to a target density by minimizing a divergence.
//! Callers choose a model kind, an objective, and step settings, and get
//! back the fitted mixture together with the per-step objective history.
//!
//! Key behaviors
//! -------------
//! - [`reparam`]: map mixtures to an unconstrained vector `θ`
//!   (`[means, ln scales, logits]`) and back.
//! - [`numerical_stability`]: guarded log-scale codec and max-shifted
//!   softmax used by the reparameterization.
//! - [`descent`]: central-difference gradient descent with observer,
//!   cancellation, and suspension hooks.
//! - [`landscape`]: brute-force objective surface for a single Gaussian.
//! - [`errors`]: [`OptError`](errors::OptError) /
//!   [`OptResult`](errors::OptResult), wrapping density-layer and argmin
//!   errors.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every `θ` decodes to a valid mixture: scales are floored, weights
//!   come from a softmax, and means are clamped into the domain after each
//!   update.
//! - Configuration errors surface before the first step; numerical
//!   degeneracy during a run is recorded, not raised.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule; end-to-end fitting behavior is
//!   covered by the integration tests under `tests/`.

pub mod descent;
pub mod errors;
pub mod landscape;
pub mod numerical_stability;
pub mod reparam;

pub mod prelude {
    pub use super::descent::prelude::*;
    pub use super::errors::{OptError, OptResult};
    pub use super::landscape::{Landscape, objective_landscape};
    pub use super::numerical_stability::prelude::*;
    pub use super::reparam::{ModelKind, pack, unpack};
}
