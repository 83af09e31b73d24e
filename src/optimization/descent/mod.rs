//! descent — finite-difference gradient descent on divergence objectives.
//!
//! Purpose
//! -------
//! Fit a single Gaussian or a `k`-component mixture to a target density by
//! minimizing a divergence between the model's grid density and the
//! target. Callers pick the model kind, the objective, and a
//! [`FitOptions`]; the loop is deliberately plain (no momentum, no
//! line search) so a run is predictable and replayable.
//!
//! Key behaviors
//! -------------
//! - [`adapter::DivergenceProblem`] exposes the objective through argmin's
//!   `CostFunction` and `Gradient` traits.
//! - [`finite_diff`] supplies central differences with one step size per
//!   parameter class (mean, log-scale, logit).
//! - [`session::FitSession`] owns the state machine, the parameter vector,
//!   and the history; [`fit`] / [`fit_with_hooks`] are one-shot wrappers.
//! - [`traits`] defines the options, outcome, and the host hooks
//!   ([`ProgressObserver`], [`CancelSignal`], [`Suspend`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - The target density is read-only and normalized once when the problem
//!   is built; `θ` is owned exclusively by the session.
//! - Cancellation is polled only at the start of a step; the suspension
//!   hook runs exactly once after every completed step.
//! - Evaluation is sequential; there is no internal timeout (the step
//!   count bounds the work).
//!
//! Testing notes
//! -------------
//! - Unit tests cover option validation, hook wiring, finite-difference
//!   exactness on quadratics, state transitions, cancellation, and domain
//!   clamping.
//! - Integration tests under `tests/` check KL asymmetry, convergence
//!   toward a brute-force optimum, and mixture recovery.

pub mod adapter;
pub mod api;
pub mod finite_diff;
pub mod session;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::adapter::DivergenceProblem;
pub use self::api::{fit, fit_with_hooks};
pub use self::session::FitSession;
pub use self::traits::{
    CancelSignal, FitHooks, FitOptions, FitOutcome, FitState, NoSuspend, ProgressObserver,
    StepSnapshot, Suspend, ThreadYield,
};
pub use self::types::{Cost, Grad, LOG_SCALE_STEP, LOGIT_STEP, MEAN_STEP_FRACTION, Theta};

pub mod prelude {
    pub use super::api::{fit, fit_with_hooks};
    pub use super::session::FitSession;
    pub use super::traits::{FitHooks, FitOptions, FitOutcome, FitState, StepSnapshot};
    pub use super::types::Theta;
}
