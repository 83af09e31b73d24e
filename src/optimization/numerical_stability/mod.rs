//! numerical_stability — guarded transforms between mixture space and θ-space.
//!
//! Purpose
//! -------
//! Collect the scalar and vector transforms used to move mixture
//! parameters in and out of the unconstrained optimizer coordinates, along
//! with the floors that keep them finite.
//!
//! Key behaviors
//! -------------
//! - Log-scale encoding/decoding with a lower bound on decoded scales
//!   (`SCALE_FLOOR`).
//! - Weight → logit mapping with a floor on zero weights (`LOGIT_EPS`).
//! - Max-shifted softmax (`safe_softmax`, `safe_softmax_into`).
//!
//! Conventions
//! -----------
//! - Pure numerical helpers: no logging, no I/O, no allocation beyond the
//!   returned arrays.
//! - NaN inputs propagate; callers decide whether NaN is an error.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    LOGIT_EPS, SCALE_FLOOR, decode_log_scale, encode_log_scale, safe_softmax, safe_softmax_into,
    weight_to_logit,
};

pub mod prelude {
    pub use super::transformations::{LOGIT_EPS, SCALE_FLOOR, safe_softmax};
}
