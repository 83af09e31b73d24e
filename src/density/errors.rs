//! density::errors — invalid-configuration errors for grid densities.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias shared by the grid, mixture,
//! sampling, and divergence layers. Every variant describes a caller
//! contract violation (empty grids, non-positive spacing, mismatched
//! lengths, malformed configuration) that is reported immediately instead
//! of being repaired.
//!
//! Key behaviors
//! -------------
//! - Define [`DensityError`] and [`DensityResult`] as the canonical error
//!   surface for everything under `density` and `divergence`.
//! - Attach human-readable `Display` messages that embed the offending
//!   payload (length, index, value).
//! - Convert into a Python `ValueError` when the `python-bindings` feature
//!   is enabled.
//!
//! Conventions
//! -----------
//! - Numerical degeneracy (zero mass, `log(0)`, division by zero) is *not*
//!   an error anywhere in this crate; it is handled by ε floors and clamps.
//!   Only structurally invalid input lands here.
//! - Indices are 0-based.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for density, grid, and divergence operations.
pub type DensityResult<T> = Result<T, DensityError>;

/// Invalid-configuration conditions raised by the density layers.
#[derive(Debug, Clone, PartialEq)]
pub enum DensityError {
    // ---- Arrays ----
    /// A density array has no elements.
    EmptyDensity,

    /// Two arrays that must share a grid have different lengths.
    LengthMismatch { expected: usize, found: usize },

    /// An input value is NaN or ±∞.
    NonFiniteInput { index: usize, value: f64 },

    // ---- Grid ----
    /// Grid spacing must be finite and strictly positive.
    NonPositiveDx { dx: f64 },

    /// Grid bounds/size are malformed.
    InvalidGrid { min: f64, max: f64, len: usize, reason: &'static str },

    /// Domain bounds must be finite with `min < max`.
    InvalidDomain { min: f64, max: f64 },

    // ---- Mixture / sampling ----
    /// A component scale must be finite and > 0.
    InvalidScale { index: usize, value: f64 },

    /// Sampling needs at least one component with positive weight.
    InvalidWeights { reason: &'static str },

    /// Requested number of samples must be > 0.
    InvalidSampleCount { count: usize },

    /// Histogram bin count must be > 0.
    InvalidBinCount { bins: usize },

    // ---- Objective configuration ----
    /// Weight of a metric inside a combined objective is negative or non-finite.
    InvalidMetricWeight { index: usize, value: f64 },

    /// Metric name could not be parsed.
    UnknownMetric { name: String },
}

impl std::error::Error for DensityError {}

impl std::fmt::Display for DensityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Arrays ----
            DensityError::EmptyDensity => write!(f, "Density array is empty."),
            DensityError::LengthMismatch { expected, found } => {
                write!(f, "Length mismatch: expected {expected}, found {found}")
            }
            DensityError::NonFiniteInput { index, value } => {
                write!(f, "Input at index {index} is non-finite: {value}")
            }

            // ---- Grid ----
            DensityError::NonPositiveDx { dx } => {
                write!(f, "Grid spacing must be finite and > 0; got: {dx}")
            }
            DensityError::InvalidGrid { min, max, len, reason } => {
                write!(f, "Invalid grid [{min}, {max}] with {len} points: {reason}")
            }
            DensityError::InvalidDomain { min, max } => {
                write!(f, "Invalid domain [{min}, {max}]: bounds must be finite with min < max")
            }

            // ---- Mixture / sampling ----
            DensityError::InvalidScale { index, value } => {
                write!(f, "Component {index} has invalid scale {value}, must be finite and > 0")
            }
            DensityError::InvalidWeights { reason } => {
                write!(f, "Invalid mixture weights: {reason}")
            }
            DensityError::InvalidSampleCount { count } => {
                write!(f, "Invalid sample count {count}, must be > 0")
            }
            DensityError::InvalidBinCount { bins } => {
                write!(f, "Invalid histogram bin count {bins}, must be > 0")
            }

            // ---- Objective configuration ----
            DensityError::InvalidMetricWeight { index, value } => {
                write!(f, "Metric weight at index {index} is {value}, must be finite and >= 0")
            }
            DensityError::UnknownMetric { name } => {
                write!(f, "Unknown metric '{name}'")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<DensityError> for PyErr {
    fn from(err: DensityError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
