//! optimization::errors — unified error surface for fitting.
//!
//! Configuration mistakes (step counts, learning rates, component counts,
//! parameter-vector lengths), density-layer validation failures, and
//! backend errors raised through argmin's `CostFunction`/`Gradient` traits
//! all collapse into [`OptError`].
//!
//! Non-finite objective values are deliberately absent: a NaN or infinite
//! objective is recorded in the run history rather than raised.
use crate::density::errors::DensityError;
use argmin::core::{ArgminError, Error};
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// Gradient dimensions do not match parameter dimensions.
    GradientDimMismatch { expected: usize, found: usize },

    // ---- FitOptions ----
    /// Number of descent steps must be positive.
    InvalidStepCount { steps: usize, reason: &'static str },
    /// Learning rate must be finite and positive.
    InvalidLearningRate { value: f64, reason: &'static str },

    // ---- Model layout ----
    /// Mixture models need at least one component.
    InvalidComponentCount { count: usize, reason: &'static str },
    /// Parameter vector length does not match the model layout.
    ThetaLengthMismatch { expected: usize, actual: usize },
    /// Initial component carries a non-finite mean or an invalid scale.
    InvalidInitialComponent { index: usize, value: f64, reason: &'static str },

    // ---- Density layer ----
    /// Grid, target, or objective configuration was rejected.
    Density { source: DensityError },

    // ---- Argmin ----
    /// Invalid argument to an optimizer routine; also wraps
    /// argmin::InvalidParameter.
    InvalidParameter { text: String },
    /// Any other error surfacing through argmin's traits.
    BackendError { text: String },
}

impl std::error::Error for OptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OptError::Density { source } => Some(source),
            _ => None,
        }
    }
}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Gradient ----
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }

            // ---- FitOptions ----
            OptError::InvalidStepCount { steps, reason } => {
                write!(f, "Invalid step count {steps}: {reason}")
            }
            OptError::InvalidLearningRate { value, reason } => {
                write!(f, "Invalid learning rate {value}: {reason}")
            }

            // ---- Model layout ----
            OptError::InvalidComponentCount { count, reason } => {
                write!(f, "Invalid component count {count}: {reason}")
            }
            OptError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, actual {actual}")
            }
            OptError::InvalidInitialComponent { index, value, reason } => {
                write!(f, "Invalid initial component {index} ({value}): {reason}")
            }

            // ---- Density layer ----
            OptError::Density { source } => write!(f, "{source}"),

            // ---- Argmin ----
            OptError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }
        }
    }
}

impl From<Error> for OptError {
    /// Recover an [`OptError`] that was boxed on its way through argmin.
    /// Anything else keeps only its message.
    fn from(original_err: Error) -> Self {
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast::<ArgminError>() {
            Ok(ArgminError::InvalidParameter { text }) => OptError::InvalidParameter { text },
            Ok(argmin_err) => OptError::BackendError { text: argmin_err.to_string() },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

impl From<DensityError> for OptError {
    fn from(source: DensityError) -> Self {
        OptError::Density { source }
    }
}

#[cfg(feature = "python-bindings")]
impl From<OptError> for PyErr {
    fn from(err: OptError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
