//! rust_divergences — grid-based divergence metrics and Gaussian-mixture fitting.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the divergence report and the mixture fitter to Python via the
//! `_rust_divergences` extension module (behind the `python-bindings`
//! feature).
//!
//! Key behaviors
//! -------------
//! - [`density`]: uniform grids, left-Riemann integration, Gaussian
//!   mixtures evaluated on a grid, sampling and histograms.
//! - [`divergence`]: KL (both directions), cross-entropy, Jensen–Shannon,
//!   Jeffreys, total variation, Hellinger/Bhattacharyya, Wasserstein-1 and
//!   entropy on a shared grid, plus selectable optimizer objectives.
//! - [`optimization`]: reparameterization of mixtures into an unconstrained
//!   vector and a finite-difference gradient-descent driver with progress,
//!   cancellation, and suspension hooks.
//!
//! Invariants & assumptions
//! ------------------------
//! - All densities passed between layers share one uniform grid; the grid
//!   spacing is validated once and trusted by the inner kernels.
//! - When fitting, `P` is the candidate model and `Q` the fixed target.
//!
//! Conventions
//! -----------
//! - Invalid configuration is reported through `DensityError` / `OptError`
//!   and converted to `ValueError` at the PyO3 boundary; numerical
//!   degeneracy is handled with floors and never raised.
//!
//! Testing notes
//! -------------
//! - Unit tests live in each module; end-to-end fitting behavior is covered
//!   by the integration tests under `tests/`.

pub mod density;
pub mod divergence;
pub mod optimization;
pub mod utils;

#[cfg(feature = "python-bindings")]
use std::cell::RefCell;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyDict};

#[cfg(feature = "python-bindings")]
use crate::{
    density::{grid::Grid, mixture::density_on_grid, sampling::sample_mixture},
    divergence::{
        metrics::DivergenceReport,
        objective::{Metric, Objective},
    },
    optimization::descent::{FitHooks, FitOptions, FitOutcome, StepSnapshot, fit_with_hooks},
    utils::{
        extract_array1, extract_domain, extract_mixture, extract_model_kind, extract_objective,
    },
};

/// divergences — every metric for two densities on the same grid.
///
/// Both inputs are normalized on `dx` before comparison. Returns a dict
/// keyed by metric name (`kl_pq`, `kl_qp`, `cross_entropy`,
/// `jensen_shannon`, `jeffreys`, `total_variation`,
/// `bhattacharyya_coefficient`, `hellinger`, `bhattacharyya`,
/// `wasserstein`, `entropy_p`, `entropy_q`).
///
/// Errors
/// ------
/// - `ValueError` for empty input, mismatched lengths, or `dx <= 0`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (p, q, dx))]
pub fn divergences<'py>(
    py: Python<'py>, p: &Bound<'py, PyAny>, q: &Bound<'py, PyAny>, dx: f64,
) -> PyResult<Bound<'py, PyDict>> {
    let p = extract_array1(py, p, "p")?;
    let q = extract_array1(py, q, "q")?;
    let report = DivergenceReport::compute(p.view(), q.view(), dx)?;
    let dict = PyDict::new(py);
    for (name, value) in report.entries() {
        dict.set_item(name, value)?;
    }
    Ok(dict)
}

/// mixture_density — evaluate a mixture on `n` points over `[min, max]`.
///
/// The result integrates to one under the left Riemann rule.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (means, scales, grid_min, grid_max, n, weights = None))]
pub fn mixture_density<'py>(
    py: Python<'py>, means: &Bound<'py, PyAny>, scales: &Bound<'py, PyAny>, grid_min: f64,
    grid_max: f64, n: usize, weights: Option<&Bound<'py, PyAny>>,
) -> PyResult<Vec<f64>> {
    let grid = Grid::new(grid_min, grid_max, n)?;
    let mixture = extract_mixture(py, means, scales, weights)?;
    Ok(density_on_grid(&mixture, &grid).to_vec())
}

/// sample — draw `count` points from a mixture with a seeded generator.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (means, scales, count, seed, weights = None))]
pub fn sample<'py>(
    py: Python<'py>, means: &Bound<'py, PyAny>, scales: &Bound<'py, PyAny>, count: usize,
    seed: u64, weights: Option<&Bound<'py, PyAny>>,
) -> PyResult<Vec<f64>> {
    use rand::{SeedableRng, rngs::StdRng};

    let mixture = extract_mixture(py, means, scales, weights)?;
    let mut rng = StdRng::seed_from_u64(seed);
    Ok(sample_mixture(&mixture, count, &mut rng)?)
}

/// FitResult — Python-facing view of a finished (or cancelled) fit.
///
/// Fields
/// ------
/// - `inner`: [`FitOutcome`]
///   Final mixture, parameter vector, history, and diagnostics.
///
/// Notes
/// -----
/// - Getters copy into Python lists; Rust callers should use
///   [`FitOutcome`] directly.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_divergences")]
pub struct FitResult {
    pub inner: FitOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl FitResult {
    #[getter]
    pub fn means(&self) -> Vec<f64> {
        self.inner.mixture.components().iter().map(|c| c.mean).collect()
    }

    #[getter]
    pub fn scales(&self) -> Vec<f64> {
        self.inner.mixture.components().iter().map(|c| c.scale).collect()
    }

    #[getter]
    pub fn weights(&self) -> Vec<f64> {
        self.inner.mixture.components().iter().map(|c| c.weight).collect()
    }

    #[getter]
    pub fn theta_hat(&self) -> Vec<f64> {
        self.inner.theta_hat.to_vec()
    }

    #[getter]
    pub fn history(&self) -> Vec<f64> {
        self.inner.history.clone()
    }

    #[getter]
    pub fn initial_value(&self) -> f64 {
        self.inner.initial_value
    }

    #[getter]
    pub fn final_value(&self) -> f64 {
        self.inner.final_value()
    }

    #[getter]
    pub fn state(&self) -> String {
        self.inner.state.to_string()
    }

    #[getter]
    pub fn steps_completed(&self) -> usize {
        self.inner.steps_completed
    }

    #[getter]
    pub fn grad_norm(&self) -> Option<f64> {
        self.inner.grad_norm
    }
}

/// fit_mixture — gradient-descent fit of a Gaussian model to a target density.
///
/// Parameters
/// ----------
/// - `target`: array-like density sampled on `n = len(target)` points
///   spanning `[grid_min, grid_max]`.
/// - `means`, `scales`, `weights`: initial mixture (weights default to equal).
/// - `components`: `None` fits a single Gaussian; `k` fits a `k`-mixture.
/// - `objective`: metric name (default `"kl_pq"`) or a list of
///   `(name, weight)` pairs.
/// - `steps`, `learning_rate`, `domain`, `verbose`: see [`FitOptions`].
/// - `callback`: optional `callable(step, value, means, scales, weights)`
///   invoked after every step.
///
/// Errors
/// ------
/// - `ValueError` for invalid configuration.
/// - Any exception raised by `callback`, or a pending signal such as
///   `KeyboardInterrupt`; the fit stops at the next step boundary.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (
    target, grid_min, grid_max, means, scales, weights = None, components = None,
    objective = None, steps = 300, learning_rate = 0.05, domain = None, verbose = false,
    callback = None
))]
#[allow(clippy::too_many_arguments)]
pub fn fit_mixture<'py>(
    py: Python<'py>, target: &Bound<'py, PyAny>, grid_min: f64, grid_max: f64,
    means: &Bound<'py, PyAny>, scales: &Bound<'py, PyAny>, weights: Option<&Bound<'py, PyAny>>,
    components: Option<usize>, objective: Option<&Bound<'py, PyAny>>, steps: usize,
    learning_rate: f64, domain: Option<(f64, f64)>, verbose: bool,
    callback: Option<&Bound<'py, PyAny>>,
) -> PyResult<FitResult> {
    let target = extract_array1(py, target, "target")?;
    let grid = Grid::new(grid_min, grid_max, target.len())?;
    let initial = extract_mixture(py, means, scales, weights)?;
    let kind = extract_model_kind(components);
    let objective = match objective {
        Some(raw) => extract_objective(raw)?,
        None => Objective::Single(Metric::KlPq),
    };
    let opts = FitOptions::new(steps, learning_rate, extract_domain(domain)?, verbose)?;

    // First Python error raised by a hook; it also acts as the cancel flag.
    let failure: RefCell<Option<PyErr>> = RefCell::new(None);
    let mut observer = |snapshot: &StepSnapshot| {
        let Some(cb) = callback else { return };
        if failure.borrow().is_some() {
            return;
        }
        let comps = snapshot.mixture.components();
        let args = (
            snapshot.step,
            snapshot.value,
            comps.iter().map(|c| c.mean).collect::<Vec<f64>>(),
            comps.iter().map(|c| c.scale).collect::<Vec<f64>>(),
            comps.iter().map(|c| c.weight).collect::<Vec<f64>>(),
        );
        if let Err(err) = cb.call1(args) {
            *failure.borrow_mut() = Some(err);
        }
    };
    let cancel = || failure.borrow().is_some();
    let mut suspend = |_step: usize| {
        if let Err(err) = py.check_signals() {
            if failure.borrow().is_none() {
                *failure.borrow_mut() = Some(err);
            }
        }
    };

    let outcome = {
        let mut hooks = FitHooks::new()
            .with_observer(&mut observer)
            .with_cancel(&cancel)
            .with_suspend(&mut suspend);
        fit_with_hooks(&grid, target.view(), &initial, kind, &objective, opts, &mut hooks)?
    };
    if let Some(err) = failure.into_inner() {
        return Err(err);
    }
    Ok(FitResult { inner: outcome })
}

/// _rust_divergences — PyO3 module initializer for the Python extension.
///
/// Registers the metric report, grid evaluation, sampling, and fitting
/// functions plus the [`FitResult`] class.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_divergences<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(divergences, m)?)?;
    m.add_function(wrap_pyfunction!(mixture_density, m)?)?;
    m.add_function(wrap_pyfunction!(sample, m)?)?;
    m.add_function(wrap_pyfunction!(fit_mixture, m)?)?;
    m.add_class::<FitResult>()?;
    Ok(())
}
