//! utils — conversion helpers for the Python bindings.
//!
//! Everything here is compiled only with the `python-bindings` feature and
//! turns Python objects (NumPy arrays, pandas Series, plain sequences,
//! strings) into the validated Rust types used by the core modules.
#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    density::{
        grid::Domain,
        mixture::{Component, Mixture},
    },
    divergence::objective::{Metric, Objective},
    optimization::reparam::ModelKind,
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Copy an array-like into an owned `Array1<f64>`.
#[cfg(feature = "python-bindings")]
pub fn extract_array1<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>, name: &str,
) -> PyResult<Array1<f64>> {
    let arr = extract_f64_array(py, raw_data)?;
    let slice = arr.as_slice().map_err(|_| {
        PyValueError::new_err(format!("{name} must be a 1-D contiguous float64 array or sequence"))
    })?;
    Ok(Array1::from(slice.to_vec()))
}

/// Zip parallel `means`/`scales`/`weights` arrays into a [`Mixture`].
///
/// Missing weights default to equal weights.
#[cfg(feature = "python-bindings")]
pub fn extract_mixture<'py>(
    py: Python<'py>, means: &Bound<'py, PyAny>, scales: &Bound<'py, PyAny>,
    weights: Option<&Bound<'py, PyAny>>,
) -> PyResult<Mixture> {
    let means = extract_array1(py, means, "means")?;
    let scales = extract_array1(py, scales, "scales")?;
    if scales.len() != means.len() {
        return Err(PyValueError::new_err(format!(
            "scales has length {} but means has length {}",
            scales.len(),
            means.len()
        )));
    }
    let weights = match weights {
        Some(raw) => extract_array1(py, raw, "weights")?,
        None => Array1::from_elem(means.len(), 1.0 / means.len().max(1) as f64),
    };
    if weights.len() != means.len() {
        return Err(PyValueError::new_err(format!(
            "weights has length {} but means has length {}",
            weights.len(),
            means.len()
        )));
    }
    let components = means
        .iter()
        .zip(scales.iter())
        .zip(weights.iter())
        .map(|((&m, &s), &w)| Component::new(m, s, w))
        .collect();
    Ok(Mixture::new(components))
}

/// `None` → single Gaussian, `Some(k)` → `k`-component mixture.
#[cfg(feature = "python-bindings")]
pub fn extract_model_kind(components: Option<usize>) -> ModelKind {
    match components {
        None => ModelKind::SingleGaussian,
        Some(k) => ModelKind::Mixture(k),
    }
}

/// Parse a metric name, or a list of `(name, weight)` pairs, into an
/// [`Objective`].
#[cfg(feature = "python-bindings")]
pub fn extract_objective(raw: &Bound<'_, PyAny>) -> PyResult<Objective> {
    if let Ok(name) = raw.extract::<String>() {
        let metric: Metric = name.parse()?;
        return Ok(Objective::Single(metric));
    }
    let parts: Vec<(String, f64)> = raw.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "objective must be a metric name or a sequence of (name, weight) pairs",
        )
    })?;
    let weighted = parts
        .into_iter()
        .map(|(name, w)| name.parse::<Metric>().map(|m| (m, w)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Objective::Weighted(weighted))
}

/// Optional `(min, max)` tuple into a validated [`Domain`].
#[cfg(feature = "python-bindings")]
pub fn extract_domain(domain: Option<(f64, f64)>) -> PyResult<Option<Domain>> {
    match domain {
        Some((min, max)) => Ok(Some(Domain::new(min, max)?)),
        None => Ok(None),
    }
}
