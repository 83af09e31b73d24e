//! divergence::metrics — discrete divergences between grid densities.
//!
//! Purpose
//! -------
//! Compute divergence and distance measures between two densities sampled
//! on the same uniform grid, using the left-Riemann convention from
//! [`crate::density::grid`] for every integral.
//!
//! Key behaviors
//! -------------
//! - [`DensityPair`] validates two arrays once (same length, non-empty, finite,
//!   positive `dx`) and exposes every metric as an infallible method.
//! - [`DivergenceReport::compute`] normalizes both inputs once and derives
//!   all metrics from that shared pair, so e.g. Jeffreys is exactly the sum
//!   of the two reported KL values.
//! - Free functions ([`kl_divergence`], [`jensen_shannon`], ...) wrap the
//!   pair for one-off calls on already-normalized arrays.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are expected to be normalized; only [`DivergenceReport::compute`]
//!   normalizes on the caller's behalf.
//! - Any ratio or logarithm floors its denominator/argument at
//!   [`DENSITY_EPS`] (`1e-300`). The floor is kept tiny on purpose: larger
//!   values visibly bias KL in near-zero tails and distort its asymmetry.
//! - Terms with `p_i <= 0` are skipped in KL-type sums (`0·log 0 = 0`).
//!
//! Conventions
//! -----------
//! - `KL(P‖Q) = Σ p·log(p / max(q, ε))·dx`.
//! - `H(P,Q) = Σ -p·log(max(q, ε))·dx`, so `H(P,Q) = H(P) + KL(P‖Q)` up to
//!   discretization error.
//! - `JS = ½KL(P‖M) + ½KL(Q‖M)`, `M = (P+Q)/2`, bounded by `ln 2`.
//! - `TV = ½ Σ |p - q|·dx`, bounded in `[0, 1]`.
//! - `BC = Σ √(p·q)·dx`, `Hellinger = √max(0, 1 - BC)`,
//!   `Bhattacharyya = -log(max(BC, ε))`.
//! - `W1 = Σ |CDF_P - CDF_Q|·dx` with drift-corrected CDFs.
//!
//! Testing notes
//! -------------
//! - Unit tests check zero divergence for identical inputs, the `ln 2`
//!   bound for disjoint Gaussians, `W1 ≈ |Δmean|` for shifted Gaussians,
//!   and the cross-entropy decomposition.
use crate::density::{
    errors::{DensityError, DensityResult},
    grid::{check_finite, cumulative_unchecked, normalize_unchecked},
};
use ndarray::ArrayView1;

/// Floor applied inside logarithms and ratio denominators.
pub const DENSITY_EPS: f64 = 1e-300;

/// DensityPair — two densities on one grid, validated once.
///
/// Fields are views, so building a pair never copies the arrays.
#[derive(Debug, Clone, Copy)]
pub struct DensityPair<'a> {
    p: ArrayView1<'a, f64>,
    q: ArrayView1<'a, f64>,
    dx: f64,
}

impl<'a> DensityPair<'a> {
    /// Validate and wrap `p`, `q`, and their shared spacing `dx`.
    ///
    /// # Errors
    /// - [`DensityError::NonPositiveDx`] if `dx` is not finite and > 0.
    /// - [`DensityError::EmptyDensity`] if `p` is empty.
    /// - [`DensityError::LengthMismatch`] if `q.len() != p.len()`.
    /// - [`DensityError::NonFiniteInput`] for the first NaN/±∞ in `p`, then `q`.
    pub fn new(p: ArrayView1<'a, f64>, q: ArrayView1<'a, f64>, dx: f64) -> DensityResult<Self> {
        if !dx.is_finite() || dx <= 0.0 {
            return Err(DensityError::NonPositiveDx { dx });
        }
        if p.is_empty() {
            return Err(DensityError::EmptyDensity);
        }
        if q.len() != p.len() {
            return Err(DensityError::LengthMismatch { expected: p.len(), found: q.len() });
        }
        check_finite(p)?;
        check_finite(q)?;
        Ok(Self { p, q, dx })
    }

    /// Wrap arrays that are known to share a validated grid.
    pub(crate) fn new_unchecked(p: ArrayView1<'a, f64>, q: ArrayView1<'a, f64>, dx: f64) -> Self {
        Self { p, q, dx }
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// The same pair with `P` and `Q` swapped.
    pub fn swapped(&self) -> Self {
        Self { p: self.q, q: self.p, dx: self.dx }
    }

    pub fn kl_pq(&self) -> f64 {
        kl_kernel(self.p, self.q, self.dx)
    }

    pub fn kl_qp(&self) -> f64 {
        kl_kernel(self.q, self.p, self.dx)
    }

    pub fn cross_entropy(&self) -> f64 {
        let sum: f64 = self
            .p
            .iter()
            .zip(self.q.iter())
            .filter(|(p, _)| **p > 0.0)
            .map(|(&p, &q)| -p * q.max(DENSITY_EPS).ln())
            .sum();
        sum * self.dx
    }

    pub fn jensen_shannon(&self) -> f64 {
        let m = (&self.p + &self.q) * 0.5;
        0.5 * kl_kernel(self.p, m.view(), self.dx) + 0.5 * kl_kernel(self.q, m.view(), self.dx)
    }

    pub fn jeffreys(&self) -> f64 {
        self.kl_pq() + self.kl_qp()
    }

    pub fn total_variation(&self) -> f64 {
        let sum: f64 = self.p.iter().zip(self.q.iter()).map(|(p, q)| (p - q).abs()).sum();
        0.5 * sum * self.dx
    }

    pub fn bhattacharyya_coefficient(&self) -> f64 {
        let sum: f64 = self.p.iter().zip(self.q.iter()).map(|(p, q)| (p * q).max(0.0).sqrt()).sum();
        sum * self.dx
    }

    pub fn hellinger(&self) -> f64 {
        hellinger_from_bc(self.bhattacharyya_coefficient())
    }

    pub fn bhattacharyya(&self) -> f64 {
        bhattacharyya_from_bc(self.bhattacharyya_coefficient())
    }

    pub fn wasserstein(&self) -> f64 {
        let cp = cumulative_unchecked(self.p, self.dx);
        let cq = cumulative_unchecked(self.q, self.dx);
        let sum: f64 = cp.iter().zip(cq.iter()).map(|(a, b)| (a - b).abs()).sum();
        sum * self.dx
    }

    /// Differential entropy of `P` on the grid.
    pub fn entropy_p(&self) -> f64 {
        entropy_kernel(self.p, self.dx)
    }

    /// Differential entropy of `Q` on the grid.
    pub fn entropy_q(&self) -> f64 {
        entropy_kernel(self.q, self.dx)
    }
}

/// DivergenceReport — every metric for one normalized pair.
///
/// Built by [`DivergenceReport::compute`], which normalizes both inputs
/// once; the derived fields (`jeffreys`, `hellinger`, `bhattacharyya`) are
/// computed from the stored components, never recomputed independently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DivergenceReport {
    pub kl_pq: f64,
    pub kl_qp: f64,
    pub cross_entropy: f64,
    pub jensen_shannon: f64,
    pub jeffreys: f64,
    pub total_variation: f64,
    pub bhattacharyya_coefficient: f64,
    pub hellinger: f64,
    pub bhattacharyya: f64,
    pub wasserstein: f64,
    pub entropy_p: f64,
    pub entropy_q: f64,
}

impl DivergenceReport {
    /// Normalize `p` and `q` on spacing `dx` and compute every metric.
    ///
    /// Parameters
    /// ----------
    /// - `p`, `q`: `ArrayView1<f64>`
    ///   Non-negative densities on the same grid; they need not be normalized.
    /// - `dx`: `f64`
    ///   Shared grid spacing, finite and > 0.
    ///
    /// Errors
    /// ------
    /// - Validation errors from [`DensityPair::new`].
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use ndarray::array;
    /// # use rust_divergences::divergence::metrics::DivergenceReport;
    /// let p = array![1.0, 2.0, 1.0];
    /// let report = DivergenceReport::compute(p.view(), p.view(), 0.5).unwrap();
    /// assert!(report.kl_pq.abs() < 1e-12);
    /// assert!(report.total_variation.abs() < 1e-12);
    /// ```
    pub fn compute<'a>(
        p: ArrayView1<'a, f64>, q: ArrayView1<'a, f64>, dx: f64,
    ) -> DensityResult<Self> {
        DensityPair::new(p, q, dx)?;
        let pn = normalize_unchecked(p, dx);
        let qn = normalize_unchecked(q, dx);
        Ok(Self::from_pair(&DensityPair::new_unchecked(pn.view(), qn.view(), dx)))
    }

    /// Compute every metric for a pair that is already normalized.
    pub fn from_pair(pair: &DensityPair<'_>) -> Self {
        let kl_pq = pair.kl_pq();
        let kl_qp = pair.kl_qp();
        let bc = pair.bhattacharyya_coefficient();
        Self {
            kl_pq,
            kl_qp,
            cross_entropy: pair.cross_entropy(),
            jensen_shannon: pair.jensen_shannon(),
            jeffreys: kl_pq + kl_qp,
            total_variation: pair.total_variation(),
            bhattacharyya_coefficient: bc,
            hellinger: hellinger_from_bc(bc),
            bhattacharyya: bhattacharyya_from_bc(bc),
            wasserstein: pair.wasserstein(),
            entropy_p: pair.entropy_p(),
            entropy_q: pair.entropy_q(),
        }
    }

    /// `(name, value)` pairs in display order.
    pub fn entries(&self) -> [(&'static str, f64); 12] {
        [
            ("kl_pq", self.kl_pq),
            ("kl_qp", self.kl_qp),
            ("cross_entropy", self.cross_entropy),
            ("jensen_shannon", self.jensen_shannon),
            ("jeffreys", self.jeffreys),
            ("total_variation", self.total_variation),
            ("bhattacharyya_coefficient", self.bhattacharyya_coefficient),
            ("hellinger", self.hellinger),
            ("bhattacharyya", self.bhattacharyya),
            ("wasserstein", self.wasserstein),
            ("entropy_p", self.entropy_p),
            ("entropy_q", self.entropy_q),
        ]
    }
}

// ---- One-off helpers on normalized arrays ----

/// `KL(P‖Q)` for normalized `p`, `q`.
pub fn kl_divergence<'a>(
    p: ArrayView1<'a, f64>, q: ArrayView1<'a, f64>, dx: f64,
) -> DensityResult<f64> {
    Ok(DensityPair::new(p, q, dx)?.kl_pq())
}

/// Cross-entropy `H(P,Q)` for normalized `p`, `q`.
pub fn cross_entropy<'a>(
    p: ArrayView1<'a, f64>, q: ArrayView1<'a, f64>, dx: f64,
) -> DensityResult<f64> {
    Ok(DensityPair::new(p, q, dx)?.cross_entropy())
}

/// Jensen–Shannon divergence for normalized `p`, `q`.
pub fn jensen_shannon<'a>(
    p: ArrayView1<'a, f64>, q: ArrayView1<'a, f64>, dx: f64,
) -> DensityResult<f64> {
    Ok(DensityPair::new(p, q, dx)?.jensen_shannon())
}

/// Total variation distance for normalized `p`, `q`.
pub fn total_variation<'a>(
    p: ArrayView1<'a, f64>, q: ArrayView1<'a, f64>, dx: f64,
) -> DensityResult<f64> {
    Ok(DensityPair::new(p, q, dx)?.total_variation())
}

/// Hellinger distance for normalized `p`, `q`.
pub fn hellinger<'a>(
    p: ArrayView1<'a, f64>, q: ArrayView1<'a, f64>, dx: f64,
) -> DensityResult<f64> {
    Ok(DensityPair::new(p, q, dx)?.hellinger())
}

/// Wasserstein-1 distance for normalized `p`, `q`.
pub fn wasserstein<'a>(
    p: ArrayView1<'a, f64>, q: ArrayView1<'a, f64>, dx: f64,
) -> DensityResult<f64> {
    Ok(DensityPair::new(p, q, dx)?.wasserstein())
}

/// Differential entropy `-Σ p·log p·dx` over `p > 0`.
///
/// # Errors
/// - [`DensityError::NonPositiveDx`] / [`DensityError::EmptyDensity`].
pub fn entropy(p: ArrayView1<'_, f64>, dx: f64) -> DensityResult<f64> {
    Ok(DensityPair::new(p, p, dx)?.entropy_p())
}

// ---- Kernels ----

fn kl_kernel(p: ArrayView1<'_, f64>, q: ArrayView1<'_, f64>, dx: f64) -> f64 {
    let sum: f64 = p
        .iter()
        .zip(q.iter())
        .filter(|(p, _)| **p > 0.0)
        .map(|(&p, &q)| p * (p / q.max(DENSITY_EPS)).ln())
        .sum();
    sum * dx
}

fn entropy_kernel(p: ArrayView1<'_, f64>, dx: f64) -> f64 {
    let sum: f64 = p.iter().filter(|p| **p > 0.0).map(|&p| -p * p.ln()).sum();
    sum * dx
}

fn hellinger_from_bc(bc: f64) -> f64 {
    (1.0 - bc).max(0.0).sqrt()
}

fn bhattacharyya_from_bc(bc: f64) -> f64 {
    -bc.max(DENSITY_EPS).ln()
}
