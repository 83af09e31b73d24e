//! divergence::objective — closed set of fit objectives.
//!
//! Purpose
//! -------
//! Select which divergence the optimizer minimizes. [`Metric`] is a closed
//! enumeration with one evaluation function per variant; [`Objective`]
//! wraps a single metric or a non-negative weighted combination.
//! [`Objective::resolve`] turns the selection into a list of plain function
//! pointers once per fit, so no per-step dispatch on names or tags happens
//! in the hot loop.
//!
//! Conventions
//! -----------
//! - Metrics are evaluated on a [`DensityPair`] whose `P` is the candidate
//!   model and whose `Q` is the fixed target. Under this convention
//!   `KL(P‖Q)` is mode-seeking and `KL(Q‖P)` is mode-covering.
//! - Metric names parse case-insensitively; `-` and spaces are treated as
//!   `_` (e.g. `"kl-pq"`, `"Jensen Shannon"`).
use crate::density::errors::{DensityError, DensityResult};
use crate::divergence::metrics::DensityPair;
use std::str::FromStr;

/// Evaluation function for one metric on a normalized pair.
pub type MetricFn = fn(&DensityPair<'_>) -> f64;

/// Metric — one scalar divergence or distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// `KL(P‖Q)`.
    KlPq,
    /// `KL(Q‖P)`.
    KlQp,
    /// `H(P,Q)`.
    CrossEntropy,
    JensenShannon,
    Jeffreys,
    TotalVariation,
    Hellinger,
    Bhattacharyya,
    /// Wasserstein-1 via CDF L1 distance.
    Wasserstein,
}

impl Metric {
    pub const ALL: [Metric; 9] = [
        Metric::KlPq,
        Metric::KlQp,
        Metric::CrossEntropy,
        Metric::JensenShannon,
        Metric::Jeffreys,
        Metric::TotalVariation,
        Metric::Hellinger,
        Metric::Bhattacharyya,
        Metric::Wasserstein,
    ];

    /// Canonical snake_case name, accepted by [`Metric::from_str`].
    pub fn name(self) -> &'static str {
        match self {
            Metric::KlPq => "kl_pq",
            Metric::KlQp => "kl_qp",
            Metric::CrossEntropy => "cross_entropy",
            Metric::JensenShannon => "jensen_shannon",
            Metric::Jeffreys => "jeffreys",
            Metric::TotalVariation => "total_variation",
            Metric::Hellinger => "hellinger",
            Metric::Bhattacharyya => "bhattacharyya",
            Metric::Wasserstein => "wasserstein",
        }
    }

    /// The evaluation function for this variant.
    pub fn resolve(self) -> MetricFn {
        match self {
            Metric::KlPq => eval_kl_pq,
            Metric::KlQp => eval_kl_qp,
            Metric::CrossEntropy => eval_cross_entropy,
            Metric::JensenShannon => eval_jensen_shannon,
            Metric::Jeffreys => eval_jeffreys,
            Metric::TotalVariation => eval_total_variation,
            Metric::Hellinger => eval_hellinger,
            Metric::Bhattacharyya => eval_bhattacharyya,
            Metric::Wasserstein => eval_wasserstein,
        }
    }

    pub fn evaluate(self, pair: &DensityPair<'_>) -> f64 {
        (self.resolve())(pair)
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = DensityError;

    /// Parse a metric name (case-insensitive).
    ///
    /// Accepts the canonical names plus common aliases: `"kl"` / `"kl_forward"`
    /// for `KlPq`, `"reverse_kl"` / `"kl_reverse"` for `KlQp`, `"js"`,
    /// `"tv"`, `"w1"` / `"emd"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "kl_pq" | "kl" | "kl_forward" => Ok(Metric::KlPq),
            "kl_qp" | "reverse_kl" | "kl_reverse" => Ok(Metric::KlQp),
            "cross_entropy" | "ce" => Ok(Metric::CrossEntropy),
            "jensen_shannon" | "js" => Ok(Metric::JensenShannon),
            "jeffreys" => Ok(Metric::Jeffreys),
            "total_variation" | "tv" => Ok(Metric::TotalVariation),
            "hellinger" => Ok(Metric::Hellinger),
            "bhattacharyya" => Ok(Metric::Bhattacharyya),
            "wasserstein" | "w1" | "emd" => Ok(Metric::Wasserstein),
            _ => Err(DensityError::UnknownMetric { name: s.to_string() }),
        }
    }
}

/// Objective — what the optimizer minimizes.
#[derive(Debug, Clone, PartialEq)]
pub enum Objective {
    Single(Metric),
    /// `Σ weight_i · metric_i`; weights finite and `>= 0`.
    Weighted(Vec<(Metric, f64)>),
}

impl Objective {
    /// Validate and flatten into function pointers.
    ///
    /// # Errors
    /// - [`DensityError::InvalidMetricWeight`] for a negative or non-finite weight.
    /// - [`DensityError::InvalidWeights`] if a combination is empty or every
    ///   weight is zero.
    pub fn resolve(&self) -> DensityResult<ResolvedObjective> {
        match self {
            Objective::Single(metric) => {
                Ok(ResolvedObjective { terms: vec![(metric.resolve(), 1.0)] })
            }
            Objective::Weighted(parts) => {
                for (index, &(_, weight)) in parts.iter().enumerate() {
                    if !weight.is_finite() || weight < 0.0 {
                        return Err(DensityError::InvalidMetricWeight { index, value: weight });
                    }
                }
                if !parts.iter().any(|&(_, w)| w > 0.0) {
                    return Err(DensityError::InvalidWeights {
                        reason: "Combined objective needs at least one positive weight.",
                    });
                }
                let terms = parts
                    .iter()
                    .filter(|(_, w)| *w > 0.0)
                    .map(|&(metric, w)| (metric.resolve(), w))
                    .collect();
                Ok(ResolvedObjective { terms })
            }
        }
    }
}

impl From<Metric> for Objective {
    fn from(metric: Metric) -> Self {
        Objective::Single(metric)
    }
}

impl std::fmt::Display for Objective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Objective::Single(metric) => write!(f, "{metric}"),
            Objective::Weighted(parts) => {
                let rendered: Vec<String> =
                    parts.iter().map(|(metric, w)| format!("{w}*{metric}")).collect();
                f.write_str(&rendered.join(" + "))
            }
        }
    }
}

/// ResolvedObjective — validated objective as `(fn, weight)` terms.
#[derive(Clone)]
pub struct ResolvedObjective {
    terms: Vec<(MetricFn, f64)>,
}

impl std::fmt::Debug for ResolvedObjective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let weights: Vec<f64> = self.terms.iter().map(|(_, w)| *w).collect();
        f.debug_struct("ResolvedObjective").field("weights", &weights).finish()
    }
}

impl ResolvedObjective {
    pub fn evaluate(&self, pair: &DensityPair<'_>) -> f64 {
        self.terms.iter().map(|(eval, w)| w * eval(pair)).sum()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

// ---- Per-variant evaluation functions ----

fn eval_kl_pq(pair: &DensityPair<'_>) -> f64 {
    pair.kl_pq()
}

fn eval_kl_qp(pair: &DensityPair<'_>) -> f64 {
    pair.kl_qp()
}

fn eval_cross_entropy(pair: &DensityPair<'_>) -> f64 {
    pair.cross_entropy()
}

fn eval_jensen_shannon(pair: &DensityPair<'_>) -> f64 {
    pair.jensen_shannon()
}

fn eval_jeffreys(pair: &DensityPair<'_>) -> f64 {
    pair.jeffreys()
}

fn eval_total_variation(pair: &DensityPair<'_>) -> f64 {
    pair.total_variation()
}

fn eval_hellinger(pair: &DensityPair<'_>) -> f64 {
    pair.hellinger()
}

fn eval_bhattacharyya(pair: &DensityPair<'_>) -> f64 {
    pair.bhattacharyya()
}

fn eval_wasserstein(pair: &DensityPair<'_>) -> f64 {
    pair.wasserstein()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Names round-trip and aliases parse case-insensitively.
    //
    // Given
    // -----
    // - Every canonical name plus a few aliases in mixed case.
    //
    // Expect
    // ------
    // - Canonical names parse back to their metric; aliases map correctly.
    // - Unknown names return `UnknownMetric` with the original spelling.
    fn metric_names_parse() {
        for metric in Metric::ALL {
            assert_eq!(metric.name().parse::<Metric>().unwrap(), metric);
        }
        assert_eq!("JS".parse::<Metric>().unwrap(), Metric::JensenShannon);
        assert_eq!("Reverse-KL".parse::<Metric>().unwrap(), Metric::KlQp);
        assert_eq!("total variation".parse::<Metric>().unwrap(), Metric::TotalVariation);
        assert_eq!("W1".parse::<Metric>().unwrap(), Metric::Wasserstein);
        assert_eq!(
            "chi2".parse::<Metric>().unwrap_err(),
            DensityError::UnknownMetric { name: "chi2".to_string() }
        );
    }

    #[test]
    // Purpose
    // -------
    // Resolved function pointers agree with the pair methods.
    //
    // Given
    // -----
    // - A small normalized pair.
    //
    // Expect
    // ------
    // - `Metric::evaluate` equals the matching `DensityPair` method for KL,
    //   TV, and Wasserstein.
    fn resolved_metrics_match_pair_methods() {
        let p = array![0.2, 0.3, 0.5];
        let q = array![0.4, 0.4, 0.2];
        let pair = DensityPair::new(p.view(), q.view(), 1.0).unwrap();

        assert_eq!(Metric::KlPq.evaluate(&pair), pair.kl_pq());
        assert_eq!(Metric::KlQp.evaluate(&pair), pair.kl_qp());
        assert_eq!(Metric::TotalVariation.evaluate(&pair), pair.total_variation());
        assert_eq!(Metric::Wasserstein.evaluate(&pair), pair.wasserstein());
    }

    #[test]
    fn weighted_objective_sums_terms() {
        let p = array![0.2, 0.3, 0.5];
        let q = array![0.4, 0.4, 0.2];
        let pair = DensityPair::new(p.view(), q.view(), 1.0).unwrap();
        let objective = Objective::Weighted(vec![
            (Metric::KlPq, 0.5),
            (Metric::Hellinger, 2.0),
            (Metric::Jeffreys, 0.0),
        ]);

        let resolved = objective.resolve().unwrap();

        assert_eq!(resolved.len(), 2);
        assert_abs_diff_eq!(
            resolved.evaluate(&pair),
            0.5 * pair.kl_pq() + 2.0 * pair.hellinger(),
            epsilon = 1e-15
        );
    }

    #[test]
    fn weighted_objective_rejects_bad_weights() {
        let negative = Objective::Weighted(vec![(Metric::KlPq, 1.0), (Metric::KlQp, -0.1)]);
        assert_eq!(
            negative.resolve().unwrap_err(),
            DensityError::InvalidMetricWeight { index: 1, value: -0.1 }
        );
        let all_zero = Objective::Weighted(vec![(Metric::KlPq, 0.0)]);
        assert!(matches!(all_zero.resolve(), Err(DensityError::InvalidWeights { .. })));
        assert!(Objective::Weighted(vec![]).resolve().is_err());
    }

    #[test]
    fn objective_display_lists_terms() {
        assert_eq!(Objective::from(Metric::JensenShannon).to_string(), "jensen_shannon");
        let combo = Objective::Weighted(vec![(Metric::KlPq, 0.5), (Metric::Wasserstein, 1.0)]);
        assert_eq!(combo.to_string(), "0.5*kl_pq + 1*wasserstein");
    }
}
