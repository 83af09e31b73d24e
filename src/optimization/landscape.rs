//! optimization::landscape — brute-force objective surface for one Gaussian.
//!
//! Evaluates an objective for a single-Gaussian model over a rectangular
//! grid of (mean, log-scale) pairs. The result feeds heatmap displays and
//! serves as a brute-force reference optimum for checking descent runs.
use crate::{
    density::grid::Grid,
    divergence::objective::Objective,
    optimization::{
        descent::adapter::DivergenceProblem,
        errors::{OptError, OptResult},
        reparam::ModelKind,
    },
};
use ndarray::{Array1, Array2, ArrayView1, array};

/// Objective values over a (mean × log-scale) grid.
///
/// `values[[i, j]]` is the objective at `(means[i], log_scales[j])`.
#[derive(Debug, Clone, PartialEq)]
pub struct Landscape {
    pub means: Array1<f64>,
    pub log_scales: Array1<f64>,
    pub values: Array2<f64>,
}

/// Location and value of the smallest finite landscape entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandscapeMin {
    pub mean: f64,
    pub log_scale: f64,
    pub value: f64,
}

impl Landscape {
    /// Smallest finite entry; `None` if every entry is NaN or infinite.
    pub fn argmin(&self) -> Option<LandscapeMin> {
        self.values
            .indexed_iter()
            .filter(|(_, v)| v.is_finite())
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|((i, j), &value)| LandscapeMin {
                mean: self.means[i],
                log_scale: self.log_scales[j],
                value,
            })
    }
}

/// Evaluate `objective` between N(mean, exp(log_scale)) and `target` for
/// every pair in `means × log_scales`.
///
/// # Errors
/// - [`OptError::InvalidParameter`] if either axis is empty.
/// - Target/grid length mismatch or invalid objective weights.
pub fn objective_landscape(
    grid: &Grid, target: ArrayView1<'_, f64>, objective: &Objective, means: ArrayView1<'_, f64>,
    log_scales: ArrayView1<'_, f64>,
) -> OptResult<Landscape> {
    if means.is_empty() || log_scales.is_empty() {
        return Err(OptError::InvalidParameter {
            text: "Landscape axes must be non-empty.".to_string(),
        });
    }
    let problem =
        DivergenceProblem::new(grid, target, objective, ModelKind::SingleGaussian, grid.domain())?;
    let values = Array2::from_shape_fn((means.len(), log_scales.len()), |(i, j)| {
        problem.evaluate(&array![means[i], log_scales[j]])
    });
    Ok(Landscape { means: means.to_owned(), log_scales: log_scales.to_owned(), values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        density::mixture::{Mixture, density_on_grid},
        divergence::objective::Metric,
    };
    use approx::assert_abs_diff_eq;

    #[test]
    // Purpose
    // -------
    // The brute-force minimum sits at the target parameters when they lie
    // on the search grid.
    //
    // Given
    // -----
    // - Target N(1, e^0) on [-8, 8]; means −2..2 step 0.5, log-scales
    //   −1..1 step 0.25; KL(Q‖P).
    //
    // Expect
    // ------
    // - argmin at (1.0, 0.0) with value ≈ 0.
    fn argmin_recovers_target_parameters() {
        let grid = Grid::new(-8.0, 8.0, 401).unwrap();
        let target = density_on_grid(&Mixture::single(1.0, 1.0), &grid);
        let means = Array1::linspace(-2.0, 2.0, 9);
        let log_scales = Array1::linspace(-1.0, 1.0, 9);

        let landscape = objective_landscape(
            &grid,
            target.view(),
            &Metric::KlQp.into(),
            means.view(),
            log_scales.view(),
        )
        .unwrap();
        let best = landscape.argmin().unwrap();

        assert_eq!(landscape.values.dim(), (9, 9));
        assert_abs_diff_eq!(best.mean, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(best.log_scale, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(best.value, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn empty_axes_are_rejected() {
        let grid = Grid::new(-1.0, 1.0, 21).unwrap();
        let target = Array1::ones(21);
        let empty = Array1::<f64>::zeros(0);
        let axis = Array1::linspace(-0.5, 0.5, 3);
        assert!(matches!(
            objective_landscape(
                &grid,
                target.view(),
                &Metric::Hellinger.into(),
                empty.view(),
                axis.view()
            ),
            Err(OptError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn argmin_skips_non_finite_entries() {
        let landscape = Landscape {
            means: array![0.0, 1.0],
            log_scales: array![0.0],
            values: array![[f64::NAN], [2.0]],
        };
        let best = landscape.argmin().unwrap();
        assert_eq!(best.mean, 1.0);
        assert_eq!(best.value, 2.0);
    }
}
