//! High-level entrypoints for fitting a mixture to a target density.
use crate::{
    density::{grid::Grid, mixture::Mixture},
    divergence::objective::Objective,
    optimization::{
        descent::{
            session::FitSession,
            traits::{FitHooks, FitOptions, FitOutcome},
        },
        errors::OptResult,
        reparam::ModelKind,
    },
};
use ndarray::ArrayView1;

/// Minimize `objective(model, target)` over mixtures of the given `kind`.
///
/// Runs plain gradient descent from `initial` for `opts.step_count` steps,
/// with no observer, no cancellation, and no suspension. The returned
/// outcome's `history[i]` is the objective after step `i`.
///
/// # Errors
/// - Invalid options, model layout, initial components, target length, or
///   objective weights (reported before any step runs).
/// - Backend failures during gradient evaluation.
///
/// # Example
/// ```
/// use rust_divergences::density::{Grid, Mixture, density_on_grid};
/// use rust_divergences::divergence::Metric;
/// use rust_divergences::optimization::descent::{FitOptions, fit};
/// use rust_divergences::optimization::reparam::ModelKind;
///
/// let grid = Grid::new(-6.0, 6.0, 256).unwrap();
/// let target = density_on_grid(&Mixture::single(1.0, 0.8), &grid);
/// let opts = FitOptions::new(50, 0.5, None, false).unwrap();
/// let outcome = fit(
///     &grid,
///     target.view(),
///     &Mixture::single(0.0, 1.0),
///     ModelKind::SingleGaussian,
///     &Metric::Hellinger.into(),
///     opts,
/// )
/// .unwrap();
/// assert_eq!(outcome.history.len(), 50);
/// assert!(outcome.final_value() < outcome.initial_value);
/// ```
pub fn fit(
    grid: &Grid, target: ArrayView1<'_, f64>, initial: &Mixture, kind: ModelKind,
    objective: &Objective, opts: FitOptions,
) -> OptResult<FitOutcome> {
    fit_with_hooks(grid, target, initial, kind, objective, opts, &mut FitHooks::new())
}

/// [`fit`] with an observer, cancellation signal, and suspension point.
///
/// A cancelled fit is not an error: the outcome carries
/// [`FitState::Cancelled`](super::traits::FitState::Cancelled) and the
/// history of the steps that completed.
pub fn fit_with_hooks(
    grid: &Grid, target: ArrayView1<'_, f64>, initial: &Mixture, kind: ModelKind,
    objective: &Objective, opts: FitOptions, hooks: &mut FitHooks<'_>,
) -> OptResult<FitOutcome> {
    let mut session = FitSession::new(grid, target, initial, kind, objective, opts)?;
    session.run(hooks)
}
