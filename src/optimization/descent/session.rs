//! descent::session — the resumable gradient-descent state machine.
//!
//! Purpose
//! -------
//! Drive plain gradient descent on a [`DivergenceProblem`], one step at a
//! time, while exposing the three host interactions a long-running fit
//! needs: progress snapshots, cooperative cancellation, and a suspension
//! point after each step.
//!
//! Key behaviors
//! -------------
//! - States move `Idle → Running → Completed | Cancelled`; a terminal
//!   session returns its outcome from `run` without further progress.
//! - Each step:
//!   1. polls the cancellation signal (cancellation only ever lands on a
//!      step boundary),
//!   2. takes a central-difference gradient,
//!   3. updates `θ ← θ − lr · g`,
//!   4. clamps mean coordinates into the domain,
//!   5. decodes, evaluates, appends to the history, and notifies the
//!      observer,
//!   6. suspends exactly once.
//!
//! Invariants & assumptions
//! ------------------------
//! - `history.len()` always equals the number of completed steps.
//! - Log-scale and logit coordinates are never clamped; their floors are
//!   applied when decoding.
//! - A non-finite objective does not stop the run; it is logged once at
//!   `warn` level and recorded like any other value.
//!
//! Conventions
//! -----------
//! - Logging goes through `tracing`: `debug` per step (`info` when the
//!   options ask for verbosity), `info` on completion or cancellation.
use crate::{
    density::{grid::Grid, mixture::Mixture},
    divergence::objective::Objective,
    optimization::{
        descent::{
            adapter::DivergenceProblem,
            traits::{FitHooks, FitOptions, FitOutcome, FitState, StepSnapshot},
            types::Theta,
            validation::first_non_finite,
        },
        errors::OptResult,
        reparam::{ModelKind, pack, unpack_unchecked},
    },
};
use argmin::core::Gradient;
use argmin_math::ArgminL2Norm;
use ndarray::{ArrayView1, s};
use tracing::{debug, info, warn};

/// A single fit: problem, options, current `θ`, history, and state.
#[derive(Debug, Clone)]
pub struct FitSession<'a> {
    problem: DivergenceProblem<'a>,
    opts: FitOptions,
    theta: Theta,
    history: Vec<f64>,
    initial_value: f64,
    grad_norm: Option<f64>,
    state: FitState,
    warned_non_finite: bool,
}

impl<'a> FitSession<'a> {
    /// Validate the configuration and encode the initial mixture.
    ///
    /// # Errors
    /// - Invalid [`FitOptions`] (step count, learning rate).
    /// - Invalid model layout or initial components (see
    ///   [`pack`](crate::optimization::reparam::pack)).
    /// - Target/grid length mismatch or invalid objective weights.
    pub fn new(
        grid: &'a Grid, target: ArrayView1<'_, f64>, initial: &Mixture, kind: ModelKind,
        objective: &Objective, opts: FitOptions,
    ) -> OptResult<Self> {
        opts.validate()?;
        let domain = opts.domain.unwrap_or_else(|| grid.domain());
        let problem = DivergenceProblem::new(grid, target, objective, kind, domain)?;
        let theta = pack(kind, initial)?;
        let initial_value = problem.evaluate(&theta);
        Ok(Self {
            problem,
            opts,
            theta,
            history: Vec::new(),
            initial_value,
            grad_norm: None,
            state: FitState::Idle,
            warned_non_finite: false,
        })
    }

    pub fn state(&self) -> FitState {
        self.state
    }

    pub fn theta(&self) -> &Theta {
        &self.theta
    }

    pub fn history(&self) -> &[f64] {
        &self.history
    }

    pub fn problem(&self) -> &DivergenceProblem<'a> {
        &self.problem
    }

    /// Current mixture decoded from `θ`.
    pub fn mixture(&self) -> Mixture {
        unpack_unchecked(self.problem.kind(), &self.theta)
    }

    /// Snapshot of the session as a [`FitOutcome`].
    pub fn outcome(&self) -> FitOutcome {
        FitOutcome {
            mixture: self.mixture(),
            theta_hat: self.theta.clone(),
            history: self.history.clone(),
            initial_value: self.initial_value,
            state: self.state,
            steps_completed: self.history.len(),
            grad_norm: self.grad_norm,
        }
    }

    /// Run the remaining steps, invoking `hooks` at every step boundary.
    ///
    /// Returns when the step budget is exhausted (`Completed`) or the cancel
    /// signal is observed (`Cancelled`). Calling `run` on a terminal session
    /// returns the stored outcome unchanged.
    ///
    /// # Errors
    /// Only backend failures from the gradient evaluation; numerical
    /// degeneracy is recorded in the history instead.
    pub fn run(&mut self, hooks: &mut FitHooks<'_>) -> OptResult<FitOutcome> {
        if self.state.is_terminal() {
            return Ok(self.outcome());
        }
        self.state = FitState::Running;
        info!(
            kind = %self.problem.kind(),
            steps = self.opts.step_count,
            learning_rate = self.opts.learning_rate,
            initial_value = self.initial_value,
            "fit started"
        );

        while self.history.len() < self.opts.step_count {
            if hooks.cancel_requested() {
                self.state = FitState::Cancelled;
                info!(
                    steps_completed = self.history.len(),
                    value = self.current_value(),
                    "fit cancelled"
                );
                return Ok(self.outcome());
            }

            let snapshot = self.step()?;
            hooks.notify(&snapshot);
            hooks.suspend(snapshot.step);
        }

        self.state = FitState::Completed;
        info!(
            steps_completed = self.history.len(),
            value = self.current_value(),
            grad_norm = ?self.grad_norm,
            "fit completed"
        );
        Ok(self.outcome())
    }

    /// One gradient step: differentiate, update, clamp, evaluate, record.
    fn step(&mut self) -> OptResult<StepSnapshot> {
        let grad = self.problem.gradient(&self.theta)?;
        self.grad_norm = Some(grad.l2_norm());
        if let Some((index, value)) = first_non_finite(&grad) {
            debug!(index, value, "non-finite gradient entry");
        }

        self.theta.scaled_add(-self.opts.learning_rate, &grad);
        let k = self.problem.kind().components();
        let domain = self.problem.domain();
        self.theta.slice_mut(s![..k]).mapv_inplace(|m| domain.clamp(m));

        let mixture = unpack_unchecked(self.problem.kind(), &self.theta);
        let value = self.problem.evaluate_mixture(&mixture);
        let step = self.history.len();
        self.history.push(value);

        if !value.is_finite() && !self.warned_non_finite {
            self.warned_non_finite = true;
            warn!(step, value, "objective is not finite");
        }
        if self.opts.verbose {
            info!(step, value, "descent step");
        } else {
            debug!(step, value, "descent step");
        }
        Ok(StepSnapshot { step, value, mixture })
    }

    fn current_value(&self) -> f64 {
        self.history.last().copied().unwrap_or(self.initial_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        density::mixture::density_on_grid,
        divergence::objective::Metric,
        optimization::descent::traits::NoSuspend,
    };
    use std::cell::Cell;

    fn js_session(grid: &Grid, steps: usize) -> FitSession<'_> {
        let target = density_on_grid(&Mixture::single(1.5, 1.3), grid);
        FitSession::new(
            grid,
            target.view(),
            &Mixture::single(-2.0, 0.6),
            ModelKind::SingleGaussian,
            &Metric::JensenShannon.into(),
            FitOptions::new(steps, 1.0, None, false).unwrap(),
        )
        .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // A full run walks the state machine to `Completed` and records one
    // history entry per step.
    //
    // Given
    // -----
    // - JS fit of N(1.5, 1.3) from N(-2, 0.6), 40 steps, lr 1.0.
    //
    // Expect
    // ------
    // - Idle before, Completed after; 40 history entries.
    // - Final objective below the initial one.
    fn run_completes_and_records_history() {
        let grid = Grid::new(-8.0, 8.0, 512).unwrap();
        let mut session = js_session(&grid, 40);
        assert_eq!(session.state(), FitState::Idle);

        let outcome = session.run(&mut FitHooks::new()).unwrap();

        assert_eq!(outcome.state, FitState::Completed);
        assert_eq!(outcome.history.len(), 40);
        assert_eq!(outcome.steps_completed, 40);
        assert!(outcome.final_value() < outcome.initial_value);
        assert!(outcome.grad_norm.is_some());
    }

    #[test]
    // Purpose
    // -------
    // Cancellation lands on a step boundary and is final.
    //
    // Given
    // -----
    // - A cancel closure that trips once 3 steps have been observed.
    //
    // Expect
    // ------
    // - State `Cancelled` with exactly 3 history entries.
    // - A second `run` makes no further progress.
    fn cancellation_stops_at_step_boundary() {
        let grid = Grid::new(-8.0, 8.0, 256).unwrap();
        let mut session = js_session(&grid, 50);
        let observed = Cell::new(0usize);
        let mut observer = |_: &StepSnapshot| observed.set(observed.get() + 1);
        let cancel = || observed.get() >= 3;

        let outcome = {
            let mut hooks = FitHooks::new().with_observer(&mut observer).with_cancel(&cancel);
            session.run(&mut hooks).unwrap()
        };
        assert_eq!(outcome.state, FitState::Cancelled);
        assert_eq!(outcome.history.len(), 3);

        let again = session.run(&mut FitHooks::new()).unwrap();
        assert_eq!(again.history.len(), 3);
        assert_eq!(again.theta_hat, outcome.theta_hat);
        assert_eq!(session.state(), FitState::Cancelled);
    }

    #[test]
    fn completed_session_does_not_resume() {
        let grid = Grid::new(-8.0, 8.0, 128).unwrap();
        let mut session = js_session(&grid, 5);
        let first = session.run(&mut FitHooks::new()).unwrap();
        let second = session.run(&mut FitHooks::new()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    // Purpose
    // -------
    // Every completed step suspends exactly once and notifies the observer
    // with matching indices.
    fn suspends_once_per_step() {
        let grid = Grid::new(-8.0, 8.0, 128).unwrap();
        let mut session = js_session(&grid, 7);
        let mut steps_seen = Vec::new();
        let mut suspended = Vec::new();
        let mut observer = |s: &StepSnapshot| steps_seen.push(s.step);
        let mut suspend = |step: usize| suspended.push(step);
        {
            let mut hooks =
                FitHooks::new().with_observer(&mut observer).with_suspend(&mut suspend);
            session.run(&mut hooks).unwrap();
        }
        assert_eq!(suspended, (0..7).collect::<Vec<_>>());
        assert_eq!(steps_seen, suspended);

        let mut none = NoSuspend;
        let mut other = js_session(&grid, 2);
        assert!(other.run(&mut FitHooks::new().with_suspend(&mut none)).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Mean coordinates never leave the domain.
    //
    // Given
    // -----
    // - Target N(3.5, 0.5), narrow domain [-1, 1], large learning rate.
    //
    // Expect
    // ------
    // - Final mean lies within [-1, 1] (pressed against the upper bound).
    fn means_are_clamped_into_domain() {
        let grid = Grid::new(-8.0, 8.0, 256).unwrap();
        let target = density_on_grid(&Mixture::single(3.5, 0.5), &grid);
        let domain = crate::density::grid::Domain::new(-1.0, 1.0).unwrap();
        let mut session = FitSession::new(
            &grid,
            target.view(),
            &Mixture::single(0.0, 1.0),
            ModelKind::SingleGaussian,
            &Metric::Wasserstein.into(),
            FitOptions::new(30, 2.0, Some(domain), false).unwrap(),
        )
        .unwrap();

        let outcome = session.run(&mut FitHooks::new()).unwrap();
        let mean = outcome.mixture.components()[0].mean;
        assert!((-1.0..=1.0).contains(&mean));
        assert!(mean > 0.5);
    }
}
