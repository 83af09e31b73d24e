//! Public API surface for divergence-minimizing fits.
//!
//! - [`FitOptions`]: step budget, learning rate, clamping domain, verbosity.
//! - [`FitState`]: `Idle → Running → Completed | Cancelled`.
//! - [`FitOutcome`]: final mixture, θ, per-step history, and diagnostics.
//! - Hooks invoked by the descent loop at step boundaries:
//!   [`ProgressObserver`], [`CancelSignal`], [`Suspend`], bundled in
//!   [`FitHooks`].
//!
//! Convention: the objective is always *minimized*; `history[i]` is its value
//! after step `i`.
use crate::{
    density::{grid::Domain, mixture::Mixture},
    optimization::{
        descent::{
            types::Theta,
            validation::{verify_learning_rate, verify_step_count},
        },
        errors::OptResult,
    },
};
use std::sync::atomic::{AtomicBool, Ordering};

/// Optimizer-level configuration.
///
/// Fields:
/// - `step_count` — number of descent steps to run (`> 0`).
/// - `learning_rate` — plain gradient-descent step size (finite, `> 0`).
/// - `domain` — interval that mean coordinates are clamped into after each
///   update; `None` uses the grid extent.
/// - `verbose` — log every step at `info` level instead of `debug`.
///
/// Default:
/// - `step_count`: 300
/// - `learning_rate`: 0.05
/// - `domain`: `None`
/// - `verbose`: `false`
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    pub step_count: usize,
    pub learning_rate: f64,
    pub domain: Option<Domain>,
    pub verbose: bool,
}

impl FitOptions {
    /// Create validated options.
    ///
    /// # Errors
    /// - [`OptError::InvalidStepCount`](crate::optimization::errors::OptError::InvalidStepCount)
    ///   if `step_count == 0`.
    /// - [`OptError::InvalidLearningRate`](crate::optimization::errors::OptError::InvalidLearningRate)
    ///   if `learning_rate` is non-finite or `<= 0`.
    pub fn new(
        step_count: usize, learning_rate: f64, domain: Option<Domain>, verbose: bool,
    ) -> OptResult<Self> {
        let opts = Self { step_count, learning_rate, domain, verbose };
        opts.validate()?;
        Ok(opts)
    }

    /// Re-check the numeric fields (they are public and may have been edited).
    pub fn validate(&self) -> OptResult<()> {
        verify_step_count(self.step_count)?;
        verify_learning_rate(self.learning_rate)
    }
}

impl Default for FitOptions {
    fn default() -> Self {
        Self { step_count: 300, learning_rate: 0.05, domain: None, verbose: false }
    }
}

/// Lifecycle of a fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitState {
    Idle,
    Running,
    Completed,
    Cancelled,
}

impl FitState {
    /// `true` for `Completed` and `Cancelled`; no further steps are taken.
    pub fn is_terminal(self) -> bool {
        matches!(self, FitState::Completed | FitState::Cancelled)
    }
}

impl std::fmt::Display for FitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FitState::Idle => "idle",
            FitState::Running => "running",
            FitState::Completed => "completed",
            FitState::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Result of a fit, whether it ran to completion or was cancelled.
///
/// - `mixture`: decoded from `theta_hat`.
/// - `theta_hat`: final unconstrained parameter vector.
/// - `history`: objective value after each completed step.
/// - `initial_value`: objective at the starting point, before any step.
/// - `state`: `Completed`, `Cancelled`, or `Idle` if nothing has run yet.
/// - `steps_completed`: always equals `history.len()`.
/// - `grad_norm`: L2 norm of the last gradient, if any step ran.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOutcome {
    pub mixture: Mixture,
    pub theta_hat: Theta,
    pub history: Vec<f64>,
    pub initial_value: f64,
    pub state: FitState,
    pub steps_completed: usize,
    pub grad_norm: Option<f64>,
}

impl FitOutcome {
    /// Objective value after the last completed step (or the initial value).
    pub fn final_value(&self) -> f64 {
        self.history.last().copied().unwrap_or(self.initial_value)
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == FitState::Cancelled
    }
}

/// Immutable view of the fit after one completed step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepSnapshot {
    /// 0-based index of the step that just finished.
    pub step: usize,
    pub value: f64,
    pub mixture: Mixture,
}

/// Receives a snapshot after every completed step.
pub trait ProgressObserver {
    fn on_step(&mut self, snapshot: &StepSnapshot);
}

impl<F> ProgressObserver for F
where
    F: FnMut(&StepSnapshot),
{
    fn on_step(&mut self, snapshot: &StepSnapshot) {
        self(snapshot)
    }
}

/// Cooperative cancellation, polled once at the start of every step.
pub trait CancelSignal {
    fn is_cancelled(&self) -> bool;
}

impl CancelSignal for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl<F> CancelSignal for F
where
    F: Fn() -> bool,
{
    fn is_cancelled(&self) -> bool {
        self()
    }
}

/// Suspension point invoked once after every completed step.
///
/// Hosts use it to repaint progress or service cancellation requests;
/// `step` is the 0-based index of the step that just finished.
pub trait Suspend {
    fn suspend(&mut self, step: usize);
}

/// Does nothing; the loop runs straight through.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSuspend;

impl Suspend for NoSuspend {
    fn suspend(&mut self, _step: usize) {}
}

/// Yields the current thread to the OS scheduler after every step.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadYield;

impl Suspend for ThreadYield {
    fn suspend(&mut self, _step: usize) {
        std::thread::yield_now();
    }
}

impl<F> Suspend for F
where
    F: FnMut(usize),
{
    fn suspend(&mut self, step: usize) {
        self(step)
    }
}

/// Optional hooks for one `run` of the descent loop.
///
/// All hooks default to absent; the builder methods attach borrowed
/// implementations.
#[derive(Default)]
pub struct FitHooks<'a> {
    pub observer: Option<&'a mut dyn ProgressObserver>,
    pub cancel: Option<&'a dyn CancelSignal>,
    pub suspend: Option<&'a mut dyn Suspend>,
}

impl<'a> FitHooks<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_observer(mut self, observer: &'a mut dyn ProgressObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn with_cancel(mut self, cancel: &'a dyn CancelSignal) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn with_suspend(mut self, suspend: &'a mut dyn Suspend) -> Self {
        self.suspend = Some(suspend);
        self
    }

    pub(crate) fn cancel_requested(&self) -> bool {
        self.cancel.is_some_and(|c| c.is_cancelled())
    }

    pub(crate) fn notify(&mut self, snapshot: &StepSnapshot) {
        if let Some(observer) = self.observer.as_deref_mut() {
            observer.on_step(snapshot);
        }
    }

    pub(crate) fn suspend(&mut self, step: usize) {
        if let Some(suspend) = self.suspend.as_deref_mut() {
            suspend.suspend(step);
        }
    }
}

impl std::fmt::Debug for FitHooks<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FitHooks")
            .field("observer", &self.observer.is_some())
            .field("cancel", &self.cancel.is_some())
            .field("suspend", &self.suspend.is_some())
            .finish()
    }
}
