//! Adapter that exposes a divergence objective as an `argmin` problem.
//!
//! [`DivergenceProblem`] owns everything one evaluation needs: the grid, the
//! target density normalized once up front, the resolved objective, the
//! model layout, and the per-coordinate finite-difference steps. The cost of
//! `θ` is the objective between the decoded model density (`P`) and the
//! target (`Q`); the gradient is a central-difference estimate of that cost.
//!
//! Non-finite costs are returned as values, not errors, so that a NaN
//! objective shows up in the run history.
use crate::{
    density::{
        grid::{Density, Domain, Grid, normalize_unchecked},
        mixture::{Mixture, density_on_grid},
    },
    divergence::{
        metrics::DensityPair,
        objective::{Objective, ResolvedObjective},
    },
    optimization::{
        descent::{
            finite_diff::{central_diff, fd_steps},
            types::{Cost, Grad, Theta},
            validation::validate_grad,
        },
        errors::OptResult,
        reparam::{ModelKind, unpack_unchecked},
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use ndarray::{Array1, ArrayView1};

/// Bridges a (target, objective, model layout) triple to `argmin`'s
/// `CostFunction` and `Gradient`.
#[derive(Debug, Clone)]
pub struct DivergenceProblem<'a> {
    grid: &'a Grid,
    target: Density,
    objective: ResolvedObjective,
    kind: ModelKind,
    domain: Domain,
    steps: Array1<f64>,
}

impl<'a> DivergenceProblem<'a> {
    /// Build a problem over `grid`.
    ///
    /// The target is copied and renormalized; `domain` sets both the mean
    /// finite-difference step and the clamping interval used by the session.
    ///
    /// # Errors
    /// - [`OptError::InvalidComponentCount`](crate::optimization::errors::OptError::InvalidComponentCount)
    ///   for `Mixture(0)`.
    /// - [`OptError::Density`](crate::optimization::errors::OptError::Density)
    ///   if the target length differs from the grid, an entry is non-finite,
    ///   or the objective has invalid weights. Target mass is not checked.
    pub fn new(
        grid: &'a Grid, target: ArrayView1<'_, f64>, objective: &Objective, kind: ModelKind,
        domain: Domain,
    ) -> OptResult<Self> {
        kind.validate()?;
        grid.check_len(target)?;
        let objective = objective.resolve()?;
        let target = normalize_unchecked(target, grid.dx());
        let steps = fd_steps(kind, &domain);
        Ok(Self { grid, target, objective, kind, domain, steps })
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn grid(&self) -> &Grid {
        self.grid
    }

    /// The normalized target density.
    pub fn target(&self) -> &Density {
        &self.target
    }

    /// Finite-difference step per coordinate of `θ`.
    pub fn steps(&self) -> &Array1<f64> {
        &self.steps
    }

    /// Objective value for an already-decoded mixture.
    pub fn evaluate_mixture(&self, mixture: &Mixture) -> Cost {
        let model = density_on_grid(mixture, self.grid);
        let pair = DensityPair::new_unchecked(model.view(), self.target.view(), self.grid.dx());
        self.objective.evaluate(&pair)
    }

    /// Objective value at `theta`; assumes `theta.len() == kind.dim()`.
    pub fn evaluate(&self, theta: &Theta) -> Cost {
        self.evaluate_mixture(&unpack_unchecked(self.kind, theta))
    }

    /// Central-difference gradient at `theta`.
    pub fn fd_gradient(&self, theta: &Theta) -> Grad {
        central_diff(theta, &self.steps, |t| self.evaluate(t))
    }

    /// Model density for `theta` on the problem grid.
    pub fn model_density(&self, theta: &Theta) -> Density {
        density_on_grid(&unpack_unchecked(self.kind, theta), self.grid)
    }
}

impl CostFunction for DivergenceProblem<'_> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the objective at `θ`.
    ///
    /// # Errors
    /// `ThetaLengthMismatch` if `θ` does not match the model layout.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        self.kind.check_theta(theta)?;
        Ok(self.evaluate(theta))
    }
}

impl Gradient for DivergenceProblem<'_> {
    type Param = Theta;
    type Gradient = Grad;

    /// Central-difference gradient of the cost at `θ`.
    ///
    /// # Errors
    /// - `ThetaLengthMismatch` if `θ` does not match the model layout.
    /// - `GradientDimMismatch` if the estimate has the wrong length.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        self.kind.check_theta(theta)?;
        let grad = self.fd_gradient(theta);
        validate_grad(&grad, theta.len())?;
        Ok(grad)
    }
}
