//! Implement equations for navier-stokes simulations
//!
//! Every stage reads the state it is given and returns a new field,
//! the solver state is only replaced in [`Integrate::update`].
//!
//! [`Integrate::update`]: crate::Integrate::update
use super::Navier2D;
use crate::advection::{advect_scalar, advect_vector};
use crate::config::NonConvergencePolicy;
use crate::error::{Result, SimError};
use crate::field::{FieldBase, ScalarField, VectorField};
use crate::operators::{divergence, gradient};
use crate::solver::{LaminarDiffusion, LinearOperator, Operator};
use crate::solver::{Poisson, ScalarDiffusion, ViscousDiffusion};
use ndarray::{Array1, Array2, Dimension};

/// General
impl Navier2D {
    /// Divergence: duxdx + duydy
    pub fn div(&self) -> Array2<f64> {
        divergence(&self.velocity, &self.grid)
    }

    /// Return error if a field contains NaN or Inf
    pub(crate) fn check_finite<D: Dimension>(
        field: &FieldBase<D>,
        step: usize,
        stage: &'static str,
    ) -> Result<()> {
        if field.is_finite() {
            Ok(())
        } else {
            Err(SimError::NonFinite { step, stage })
        }
    }

    /// Solve linear system, apply non-convergence policy
    fn solve_linear<L: LinearOperator>(
        &self,
        op: &L,
        b: &Array1<f64>,
        step: usize,
    ) -> Result<Array1<f64>> {
        let result = self.cg.solve(op, b);
        if !result.converged {
            match self.on_nonconvergence {
                NonConvergencePolicy::Abort => {
                    return Err(SimError::NonConvergence {
                        step,
                        operator: op.name(),
                        iterations: result.iterations,
                        residual: result.residual,
                    })
                }
                NonConvergencePolicy::Warn => log::warn!(
                    "{} solve did not converge in step {}: residual {:5.3e} after {} iterations",
                    op.name(),
                    step,
                    result.residual,
                    result.iterations
                ),
            }
        }
        Ok(result.x)
    }
}

/// Forces
impl Navier2D {
    /// Localized forcing plus external force at `time`
    pub fn force(&self, time: f64) -> VectorField {
        let mut force = self.forcing.field(time, &self.grid);
        force.v += &self.external_force.field(time, &self.grid).v;
        force
    }

    /// Explicit force step
    /// $$
    /// u\\_new = u + \delta t (f + f\\_{ext})
    /// $$
    pub fn apply_forces(&self, velocity: &VectorField, time: f64) -> VectorField {
        let mut new = velocity.clone();
        new.v.scaled_add(self.dt, &self.force(time).v);
        new
    }
}

/// Convection
impl Navier2D {
    /// Transport velocity with itself
    pub fn advect_velocity(&self, velocity: &VectorField) -> VectorField {
        advect_vector(velocity, velocity, self.dt, &self.grid)
    }
}

/// Diffusion
impl Navier2D {
    /// Implicit diffusion operator for the current model.
    ///
    /// `velocity` is the field entering the diffusion step.
    pub fn diffusion_operator(&self, velocity: &VectorField) -> Operator {
        match self.turbulence {
            Some(model) => ViscousDiffusion::new(
                &self.grid,
                self.dt,
                self.nu,
                model,
                self.coupling,
                velocity,
            )
            .into(),
            None => LaminarDiffusion::new(&self.grid, self.dt, self.nu).into(),
        }
    }

    /// Solve momentum diffusion
    /// $$
    /// (1 - \delta t \nabla \cdot \nu\\_{eff} \nabla) u\\_new = u
    /// $$
    ///
    /// # Errors
    /// Solve did not converge and the policy is abort.
    pub fn solve_velocity(&self, velocity: &VectorField, step: usize) -> Result<VectorField> {
        let op = self.diffusion_operator(velocity);
        let x = self.solve_linear(&op, &velocity.to_flat(), step)?;
        Ok(velocity.with_flat(&x))
    }
}

/// Pressure update
impl Navier2D {
    /// Solve pressure poisson equation
    /// $$
    /// \nabla^2 p = \nabla \cdot u
    /// $$
    ///
    /// # Errors
    /// Solve did not converge and the policy is abort.
    pub fn solve_pres(&self, velocity: &VectorField, step: usize) -> Result<ScalarField> {
        let rhs = ScalarField::from_array(divergence(velocity, &self.grid));
        let op = Poisson::new(&self.grid);
        let x = self.solve_linear(&op, &rhs.to_flat(), step)?;
        Ok(rhs.with_flat(&x))
    }

    /// Correct velocity field.
    /// $$
    /// u\\_new = u - \nabla p
    /// $$
    pub fn project_velocity(&self, velocity: &VectorField, pres: &ScalarField) -> VectorField {
        let mut new = velocity.clone();
        new.v -= &gradient(&pres.v, &self.grid).v;
        new
    }
}

/// Temperature
impl Navier2D {
    /// Solve temperature equation
    /// $$
    /// (1 - \kappa \delta t \nabla^2) T\\_new = T(x - \delta t u)
    /// $$
    /// then add the heat source and clamp the obstacle temperature.
    ///
    /// # Errors
    /// Solve did not converge and the policy is abort.
    pub fn solve_temp(
        &self,
        temp: &ScalarField,
        velocity: &VectorField,
        step: usize,
    ) -> Result<ScalarField> {
        let advected = ScalarField::from_array(advect_scalar(&temp.v, velocity, self.dt, &self.grid));
        let op = ScalarDiffusion::new(&self.grid, self.dt, self.ka);
        let x = self.solve_linear(&op, &advected.to_flat(), step)?;
        let mut new = advected.with_flat(&x);
        new.v.scaled_add(self.dt, &self.source);
        if let Some(value) = self.solid_temp {
            new.fill_masked(&self.solid, value);
        }
        Ok(new)
    }
}
