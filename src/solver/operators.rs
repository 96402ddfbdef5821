//! Matrix-free operators of the flow solver
//!
//! Every operator reshapes its flat input into a field on the grid,
//! applies finite difference stencils and flattens the result again.
use super::LinearOperator;
use crate::field::{ScalarField, VectorField};
use crate::grid::Grid;
use crate::operators::{diffusive_flux_divergence, laplacian, vector_laplacian};
use crate::turbulence::Smagorinsky;
use ndarray::{Array1, Array2};
use serde::Deserialize;

/// How the eddy viscosity enters the implicit diffusion operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViscosityCoupling {
    /// Recompute the viscosity from the iterate on every application.
    /// The operator then depends on its own input.
    PerIteration,
    /// Evaluate the viscosity once from the velocity before diffusion.
    /// The operator is linear.
    Frozen,
}

impl Default for ViscosityCoupling {
    fn default() -> Self {
        Self::PerIteration
    }
}

fn scalar_from_flat(x: &Array1<f64>, grid: &Grid) -> ScalarField {
    ScalarField::zeros(grid).with_flat(x)
}

fn vector_from_flat(x: &Array1<f64>, grid: &Grid) -> VectorField {
    VectorField::zeros(grid).with_flat(x)
}

/// Implicit momentum diffusion with Smagorinsky eddy viscosity
/// $$
/// A(v) = v - \delta t \nabla \cdot (\nu_{eff} \nabla v)
/// $$
/// applied to each velocity component.
#[derive(Debug, Clone)]
pub struct ViscousDiffusion {
    grid: Grid,
    dt: f64,
    nu: f64,
    model: Smagorinsky,
    frozen: Option<Array2<f64>>,
}

impl ViscousDiffusion {
    /// Construct operator.
    ///
    /// `velocity` is the field before diffusion; it is only used
    /// if the viscosity is frozen.
    pub fn new(
        grid: &Grid,
        dt: f64,
        nu: f64,
        model: Smagorinsky,
        coupling: ViscosityCoupling,
        velocity: &VectorField,
    ) -> Self {
        let frozen = match coupling {
            ViscosityCoupling::Frozen => Some(model.effective_viscosity(nu, velocity, grid)),
            ViscosityCoupling::PerIteration => None,
        };
        Self {
            grid: grid.clone(),
            dt,
            nu,
            model,
            frozen,
        }
    }
}

impl LinearOperator for ViscousDiffusion {
    fn dof(&self) -> usize {
        self.grid.len() * 2
    }

    fn apply(&self, x: &Array1<f64>) -> Array1<f64> {
        let v = vector_from_flat(x, &self.grid);
        let nu_eff = match &self.frozen {
            Some(nu_eff) => nu_eff.to_owned(),
            None => self.model.effective_viscosity(self.nu, &v, &self.grid),
        };
        let mut out = v.clone();
        for c in 0..2 {
            let flux = diffusive_flux_divergence(&nu_eff, &v.component(c), &self.grid);
            out.component_mut(c).scaled_add(-self.dt, &flux);
        }
        out.to_flat()
    }

    fn name(&self) -> &'static str {
        "viscous diffusion"
    }
}

/// Implicit momentum diffusion with constant viscosity
/// $$
/// A(v) = v - \nu \delta t \nabla^2 v
/// $$
#[derive(Debug, Clone)]
pub struct LaminarDiffusion {
    grid: Grid,
    dt: f64,
    nu: f64,
}

impl LaminarDiffusion {
    /// Construct operator
    pub fn new(grid: &Grid, dt: f64, nu: f64) -> Self {
        Self {
            grid: grid.clone(),
            dt,
            nu,
        }
    }
}

impl LinearOperator for LaminarDiffusion {
    fn dof(&self) -> usize {
        self.grid.len() * 2
    }

    fn apply(&self, x: &Array1<f64>) -> Array1<f64> {
        let v = vector_from_flat(x, &self.grid);
        let lap = vector_laplacian(&v, &self.grid);
        let mut out = v.v;
        out.scaled_add(-self.nu * self.dt, &lap.v);
        out.iter().copied().collect()
    }

    fn name(&self) -> &'static str {
        "laminar diffusion"
    }
}

/// Pressure poisson operator
/// $$
/// A(p) = \nabla^2 p
/// $$
#[derive(Debug, Clone)]
pub struct Poisson {
    grid: Grid,
}

impl Poisson {
    /// Construct operator
    pub fn new(grid: &Grid) -> Self {
        Self { grid: grid.clone() }
    }
}

impl LinearOperator for Poisson {
    fn dof(&self) -> usize {
        self.grid.len()
    }

    fn apply(&self, x: &Array1<f64>) -> Array1<f64> {
        let p = scalar_from_flat(x, &self.grid);
        laplacian(&p.v, &self.grid).iter().copied().collect()
    }

    fn name(&self) -> &'static str {
        "pressure poisson"
    }
}

/// Implicit diffusion of a scalar
/// $$
/// A(T) = T - \kappa \delta t \nabla^2 T
/// $$
#[derive(Debug, Clone)]
pub struct ScalarDiffusion {
    grid: Grid,
    dt: f64,
    ka: f64,
}

impl ScalarDiffusion {
    /// Construct operator
    pub fn new(grid: &Grid, dt: f64, ka: f64) -> Self {
        Self {
            grid: grid.clone(),
            dt,
            ka,
        }
    }
}

impl LinearOperator for ScalarDiffusion {
    fn dof(&self) -> usize {
        self.grid.len()
    }

    fn apply(&self, x: &Array1<f64>) -> Array1<f64> {
        let t = scalar_from_flat(x, &self.grid);
        let lap = laplacian(&t.v, &self.grid);
        let mut out = t.v;
        out.scaled_add(-self.ka * self.dt, &lap);
        out.iter().copied().collect()
    }

    fn name(&self) -> &'static str {
        "temperature diffusion"
    }
}

/// Identity operator
#[derive(Debug, Clone)]
pub struct Identity {
    n: usize,
}

impl Identity {
    /// Identity of size n
    pub fn new(n: usize) -> Self {
        Self { n }
    }
}

impl LinearOperator for Identity {
    fn dof(&self) -> usize {
        self.n
    }

    fn apply(&self, x: &Array1<f64>) -> Array1<f64> {
        x.to_owned()
    }

    fn name(&self) -> &'static str {
        "identity"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{Cg, Operator};

    fn grid() -> Grid {
        Grid::new(11, 11, 1., 1.).unwrap()
    }

    #[test]
    fn test_diffusion_operators_are_identity_without_viscosity() {
        let grid = grid();
        let x = Array1::from_shape_fn(grid.len() * 2, |i| (i as f64).sin());
        let velocity = VectorField::zeros(&grid);
        let model = Smagorinsky::new(0., &grid);
        let ops: Vec<Operator> = vec![
            LaminarDiffusion::new(&grid, 0.1, 0.).into(),
            ViscousDiffusion::new(&grid, 0.1, 0., model, ViscosityCoupling::Frozen, &velocity)
                .into(),
        ];
        for op in &ops {
            assert_eq!(op.dof(), x.len());
            assert_eq!(op.apply(&x), x);
        }
    }

    #[test]
    fn test_viscous_matches_laminar_for_zero_constant() {
        // with C_s = 0 the flux form differs from the five point stencil,
        // but both agree on fields that are quadratic in x and y
        let grid = grid();
        let ux = grid.map_coords(|x, y| x * x + y);
        let uy = grid.map_coords(|x, y| x - y * y);
        let v = VectorField::from_components(&ux, &uy);
        let model = Smagorinsky::new(0., &grid);
        let turb = ViscousDiffusion::new(
            &grid,
            0.1,
            1e-2,
            model,
            ViscosityCoupling::PerIteration,
            &v,
        );
        let lam = LaminarDiffusion::new(&grid, 0.1, 1e-2);
        let a = vector_from_flat(&turb.apply(&v.to_flat()), &grid);
        let b = vector_from_flat(&lam.apply(&v.to_flat()), &grid);
        // compare away from the boundary band
        for i in 2..grid.nx - 2 {
            for j in 2..grid.ny - 2 {
                for c in 0..2 {
                    assert!((a.v[[i, j, c]] - b.v[[i, j, c]]).abs() < 1e-10);
                }
            }
        }
    }

    #[test]
    fn test_scalar_diffusion_solve_smooths_peak() {
        let grid = grid();
        let mut t = ScalarField::zeros(&grid);
        t.v[[5, 5]] = 1.;
        let op = ScalarDiffusion::new(&grid, 0.1, 0.01);
        let result = Cg::new(None, 1e-10).solve(&op, &t.to_flat());
        assert!(result.converged);
        let t_new = scalar_from_flat(&result.x, &grid);
        assert!(t_new.v[[5, 5]] < 1.);
        assert!(t_new.v[[5, 5]] > 0.);
        assert!(t_new.v[[4, 5]] > 0.);
        // the implicit system is satisfied
        let recover = op.apply(&result.x);
        for (a, b) in recover.iter().zip(t.to_flat().iter()) {
            assert!((a - b).abs() < 1e-8);
        }
    }

    #[test]
    fn test_poisson_solve_recovers_pressure() {
        // p vanishes on the boundary, so lap(p) determines it uniquely
        let grid = grid();
        let p = grid.map_coords(|x, y| {
            (std::f64::consts::PI * x).sin() * (std::f64::consts::PI * y).sin()
        });
        let op = Poisson::new(&grid);
        let b = op.apply(&ScalarField::from_array(p.clone()).to_flat());
        let result = Cg::new(None, 1e-12).solve(&op, &b);
        assert!(result.converged);
        let p_new = scalar_from_flat(&result.x, &grid);
        for (a, b) in p_new.v.iter().zip(p.iter()) {
            assert!((a - b).abs() < 1e-8, "{} vs {}", a, b);
        }
    }
}
