//! # Smagorinsky sub-grid model
//!
//! Eddy viscosity from the magnitude of the resolved strain rate
//! $$
//! \nu_t = (C_s \Delta)^2 |S|, \quad |S| = \sqrt{2 S_{ij} S_{ij}}
//! $$
//! with the filter width `Delta` taken from the grid spacing.
use crate::field::VectorField;
use crate::grid::Grid;
use crate::operators::{partial_x, partial_y};
use ndarray::{Array2, Zip};

/// Typical value of the Smagorinsky constant
pub const SMAGORINSKY_CONSTANT: f64 = 0.1;

/// Smagorinsky eddy viscosity model
#[derive(Debug, Clone, Copy)]
pub struct Smagorinsky {
    /// Model constant C_s
    pub cs: f64,
    /// Filter width
    pub delta: f64,
}

impl Smagorinsky {
    /// Model with constant `cs` and the filter width of `grid`
    pub fn new(cs: f64, grid: &Grid) -> Self {
        Self {
            cs,
            delta: grid.filter_width(),
        }
    }

    /// Turbulent viscosity nu_t on every node
    pub fn eddy_viscosity(&self, velocity: &VectorField, grid: &Grid) -> Array2<f64> {
        let c = (self.cs * self.delta).powi(2);
        strain_rate_magnitude(velocity, grid).mapv_into(|s| c * s)
    }

    /// Molecular plus turbulent viscosity
    pub fn effective_viscosity(&self, nu: f64, velocity: &VectorField, grid: &Grid) -> Array2<f64> {
        self.eddy_viscosity(velocity, grid).mapv_into(|nu_t| nu + nu_t)
    }
}

/// Magnitude of the strain rate tensor
/// $$
/// |S| = \sqrt{2 (S_{11}^2 + S_{22}^2 + 2 S_{12}^2)}
/// $$
/// with `S11 = dudx`, `S22 = dvdy`, `S12 = (dudy + dvdx) / 2`.
pub fn strain_rate_magnitude(velocity: &VectorField, grid: &Grid) -> Array2<f64> {
    let ux = velocity.component(0);
    let uy = velocity.component(1);
    let du_dx = partial_x(&ux, grid);
    let du_dy = partial_y(&ux, grid);
    let dv_dx = partial_x(&uy, grid);
    let dv_dy = partial_y(&uy, grid);
    Zip::from(&du_dx)
        .and(&dv_dy)
        .and(&du_dy)
        .and(&dv_dx)
        .map_collect(|&s11, &s22, &a, &b| {
            let s12 = 0.5 * (a + b);
            (2. * (s11 * s11 + s22 * s22 + 2. * s12 * s12)).sqrt()
        })
}
