//! # Matrix-free linear solver
//!
//! Linear systems `A x = b` are solved with the conjugate gradient
//! method. The matrix is never stored; an operator only knows its
//! number of degrees of freedom and how to act on a flat vector.
//!
//! Implemented operators
//! - [`ViscousDiffusion`]: `v - dt * div(nu_eff * grad v)`
//! - [`LaminarDiffusion`]: `v - dt * nu * lap(v)`
//! - [`Poisson`]: `lap(p)`
//! - [`ScalarDiffusion`]: `T - dt * ka * lap(T)`
//! - [`Identity`]
#![allow(clippy::module_name_repetitions)]
pub mod cg;
pub mod operators;
pub use cg::{Cg, CgResult};
pub use operators::{
    Identity, LaminarDiffusion, Poisson, ScalarDiffusion, ViscosityCoupling, ViscousDiffusion,
};
use ndarray::Array1;

/// Action of a linear operator on a flat vector
#[enum_dispatch]
pub trait LinearOperator {
    /// Degrees of freedom (length of in- and output)
    fn dof(&self) -> usize;

    /// Return A x
    fn apply(&self, x: &Array1<f64>) -> Array1<f64>;

    /// Name used in logs and errors
    fn name(&self) -> &'static str;
}

/// Collection of operators used by the flow solver
#[enum_dispatch(LinearOperator)]
#[derive(Debug, Clone)]
pub enum Operator {
    /// Implicit momentum diffusion with eddy viscosity
    ViscousDiffusion,
    /// Implicit momentum diffusion, constant viscosity
    LaminarDiffusion,
    /// Pressure poisson operator
    Poisson,
    /// Implicit temperature diffusion
    ScalarDiffusion,
    /// Identity
    Identity,
}
