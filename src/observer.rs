//! # Observation of the running simulation
//!
//! After every callback the integrator hands a read-only [`Frame`]
//! to its [`Observer`]. Observers are free to render, record or
//! ignore it; they cannot change the state.
use crate::field::{ScalarField, VectorField};
use crate::grid::Grid;
use ndarray::Array2;

/// Snapshot of the state after a time step
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Number of completed steps
    pub step: usize,
    /// Simulation time
    pub time: f64,
    /// Grid and node coordinates
    pub grid: &'a Grid,
    /// Velocity
    pub velocity: &'a VectorField,
    /// Scalar vorticity
    pub vorticity: &'a Array2<f64>,
    /// Temperature
    pub temperature: &'a ScalarField,
    /// Obstacle mask
    pub solid: &'a Array2<bool>,
    /// External force at `time`
    pub external_force: &'a VectorField,
}

/// Receives a frame after every callback
pub trait Observer {
    /// Inspect current state
    fn observe(&mut self, frame: &Frame<'_>);
}

/// Observer that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn observe(&mut self, _frame: &Frame<'_>) {}
}

impl<F> Observer for F
where
    F: FnMut(&Frame<'_>),
{
    fn observe(&mut self, frame: &Frame<'_>) {
        self(frame)
    }
}
