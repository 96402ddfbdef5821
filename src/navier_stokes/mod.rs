//! Navier--Stokes solver
pub mod functions;
pub mod navier;
pub mod navier_eq;
pub mod solid_masks;
pub use navier::Navier2D;
