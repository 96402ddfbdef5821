//! # `rustcfd`: Finite difference solver for thermally coupled flow
//!<img align="right" src="https://rustacean.net/assets/cuddlyferris.png" width="80">
//!
//! # Details
//!
//! Integrates the two dimensional incompressible Navier-Stokes
//! equations, coupled with a temperature equation, on a uniform
//! grid. A solid cylinder sits in the domain, the flow is driven by
//! a decaying localized push and an oscillating external force, and
//! a gaussian heat source warms the fluid.
//!
//! Each time step is split into explicit forcing, semi-Lagrangian
//! advection, implicit diffusion with a Smagorinsky eddy viscosity,
//! and a pressure projection. All implicit systems are solved
//! matrix-free with conjugate gradients, see [`solver`].
//!
//! ## Implemented solver
//!
//! - `2-D Navier-Stokes with temperature and obstacle`,
//! see [`navier_stokes::navier`]
//!
//! # Example
//! ```
//! use rustcfd::config::Config;
//! use rustcfd::integrate;
//! use rustcfd::navier_stokes::Navier2D;
//!
//! let mut config = Config::default();
//! config.grid.nx = 21;
//! config.grid.ny = 21;
//! let mut navier = Navier2D::new(&config).unwrap();
//! integrate(&mut navier, 2, None).unwrap();
//! assert!((navier.time - 0.2).abs() < 1e-12);
//! ```
//!
//! ## Configuration
//!
//! The binary reads a TOML file, see [`config`]:
//!
//! `cargo run --release -- run.toml`
//!
//! Set `RUST_LOG=debug` to follow every linear solve.
#![warn(missing_docs)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#[macro_use]
extern crate enum_dispatch;
pub mod advection;
pub mod config;
pub mod error;
pub mod field;
pub mod forcing;
pub mod grid;
pub mod logger;
pub mod navier_stokes;
pub mod observer;
pub mod operators;
pub mod solver;
pub mod turbulence;

pub use error::{Result, SimError};

/// Integrate trait, step forward in time, and report results
pub trait Integrate {
    /// Update solution
    ///
    /// # Errors
    /// The step failed, the state is left at the previous step.
    fn update(&mut self) -> Result<()>;
    /// Receive current time
    fn get_time(&self) -> f64;
    /// Get timestep
    fn get_dt(&self) -> f64;
    /// Callback function (can be used for i/o)
    fn callback(&mut self);
    /// Additional break criteria
    fn exit(&mut self) -> bool {
        false
    }
}

/// Integrade pde, that implements the Integrate trait.
///
/// Runs `n_steps` updates. Specify `callback_intervall` to invoke the
/// callback every n-th step.
///
/// Stop Criteria:
/// 1. Timestep limit
/// 2. Break criteria of the pde
///
/// # Errors
/// The first failed update.
pub fn integrate<T: Integrate>(
    pde: &mut T,
    n_steps: usize,
    callback_intervall: Option<usize>,
) -> Result<()> {
    for timestep in 1..=n_steps {
        // Update
        pde.update()?;

        // Callback
        if let Some(intervall) = callback_intervall {
            if intervall > 0 && timestep % intervall == 0 {
                pde.callback();
            }
        }

        // Break
        if pde.exit() {
            log::info!("break criteria triggered at time {:4.3}", pde.get_time());
            return Ok(());
        }
    }
    log::info!(
        "timestep limit reached: {} (time = {:4.3}, dt = {})",
        n_steps,
        pde.get_time(),
        pde.get_dt()
    );
    Ok(())
}
