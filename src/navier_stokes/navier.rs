//! # Direct numerical simulation
//! Solver for 2-dimensional incompressible Navier-Stokes momentum
//! equations coupled with a temperature equation, around a solid
//! cylinder and closed with a Smagorinsky sub-grid model.
//!
//! Every step is split into
//! 1. body forces
//! 2. semi-Lagrangian self-advection
//! 3. implicit diffusion with eddy viscosity
//! 4. pressure projection
//! 5. obstacle enforcement
//! 6. temperature advection, diffusion and heating
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
//! navier.random_disturbance(1e-3);
//! integrate(&mut navier, 3, Some(1)).unwrap();
//! assert_eq!(navier.step, 3);
//! assert_eq!(navier.diagnostics["time"].len(), 3);
//! ```
use super::functions::{apply_cos_sin, apply_sin_cos, random_field};
use super::functions::{eval_div, eval_energy, eval_max_abs, eval_mean};
use super::solid_masks::{no_solid, solid_cylinder};
use crate::config::{Config, NonConvergencePolicy};
use crate::error::Result;
use crate::field::{ScalarField, VectorField};
use crate::forcing::{ExternalForce, Forcing};
use crate::grid::Grid;
use crate::observer::{Frame, Observer};
use crate::operators::curl;
use crate::solver::{Cg, ViscosityCoupling};
use crate::turbulence::Smagorinsky;
use crate::Integrate;
use ndarray::Array2;
use std::collections::HashMap;

/// Solve 2-dimensional Navier-Stokes equations
/// coupled with temperature equations
pub struct Navier2D {
    /// Grid
    pub grid: Grid,
    /// Velocity \[ux, uy\]
    pub velocity: VectorField,
    /// Temperature
    pub temp: ScalarField,
    /// Pressure of the last projection
    pub pres: ScalarField,
    /// Obstacle mask, all false without obstacle
    pub solid: Array2<bool>,
    /// Temperature inside the obstacle
    pub solid_temp: Option<f64>,
    /// Viscosity
    pub nu: f64,
    /// Thermal diffusivity
    pub ka: f64,
    /// Time
    pub time: f64,
    /// Time step size
    pub dt: f64,
    /// Number of completed steps
    pub step: usize,
    /// Sub-grid model, laminar if None
    pub(crate) turbulence: Option<Smagorinsky>,
    pub(crate) coupling: ViscosityCoupling,
    pub(crate) cg: Cg,
    pub(crate) on_nonconvergence: NonConvergencePolicy,
    pub(crate) forcing: Forcing,
    pub(crate) external_force: ExternalForce,
    /// Heat source, constant in time
    pub(crate) source: Array2<f64>,
    /// diagnostics like energy, divergence, ...
    pub diagnostics: HashMap<String, Vec<f64>>,
    /// Receives a frame on every callback
    pub observer: Option<Box<dyn Observer>>,
}

impl Navier2D {
    /// Construct solver from validated configuration.
    ///
    /// All fields start at rest with zero temperature,
    /// apart from the obstacle temperature.
    ///
    /// # Errors
    /// Invalid configuration.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let g = &config.grid;
        let grid = Grid::new(g.nx, g.ny, g.lx, g.ly)?;
        let physics = &config.physics;

        // obstacle
        let (solid, solid_temp) = if config.obstacle.enabled {
            let o = &config.obstacle.obstacle;
            (
                solid_cylinder(&grid, o.center, o.radius),
                Some(o.temperature),
            )
        } else {
            (no_solid(&grid), None)
        };

        // turbulence
        let turbulence = if physics.turbulence {
            Some(Smagorinsky::new(physics.smagorinsky_constant, &grid))
        } else {
            None
        };

        // Diagnostics
        let mut diagnostics = HashMap::new();
        for key in &["time", "div", "energy", "vorticity", "temp"] {
            diagnostics.insert((*key).to_string(), Vec::<f64>::new());
        }

        let mut navier = Self {
            velocity: VectorField::zeros(&grid),
            temp: ScalarField::zeros(&grid),
            pres: ScalarField::zeros(&grid),
            source: config.source.field(&grid),
            solid,
            solid_temp,
            nu: physics.viscosity,
            ka: physics.diffusivity,
            time: 0.,
            dt: config.time.dt,
            step: 0,
            turbulence,
            coupling: physics.viscosity_coupling,
            cg: Cg::new(config.solver.max_iter, config.solver.tolerance),
            on_nonconvergence: config.solver.on_nonconvergence,
            forcing: config.forcing.clone(),
            external_force: config.external_force.clone(),
            diagnostics,
            observer: None,
            grid,
        };
        navier.enforce_obstacle();
        log::info!(
            "Navier2D: grid ({}, {}), dt = {}, nu = {:e}, ka = {:e}, turbulence = {}",
            navier.grid.nx,
            navier.grid.ny,
            navier.dt,
            navier.nu,
            navier.ka,
            navier.turbulence.is_some()
        );
        Ok(navier)
    }

    /// Attach observer, replacing the previous one
    pub fn set_observer<O: Observer + 'static>(&mut self, observer: O) {
        self.observer = Some(Box::new(observer));
    }

    /// Initialize velocity with fourier modes
    /// ux = amp \* sin(mx)cos(nx)
    /// uy = -amp \* cos(mx)sin(nx)
    pub fn set_velocity(&mut self, amp: f64, m: f64, n: f64) {
        apply_sin_cos(&mut self.velocity.component_mut(0), &self.grid, amp, m, n);
        apply_cos_sin(&mut self.velocity.component_mut(1), &self.grid, -amp, m, n);
        self.enforce_obstacle();
    }

    /// Initialize temperature with fourier modes
    /// temp = amp \* sin(mx)cos(nx)
    pub fn set_temperature(&mut self, amp: f64, m: f64, n: f64) {
        apply_sin_cos(&mut self.temp.v, &self.grid, amp, m, n);
        self.enforce_obstacle();
    }

    /// Initialize all fields with random disturbances in \[-amp, amp\]
    pub fn random_disturbance(&mut self, amp: f64) {
        random_field(&mut self.temp.v, amp);
        random_field(&mut self.velocity.component_mut(0), amp);
        random_field(&mut self.velocity.component_mut(1), amp);
        self.enforce_obstacle();
    }

    /// Reset time and step counter
    pub fn reset_time(&mut self) {
        self.time = 0.;
        self.step = 0;
    }

    /// Zero velocity and fix temperature inside the obstacle
    pub fn enforce_obstacle(&mut self) {
        self.velocity.zero_masked(&self.solid);
        if let Some(value) = self.solid_temp {
            self.temp.fill_masked(&self.solid, value);
        }
    }

    /// Scalar vorticity of the current velocity
    pub fn vorticity(&self) -> Array2<f64> {
        curl(&self.velocity, &self.grid)
    }

    fn push_diagnostic(&mut self, key: &str, value: f64) {
        self.diagnostics
            .entry(key.to_string())
            .or_insert_with(Vec::new)
            .push(value);
    }
}

impl Integrate for Navier2D {
    /// Update 1 timestep
    fn update(&mut self) -> Result<()> {
        let step = self.step + 1;
        let time = self.time + self.dt;

        // Forces
        let velocity = self.apply_forces(&self.velocity, time);
        Self::check_finite(&velocity, step, "forcing")?;

        // Convection
        let velocity = self.advect_velocity(&velocity);
        Self::check_finite(&velocity, step, "advection")?;

        // Diffusion
        let velocity = self.solve_velocity(&velocity, step)?;
        Self::check_finite(&velocity, step, "diffusion")?;

        // Projection
        let pres = self.solve_pres(&velocity, step)?;
        Self::check_finite(&pres, step, "pressure")?;
        let mut velocity = self.project_velocity(&velocity, &pres);
        velocity.zero_masked(&self.solid);
        Self::check_finite(&velocity, step, "projection")?;

        // Solve Temperature
        let temp = self.solve_temp(&self.temp, &velocity, step)?;
        Self::check_finite(&temp, step, "temperature")?;

        self.velocity = velocity;
        self.pres = pres;
        self.temp = temp;
        self.time = time;
        self.step = step;
        Ok(())
    }

    fn get_time(&self) -> f64 {
        self.time
    }

    fn get_dt(&self) -> f64 {
        self.dt
    }

    fn callback(&mut self) {
        let vorticity = self.vorticity();
        let div = eval_div(&self.velocity, &self.grid);
        let energy = eval_energy(&self.velocity);
        let max_vorticity = eval_max_abs(&vorticity);
        let mean_temp = eval_mean(&self.temp.v);
        log::info!(
            "step = {:5}  time = {:6.2}  |div| = {:4.2e}  E = {:5.3e}  |w|max = {:5.3e}  <T> = {:5.3e}",
            self.step,
            self.time,
            div,
            energy,
            max_vorticity,
            mean_temp
        );

        self.push_diagnostic("time", self.time);
        self.push_diagnostic("div", div);
        self.push_diagnostic("energy", energy);
        self.push_diagnostic("vorticity", max_vorticity);
        self.push_diagnostic("temp", mean_temp);

        if let Some(observer) = self.observer.as_mut() {
            let external_force = self.external_force.field(self.time, &self.grid);
            let frame = Frame {
                step: self.step,
                time: self.time,
                grid: &self.grid,
                velocity: &self.velocity,
                vorticity: &vorticity,
                temperature: &self.temp,
                solid: &self.solid,
                external_force: &external_force,
            };
            observer.observe(&frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use crate::integrate;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn small_config() -> Config {
        let mut config = Config::default();
        config.grid.nx = 11;
        config.grid.ny = 11;
        config
    }

    fn observer<F: FnMut(&Frame<'_>)>(f: F) -> F {
        f
    }

    fn quiet_config() -> Config {
        let mut config = small_config();
        config.forcing.amplitude = 0.;
        config.external_force.amplitude_x = 0.;
        config.external_force.amplitude_y = 0.;
        config.source.strength = 0.;
        config.obstacle.enabled = false;
        config
    }

    #[test]
    fn test_zero_forcing_stays_at_rest() {
        let mut navier = Navier2D::new(&quiet_config()).unwrap();
        navier.update().unwrap();
        assert_eq!(navier.step, 1);
        assert!((navier.time - 0.1).abs() < 1e-14);
        assert!(navier.velocity.v.iter().all(|x| *x == 0.));
        assert!(navier.temp.v.iter().all(|x| *x == 0.));
    }

    #[test]
    fn test_obstacle_invariants_hold_every_step() {
        let mut config = Config::default();
        config.grid.nx = 21;
        config.grid.ny = 21;
        let mut navier = Navier2D::new(&config).unwrap();
        assert!(navier.solid.iter().any(|&m| m));
        navier.random_disturbance(0.1);
        for _ in 0..3 {
            navier.update().unwrap();
            for ((i, j), &m) in navier.solid.indexed_iter() {
                if m {
                    assert_eq!(navier.velocity.v[[i, j, 0]], 0.);
                    assert_eq!(navier.velocity.v[[i, j, 1]], 0.);
                    assert_eq!(navier.temp.v[[i, j]], 0.5);
                }
            }
        }
    }

    #[test]
    fn test_heat_source_warms_centre() {
        let mut config = small_config();
        config.obstacle.enabled = false;
        let mut navier = Navier2D::new(&config).unwrap();
        navier.update().unwrap();
        assert!(navier.temp.v[[5, 5]] > 0.09);
        assert!(navier.temp.v[[0, 0]].abs() < 1e-6);
    }

    #[test]
    fn test_nonconvergence_abort() {
        let mut config = small_config();
        config.solver.max_iter = Some(1);
        config.solver.tolerance = 1e-12;
        config.solver.on_nonconvergence = NonConvergencePolicy::Abort;
        let mut navier = Navier2D::new(&config).unwrap();
        match navier.update() {
            Err(SimError::NonConvergence {
                step, iterations, ..
            }) => {
                assert_eq!(step, 1);
                assert_eq!(iterations, 1);
            }
            other => panic!("expected non-convergence, got {:?}", other.err()),
        }
        // state untouched
        assert_eq!(navier.step, 0);
        assert_eq!(navier.time, 0.);
    }

    #[test]
    fn test_nonconvergence_warn_continues() {
        let mut config = small_config();
        config.solver.max_iter = Some(1);
        config.solver.tolerance = 1e-12;
        let mut navier = Navier2D::new(&config).unwrap();
        navier.update().unwrap();
        assert_eq!(navier.step, 1);
        assert!(navier.velocity.is_finite());
    }

    #[test]
    fn test_non_finite_is_reported() {
        let mut navier = Navier2D::new(&small_config()).unwrap();
        navier.velocity.v[[2, 2, 0]] = f64::NAN;
        match navier.update() {
            Err(SimError::NonFinite { step, stage }) => {
                assert_eq!(step, 1);
                assert_eq!(stage, "forcing");
            }
            other => panic!("expected non-finite error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_observer_receives_frames() {
        let steps = Rc::new(RefCell::new(Vec::new()));
        let record = Rc::clone(&steps);
        let mut navier = Navier2D::new(&small_config()).unwrap();
        navier.set_observer(observer(move |frame| {
            assert_eq!(frame.velocity.v.shape(), &[11, 11, 2]);
            assert_eq!(frame.vorticity.shape(), &[11, 11]);
            record.borrow_mut().push((frame.step, frame.time));
        }));
        integrate(&mut navier, 4, Some(2)).unwrap();
        let steps = steps.borrow();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].0, 2);
        assert_eq!(steps[1].0, 4);
        assert!((steps[1].1 - 0.4).abs() < 1e-12);
        assert_eq!(navier.diagnostics["energy"].len(), 2);
    }

    #[test]
    fn test_reset_time() {
        let mut navier = Navier2D::new(&small_config()).unwrap();
        navier.update().unwrap();
        navier.reset_time();
        assert_eq!(navier.step, 0);
        assert_eq!(navier.time, 0.);
    }

    #[test]
    fn test_set_velocity_respects_obstacle() {
        let mut config = Config::default();
        config.grid.nx = 21;
        config.grid.ny = 21;
        let mut navier = Navier2D::new(&config).unwrap();
        navier.set_velocity(1., 2., 2.);
        navier.set_temperature(1., 1., 1.);
        assert_eq!(navier.velocity.v[[10, 10, 0]], 0.);
        assert_eq!(navier.temp.v[[10, 10]], 0.5);
        assert!(navier.velocity.max_abs() > 0.5);
    }
}
