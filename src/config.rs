//! # Simulation parameters
//!
//! All parameters are fixed at start. They are read from a TOML file,
//! every section and key is optional and falls back to its default:
//!
//! ```toml
//! [grid]
//! nx = 41
//! ny = 41
//!
//! [time]
//! n_steps = 100
//! dt = 0.1
//!
//! [physics]
//! viscosity = 1e-4
//! viscosity_coupling = "frozen"
//!
//! [solver]
//! max_iter = 500
//! on_nonconvergence = "abort"
//!
//! [obstacle]
//! center = [0.5, 0.5]
//! radius = 0.1
//! ```
use crate::error::{Result, SimError};
use crate::forcing::{ExternalForce, Forcing, HeatSource, Obstacle};
use crate::solver::ViscosityCoupling;
use crate::turbulence::SMAGORINSKY_CONSTANT;
use serde::Deserialize;
use std::path::Path;

/// Complete configuration of a run
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Grid size
    pub grid: GridConfig,
    /// Time stepping
    pub time: TimeConfig,
    /// Material parameters
    pub physics: PhysicsConfig,
    /// Linear solver
    pub solver: SolverConfig,
    /// Solid cylinder
    pub obstacle: ObstacleConfig,
    /// Localized body force
    pub forcing: Forcing,
    /// Global oscillating force
    pub external_force: ExternalForce,
    /// Temperature source
    pub source: HeatSource,
    /// Callback frequency
    pub output: OutputConfig,
}

/// Number of nodes and domain lengths
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Nodes along x
    pub nx: usize,
    /// Nodes along y
    pub ny: usize,
    /// Length along x
    pub lx: f64,
    /// Length along y
    pub ly: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            nx: 41,
            ny: 41,
            lx: 1.,
            ly: 1.,
        }
    }
}

/// Time step and number of steps
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Number of time steps
    pub n_steps: usize,
    /// Time step size
    pub dt: f64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            n_steps: 100,
            dt: 0.1,
        }
    }
}

/// Diffusivities and turbulence closure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Kinematic viscosity
    pub viscosity: f64,
    /// Thermal diffusivity
    pub diffusivity: f64,
    /// Smagorinsky constant
    pub smagorinsky_constant: f64,
    /// Use the Smagorinsky closure
    pub turbulence: bool,
    /// Treatment of the eddy viscosity inside the implicit solve
    pub viscosity_coupling: ViscosityCoupling,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            viscosity: 1e-4,
            diffusivity: 1e-4,
            smagorinsky_constant: SMAGORINSKY_CONSTANT,
            turbulence: true,
            viscosity_coupling: ViscosityCoupling::default(),
        }
    }
}

/// What to do if a linear solve does not converge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonConvergencePolicy {
    /// Log a warning and continue with the last iterate
    Warn,
    /// Stop the simulation with an error
    Abort,
}

/// Conjugate gradient settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Iteration cap (default: 10 times the degrees of freedom)
    pub max_iter: Option<usize>,
    /// Relative residual tolerance
    pub tolerance: f64,
    /// Non-convergence policy
    pub on_nonconvergence: NonConvergencePolicy,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iter: None,
            tolerance: crate::solver::cg::DEFAULT_TOL,
            on_nonconvergence: NonConvergencePolicy::Warn,
        }
    }
}

/// Solid cylinder, can be switched off
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    /// Place the obstacle
    pub enabled: bool,
    /// Geometry and temperature
    #[serde(flatten)]
    pub obstacle: Obstacle,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            obstacle: Obstacle::default(),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Invoke the callback every n-th step
    pub callback_intervall: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            callback_intervall: 1,
        }
    }
}

impl Config {
    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// File cannot be read or parsed, or contains invalid values.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&contents)?;
        log::info!("Configuration read from {:?}", path);
        Ok(config)
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    /// Invalid TOML or invalid values.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check all parameters
    ///
    /// # Errors
    /// First invalid value found.
    pub fn validate(&self) -> Result<()> {
        let g = &self.grid;
        if g.nx < 3 || g.ny < 3 {
            return Err(SimError::config(format!(
                "grid needs at least 3 points per axis, got ({}, {})",
                g.nx, g.ny
            )));
        }
        if !(g.lx > 0. && g.ly > 0.) {
            return Err(SimError::config("domain lengths must be positive"));
        }
        if !(self.time.dt > 0.) {
            return Err(SimError::config(format!(
                "time step must be positive, got {}",
                self.time.dt
            )));
        }
        if self.time.n_steps == 0 {
            return Err(SimError::config("number of time steps must be positive"));
        }
        let p = &self.physics;
        if !(p.viscosity >= 0. && p.diffusivity >= 0. && p.smagorinsky_constant >= 0.) {
            return Err(SimError::config(
                "viscosity, diffusivity and smagorinsky constant must be non-negative",
            ));
        }
        if !(self.solver.tolerance > 0.) {
            return Err(SimError::config("solver tolerance must be positive"));
        }
        if self.solver.max_iter == Some(0) {
            return Err(SimError::config("solver iteration cap must be positive"));
        }
        if self.obstacle.enabled {
            let o = &self.obstacle.obstacle;
            let [cx, cy] = o.center;
            if !(o.radius > 0.) {
                return Err(SimError::config("obstacle radius must be positive"));
            }
            if cx - o.radius < 0. || cx + o.radius > g.lx || cy - o.radius < 0. || cy + o.radius > g.ly
            {
                return Err(SimError::config(format!(
                    "obstacle of radius {} at ({}, {}) exceeds the domain",
                    o.radius, cx, cy
                )));
            }
        }
        let f = &self.forcing;
        if !(f.x_range[0] < f.x_range[1] && f.y_range[0] < f.y_range[1]) {
            return Err(SimError::config("forcing region is empty"));
        }
        if f.axis > 1 {
            return Err(SimError::config(format!(
                "forcing axis must be 0 or 1, got {}",
                f.axis
            )));
        }
        let e = &self.external_force;
        if !(e.period > 0. && e.wavelength > 0.) {
            return Err(SimError::config(
                "external force period and wavelength must be positive",
            ));
        }
        if !(self.source.width > 0.) {
            return Err(SimError::config("source width must be positive"));
        }
        if self.output.callback_intervall == 0 {
            return Err(SimError::config("callback intervall must be positive"));
        }
        Ok(())
    }
}
