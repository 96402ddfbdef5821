//! # Body forces, heat source and obstacle
//!
//! - [`Forcing`]: localized push in a rectangle, decaying linearly in time
//! - [`ExternalForce`]: global oscillating force
//! - [`HeatSource`]: gaussian temperature source
//! - [`Obstacle`]: solid cylinder with fixed temperature
use crate::field::VectorField;
use crate::grid::Grid;
use ndarray::Array2;
use serde::Deserialize;
use std::f64::consts::PI;

/// Force inside the open rectangle `x_range x y_range`, acting
/// along `axis` with magnitude `max(amplitude - decay_rate * t, 0)`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Forcing {
    /// Bounds along x (exclusive)
    pub x_range: [f64; 2],
    /// Bounds along y (exclusive)
    pub y_range: [f64; 2],
    /// Magnitude at t = 0
    pub amplitude: f64,
    /// Linear decay per unit time
    pub decay_rate: f64,
    /// Direction of the force (0 = x, 1 = y)
    pub axis: usize,
}

impl Default for Forcing {
    fn default() -> Self {
        Self {
            x_range: [0.4, 0.6],
            y_range: [0.1, 0.3],
            amplitude: 2.0,
            decay_rate: 0.5,
            axis: 1,
        }
    }
}

impl Forcing {
    /// Magnitude at `time`
    pub fn magnitude(&self, time: f64) -> f64 {
        (self.amplitude - self.decay_rate * time).max(0.)
    }

    /// True if (x, y) lies inside the forcing region
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x > self.x_range[0] && x < self.x_range[1] && y > self.y_range[0] && y < self.y_range[1]
    }

    /// Force field at `time`
    pub fn field(&self, time: f64, grid: &Grid) -> VectorField {
        let mut force = VectorField::zeros(grid);
        let magnitude = self.magnitude(time);
        if magnitude == 0. {
            return force;
        }
        let region = grid.map_coords(|x, y| if self.contains(x, y) { magnitude } else { 0. });
        force.component_mut(self.axis).assign(&region);
        force
    }
}

/// Global oscillating force
/// $$
/// f_x = A_x \sin(2 \pi y / \lambda), \quad f_y = -A_y \sin(2 \pi t / T)
/// $$
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExternalForce {
    /// Amplitude of the x component
    pub amplitude_x: f64,
    /// Amplitude of the y component
    pub amplitude_y: f64,
    /// Period T of the y component
    pub period: f64,
    /// Wavelength along y of the x component
    pub wavelength: f64,
}

impl Default for ExternalForce {
    fn default() -> Self {
        Self {
            amplitude_x: 0.1,
            amplitude_y: 0.1,
            period: 10.,
            wavelength: 1.,
        }
    }
}

impl ExternalForce {
    /// Force field at `time`
    pub fn field(&self, time: f64, grid: &Grid) -> VectorField {
        let fx = grid.map_coords(|_, y| self.amplitude_x * (2. * PI * y / self.wavelength).sin());
        let fy = Array2::from_elem(
            grid.shape(),
            -self.amplitude_y * (2. * PI * time / self.period).sin(),
        );
        VectorField::from_components(&fx, &fy)
    }
}

/// Gaussian bump, constant in time
/// $$
/// S \exp(-((x-c_x)^2 + (y-c_y)^2) / w)
/// $$
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeatSource {
    /// Centre of the source
    pub center: [f64; 2],
    /// Peak strength S
    pub strength: f64,
    /// Width parameter w
    pub width: f64,
}

impl Default for HeatSource {
    fn default() -> Self {
        Self {
            center: [0.5, 0.5],
            strength: 1.,
            width: 0.01,
        }
    }
}

impl HeatSource {
    /// Source term on every node
    pub fn field(&self, grid: &Grid) -> Array2<f64> {
        let [cx, cy] = self.center;
        grid.map_coords(|x, y| {
            let r2 = (x - cx).powi(2) + (y - cy).powi(2);
            self.strength * (-r2 / self.width).exp()
        })
    }
}

/// Solid cylinder: zero velocity, fixed temperature
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Obstacle {
    /// Centre of the cylinder
    pub center: [f64; 2],
    /// Radius
    pub radius: f64,
    /// Temperature enforced inside
    pub temperature: f64,
}

impl Default for Obstacle {
    fn default() -> Self {
        Self {
            center: [0.5, 0.5],
            radius: 0.1,
            temperature: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forcing_decay() {
        let forcing = Forcing::default();
        assert!((forcing.magnitude(0.1) - 1.95).abs() < 1e-14);
        assert_eq!(forcing.magnitude(4.0), 0.);
        assert_eq!(forcing.magnitude(10.0), 0.);
    }

    #[test]
    fn test_forcing_region() {
        let grid = Grid::new(11, 11, 1., 1.).unwrap();
        let force = Forcing::default().field(0.1, &grid);
        // only x = 0.5, y = 0.2 lies strictly inside (0.4, 0.6) x (0.1, 0.3)
        assert!((force.v[[5, 2, 1]] - 1.95).abs() < 1e-14);
        assert_eq!(force.component(0).sum(), 0.);
        assert!((force.component(1).sum() - 1.95).abs() < 1e-14);
    }

    #[test]
    fn test_external_force() {
        let grid = Grid::new(5, 5, 1., 1.).unwrap();
        let force = ExternalForce::default().field(2.5, &grid);
        // y = 0.25: sin(pi/2) = 1
        assert!((force.v[[3, 1, 0]] - 0.1).abs() < 1e-14);
        // t = T/4: fy = -0.1 everywhere
        for x in force.component(1).iter() {
            assert!((x + 0.1).abs() < 1e-14);
        }
    }

    #[test]
    fn test_heat_source_peak() {
        let grid = Grid::new(11, 11, 1., 1.).unwrap();
        let source = HeatSource::default().field(&grid);
        assert!((source[[5, 5]] - 1.).abs() < 1e-14);
        assert!((source[[6, 5]] - (-1.0_f64).exp()).abs() < 1e-12);
        assert!(source[[0, 0]] < 1e-20);
    }
}
