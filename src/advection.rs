//! # Semi-Lagrangian advection
//!
//! Every node is traced back along the velocity over one time
//! step, the departure point is clamped into the domain and the
//! transported field is sampled there by bilinear interpolation.
//!
//! The trace is done in index space: node `(i, j)` departs from
//! `(i - dt * ux / hx, j - dt * uy / hy)`, which keeps zero transport
//! exact.
use crate::field::VectorField;
use crate::grid::Grid;
use ndarray::{Array2, ArrayBase, Data, Ix2, Zip};

/// Departure points of all nodes, in fractional index coordinates
#[derive(Debug, Clone)]
pub struct Backtrace {
    xi: Array2<f64>,
    yi: Array2<f64>,
}

impl Backtrace {
    /// Trace nodes back along `velocity` over `dt`
    pub fn new(velocity: &VectorField, dt: f64, grid: &Grid) -> Self {
        let x_max = (grid.nx - 1) as f64;
        let y_max = (grid.ny - 1) as f64;
        let (hx, hy) = (grid.dx[0], grid.dx[1]);
        let mut xi = Array2::zeros(grid.shape());
        let mut yi = Array2::zeros(grid.shape());
        Zip::indexed(&mut xi)
            .and(&mut yi)
            .and(&velocity.component(0))
            .and(&velocity.component(1))
            .for_each(|(i, j), x, y, &ux, &uy| {
                *x = (i as f64 - dt * ux / hx).clamp(0., x_max);
                *y = (j as f64 - dt * uy / hy).clamp(0., y_max);
            });
        Self { xi, yi }
    }

    /// Sample `field` at the departure points
    pub fn sample<S: Data<Elem = f64>>(&self, field: &ArrayBase<S, Ix2>) -> Array2<f64> {
        Zip::from(&self.xi)
            .and(&self.yi)
            .map_collect(|&x, &y| bilinear(field, x, y))
    }
}

/// Bilinear interpolation at fractional index (x, y).
/// The point must lie inside `[0, nx-1] x [0, ny-1]`.
pub fn bilinear<S: Data<Elem = f64>>(f: &ArrayBase<S, Ix2>, x: f64, y: f64) -> f64 {
    let (nx, ny) = f.dim();
    let i0 = (x.floor() as usize).min(nx - 2);
    let j0 = (y.floor() as usize).min(ny - 2);
    let s1 = x - i0 as f64;
    let s0 = 1. - s1;
    let t1 = y - j0 as f64;
    let t0 = 1. - t1;
    s0 * (t0 * f[[i0, j0]] + t1 * f[[i0, j0 + 1]])
        + s1 * (t0 * f[[i0 + 1, j0]] + t1 * f[[i0 + 1, j0 + 1]])
}

/// Advect scalar field with `velocity`
pub fn advect_scalar<S: Data<Elem = f64>>(
    field: &ArrayBase<S, Ix2>,
    velocity: &VectorField,
    dt: f64,
    grid: &Grid,
) -> Array2<f64> {
    Backtrace::new(velocity, dt, grid).sample(field)
}

/// Advect both components of a vector field with `velocity`
pub fn advect_vector(
    field: &VectorField,
    velocity: &VectorField,
    dt: f64,
    grid: &Grid,
) -> VectorField {
    let trace = Backtrace::new(velocity, dt, grid);
    VectorField::from_components(
        &trace.sample(&field.component(0)),
        &trace.sample(&field.component(1)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::new(21, 17, 1.0, 0.8).unwrap()
    }

    #[test]
    fn test_advect_zero_velocity_preserves() {
        let grid = grid();
        let f = grid.map_coords(|x, y| (5. * x).sin() + y * y);
        let velocity = VectorField::zeros(&grid);
        let g = advect_scalar(&f, &velocity, 0.1, &grid);
        assert_eq!(g, f);

        let v = VectorField::from_components(&f, &(&f * -2.));
        let w = advect_vector(&v, &velocity, 0.1, &grid);
        assert_eq!(w, v);
    }

    #[test]
    fn test_advect_uniform_field_unchanged() {
        let grid = grid();
        let f = Array2::from_elem(grid.shape(), 5.);
        let mut velocity = VectorField::zeros(&grid);
        velocity.component_mut(0).fill(0.3);
        velocity.component_mut(1).fill(-0.7);
        let g = advect_scalar(&f, &velocity, 0.1, &grid);
        for x in g.iter() {
            assert!((x - 5.).abs() < 1e-12);
        }
    }

    #[test]
    fn test_advect_linear_field_is_exact() {
        // f = x is transported exactly in the interior: f(x - dt*u)
        let grid = grid();
        let f = grid.map_coords(|x, _| x);
        let mut velocity = VectorField::zeros(&grid);
        velocity.component_mut(0).fill(0.5);
        let dt = 0.1;
        let g = advect_scalar(&f, &velocity, dt, &grid);
        for i in 1..grid.nx {
            for j in 0..grid.ny {
                let expected = grid.x[0][i] - dt * 0.5;
                assert!((g[[i, j]] - expected).abs() < 1e-12);
            }
        }
        // departure point of the first column is clamped to the wall
        assert!((g[[0, 3]] - 0.).abs() < 1e-14);
    }

    #[test]
    fn test_advect_clamps_large_velocity() {
        let grid = grid();
        let f = grid.map_coords(|x, y| x + 2. * y);
        let mut velocity = VectorField::zeros(&grid);
        velocity.component_mut(0).fill(-100.);
        velocity.component_mut(1).fill(100.);
        let g = advect_scalar(&f, &velocity, 1.0, &grid);
        // every node samples the corner (lx, 0)
        for x in g.iter() {
            assert!((x - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_bilinear_corners_and_centre() {
        let f = ndarray::array![[0., 1.], [2., 3.]];
        assert_eq!(bilinear(&f, 0., 0.), 0.);
        assert_eq!(bilinear(&f, 1., 1.), 3.);
        assert_eq!(bilinear(&f, 1., 0.), 2.);
        assert!((bilinear(&f, 0.5, 0.5) - 1.5).abs() < 1e-14);
    }
}
