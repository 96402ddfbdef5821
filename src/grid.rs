//! # Structured two dimensional grid
//!
//! Uniformly spaced nodes on `[0, lx] x [0, ly]`, including the
//! boundary nodes. The first array axis runs along x, the second
//! along y ("ij" indexing).
use crate::error::{Result, SimError};
use ndarray::{Array1, Array2};

/// Fixed lattice geometry
///
/// # Example
/// ```
/// use rustcfd::grid::Grid;
/// let grid = Grid::new(11, 11, 1.0, 1.0).unwrap();
/// assert!((grid.dx[0] - 0.1).abs() < 1e-12);
/// assert_eq!(grid.shape(), (11, 11));
/// ```
#[derive(Debug, Clone)]
pub struct Grid {
    /// Number of nodes along x
    pub nx: usize,
    /// Number of nodes along y
    pub ny: usize,
    /// Domain lengths \[lx, ly\]
    pub size: [f64; 2],
    /// Node spacing \[hx, hy\]
    pub dx: [f64; 2],
    /// Node coordinates \[x, y\]
    pub x: [Array1<f64>; 2],
}

impl Grid {
    /// Construct grid from the number of nodes and the domain lengths.
    ///
    /// # Errors
    /// Less than three nodes along an axis (no interior), or a
    /// non-positive length.
    pub fn new(nx: usize, ny: usize, lx: f64, ly: f64) -> Result<Self> {
        if nx < 3 || ny < 3 {
            return Err(SimError::config(format!(
                "grid needs at least 3 points per axis, got ({}, {})",
                nx, ny
            )));
        }
        if !(lx > 0. && ly > 0.) {
            return Err(SimError::config(format!(
                "domain lengths must be positive, got ({}, {})",
                lx, ly
            )));
        }
        Ok(Self {
            nx,
            ny,
            size: [lx, ly],
            dx: [lx / (nx - 1) as f64, ly / (ny - 1) as f64],
            x: [Array1::linspace(0., lx, nx), Array1::linspace(0., ly, ny)],
        })
    }

    /// Shape of a scalar field on this grid
    pub fn shape(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    /// Always false, a grid has at least 3x3 nodes
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Filter width of the sub-grid model, geometric mean of the spacings
    pub fn filter_width(&self) -> f64 {
        (self.dx[0] * self.dx[1]).sqrt()
    }

    /// Coordinates of node (i, j)
    pub fn coord(&self, i: usize, j: usize) -> [f64; 2] {
        [self.x[0][i], self.x[1][j]]
    }

    /// Meshgrid of x and y coordinates
    pub fn meshgrid(&self) -> [Array2<f64>; 2] {
        let xx = Array2::from_shape_fn(self.shape(), |(i, _)| self.x[0][i]);
        let yy = Array2::from_shape_fn(self.shape(), |(_, j)| self.x[1][j]);
        [xx, yy]
    }

    /// Evaluate `f(x, y)` on every node
    pub fn map_coords<F>(&self, f: F) -> Array2<f64>
    where
        F: Fn(f64, f64) -> f64,
    {
        Array2::from_shape_fn(self.shape(), |(i, j)| f(self.x[0][i], self.x[1][j]))
    }
}
