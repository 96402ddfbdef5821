//! # Grid aligned fields
//!
//! `FieldBase` wraps an ndarray whose leading two axes match the
//! grid nodes. Scalar fields are two dimensional, vector fields
//! carry a trailing component axis of length 2 (x, y).
//!
//! The linear solver works on flat vectors, so every field can be
//! flattened (`to_flat`) and refilled from a flat vector
//! (`assign_flat`) in standard (row major) order.
use crate::grid::Grid;
use ndarray::{prelude::*, Data, Dimension, Zip};

/// Scalar field, shape (nx, ny)
pub type ScalarField = FieldBase<Ix2>;

/// Two component vector field, shape (nx, ny, 2)
pub type VectorField = FieldBase<Ix3>;

/// Field on a structured grid
///
/// # Example
///```
/// use rustcfd::grid::Grid;
/// use rustcfd::field::VectorField;
///
/// let grid = Grid::new(8, 6, 1.0, 1.0).unwrap();
/// let mut velocity = VectorField::zeros(&grid);
/// velocity.component_mut(1).fill(1.0);
/// assert_eq!(velocity.to_flat().len(), 8 * 6 * 2);
///```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBase<D: Dimension> {
    /// Field values
    pub v: Array<f64, D>,
}

impl<D: Dimension> FieldBase<D> {
    /// Wrap an existing array
    pub fn from_array(v: Array<f64, D>) -> Self {
        Self { v }
    }

    /// Degrees of freedom
    pub fn dof(&self) -> usize {
        self.v.len()
    }

    /// Copy into a flat vector
    pub fn to_flat(&self) -> Array1<f64> {
        self.v.iter().copied().collect()
    }

    /// Overwrite values from a flat vector
    ///
    /// # Panics
    /// Length of `flat` differs from the field size.
    pub fn assign_flat<S: Data<Elem = f64>>(&mut self, flat: &ArrayBase<S, Ix1>) {
        assert_eq!(
            flat.len(),
            self.v.len(),
            "Flat vector of length {} does not fit field of size {}",
            flat.len(),
            self.v.len()
        );
        for (a, b) in self.v.iter_mut().zip(flat.iter()) {
            *a = *b;
        }
    }

    /// Field of the same shape built from a flat vector
    pub fn with_flat<S: Data<Elem = f64>>(&self, flat: &ArrayBase<S, Ix1>) -> Self {
        let mut new = self.clone();
        new.assign_flat(flat);
        new
    }

    /// True if no value is NaN or Inf
    pub fn is_finite(&self) -> bool {
        self.v.iter().all(|x| x.is_finite())
    }

    /// L2 norm over all values
    pub fn norm_l2(&self) -> f64 {
        self.v.iter().map(|x| x.powi(2)).sum::<f64>().sqrt()
    }

    /// Largest absolute value
    pub fn max_abs(&self) -> f64 {
        self.v.iter().fold(0., |m: f64, x| m.max(x.abs()))
    }
}

impl ScalarField {
    /// Zero field on grid
    pub fn zeros(grid: &Grid) -> Self {
        Self::from_array(Array2::zeros(grid.shape()))
    }

    /// Set all nodes where `mask` is true to `value`
    pub fn fill_masked(&mut self, mask: &Array2<bool>, value: f64) {
        Zip::from(&mut self.v).and(mask).for_each(|x, &m| {
            if m {
                *x = value;
            }
        });
    }
}

impl VectorField {
    /// Zero field on grid
    pub fn zeros(grid: &Grid) -> Self {
        Self::from_array(Array3::zeros((grid.nx, grid.ny, 2)))
    }

    /// Assemble from x and y components
    ///
    /// # Panics
    /// Components differ in shape.
    pub fn from_components<S1, S2>(ux: &ArrayBase<S1, Ix2>, uy: &ArrayBase<S2, Ix2>) -> Self
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = f64>,
    {
        assert_eq!(ux.shape(), uy.shape(), "Components differ in shape");
        let (nx, ny) = ux.dim();
        let mut v = Array3::zeros((nx, ny, 2));
        v.index_axis_mut(Axis(2), 0).assign(ux);
        v.index_axis_mut(Axis(2), 1).assign(uy);
        Self::from_array(v)
    }

    /// View of component `c` (0 = x, 1 = y)
    pub fn component(&self, c: usize) -> ArrayView2<f64> {
        self.v.index_axis(Axis(2), c)
    }

    /// Mutable view of component `c` (0 = x, 1 = y)
    pub fn component_mut(&mut self, c: usize) -> ArrayViewMut2<f64> {
        self.v.index_axis_mut(Axis(2), c)
    }

    /// Set both components to zero where `mask` is true
    pub fn zero_masked(&mut self, mask: &Array2<bool>) {
        for c in 0..2 {
            Zip::from(self.component_mut(c))
                .and(mask)
                .for_each(|x, &m| {
                    if m {
                        *x = 0.;
                    }
                });
        }
    }

    /// Pointwise magnitude sqrt(ux^2 + uy^2)
    pub fn magnitude(&self) -> Array2<f64> {
        Zip::from(self.component(0))
            .and(self.component(1))
            .map_collect(|&ux, &uy| ux.hypot(uy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_roundtrip_keeps_layout() {
        let grid = Grid::new(4, 3, 1., 1.).unwrap();
        let mut field = VectorField::zeros(&grid);
        field.v[[2, 1, 1]] = 5.;
        let flat = field.to_flat();
        // row major: ((i * ny) + j) * 2 + c
        assert_eq!(flat[(2 * 3 + 1) * 2 + 1], 5.);
        let other = VectorField::zeros(&grid).with_flat(&flat);
        assert_eq!(other, field);
    }

    #[test]
    #[should_panic]
    fn test_assign_flat_wrong_size() {
        let grid = Grid::new(4, 3, 1., 1.).unwrap();
        let mut field = ScalarField::zeros(&grid);
        field.assign_flat(&Array1::<f64>::zeros(5));
    }

    #[test]
    fn test_masks() {
        let grid = Grid::new(4, 4, 1., 1.).unwrap();
        let mut mask = Array2::from_elem((4, 4), false);
        mask[[1, 2]] = true;
        let mut temp = ScalarField::zeros(&grid);
        temp.fill_masked(&mask, 0.5);
        assert_eq!(temp.v[[1, 2]], 0.5);
        assert_eq!(temp.v.sum(), 0.5);

        let mut vel = VectorField::zeros(&grid);
        vel.v.fill(1.);
        vel.zero_masked(&mask);
        assert_eq!(vel.v[[1, 2, 0]], 0.);
        assert_eq!(vel.v[[1, 2, 1]], 0.);
        assert_eq!(vel.v.sum(), 30.);
    }

    #[test]
    fn test_non_finite_detection() {
        let grid = Grid::new(3, 3, 1., 1.).unwrap();
        let mut field = ScalarField::zeros(&grid);
        assert!(field.is_finite());
        field.v[[1, 1]] = f64::NAN;
        assert!(!field.is_finite());
    }
}
