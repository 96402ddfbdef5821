//! # Finite difference operators
//!
//! Second order central differences on the interior nodes
//! `[1, n-2] x [1, n-2]`. Boundary entries of every result are
//! zero; no one-sided stencils are applied there.
//!
//! All operators are linear and read from the input only, results
//! go to a freshly allocated output array.
use crate::field::VectorField;
use crate::grid::Grid;
use ndarray::{Array2, ArrayBase, Data, Ix2, Zip};

/// Central difference along x
/// $$
/// (f_{i+1,j} - f_{i-1,j}) / (2 h_x)
/// $$
pub fn partial_x<S: Data<Elem = f64>>(f: &ArrayBase<S, Ix2>, grid: &Grid) -> Array2<f64> {
    let (nx, ny) = f.dim();
    let two_h = 2. * grid.dx[0];
    let mut diff = Array2::zeros((nx, ny));
    for i in 1..nx - 1 {
        for j in 1..ny - 1 {
            diff[[i, j]] = (f[[i + 1, j]] - f[[i - 1, j]]) / two_h;
        }
    }
    diff
}

/// Central difference along y
/// $$
/// (f_{i,j+1} - f_{i,j-1}) / (2 h_y)
/// $$
pub fn partial_y<S: Data<Elem = f64>>(f: &ArrayBase<S, Ix2>, grid: &Grid) -> Array2<f64> {
    let (nx, ny) = f.dim();
    let two_h = 2. * grid.dx[1];
    let mut diff = Array2::zeros((nx, ny));
    for i in 1..nx - 1 {
        for j in 1..ny - 1 {
            diff[[i, j]] = (f[[i, j + 1]] - f[[i, j - 1]]) / two_h;
        }
    }
    diff
}

/// Five point laplacian
/// $$
/// (f_{i-1,j} - 2f_{i,j} + f_{i+1,j}) / h_x^2 + (f_{i,j-1} - 2f_{i,j} + f_{i,j+1}) / h_y^2
/// $$
pub fn laplacian<S: Data<Elem = f64>>(f: &ArrayBase<S, Ix2>, grid: &Grid) -> Array2<f64> {
    let (nx, ny) = f.dim();
    let hx2 = grid.dx[0].powi(2);
    let hy2 = grid.dx[1].powi(2);
    let mut diff = Array2::zeros((nx, ny));
    for i in 1..nx - 1 {
        for j in 1..ny - 1 {
            let c = 2. * f[[i, j]];
            diff[[i, j]] = (f[[i - 1, j]] - c + f[[i + 1, j]]) / hx2
                + (f[[i, j - 1]] - c + f[[i, j + 1]]) / hy2;
        }
    }
    diff
}

/// Gradient (df/dx, df/dy)
pub fn gradient<S: Data<Elem = f64>>(f: &ArrayBase<S, Ix2>, grid: &Grid) -> VectorField {
    VectorField::from_components(&partial_x(f, grid), &partial_y(f, grid))
}

/// Divergence: duxdx + duydy
pub fn divergence(v: &VectorField, grid: &Grid) -> Array2<f64> {
    partial_x(&v.component(0), grid) + partial_y(&v.component(1), grid)
}

/// Scalar vorticity: duydx - duxdy
pub fn curl(v: &VectorField, grid: &Grid) -> Array2<f64> {
    partial_x(&v.component(1), grid) - partial_y(&v.component(0), grid)
}

/// Laplacian applied to each component
pub fn vector_laplacian(v: &VectorField, grid: &Grid) -> VectorField {
    VectorField::from_components(
        &laplacian(&v.component(0), grid),
        &laplacian(&v.component(1), grid),
    )
}

/// Divergence of a diffusive flux with variable coefficient
/// $$
/// \nabla \cdot (\nu \nabla f)
/// $$
pub fn diffusive_flux_divergence<S1, S2>(
    nu: &ArrayBase<S1, Ix2>,
    f: &ArrayBase<S2, Ix2>,
    grid: &Grid,
) -> Array2<f64>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    let mut flux_x = partial_x(f, grid);
    let mut flux_y = partial_y(f, grid);
    Zip::from(&mut flux_x)
        .and(&mut flux_y)
        .and(nu)
        .for_each(|fx, fy, &n| {
            *fx *= n;
            *fy *= n;
        });
    partial_x(&flux_x, grid) + partial_y(&flux_y, grid)
}
