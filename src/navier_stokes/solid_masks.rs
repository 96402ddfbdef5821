//! Masks of solid obstacles
use crate::grid::Grid;
use ndarray::Array2;

/// Nodes strictly inside a circle of radius `radius` around `center`
///
/// # Example
///```
/// use rustcfd::grid::Grid;
/// use rustcfd::navier_stokes::solid_masks::solid_cylinder;
/// let grid = Grid::new(11, 11, 1.0, 1.0).unwrap();
/// let mask = solid_cylinder(&grid, [0.5, 0.5], 0.1);
/// assert!(mask[[5, 5]]);
/// assert!(!mask[[0, 0]]);
///```
pub fn solid_cylinder(grid: &Grid, center: [f64; 2], radius: f64) -> Array2<bool> {
    let [cx, cy] = center;
    Array2::from_shape_fn(grid.shape(), |(i, j)| {
        let [x, y] = grid.coord(i, j);
        (x - cx).powi(2) + (y - cy).powi(2) < radius.powi(2)
    })
}

/// No solid node
pub fn no_solid(grid: &Grid) -> Array2<bool> {
    Array2::from_elem(grid.shape(), false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cylinder_mask() {
        let grid = Grid::new(41, 41, 1., 1.).unwrap();
        let mask = solid_cylinder(&grid, [0.5, 0.5], 0.1);
        assert!(mask[[20, 20]]);
        assert!(mask[[20, 23]]);
        assert!(mask[[17, 20]]);
        assert!(!mask[[20, 25]]);
        assert!(!mask[[23, 23]]);
        for i in 0..41 {
            for j in 0..41 {
                assert_eq!(mask[[i, j]], mask[[j, i]]);
            }
        }
        assert!(!no_solid(&grid).iter().any(|&m| m));
    }
}
