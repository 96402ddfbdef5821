//! Some useful post-processing functions
use crate::field::VectorField;
use crate::grid::Grid;
use crate::operators::divergence;
use ndarray::{Array2, ArrayBase, Data, DataMut, Ix2};

/// Return l2 norm of real array
pub fn norm_l2_f64<S: Data<Elem = f64>>(array: &ArrayBase<S, Ix2>) -> f64 {
    array.iter().map(|x| x.powi(2)).sum::<f64>().sqrt()
}

/// Returns l2 norm of the divergence, scaled by the number of nodes
pub fn eval_div(velocity: &VectorField, grid: &Grid) -> f64 {
    norm_l2_f64(&divergence(velocity, grid)) / (grid.len() as f64).sqrt()
}

/// Returns mean kinetic energy
/// $$
/// E = \frac{1}{2} \langle u_x^2 + u_y^2 \rangle\\_V
/// $$
pub fn eval_energy(velocity: &VectorField) -> f64 {
    let n = (velocity.v.len() / 2) as f64;
    0.5 * velocity.v.iter().map(|x| x.powi(2)).sum::<f64>() / n
}

/// Returns largest absolute value
pub fn eval_max_abs<S: Data<Elem = f64>>(array: &ArrayBase<S, Ix2>) -> f64 {
    array.iter().fold(0., |m: f64, x| m.max(x.abs()))
}

/// Returns mean value
pub fn eval_mean<S: Data<Elem = f64>>(array: &ArrayBase<S, Ix2>) -> f64 {
    array.sum() / array.len() as f64
}

/// Construct field f(x,y) = amp \* sin(pi\*m*x)cos(pi\*n*y),
/// x and y normalized to \[0, 1\]
pub fn apply_sin_cos<S>(field: &mut ArrayBase<S, Ix2>, grid: &Grid, amp: f64, m: f64, n: f64)
where
    S: DataMut<Elem = f64>,
{
    use std::f64::consts::PI;
    let [lx, ly] = grid.size;
    let arg_x = PI * m / lx;
    let arg_y = PI * n / ly;
    for ((i, j), v) in field.indexed_iter_mut() {
        let [x, y] = grid.coord(i, j);
        *v = amp * (arg_x * x).sin() * (arg_y * y).cos();
    }
}

/// Construct field f(x,y) = amp \* cos(pi\*m*x)sin(pi\*n*y),
/// x and y normalized to \[0, 1\]
pub fn apply_cos_sin<S>(field: &mut ArrayBase<S, Ix2>, grid: &Grid, amp: f64, m: f64, n: f64)
where
    S: DataMut<Elem = f64>,
{
    use std::f64::consts::PI;
    let [lx, ly] = grid.size;
    let arg_x = PI * m / lx;
    let arg_y = PI * n / ly;
    for ((i, j), v) in field.indexed_iter_mut() {
        let [x, y] = grid.coord(i, j);
        *v = amp * (arg_x * x).cos() * (arg_y * y).sin();
    }
}

/// Apply random disturbance [-c, c]
pub fn random_field<S>(field: &mut ArrayBase<S, Ix2>, c: f64)
where
    S: DataMut<Elem = f64>,
{
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;
    if c == 0. {
        field.fill(0.);
        return;
    }
    let rand: Array2<f64> = Array2::random(field.raw_dim(), Uniform::new(-c, c));
    field.assign(&rand);
}
