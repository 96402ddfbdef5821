//! Conjugate gradient iteration
use super::LinearOperator;
use ndarray::Array1;

/// Default relative tolerance ||r|| / ||b||
pub const DEFAULT_TOL: f64 = 1e-5;

/// Outcome of a conjugate gradient solve.
///
/// `x` is the last iterate, also when the iteration did not converge.
#[derive(Debug, Clone)]
pub struct CgResult {
    /// Solution (flat)
    pub x: Array1<f64>,
    /// True if the tolerance was reached
    pub converged: bool,
    /// Number of iterations performed
    pub iterations: usize,
    /// Relative residual ||r|| / ||b|| of `x`
    pub residual: f64,
}

/// Conjugate gradient solver
///
/// Starts from a zero initial guess. Without an explicit cap the
/// iteration count is limited to `10 * dof`.
///
/// # Example
///```
/// use rustcfd::solver::{Cg, Identity};
/// use ndarray::Array1;
/// let b = Array1::from(vec![1., 2., 3.]);
/// let result = Cg::default().solve(&Identity::new(3), &b);
/// assert!(result.converged);
/// assert_eq!(result.x, b);
///```
#[derive(Debug, Clone, Copy)]
pub struct Cg {
    /// Optional iteration cap
    pub max_iter: Option<usize>,
    /// Relative tolerance
    pub tol: f64,
}

impl Default for Cg {
    fn default() -> Self {
        Self {
            max_iter: None,
            tol: DEFAULT_TOL,
        }
    }
}

impl Cg {
    /// Solver with iteration cap and relative tolerance
    pub fn new(max_iter: Option<usize>, tol: f64) -> Self {
        Self { max_iter, tol }
    }

    /// Solve A x = b
    ///
    /// # Panics
    /// Length of `b` does not match the operator.
    pub fn solve<L: LinearOperator>(&self, op: &L, b: &Array1<f64>) -> CgResult {
        let n = op.dof();
        assert_eq!(
            b.len(),
            n,
            "Right hand side of length {} does not match {} with dof {}",
            b.len(),
            op.name(),
            n
        );
        let max_iter = self.max_iter.unwrap_or(10 * n);
        let b_norm = b.dot(b).sqrt();
        let mut x = Array1::<f64>::zeros(n);
        if b_norm == 0. {
            return CgResult {
                x,
                converged: true,
                iterations: 0,
                residual: 0.,
            };
        }
        let atol = self.tol * b_norm;

        let mut r = b.to_owned();
        let mut p = r.clone();
        let mut rs = r.dot(&r);
        let mut iterations = 0;
        let mut converged = false;

        while iterations < max_iter {
            let ap = op.apply(&p);
            let pap = p.dot(&ap);
            if pap == 0. || !pap.is_finite() {
                log::debug!("{}: breakdown after {} iterations", op.name(), iterations);
                break;
            }
            let alpha = rs / pap;
            x.scaled_add(alpha, &p);
            r.scaled_add(-alpha, &ap);
            iterations += 1;

            let rs_new = r.dot(&r);
            if rs_new.sqrt() <= atol {
                rs = rs_new;
                converged = true;
                break;
            }
            let beta = rs_new / rs;
            p *= beta;
            p += &r;
            rs = rs_new;
        }

        let residual = rs.sqrt() / b_norm;
        log::debug!(
            "{}: {} iterations, residual {:5.3e}, converged {}",
            op.name(),
            iterations,
            residual,
            converged
        );
        CgResult {
            x,
            converged,
            iterations,
            residual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::Identity;
    use ndarray::{array, Array2};

    /// Dense matrix, only for testing
    struct Dense(Array2<f64>);

    impl LinearOperator for Dense {
        fn dof(&self) -> usize {
            self.0.nrows()
        }
        fn apply(&self, x: &Array1<f64>) -> Array1<f64> {
            self.0.dot(x)
        }
        fn name(&self) -> &'static str {
            "dense"
        }
    }

    fn approx_eq(result: &Array1<f64>, expected: &Array1<f64>, dif: f64) {
        for (a, b) in expected.iter().zip(result.iter()) {
            if (a - b).abs() > dif {
                panic!("Large difference of values, got {} expected {}.", b, a)
            }
        }
    }

    #[test]
    fn test_identity_returns_rhs() {
        let b = Array1::linspace(-1., 4., 17);
        let result = Cg::default().solve(&Identity::new(17), &b);
        assert!(result.converged);
        assert_eq!(result.iterations, 1);
        approx_eq(&result.x, &b, 1e-14);
    }

    #[test]
    fn test_small_spd_system() {
        // [[4, 1], [1, 3]] x = [1, 2]  =>  x = [1/11, 7/11]
        let op = Dense(array![[4., 1.], [1., 3.]]);
        let b = array![1., 2.];
        let result = Cg::new(Some(10), 1e-10).solve(&op, &b);
        assert!(result.converged);
        assert!(result.iterations <= 2);
        approx_eq(&result.x, &array![1. / 11., 7. / 11.], 1e-10);
    }

    #[test]
    fn test_tridiagonal_spd_system() {
        let n = 20;
        let mut mat = Array2::<f64>::zeros((n, n));
        for i in 0..n {
            mat[[i, i]] = 2.;
            if i > 0 {
                mat[[i, i - 1]] = -1.;
            }
            if i < n - 1 {
                mat[[i, i + 1]] = -1.;
            }
        }
        let expected = Array1::from_shape_fn(n, |i| (i as f64 * 0.3).sin());
        let b = mat.dot(&expected);
        let result = Cg::new(None, 1e-12).solve(&Dense(mat), &b);
        assert!(result.converged);
        assert!(result.residual <= 1e-12);
        approx_eq(&result.x, &expected, 1e-8);
    }

    #[test]
    fn test_zero_rhs() {
        let b = Array1::zeros(5);
        let result = Cg::default().solve(&Identity::new(5), &b);
        assert!(result.converged);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.x, b);
    }

    #[test]
    fn test_iteration_cap_is_reported() {
        let n = 50;
        let mat = Array2::from_shape_fn((n, n), |(i, j)| {
            if i == j {
                2.
            } else if i + 1 == j || j + 1 == i {
                -1.
            } else {
                0.
            }
        });
        let b = Array1::from_elem(n, 1.);
        let result = Cg::new(Some(3), 1e-12).solve(&Dense(mat), &b);
        assert!(!result.converged);
        assert_eq!(result.iterations, 3);
        assert!(result.residual > 1e-12);
    }
}
