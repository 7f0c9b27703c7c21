//! Tridiagonal and cyclic-tridiagonal solvers.
//!
//! The matrix along an axis depends only on the degree, boundary condition
//! and axis length, while every lane of samples along that axis is a new
//! right-hand side. The LU factors are therefore computed once and the
//! forward/backward sweeps replayed per lane, each in O(n).
//!
//! References
//! * https://en.wikipedia.org/wiki/Tridiagonal_matrix_algorithm
//! * W. H. Press et al., Numerical Recipes, 3rd ed., section 2.7.2 (cyclic systems)
use alloc::vec;
use alloc::vec::Vec;

use num_traits::Float;

use crate::Coefficient;

/// LU factors of a tridiagonal matrix, stored as the Thomas algorithm's
/// modified coefficients.
#[derive(Clone, Debug)]
pub(crate) struct TridiagonalFactor<T> {
    /// Sub-diagonal, `sub[0]` unused
    sub: Vec<T>,
    /// Reciprocal of each pivot
    inv_pivot: Vec<T>,
    /// Super-diagonal divided by its row's pivot, `upper[n-1]` unused
    upper: Vec<T>,
}

impl<T: Float> TridiagonalFactor<T> {
    /// Factor the matrix with diagonals `sub`, `diag` and `sup`, all of length `n`.
    ///
    /// Returns `None` if a pivot vanishes, which does not happen for the
    /// diagonally dominant systems produced by prefiltering.
    pub fn new(sub: &[T], diag: &[T], sup: &[T]) -> Option<Self> {
        let n = diag.len();
        if n == 0 || sub.len() != n || sup.len() != n {
            return None;
        }

        let mut inv_pivot = vec![T::zero(); n];
        let mut upper = vec![T::zero(); n];

        let mut pivot = diag[0];
        for i in 0..n {
            if i > 0 {
                pivot = diag[i] - sub[i] * upper[i - 1];
            }
            if pivot == T::zero() || !pivot.is_finite() {
                return None;
            }
            inv_pivot[i] = pivot.recip();
            upper[i] = sup[i] * inv_pivot[i];
        }

        Some(Self {
            sub: sub.to_vec(),
            inv_pivot,
            upper,
        })
    }

    pub fn len(&self) -> usize {
        self.inv_pivot.len()
    }

    /// Solve for one right-hand side. `rhs` and `out` must both have the
    /// factored length.
    #[inline]
    pub fn solve<V: Coefficient<T>>(&self, rhs: &[V], out: &mut [V]) {
        let n = self.len();

        // Forward sweep
        out[0] = rhs[0] * self.inv_pivot[0];
        for i in 1..n {
            out[i] = (rhs[i] + out[i - 1] * -self.sub[i]) * self.inv_pivot[i];
        }

        // Back substitution
        for i in (0..n - 1).rev() {
            out[i] = out[i] + out[i + 1] * -self.upper[i];
        }
    }
}

/// Factors of a symmetric circulant tridiagonal matrix with `diag` on the
/// diagonal and `off` on both off-diagonals and in both corners.
///
/// The corners are split off as a rank-one update so the remaining matrix is
/// plain tridiagonal, then corrected with the Sherman-Morrison formula. The
/// correction vector depends only on the matrix, so it is solved once here.
#[derive(Clone, Debug)]
pub(crate) struct CyclicFactor<T> {
    inner: TridiagonalFactor<T>,
    /// Solution of the inner system against the rank-one update vector
    z: Vec<T>,
    /// Ratio of corner value to the shifted first pivot
    ratio: T,
    inv_denom: T,
}

impl<T: Float + Send + Sync> CyclicFactor<T> {
    /// Factor a circulant system of size `n`. Requires `n >= 3`.
    pub fn new(off: T, diag: T, n: usize) -> Option<Self> {
        if n < 3 {
            return None;
        }

        let gamma = -diag;
        let mut diags = vec![diag; n];
        diags[0] = diag - gamma;
        diags[n - 1] = diag - off * off / gamma;
        let offs = vec![off; n];

        let inner = TridiagonalFactor::new(&offs, &diags, &offs)?;

        let mut u = vec![T::zero(); n];
        u[0] = gamma;
        u[n - 1] = off;
        let mut z = vec![T::zero(); n];
        inner.solve(&u, &mut z);

        let ratio = off / gamma;
        let denom = T::one() + z[0] + ratio * z[n - 1];
        if denom == T::zero() || !denom.is_finite() {
            return None;
        }

        Some(Self {
            inner,
            z,
            ratio,
            inv_denom: denom.recip(),
        })
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Solve for one right-hand side of the factored length.
    #[inline]
    pub fn solve<V: Coefficient<T>>(&self, rhs: &[V], out: &mut [V]) {
        let n = self.len();
        self.inner.solve(rhs, out);

        let fact = (out[0] + out[n - 1] * self.ratio) * self.inv_denom;
        for i in 0..n {
            out[i] = out[i] + fact * -self.z[i];
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Multiply a dense matrix by a vector
    fn matvec(a: &[Vec<f64>], x: &[f64]) -> Vec<f64> {
        a.iter()
            .map(|row| row.iter().zip(x).map(|(aij, xj)| aij * xj).sum())
            .collect()
    }

    #[test]
    fn test_tridiagonal_solve() {
        let n = 7;
        let sub = vec![0.125; n];
        let mut diag = vec![0.75; n];
        let sup = vec![0.125; n];
        diag[0] = 1.0;
        diag[n - 1] = 0.875;

        let factor = TridiagonalFactor::new(&sub, &diag, &sup).unwrap();

        let mut dense = vec![vec![0.0; n]; n];
        for i in 0..n {
            dense[i][i] = diag[i];
            if i > 0 {
                dense[i][i - 1] = sub[i];
            }
            if i < n - 1 {
                dense[i][i + 1] = sup[i];
            }
        }

        let rhs: Vec<f64> = (0..n).map(|i| (i as f64).sin() + 2.0).collect();
        let mut x = vec![0.0; n];
        factor.solve(&rhs, &mut x);

        let back = matvec(&dense, &x);
        (0..n).for_each(|i| assert!((back[i] - rhs[i]).abs() < 1e-14));
    }

    #[test]
    fn test_zero_pivot_rejected() {
        let sub = [0.0, 1.0];
        let diag = [0.0, 1.0];
        let sup = [1.0, 0.0];
        assert!(TridiagonalFactor::new(&sub, &diag, &sup).is_none());
    }

    #[test]
    fn test_cyclic_solve() {
        for n in [3, 4, 9, 16] {
            let (off, diag) = (1.0 / 6.0, 2.0 / 3.0);
            let factor = CyclicFactor::new(off, diag, n).unwrap();

            let mut dense = vec![vec![0.0; n]; n];
            for i in 0..n {
                dense[i][i] = diag;
                dense[i][(i + 1) % n] += off;
                dense[i][(i + n - 1) % n] += off;
            }

            let rhs: Vec<f64> = (0..n).map(|i| (i as f64 * 0.7).cos()).collect();
            let mut x = vec![0.0; n];
            factor.solve(&rhs, &mut x);

            let back = matvec(&dense, &x);
            (0..n).for_each(|i| assert!((back[i] - rhs[i]).abs() < 1e-13));
        }
    }

    #[test]
    fn test_cyclic_too_short() {
        assert!(CyclicFactor::new(0.125, 0.75, 2).is_none());
    }
}
