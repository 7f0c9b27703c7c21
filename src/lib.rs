//! N-dimensional B-spline interpolation and extrapolation on regular grids,
//! no-std compatible, prioritizing correctness and predictable performance.
//!
//! Samples live at 1-based integer coordinates `1..=n` along each axis. Each
//! axis independently selects a polynomial degree (0 through 3), and for
//! degree 2 and above a boundary condition that closes the linear system
//! converting samples into spline coefficients ("prefiltering").
//! An [`Interpolant`] is built once and is then immutable; wrap it in an
//! [`Extrapolator`] to define values outside the domain, or in a [`Scaled`]
//! view to evaluate in physical units.
//!
//! # Performance Scalings
//! Each observation depends on `degree + 1` coefficients per axis, so the
//! cost of one evaluation is the product of the supports and independent of
//! the size of the grid. Construction solves one banded system per lane of
//! samples along each prefiltered axis, reusing a single factorization per
//! axis; with the `parallel` feature the lanes are solved on the rayon pool.
//!
//! | Degree       | Padding | Build cost per axis      | Evaluation cost     |
//! |--------------|---------|--------------------------|---------------------|
//! | 0, constant  | 0       | none                     | O(1) per axis       |
//! | 1, linear    | 0       | none                     | O(2) per axis       |
//! | 2, quadratic | 1       | O(total samples)         | O(3) per axis       |
//! | 3, cubic     | 1       | O(total samples)         | O(4) per axis       |
//!
//! # Example: Quadratic Interpolation w/ Extrapolation
//! ```rust
//! use bspline_nd::{AxisSpec, Boundary, Extrapolation, Extrapolator, Interpolant, Placement};
//!
//! let y = [0.0_f64, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0, 0.0, 1.0];
//!
//! let itp: Interpolant<f64, f64, 1> = Interpolant::build(
//!     [y.len()],
//!     &y,
//!     [AxisSpec::quadratic(Boundary::Line, Placement::OnCell)],
//! )
//! .unwrap();
//!
//! // Passes through the samples
//! assert!((itp.evaluate([2.0]).unwrap() - 1.0).abs() < 1e-12);
//!
//! // Outside of [0.5, 10.5] the bare interpolant refuses to answer
//! assert!(itp.evaluate([11.0]).is_err());
//!
//! // Hold the edge value instead
//! let etp = Extrapolator::uniform(&itp, Extrapolation::Flat).unwrap();
//! assert_eq!(etp.evaluate([11.0]).unwrap(), itp.evaluate([10.5]).unwrap());
//! ```
//!
//! # Example: Batch Evaluation in Physical Units
//! ```rust
//! use bspline_nd::{AxisSpec, Interpolant, Interpolate, Scaled};
//!
//! // Samples at x = 0.0, 0.5, 1.0 and y = 10.0, 20.0
//! let z = [0.0_f64, 1.0, 2.0, 3.0, 4.0, 5.0];
//! let itp: Interpolant<f64, f64, 2> =
//!     Interpolant::build([3, 2], &z, [AxisSpec::linear(); 2]).unwrap();
//! let scaled = Scaled::new(itp, [0.0, 10.0], [0.5, 10.0]).unwrap();
//!
//! let xobs = [0.25_f64, 1.0];
//! let yobs = [10.0, 15.0];
//! let mut out = [0.0; 2];
//! scaled.evaluate_many(&[&xobs[..], &yobs[..]], &mut out).unwrap();
//! assert_eq!(out, [1.0, 4.5]);
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
// These "needless" range loops are a significant speedup
#![allow(clippy::needless_range_loop)]

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Add, Mul};

use num_traits::{Float, Zero};

pub mod basis;
pub use basis::Degree;

pub mod boundary;
pub use boundary::{Boundary, Placement, SplineConfig};

pub mod error;
pub use error::{InterpError, Result};

pub mod grid;
pub use grid::{Axis, CoefficientGrid};

pub(crate) mod prefilter;

pub mod interpolant;
pub use interpolant::{AxisSpec, Interpolant};

pub mod extrapolate;
pub use extrapolate::{Extrapolation, Extrapolator};

pub mod scaled;
pub use scaled::Scaled;

#[cfg(feature = "std")]
pub mod utils;

#[cfg(all(test, feature = "std"))]
pub(crate) mod testing;

/// Values that can be stored on a grid and blended with real weights.
///
/// Implemented for every type closed under addition and scaling by `T`,
/// which covers the float types themselves as well as small vector types.
pub trait Coefficient<T>:
    Copy + Send + Sync + Zero + Add<Output = Self> + Mul<T, Output = Self>
{
}

impl<T, V> Coefficient<T> for V where
    V: Copy + Send + Sync + Zero + Add<Output = V> + Mul<T, Output = V>
{
}

/// Evaluation of an N-dimensional function at points in its domain.
pub trait Interpolate<T: Float, V: Coefficient<T>, const N: usize> {
    /// Evaluate at a single point.
    fn evaluate(&self, x: [T; N]) -> Result<V>;

    /// Domain `(lo, hi)` of each axis.
    fn bounds(&self) -> [(T, T); N];

    /// Evaluate at many points, given as one coordinate list per axis,
    /// writing the results to `out`.
    ///
    /// # Errors
    /// * `ShapeMismatch` if the coordinate lists and `out` differ in length
    /// * The first error from any single evaluation; `out` is left
    ///   partially written in that case
    fn evaluate_many(&self, obs: &[&[T]; N], out: &mut [V]) -> Result<()> {
        let n = out.len();
        for coords in obs.iter() {
            if coords.len() != n {
                return Err(InterpError::ShapeMismatch {
                    expected: n,
                    actual: coords.len(),
                });
            }
        }

        let mut x = [T::zero(); N];
        for i in 0..n {
            for j in 0..N {
                x[j] = obs[j][i];
            }
            out[i] = self.evaluate(x)?;
        }

        Ok(())
    }

    /// Evaluate at many points, allocating the output.
    fn evaluate_alloc(&self, obs: &[&[T]; N]) -> Result<Vec<V>> {
        let n = obs.first().map_or(0, |coords| coords.len());
        let mut out = vec![V::zero(); n];
        self.evaluate_many(obs, &mut out)?;
        Ok(out)
    }
}

impl<T, V, I, const N: usize> Interpolate<T, V, N> for &I
where
    T: Float,
    V: Coefficient<T>,
    I: Interpolate<T, V, N> + ?Sized,
{
    fn evaluate(&self, x: [T; N]) -> Result<V> {
        (**self).evaluate(x)
    }

    fn bounds(&self) -> [(T, T); N] {
        (**self).bounds()
    }
}
