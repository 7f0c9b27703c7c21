//! Evaluation in physical units on a regular grid.
//!
//! Sample `i` (1-based) along each axis sits at `start + (i - 1) * step`.
//! A [`Scaled`] view maps physical coordinates onto sample indices and
//! delegates to any [`Interpolate`] implementor, so the same wrapper serves
//! both a bare [`Interpolant`](crate::Interpolant) and an
//! [`Extrapolator`](crate::Extrapolator).
use num_traits::Float;

use crate::error::{InterpError, Result};
use crate::{Coefficient, Interpolate};

#[derive(Clone, Copy, Debug)]
pub struct Scaled<I, T, const N: usize> {
    inner: I,
    starts: [T; N],
    steps: [T; N],
}

impl<I, T: Float, const N: usize> Scaled<I, T, N> {
    /// # Errors
    /// * `Configuration` if any step is zero or not finite, or any start is
    ///   not finite
    pub fn new(inner: I, starts: [T; N], steps: [T; N]) -> Result<Self> {
        for i in 0..N {
            if steps[i] == T::zero() || !steps[i].is_finite() {
                return Err(InterpError::Configuration {
                    axis: i,
                    reason: "grid step must be finite and nonzero",
                });
            }
            if !starts[i].is_finite() {
                return Err(InterpError::Configuration {
                    axis: i,
                    reason: "grid start must be finite",
                });
            }
        }

        Ok(Self {
            inner,
            starts,
            steps,
        })
    }

    pub fn inner(&self) -> &I {
        &self.inner
    }

    pub fn into_inner(self) -> I {
        self.inner
    }

    /// Sample index coordinates of a physical point.
    #[inline]
    pub fn to_index(&self, x: [T; N]) -> [T; N] {
        core::array::from_fn(|i| T::one() + (x[i] - self.starts[i]) / self.steps[i])
    }

    /// Physical coordinates of a point in sample index coordinates.
    #[inline]
    pub fn to_physical(&self, index: [T; N]) -> [T; N] {
        core::array::from_fn(|i| self.starts[i] + (index[i] - T::one()) * self.steps[i])
    }

    /// Gradient with respect to physical coordinates from a gradient with
    /// respect to index coordinates.
    pub fn scale_gradient<V>(&self, grad: [V; N]) -> [V; N]
    where
        V: Coefficient<T>,
    {
        core::array::from_fn(|i| grad[i] * self.steps[i].recip())
    }
}

impl<I, T, V, const N: usize> Interpolate<T, V, N> for Scaled<I, T, N>
where
    I: Interpolate<T, V, N>,
    T: Float,
    V: Coefficient<T>,
{
    #[inline]
    fn evaluate(&self, x: [T; N]) -> Result<V> {
        self.inner.evaluate(self.to_index(x))
    }

    /// Physical domain of each axis, ordered low to high even for
    /// negative steps.
    fn bounds(&self) -> [(T, T); N] {
        let inner = self.inner.bounds();
        let lo = self.to_physical(core::array::from_fn(|i| inner[i].0));
        let hi = self.to_physical(core::array::from_fn(|i| inner[i].1));
        core::array::from_fn(|i| (lo[i].min(hi[i]), lo[i].max(hi[i])))
    }
}
