//! Shaped, immutable storage for spline coefficients.
//!
//! Assumes C-style ordering of values (c(x0, y0), c(x0, y1), ..., c(x0, yn), c(x1, y0), ...).
use alloc::vec::Vec;

use num_traits::Float;

use crate::basis::{locate_cubic_periodic, Degree, Kernel};
use crate::boundary::{Boundary, Placement};
use crate::error::{InterpError, Result};

/// Resolved description of one axis of a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Axis {
    pub degree: Degree,
    pub placement: Placement,
    /// Present exactly when the degree requires prefiltering
    pub boundary: Option<Boundary>,
    /// Number of samples along the axis
    pub len: usize,
}

impl Axis {
    /// Number of coefficients stored along the axis, including ghosts.
    ///
    /// A cubic periodic axis placed on the cell keeps one more ghost past
    /// the end, so that a whole period of cells `[1, n + 1)` is stored.
    pub const fn stored_len(&self) -> usize {
        let extra = if self.wraps_first_half_cell() { 1 } else { 0 };
        self.len + 2 * self.degree.padding() + extra
    }

    pub const fn is_periodic(&self) -> bool {
        matches!(self.boundary, Some(Boundary::Periodic))
    }

    /// Whether the half cell before the first sample is evaluated as the
    /// half cell past the last one, a period later.
    pub(crate) const fn wraps_first_half_cell(&self) -> bool {
        self.is_periodic()
            && matches!(
                (self.degree, self.placement),
                (Degree::Cubic, Placement::OnCell)
            )
    }

    /// Evaluation functions for this axis.
    pub(crate) fn kernel<T: Float>(&self) -> Kernel<T> {
        let kernel = self.degree.kernel();
        if self.wraps_first_half_cell() {
            Kernel {
                locate: locate_cubic_periodic,
                ..kernel
            }
        } else {
            kernel
        }
    }
}

/// Cumulative product of the sizes of higher dimensions, which is the
/// stride between consecutive indices along each dimension.
pub(crate) fn strides<const N: usize>(dims: &[usize; N]) -> [usize; N] {
    let mut out = [1_usize; N];
    let mut acc = 1;
    for i in (0..N).rev() {
        out[i] = acc;
        acc *= dims[i];
    }
    out
}

/// An N-dimensional array of coefficients with one descriptor per axis.
///
/// The shape is fixed at construction and the values are never mutated
/// afterward.
#[derive(Clone, Debug)]
pub struct CoefficientGrid<V, const N: usize> {
    dims: [usize; N],
    strides: [usize; N],
    axes: [Axis; N],
    values: Vec<V>,
}

impl<V, const N: usize> CoefficientGrid<V, N> {
    /// # Errors
    /// * If the number of values does not match the product of `dims`
    /// * If any stored dimension does not match its axis descriptor
    pub fn new(dims: [usize; N], axes: [Axis; N], values: Vec<V>) -> Result<Self> {
        let expected: usize = dims.iter().product();
        if values.len() != expected {
            return Err(InterpError::ShapeMismatch {
                expected,
                actual: values.len(),
            });
        }
        for i in 0..N {
            if dims[i] != axes[i].stored_len() {
                return Err(InterpError::ShapeMismatch {
                    expected: axes[i].stored_len(),
                    actual: dims[i],
                });
            }
        }

        Ok(Self {
            dims,
            strides: strides(&dims),
            axes,
            values,
        })
    }

    /// Stored shape, including ghost coefficients.
    pub fn dims(&self) -> &[usize; N] {
        &self.dims
    }

    pub fn strides(&self) -> &[usize; N] {
        &self.strides
    }

    pub fn axes(&self) -> &[Axis; N] {
        &self.axes
    }

    /// Flat view of all coefficients.
    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Flat offset of an N-dimensional index, or `None` if any component
    /// is past the end of its dimension.
    #[inline]
    pub fn flat_index(&self, index: [usize; N]) -> Option<usize> {
        let mut k = 0;
        for j in 0..N {
            if index[j] >= self.dims[j] {
                return None;
            }
            k += index[j] * self.strides[j];
        }
        Some(k)
    }

    /// Inverse of `flat_index`.
    pub fn unflatten(&self, mut flat: usize) -> Option<[usize; N]> {
        if flat >= self.values.len() {
            return None;
        }
        let mut index = [0_usize; N];
        for j in 0..N {
            index[j] = flat / self.strides[j];
            flat %= self.strides[j];
        }
        Some(index)
    }

    pub fn get(&self, index: [usize; N]) -> Option<&V> {
        self.flat_index(index).map(|k| &self.values[k])
    }
}
