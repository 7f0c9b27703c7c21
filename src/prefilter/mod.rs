//! Conversion of raw samples into B-spline coefficients.
//!
//! For degree 2 and above, the spline only passes through the samples if its
//! coefficients solve `A c = s`, where each interior row of `A` is the basis
//! evaluated at a sample (`1/8, 3/4, 1/8` for quadratic, `1/6, 2/3, 1/6`
//! for cubic) and the outer rows come from the boundary condition.
//!
//! The tensor-product basis is separable, so an N-dimensional grid is
//! filtered one axis at a time: every lane of samples along axis 0 is solved,
//! then every lane of the result along axis 1, and so on. Each filtered axis
//! grows by one ghost coefficient at each end.
//!
//! Operation Complexity
//! * O(n) per lane, O(total coefficients) per axis.
//!
//! Memory Complexity
//! * One output buffer per filtered axis plus O(n) scratch per worker.
use alloc::vec;
use alloc::vec::Vec;

use num_traits::Float;

use crate::basis::Degree;
use crate::boundary::{Closure, Placement};
use crate::error::{InterpError, Result};
use crate::grid::{Axis, CoefficientGrid};
use crate::Coefficient;

pub(crate) mod tridiagonal;

use tridiagonal::{CyclicFactor, TridiagonalFactor};

/// Solver for every lane along one axis.
#[derive(Clone, Debug)]
pub(crate) enum AxisSolver<T> {
    /// Ghost coefficients are eliminated from the first and last rows,
    /// solved for, then recovered from the boundary rows.
    Banded {
        factor: TridiagonalFactor<T>,
        left: Ghost<T>,
        right: Ghost<T>,
    },
    /// Circulant system over one period; ghosts are copied by wraparound.
    Cyclic { factor: CyclicFactor<T>, period: usize },
}

/// A ghost coefficient as a combination of the two nearest interior
/// coefficients and the second sample in from the same edge.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Ghost<T> {
    near: T,
    next: T,
    sample: T,
    /// Weight of that sample in the first interpolation row's right-hand side
    rhs: T,
}

impl<T: Float> Ghost<T> {
    /// Solve a boundary row `(a0, a1, a2, a3)` for the ghost, with `a3`
    /// replaced through the interpolation row at the second sample,
    /// `off c1 + diag c2 + off c3 = s2`.
    fn eliminate(row: [T; 4], off: T, diag: T) -> Self {
        let [a0, a1, a2, a3] = row;
        let sample = -a3 / (a0 * off);
        Self {
            near: (a3 - a1) / a0,
            next: (a3 * diag / off - a2) / a0,
            sample,
            rhs: -off * sample,
        }
    }
}

impl<T: Float + Send + Sync> AxisSolver<T> {
    /// Set up the solver for an axis of `n` samples.
    ///
    /// # Errors
    /// * `SingularSystem` if the axis is too short for the degree, or the
    ///   periodic system has a period shorter than 3.
    /// * `Configuration` if the degree does not take a boundary condition.
    pub fn new(degree: Degree, closure: Closure<T>, n: usize) -> Result<Self> {
        let singular = InterpError::SingularSystem {
            axis: 0,
            len: n,
            degree: degree.order(),
        };
        if n < degree.min_samples() {
            return Err(singular);
        }
        let (off, diag) = interior_stencil(degree).ok_or(InterpError::Configuration {
            axis: 0,
            reason: "boundary conditions apply only to degree 2 and above",
        })?;

        match closure {
            Closure::Rows { left, right } => {
                // Substitute each ghost into the interpolation row next to it
                let left = Ghost::eliminate(left, off, diag);
                let right = Ghost::eliminate(right, off, diag);

                let mut sub = vec![off; n];
                let mut diags = vec![diag; n];
                let mut sup = vec![off; n];
                diags[0] = diag + off * left.near;
                sup[0] = off + off * left.next;
                diags[n - 1] = diag + off * right.near;
                sub[n - 1] = off + off * right.next;

                let factor = TridiagonalFactor::new(&sub, &diags, &sup).ok_or(singular)?;
                Ok(Self::Banded {
                    factor,
                    left,
                    right,
                })
            }
            Closure::Periodic { period } => {
                let factor = CyclicFactor::new(off, diag, period).ok_or(singular)?;
                Ok(Self::Cyclic { factor, period })
            }
        }
    }

    /// Solve one lane of `n` samples into `coefs`, which holds `n + 2`
    /// values for banded solvers and any length for cyclic ones.
    /// `work` must hold at least `n` values.
    #[inline]
    pub fn solve_lane<V: Coefficient<T>>(&self, samples: &[V], coefs: &mut [V], work: &mut [V]) {
        let n = samples.len();
        match self {
            Self::Banded {
                factor,
                left,
                right,
            } => {
                let rhs = &mut work[..n];
                rhs.copy_from_slice(samples);
                rhs[0] = samples[0] + samples[1] * left.rhs;
                rhs[n - 1] = samples[n - 1] + samples[n - 2] * right.rhs;
                factor.solve(rhs, &mut coefs[1..=n]);

                coefs[0] = coefs[1] * left.near + coefs[2] * left.next + samples[1] * left.sample;
                coefs[n + 1] = coefs[n] * right.near
                    + coefs[n - 1] * right.next
                    + samples[n - 2] * right.sample;
            }
            Self::Cyclic { factor, period } => {
                let p = *period;
                factor.solve(&samples[..p], &mut work[..p]);
                // Coefficient `a` sits at sample `a`, 1-based, wrapped onto the period
                for (a, c) in coefs.iter_mut().enumerate() {
                    *c = work[(a + p - 1) % p];
                }
            }
        }
    }
}

/// Off-diagonal and diagonal entries of the interpolation rows
fn interior_stencil<T: Float>(degree: Degree) -> Option<(T, T)> {
    let one = T::one();
    let two = one + one;
    let four = two + two;
    let eight = four + four;
    let six = four + two;
    match degree {
        Degree::Quadratic => Some((one / eight, (two + one) / four)),
        Degree::Cubic => Some((one / six, two / (two + one))),
        Degree::Constant | Degree::Linear => None,
    }
}

/// Per-worker lane buffers
struct LaneScratch<V> {
    lane: Vec<V>,
    work: Vec<V>,
    coefs: Vec<V>,
}

impl<V: Copy + num_traits::Zero> LaneScratch<V> {
    fn new(n: usize, stored: usize) -> Self {
        Self {
            lane: vec![V::zero(); n],
            work: vec![V::zero(); n],
            coefs: vec![V::zero(); stored],
        }
    }
}

/// Filter the `inner` lanes of one `(n, inner)` block into a `(stored, inner)` block.
fn filter_block<T, V>(
    src_block: &[V],
    dst_block: &mut [V],
    inner: usize,
    solver: &AxisSolver<T>,
    scratch: &mut LaneScratch<V>,
) where
    T: Float + Send + Sync,
    V: Coefficient<T>,
{
    let n = scratch.lane.len();
    for i in 0..inner {
        for j in 0..n {
            scratch.lane[j] = src_block[j * inner + i];
        }
        solver.solve_lane(&scratch.lane, &mut scratch.coefs, &mut scratch.work);
        for (j, c) in scratch.coefs.iter().enumerate() {
            dst_block[j * inner + i] = *c;
        }
    }
}

/// Filter every lane along one axis of a C-ordered array viewed with shape
/// `(outer, n, inner)`, producing an array of shape `(outer, stored, inner)`.
/// Banded solvers store `n + 2` coefficients per lane; cyclic solvers fill
/// any length by wraparound.
///
/// With the `parallel` feature, work is split over whichever of the outer
/// blocks or the lanes within a block is more numerous.
pub(crate) fn filter_axis<T, V>(
    src: &[V],
    outer: usize,
    n: usize,
    stored: usize,
    inner: usize,
    solver: &AxisSolver<T>,
) -> Vec<V>
where
    T: Float + Send + Sync,
    V: Coefficient<T>,
{
    let m = stored;
    let mut dst = vec![V::zero(); outer * m * inner];

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if outer >= inner {
            dst.par_chunks_mut(m * inner)
                .zip(src.par_chunks(n * inner))
                .for_each_init(
                    || LaneScratch::new(n, m),
                    |scratch, (dst_block, src_block)| {
                        filter_block(src_block, dst_block, inner, solver, scratch)
                    },
                );
        } else {
            // Solved lanes for one outer block, stored lane-major
            let mut lanes = vec![V::zero(); inner * m];
            for (dst_block, src_block) in dst.chunks_mut(m * inner).zip(src.chunks(n * inner)) {
                lanes.par_chunks_mut(m).enumerate().for_each_init(
                    || LaneScratch::new(n, m),
                    |scratch, (i, coefs)| {
                        for j in 0..n {
                            scratch.lane[j] = src_block[j * inner + i];
                        }
                        solver.solve_lane(&scratch.lane, coefs, &mut scratch.work);
                    },
                );
                for i in 0..inner {
                    for j in 0..m {
                        dst_block[j * inner + i] = lanes[i * m + j];
                    }
                }
            }
        }
    }
    #[cfg(not(feature = "parallel"))]
    {
        let mut scratch = LaneScratch::new(n, m);
        for (dst_block, src_block) in dst.chunks_mut(m * inner).zip(src.chunks(n * inner)) {
            filter_block(src_block, dst_block, inner, solver, &mut scratch);
        }
    }

    tracing::trace!(outer, n, inner, "filtered lanes");
    dst
}

/// Check that every lane along a periodic axis placed on the grid ends on a
/// repeat of its first sample.
fn check_period_closes<T, V>(samples: &[V], outer: usize, n: usize, inner: usize) -> bool
where
    T: Float,
    V: Coefficient<T>,
{
    let last = (n - 1) * inner;
    samples
        .chunks(n * inner)
        .take(outer)
        .all(|block| (0..inner).all(|i| (block[last + i] + block[i] * -T::one()).is_zero()))
}

/// Prefilter a C-ordered sample array into a coefficient grid.
///
/// Axes of degree 0 or 1 are left as-is. Every other axis is filtered in
/// turn, with the closure its descriptor resolves to.
pub(crate) fn prefilter<T, V, const N: usize>(
    samples: &[V],
    axes: [Axis; N],
) -> Result<CoefficientGrid<V, N>>
where
    T: Float + Send + Sync,
    V: Coefficient<T>,
{
    // Validate and factor every axis before doing any filtering
    let mut solvers: [Option<AxisSolver<T>>; N] = core::array::from_fn(|_| None);
    for (i, axis) in axes.iter().enumerate() {
        if axis.len < axis.degree.min_samples() {
            return Err(InterpError::SingularSystem {
                axis: i,
                len: axis.len,
                degree: axis.degree.order(),
            });
        }
        if let Some(boundary) = axis.boundary {
            let closure = boundary
                .closure::<T>(axis.degree, axis.placement, axis.len)
                .map_err(|e| e.on_axis(i))?;
            let solver =
                AxisSolver::new(axis.degree, closure, axis.len).map_err(|e| e.on_axis(i))?;
            solvers[i] = Some(solver);
        }
    }

    let mut dims: [usize; N] = core::array::from_fn(|i| axes[i].len);

    // Filtering is linear along every other axis, so a period that closes
    // in the samples still closes after the axes before it are filtered
    for (i, axis) in axes.iter().enumerate() {
        if axis.is_periodic() && axis.placement == Placement::OnGrid {
            let outer: usize = dims[..i].iter().product();
            let inner: usize = dims[i + 1..].iter().product();
            if !check_period_closes::<T, V>(samples, outer, dims[i], inner) {
                return Err(InterpError::Configuration {
                    axis: i,
                    reason: "periodic axes on the grid must repeat the first sample at the end",
                });
            }
        }
    }

    let mut values = samples.to_vec();
    for (i, solver) in solvers.iter().enumerate() {
        let Some(solver) = solver else { continue };
        tracing::debug!(
            axis = i,
            degree = axes[i].degree.order(),
            len = axes[i].len,
            boundary = ?axes[i].boundary,
            placement = ?axes[i].placement,
            "prefiltering axis"
        );
        let outer: usize = dims[..i].iter().product();
        let inner: usize = dims[i + 1..].iter().product();
        let stored = axes[i].stored_len();
        values = filter_axis(&values, outer, dims[i], stored, inner, solver);
        dims[i] = stored;
    }

    CoefficientGrid::new(dims, axes, values)
}
