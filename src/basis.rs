//! Cardinal B-spline basis weights on a unit-spaced grid.
//!
//! For a spline of degree `d`, the value at `x` depends on `d + 1`
//! coefficients. Odd degrees locate the cell `[k, k + 1)` containing `x`
//! and take `t = x - k`; even degrees locate the nearest sample `k` and take
//! `t = x + 1/2 - k`, since their cells are centered on the samples.
//! Either way `t` lands in `[0, 1]` on the interior of the grid and the
//! weights sum to one.
//!
//! ```text
//! degree   coefficient footprint around x     padding
//! 0        k                                  0
//! 1        k, k+1                             0
//! 2        k-1, k, k+1                        1
//! 3        k-1, k, k+1, k+2                   1
//! ```
use num_traits::{Float, NumCast};

/// Largest footprint of any implemented basis
pub const MAX_SUPPORT: usize = 4;

/// Polynomial degree of the basis along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Degree {
    /// Nearest-neighbor, ties toward the lower index
    Constant,
    /// Linear interpolation between bracketing samples
    Linear,
    /// Uniform quadratic B-spline, requires prefiltering
    Quadratic,
    /// Uniform cubic B-spline, requires prefiltering
    Cubic,
}

impl Degree {
    /// Map a polynomial order onto an implemented basis, if there is one.
    pub const fn from_order(order: usize) -> Option<Self> {
        match order {
            0 => Some(Self::Constant),
            1 => Some(Self::Linear),
            2 => Some(Self::Quadratic),
            3 => Some(Self::Cubic),
            _ => None,
        }
    }

    pub const fn order(self) -> usize {
        match self {
            Self::Constant => 0,
            Self::Linear => 1,
            Self::Quadratic => 2,
            Self::Cubic => 3,
        }
    }

    /// Number of coefficients that contribute at any one location.
    pub const fn support(self) -> usize {
        self.order() + 1
    }

    /// Whether samples must be converted to coefficients before evaluation.
    /// Below degree 2 the coefficients are the samples themselves.
    pub const fn needs_prefilter(self) -> bool {
        self.order() >= 2
    }

    /// Ghost coefficients stored past each end of a prefiltered axis.
    pub const fn padding(self) -> usize {
        if self.needs_prefilter() {
            1
        } else {
            0
        }
    }

    /// Fewest samples an axis of this degree can be built from.
    pub const fn min_samples(self) -> usize {
        self.support()
    }

    /// Basis weights for a normalized offset `t` within the located cell.
    /// Entries past `support()` are zero.
    #[inline]
    pub fn weights<T: Float>(self, t: T) -> [T; MAX_SUPPORT] {
        (self.kernel::<T>().weights)(t)
    }

    /// Derivatives of the basis weights with respect to `t`.
    #[inline]
    pub fn slopes<T: Float>(self, t: T) -> [T; MAX_SUPPORT] {
        (self.kernel::<T>().slopes)(t)
    }

    /// Locate the footprint of `x` on an axis with `n` samples at
    /// 1-based indices `1..=n`, returning the array index of the first
    /// contributing coefficient along with the weights.
    ///
    /// Returns `None` if `x` cannot be represented as an index.
    pub fn stencil<T: Float>(self, x: T, n: usize) -> Option<(usize, [T; MAX_SUPPORT])> {
        let kernel = self.kernel::<T>();
        let (first, t) = (kernel.locate)(x, <T as NumCast>::from(n)?)?;
        Some((first, (kernel.weights)(t)))
    }

    /// Select the evaluation functions for this degree.
    pub(crate) fn kernel<T: Float>(self) -> Kernel<T> {
        match self {
            Self::Constant => Kernel {
                locate: locate_nearest,
                weights: constant_weights,
                slopes: constant_slopes,
            },
            Self::Linear => Kernel {
                locate: locate_linear,
                weights: linear_weights,
                slopes: linear_slopes,
            },
            Self::Quadratic => Kernel {
                locate: locate_quadratic,
                weights: quadratic_weights,
                slopes: quadratic_slopes,
            },
            Self::Cubic => Kernel {
                locate: locate_cubic,
                weights: cubic_weights,
                slopes: cubic_slopes,
            },
        }
    }
}

/// Evaluation functions for one degree, chosen once per axis at construction
/// so that evaluation never matches on the degree.
#[derive(Clone, Copy)]
pub(crate) struct Kernel<T> {
    /// `(x, n) -> (first coefficient index, t)`
    pub locate: fn(T, T) -> Option<(usize, T)>,
    pub weights: fn(T) -> [T; MAX_SUPPORT],
    pub slopes: fn(T) -> [T; MAX_SUPPORT],
}

#[inline]
fn locate_nearest<T: Float>(x: T, n: T) -> Option<(usize, T)> {
    let half = T::one() / (T::one() + T::one());
    // ceil(x - 1/2) rounds half-way points down
    let k = (x - half).ceil().max(T::one()).min(n);
    Some((<usize as NumCast>::from(k - T::one())?, T::zero()))
}

#[inline]
fn locate_linear<T: Float>(x: T, n: T) -> Option<(usize, T)> {
    let k = x.floor().max(T::one()).min(n - T::one());
    Some((<usize as NumCast>::from(k - T::one())?, x - k))
}

#[inline]
fn locate_quadratic<T: Float>(x: T, n: T) -> Option<(usize, T)> {
    let half = T::one() / (T::one() + T::one());
    let k = (x + half).floor().max(T::one()).min(n);
    // Padded storage puts sample `k` at index `k`, so the stencil starts at `k - 1`
    Some((<usize as NumCast>::from(k - T::one())?, x + half - k))
}

#[inline]
fn locate_cubic<T: Float>(x: T, n: T) -> Option<(usize, T)> {
    let k = x.floor().max(T::one()).min(n - T::one());
    Some((<usize as NumCast>::from(k - T::one())?, x - k))
}

/// Cubic locate over one whole period of cells `[1, n + 1)`, for periodic
/// axes placed on the cell, where the period is `n`.
#[inline]
pub(crate) fn locate_cubic_periodic<T: Float>(x: T, n: T) -> Option<(usize, T)> {
    let x = if x < T::one() { x + n } else { x };
    let k = x.floor().max(T::one()).min(n);
    Some((<usize as NumCast>::from(k - T::one())?, x - k))
}

#[inline]
fn constant_weights<T: Float>(_t: T) -> [T; MAX_SUPPORT] {
    [T::one(), T::zero(), T::zero(), T::zero()]
}

#[inline]
fn constant_slopes<T: Float>(_t: T) -> [T; MAX_SUPPORT] {
    [T::zero(); MAX_SUPPORT]
}

#[inline]
fn linear_weights<T: Float>(t: T) -> [T; MAX_SUPPORT] {
    [T::one() - t, t, T::zero(), T::zero()]
}

#[inline]
fn linear_slopes<T: Float>(_t: T) -> [T; MAX_SUPPORT] {
    [-T::one(), T::one(), T::zero(), T::zero()]
}

#[inline]
fn quadratic_weights<T: Float>(t: T) -> [T; MAX_SUPPORT] {
    let one = T::one();
    let two = one + one;
    let half = one / two;
    let s = one - t;
    let c = t - half;

    [s * s / two, half + half * half - c * c, t * t / two, T::zero()]
}

#[inline]
fn quadratic_slopes<T: Float>(t: T) -> [T; MAX_SUPPORT] {
    let one = T::one();
    [t - one, one - (t + t), t, T::zero()]
}

#[inline]
fn cubic_weights<T: Float>(t: T) -> [T; MAX_SUPPORT] {
    let one = T::one();
    let two = one + one;
    let three = two + one;
    let four = two + two;
    let six = three + three;
    let s = one - t;
    let t2 = t * t;
    let t3 = t2 * t;

    [
        s * s * s / six,
        (three * t3 - six * t2 + four) / six,
        (-three * t3 + three * t2 + three * t + one) / six,
        t3 / six,
    ]
}

#[inline]
fn cubic_slopes<T: Float>(t: T) -> [T; MAX_SUPPORT] {
    let one = T::one();
    let two = one + one;
    let three = two + one;
    let half = one / two;
    let s = one - t;
    let t2 = t * t;

    [
        -s * s / two,
        three * half * t2 - two * t,
        -three * half * t2 + t + half,
        t2 / two,
    ]
}
