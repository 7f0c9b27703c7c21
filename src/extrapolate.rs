//! Policies for evaluating outside of an interpolant's domain.
//!
//! An [`Extrapolator`] borrows an [`Interpolant`] and, axis by axis, maps
//! out-of-domain coordinates back inside before delegating to it, or answers
//! without delegating at all.
//!
//! ```rust
//! use bspline_nd::{AxisSpec, Extrapolation, Extrapolator, Interpolant};
//!
//! let z = [1.0_f64, 2.0, 4.0];
//! let itp: Interpolant<f64, f64, 1> =
//!     Interpolant::build([3], &z, [AxisSpec::linear()]).unwrap();
//!
//! let flat = Extrapolator::uniform(&itp, Extrapolation::Flat).unwrap();
//! assert_eq!(flat.evaluate([7.0]).unwrap(), 4.0);
//!
//! let line = Extrapolator::uniform(&itp, Extrapolation::Line).unwrap();
//! assert_eq!(line.evaluate([4.0]).unwrap(), 6.0);
//!
//! let fill = Extrapolator::uniform(&itp, Extrapolation::NaNFill)
//!     .unwrap()
//!     .with_fill(-1.0);
//! assert_eq!(fill.evaluate([0.0]).unwrap(), -1.0);
//! ```
use num_traits::Float;

use crate::error::{InterpError, Result};
use crate::interpolant::Interpolant;
use crate::{Coefficient, Interpolate};

/// What to do with a coordinate outside of an axis' domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Extrapolation {
    /// Clamp to the nearest end of the domain.
    Flat,
    /// Wrap around by the period of the axis. Requires the axis to have been
    /// built with a periodic boundary condition.
    Periodic,
    /// Mirror at the ends of the domain, repeatedly if needed.
    Reflect,
    /// Continue along the slope at the nearest end of the domain.
    Line,
    /// Fail with `OutOfDomain`.
    Error,
    /// Return the fill value without evaluating.
    NaNFill,
}

/// A read-only view of an [`Interpolant`] that is defined everywhere
/// its policies allow.
#[derive(Clone, Copy)]
pub struct Extrapolator<'a, T, V, const N: usize> {
    itp: &'a Interpolant<T, V, N>,
    policies: [Extrapolation; N],
    fill: V,
}

impl<'a, T, V, const N: usize> Extrapolator<'a, T, V, N>
where
    T: Float + Send + Sync,
    V: Coefficient<T>,
{
    /// Wrap `itp` with one policy per axis.
    ///
    /// # Errors
    /// * `Configuration` if a `Periodic` policy is requested on an axis that
    ///   was not built with a periodic boundary condition
    pub fn new(itp: &'a Interpolant<T, V, N>, policies: [Extrapolation; N]) -> Result<Self> {
        for (i, (policy, axis)) in policies.iter().zip(itp.axes()).enumerate() {
            if *policy == Extrapolation::Periodic && !axis.is_periodic() {
                return Err(InterpError::Configuration {
                    axis: i,
                    reason: "periodic extrapolation requires a periodic boundary condition",
                });
            }
        }

        Ok(Self {
            itp,
            policies,
            fill: V::zero() * T::nan(),
        })
    }

    /// Wrap `itp` with the same policy on every axis.
    pub fn uniform(itp: &'a Interpolant<T, V, N>, policy: Extrapolation) -> Result<Self> {
        Self::new(itp, [policy; N])
    }

    /// Replace the NaN returned by `NaNFill` axes.
    pub fn with_fill(self, fill: V) -> Self {
        Self { fill, ..self }
    }

    pub fn interpolant(&self) -> &'a Interpolant<T, V, N> {
        self.itp
    }

    pub fn policies(&self) -> &[Extrapolation; N] {
        &self.policies
    }

    /// Evaluate at a point, extrapolating per axis as needed.
    ///
    /// A NaN coordinate has no position to remap, so it is answered with the
    /// fill value, except on `Error` axes. An `Error` axis out of its domain
    /// fails regardless of what the other axes would have answered.
    ///
    /// # Errors
    /// * `OutOfDomain` if a coordinate is outside the domain of an `Error` axis
    pub fn evaluate(&self, x: [T; N]) -> Result<V> {
        let bounds = self.itp.bounds();
        let outside = |i: usize| !(x[i] >= bounds[i].0 && x[i] <= bounds[i].1);

        for i in 0..N {
            if self.policies[i] == Extrapolation::Error && outside(i) {
                return Err(self.itp.out_of_domain(i, x[i]));
            }
        }

        let mut inside = x;
        let mut linearized = false;
        for i in 0..N {
            if !outside(i) {
                continue;
            }

            let (lo, hi) = bounds[i];
            let v = x[i];
            let policy = self.policies[i];
            if v.is_nan() || policy == Extrapolation::NaNFill {
                return Ok(self.fill);
            }

            inside[i] = match policy {
                Extrapolation::Flat => v.max(lo).min(hi),
                Extrapolation::Periodic => wrap(v, lo, hi),
                Extrapolation::Reflect => reflect(v, lo, hi),
                Extrapolation::Line => {
                    linearized = true;
                    v.max(lo).min(hi)
                }
                Extrapolation::Error | Extrapolation::NaNFill => v,
            };
        }

        let value = self.itp.evaluate_inside(inside)?;
        if !linearized {
            return Ok(value);
        }

        // First-order continuation from the nearest point of the domain
        let grad = self.itp.gradient(inside)?;
        let mut out = value;
        for i in 0..N {
            if self.policies[i] == Extrapolation::Line && x[i] != inside[i] {
                out = out + grad[i] * (x[i] - inside[i]);
            }
        }

        Ok(out)
    }
}

/// Map `v` into `[lo, hi]` by whole periods of `hi - lo`.
fn wrap<T: Float>(v: T, lo: T, hi: T) -> T {
    let period = hi - lo;
    let mut r = (v - lo) % period;
    if r < T::zero() {
        r = r + period;
    }
    (lo + r).min(hi)
}

/// Map `v` into `[lo, hi]` by mirroring at each end.
fn reflect<T: Float>(v: T, lo: T, hi: T) -> T {
    let span = hi - lo;
    let mut r = (v - lo) % (span + span);
    if r < T::zero() {
        r = r + span + span;
    }
    if r > span {
        r = span + span - r;
    }
    (lo + r).max(lo).min(hi)
}

impl<T, V, const N: usize> Interpolate<T, V, N> for Extrapolator<'_, T, V, N>
where
    T: Float + Send + Sync,
    V: Coefficient<T>,
{
    fn evaluate(&self, x: [T; N]) -> Result<V> {
        Extrapolator::evaluate(self, x)
    }

    /// Only `Error` axes keep the interpolant's domain.
    fn bounds(&self) -> [(T, T); N] {
        let inner = self.itp.bounds();
        core::array::from_fn(|i| match self.policies[i] {
            Extrapolation::Error => inner[i],
            _ => (T::neg_infinity(), T::infinity()),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::boundary::{Boundary, Placement};
    use crate::interpolant::AxisSpec;
    use crate::testing::*;
    use crate::utils::*;
    use alloc::vec::Vec;
    use approx::assert_relative_eq;

    type Itp<const N: usize> = Interpolant<f64, f64, N>;

    const WAVE: [f64; 10] = [0.0, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0, 0.0, 1.0];

    #[test]
    fn test_flat() {
        let n = WAVE.len();
        let spec = AxisSpec::quadratic(Boundary::Line, Placement::OnGrid);
        let itp = Itp::build([n], &WAVE, [spec]).unwrap();
        let etp = Extrapolator::uniform(&itp, Extrapolation::Flat).unwrap();

        let nf = n as f64;
        assert_eq!(etp.evaluate([0.0]).unwrap(), itp.evaluate([1.0]).unwrap());
        assert_eq!(etp.evaluate([nf + 5.0]).unwrap(), itp.evaluate([nf]).unwrap());
        // Unchanged inside
        assert_eq!(etp.evaluate([3.7]).unwrap(), itp.evaluate([3.7]).unwrap());
    }

    #[test]
    fn test_periodic() {
        let z = &WAVE[..9];
        let n = z.len();
        let spec = AxisSpec::cubic(Boundary::Periodic, Placement::OnGrid);
        let itp = Itp::build([n], z, [spec]).unwrap();
        let etp = Extrapolator::uniform(&itp, Extrapolation::Periodic).unwrap();

        let nf = n as f64;
        for k in 1..=8 {
            let k = k as f64;
            let wrapped = etp.evaluate([nf + k]).unwrap();
            let expected = etp.evaluate([1.0 + k]).unwrap();
            assert!((wrapped - expected).abs() < 1e-12);
        }
        // Non-integer offsets in both directions
        for x in linspace(1.0, 9.0, 23) {
            let v = itp.evaluate([x]).unwrap();
            assert!((etp.evaluate([x + 8.0]).unwrap() - v).abs() < 1e-12);
            assert!((etp.evaluate([x - 16.0]).unwrap() - v).abs() < 1e-12);
        }
    }

    /// Periodic on the cell repeats every `n` samples over `[0.5, n + 0.5]`
    #[test]
    fn test_periodic_on_cell() {
        let z = [0.0, 1.0, 0.5, -1.0, -0.25, 2.0, 0.0, -0.5];
        for degree in [2, 3] {
            let spec = AxisSpec::new(degree, Placement::OnCell, Some(Boundary::Periodic));
            let itp = Itp::build([8], &z, [spec]).unwrap();
            let etp = Extrapolator::uniform(&itp, Extrapolation::Periodic).unwrap();

            for x in linspace(0.5, 8.5, 33) {
                let v = itp.evaluate([x]).unwrap();
                assert_relative_eq!(etp.evaluate([x + 8.0]).unwrap(), v, epsilon = 1e-12);
                assert_relative_eq!(etp.evaluate([x - 16.0]).unwrap(), v, epsilon = 1e-12);
            }

            // Smooth across the seam between periods
            let h = 1e-7;
            let below = etp.evaluate([8.5 - h]).unwrap();
            let above = etp.evaluate([8.5 + h]).unwrap();
            let slope = itp.gradient([8.5]).unwrap()[0];
            assert_relative_eq!((above - below) / (2.0 * h), slope, epsilon = 1e-6);
            assert_relative_eq!(slope, itp.gradient([0.5]).unwrap()[0], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_periodic_requires_periodic_boundary() {
        let spec = AxisSpec::quadratic(Boundary::Flat, Placement::OnGrid);
        let itp = Itp::build([10, 10], &[0.0; 100], [AxisSpec::linear(), spec]).unwrap();
        let err = Extrapolator::new(&itp, [Extrapolation::Flat, Extrapolation::Periodic]);
        assert!(matches!(
            err.err(),
            Some(InterpError::Configuration { axis: 1, .. })
        ));
    }

    #[test]
    fn test_error() {
        let itp = Itp::build([10], &WAVE, [AxisSpec::linear()]).unwrap();
        let etp = Extrapolator::uniform(&itp, Extrapolation::Error).unwrap();
        assert_eq!(
            etp.evaluate([-1.0]),
            Err(InterpError::OutOfDomain {
                axis: 0,
                coordinate: -1.0,
                lo: 1.0,
                hi: 10.0
            })
        );
        assert!(etp.evaluate([f64::NAN]).is_err());
        assert_eq!(etp.evaluate([2.0]).unwrap(), 1.0);
    }

    #[test]
    fn test_reflect() {
        let mut rng = rng_fixed_seed();
        let z: Vec<f64> = randn(&mut rng, 7);
        let spec = AxisSpec::quadratic(Boundary::Reflect, Placement::OnCell);
        let itp = Itp::build([7], &z, [spec]).unwrap();
        let etp = Extrapolator::uniform(&itp, Extrapolation::Reflect).unwrap();

        let (lo, hi) = itp.bounds()[0];
        for d in linspace(0.0, 3.0, 13) {
            assert_relative_eq!(
                etp.evaluate([lo - d]).unwrap(),
                itp.evaluate([lo + d]).unwrap(),
                epsilon = 1e-12,
                max_relative = 1e-12
            );
            assert_relative_eq!(
                etp.evaluate([hi + d]).unwrap(),
                itp.evaluate([hi - d]).unwrap(),
                epsilon = 1e-12,
                max_relative = 1e-12
            );
        }
        // Overshoot by more than one span folds back again
        let span = hi - lo;
        assert_relative_eq!(
            etp.evaluate([hi + span + 1.0]).unwrap(),
            itp.evaluate([lo + 1.0]).unwrap(),
            epsilon = 1e-12,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_line() {
        let z: Vec<f64> = (1..=6).map(|i| 0.5 * i as f64 + 1.0).collect();
        let spec = AxisSpec::cubic(Boundary::Line, Placement::OnGrid);
        let itp = Itp::build([6], &z, [spec]).unwrap();
        let etp = Extrapolator::uniform(&itp, Extrapolation::Line).unwrap();
        for x in [-3.0, 0.0, 0.5, 6.5, 10.0] {
            assert_relative_eq!(etp.evaluate([x]).unwrap(), 0.5 * x + 1.0, epsilon = 1e-12);
        }
    }

    /// Policies apply independently per axis
    #[test]
    fn test_mixed_policies() {
        let dims = [5, 6];
        let mut rng = rng_fixed_seed();
        let z: Vec<f64> = randn(&mut rng, 30);
        let specs = [
            AxisSpec::cubic(Boundary::Flat, Placement::OnGrid),
            AxisSpec::quadratic(Boundary::Line, Placement::OnCell),
        ];
        let itp = Itp::build(dims, &z, specs).unwrap();
        let etp = Extrapolator::new(&itp, [Extrapolation::Flat, Extrapolation::NaNFill])
            .unwrap()
            .with_fill(7.0);

        assert_eq!(
            etp.evaluate([-2.0, 3.3]).unwrap(),
            itp.evaluate([1.0, 3.3]).unwrap()
        );
        assert_eq!(etp.evaluate([2.0, 6.6]).unwrap(), 7.0);
        assert_eq!(etp.evaluate([f64::NAN, 2.0]).unwrap(), 7.0);
        assert_eq!(etp.bounds(), [(f64::NEG_INFINITY, f64::INFINITY); 2]);
    }

    /// An `Error` axis out of its domain fails no matter which axis would
    /// otherwise have answered with the fill value
    #[test]
    fn test_error_wins_over_fill() {
        let z = [0.0; 20];
        let itp = Itp::build([4, 5], &z, [AxisSpec::linear(); 2]).unwrap();
        let outside = [0.0, 9.0];

        let etp = Extrapolator::new(&itp, [Extrapolation::NaNFill, Extrapolation::Error]).unwrap();
        assert!(matches!(
            etp.evaluate(outside),
            Err(InterpError::OutOfDomain { axis: 1, .. })
        ));
        let etp = Extrapolator::new(&itp, [Extrapolation::Error, Extrapolation::NaNFill]).unwrap();
        assert!(matches!(
            etp.evaluate(outside),
            Err(InterpError::OutOfDomain { axis: 0, .. })
        ));

        // NaN on the fill axis still defers to the Error axis
        let etp = Extrapolator::new(&itp, [Extrapolation::Flat, Extrapolation::Error]).unwrap();
        assert!(etp.evaluate([f64::NAN, 9.0]).is_err());
        assert!(etp.evaluate([f64::NAN, 2.0]).unwrap().is_nan());
    }

    #[test]
    fn test_nan_fill_default() {
        let itp = Itp::build([10], &WAVE, [AxisSpec::constant()]).unwrap();
        let etp = Extrapolator::uniform(&itp, Extrapolation::NaNFill).unwrap();
        assert!(etp.evaluate([11.0]).unwrap().is_nan());
        assert!(etp.evaluate([0.0]).unwrap().is_nan());
        assert_eq!(etp.evaluate([10.0]).unwrap(), 1.0);

        let pairs = [Pair(0.0, 1.0), Pair(1.0, 0.0)];
        let itp = Interpolant::<f64, Pair, 1>::build([2], &pairs, [AxisSpec::linear()]).unwrap();
        let etp = Extrapolator::uniform(&itp, Extrapolation::NaNFill).unwrap();
        let Pair(a, b) = etp.evaluate([3.0]).unwrap();
        assert!(a.is_nan() && b.is_nan());
    }
}
