//! Boundary conditions that close the prefiltering system.
//!
//! Interpolating `n` samples with a degree-2 or degree-3 spline takes `n + 2`
//! coefficients, one ghost past each end of the axis, but the samples only
//! supply `n` equations. Each boundary condition supplies the other two.
//! `Line`, `Flat` and `Reflect` each give one row over the four outermost
//! coefficients at each end: the second or first derivative of the spline
//! at the edge of the domain, set to zero. `Periodic` instead wraps the
//! system into a circulant one with no ghosts to solve for.
//!
//! Rows are ordered from the edge inward, so the same row describes both
//! ends: `(c[0], c[1], c[2], c[3])` on the left and
//! `(c[n+1], c[n], c[n-1], c[n-2])` on the right, with a zero right-hand side.
//!
//! | Condition      | OnGrid          | OnCell, quadratic | OnCell, cubic     |
//! |----------------|-----------------|-------------------|-------------------|
//! | Line           | (1, -2, 1, 0)   | (1, -2, 1, 0)     | (3, -7, 5, -1)    |
//! | Flat, Reflect  | (1, 0, -1, 0)   | (1, -1, 0, 0)     | (9, -11, 3, -1)   |
//!
//! A cubic placed on the cell has its edge halfway into the ghost cell, where
//! all four basis functions of the outermost piece are nonzero.
use num_traits::{Float, NumCast};

use crate::basis::Degree;
use crate::error::{InterpError, Result};

/// Where a boundary condition is anchored relative to the outermost sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Placement {
    /// At the first/last sample index; the domain is `[1, n]`.
    #[default]
    OnGrid,
    /// Half a cell outside the first/last sample; the domain is `[0.5, n + 0.5]`.
    OnCell,
}

impl Placement {
    /// Distance from the outermost sample to the edge of the domain, in cells.
    pub fn margin<T: Float>(self) -> T {
        match self {
            Self::OnGrid => T::zero(),
            Self::OnCell => T::one() / (T::one() + T::one()),
        }
    }
}

/// Behavior of the reconstructed spline at the ends of an axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Boundary {
    /// Second derivative vanishes at the boundary, so the spline continues
    /// as a straight line.
    #[default]
    Line,
    /// First derivative vanishes at the boundary.
    Flat,
    /// Samples mirror across the boundary. Reconstructs identically to
    /// `Flat`; the two differ only in how they are extrapolated.
    Reflect,
    /// Samples repeat with the period of the axis. On the grid, the last
    /// sample must equal the first.
    Periodic,
}

/// One closing equation over the four coefficients nearest an edge,
/// ordered from the edge inward.
pub type BoundaryRow<T> = [T; 4];

/// The pair of equations, or the circulant structure, that closes one axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Closure<T> {
    /// Banded system with one substituted row at each end
    Rows {
        left: BoundaryRow<T>,
        right: BoundaryRow<T>,
    },
    /// Circulant system repeating every `period` samples
    Periodic { period: usize },
}

impl Boundary {
    /// Resolve the equations that close an axis of `n` samples at the given
    /// degree and placement.
    ///
    /// Periodic axes placed on the grid treat the last sample as a repeat of
    /// the first, so their period is one less than the sample count.
    ///
    /// # Errors
    /// * If the degree does not take boundary conditions (degree 0 or 1).
    ///   The error is reported against axis 0; callers relabel it.
    pub fn closure<T: Float>(
        self,
        degree: Degree,
        placement: Placement,
        n: usize,
    ) -> Result<Closure<T>> {
        if !degree.needs_prefilter() {
            return Err(InterpError::Configuration {
                axis: 0,
                reason: "boundary conditions apply only to degree 2 and above",
            });
        }

        let int = |v: i8| <T as NumCast>::from(v).unwrap_or_else(T::nan);
        let cubic_on_cell = degree == Degree::Cubic && placement == Placement::OnCell;
        let row = match (self, placement) {
            (Self::Line, _) if cubic_on_cell => [int(3), int(-7), int(5), int(-1)],
            (Self::Line, _) => [int(1), int(-2), int(1), int(0)],
            (Self::Flat | Self::Reflect, _) if cubic_on_cell => {
                [int(9), int(-11), int(3), int(-1)]
            }
            (Self::Flat | Self::Reflect, Placement::OnGrid) => [int(1), int(0), int(-1), int(0)],
            (Self::Flat | Self::Reflect, Placement::OnCell) => [int(1), int(-1), int(0), int(0)],
            (Self::Periodic, Placement::OnGrid) => {
                return Ok(Closure::Periodic {
                    period: n.saturating_sub(1),
                })
            }
            (Self::Periodic, Placement::OnCell) => return Ok(Closure::Periodic { period: n }),
        };

        Ok(Closure::Rows {
            left: row,
            right: row,
        })
    }
}

/// Default boundary condition and placement for axes that do not set their own.
///
/// There is no process-wide default; construction takes one of these
/// explicitly when the caller does not want to spell out every axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SplineConfig {
    pub boundary: Boundary,
    pub placement: Placement,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_low_degree_rejected() {
        for degree in [Degree::Constant, Degree::Linear] {
            for boundary in [
                Boundary::Line,
                Boundary::Flat,
                Boundary::Reflect,
                Boundary::Periodic,
            ] {
                let closure = boundary.closure::<f64>(degree, Placement::OnGrid, 10);
                assert!(matches!(closure, Err(InterpError::Configuration { .. })));
            }
        }
    }

    #[test]
    fn test_placement_shifts_flat_rows() {
        let on_grid = Boundary::Flat.closure::<f64>(Degree::Quadratic, Placement::OnGrid, 10);
        let on_cell = Boundary::Flat.closure::<f64>(Degree::Quadratic, Placement::OnCell, 10);
        assert_eq!(
            on_grid.unwrap(),
            Closure::Rows {
                left: [1.0, 0.0, -1.0, 0.0],
                right: [1.0, 0.0, -1.0, 0.0]
            }
        );
        assert_eq!(
            on_cell.unwrap(),
            Closure::Rows {
                left: [1.0, -1.0, 0.0, 0.0],
                right: [1.0, -1.0, 0.0, 0.0]
            }
        );
        // Reflect closes the system the same way
        assert_eq!(
            Boundary::Reflect
                .closure::<f64>(Degree::Quadratic, Placement::OnCell, 10)
                .unwrap(),
            on_cell.unwrap()
        );
    }

    fn left_row(boundary: Boundary, degree: Degree, placement: Placement) -> [f64; 4] {
        match boundary.closure::<f64>(degree, placement, 10) {
            Ok(Closure::Rows { left, .. }) => left,
            other => panic!("expected banded rows, got {other:?}"),
        }
    }

    /// Each row is the derivative of the outermost piece at the edge of the
    /// domain, up to scale
    #[test]
    fn test_rows_match_basis_derivatives() {
        // Cubic on the cell: the edge sits at t = -1/2 of the first piece
        let t = -0.5_f64;
        let slopes = Degree::Cubic.slopes(t);
        let curvatures = [1.0 - t, 3.0 * t - 2.0, 1.0 - 3.0 * t, t];

        let flat = left_row(Boundary::Flat, Degree::Cubic, Placement::OnCell);
        let line = left_row(Boundary::Line, Degree::Cubic, Placement::OnCell);
        for j in 0..4 {
            assert!((flat[j] + 8.0 * slopes[j]).abs() < 1e-12);
            assert!((line[j] - 2.0 * curvatures[j]).abs() < 1e-12);
        }
        let reflect = left_row(Boundary::Reflect, Degree::Cubic, Placement::OnCell);
        assert_eq!(reflect, flat);

        // On the grid the cubic edge is at t = 0, where the fourth term drops out
        let slopes = Degree::Cubic.slopes(0.0_f64);
        let flat = left_row(Boundary::Flat, Degree::Cubic, Placement::OnGrid);
        for j in 0..4 {
            assert!((flat[j] + 2.0 * slopes[j]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_line_rows_have_zero_curvature() {
        let closure = Boundary::Line
            .closure::<f64>(Degree::Cubic, Placement::OnGrid, 10)
            .unwrap();
        let Closure::Rows { left, .. } = closure else {
            panic!("expected banded rows")
        };
        // A second difference
        assert_eq!(left, [1.0, -2.0, 1.0, 0.0]);
    }

    #[test]
    fn test_periodic_period() {
        let on_grid = Boundary::Periodic.closure::<f64>(Degree::Quadratic, Placement::OnGrid, 9);
        let on_cell = Boundary::Periodic.closure::<f64>(Degree::Quadratic, Placement::OnCell, 9);
        assert_eq!(on_grid.unwrap(), Closure::Periodic { period: 8 });
        assert_eq!(on_cell.unwrap(), Closure::Periodic { period: 9 });
    }
}
