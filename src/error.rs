//! Error taxonomy shared by construction and evaluation.
//!
//! Construction errors always name the offending axis. Evaluation errors are
//! local to a single call; nothing is retried, since every failure here is
//! deterministic.
use thiserror::Error;

/// Convenience alias for results in this crate.
pub type Result<T> = core::result::Result<T, InterpError>;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[non_exhaustive]
pub enum InterpError {
    /// The requested polynomial degree has no implemented basis.
    #[error("axis {axis}: degree {degree} has no implemented basis (max 3)")]
    UnsupportedDegree { axis: usize, degree: usize },

    /// A boundary condition does not fit the degree, or an extrapolation
    /// policy does not fit the boundary condition the axis was built with.
    #[error("axis {axis}: {reason}")]
    Configuration { axis: usize, reason: &'static str },

    /// Too few samples along an axis to close the prefiltering system.
    #[error("axis {axis}: {len} samples cannot support a degree {degree} spline")]
    SingularSystem {
        axis: usize,
        len: usize,
        degree: usize,
    },

    /// Evaluation outside the domain with no extrapolation, or with the
    /// `Error` extrapolation policy.
    #[error("axis {axis}: coordinate {coordinate} outside of [{lo}, {hi}]")]
    OutOfDomain {
        axis: usize,
        coordinate: f64,
        lo: f64,
        hi: f64,
    },

    /// Buffer lengths do not match the grid or each other.
    #[error("expected {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
}

impl InterpError {
    /// Attribute an axis-level error to axis `axis` of a larger grid.
    pub(crate) fn on_axis(self, axis: usize) -> Self {
        match self {
            Self::UnsupportedDegree { degree, .. } => Self::UnsupportedDegree { axis, degree },
            Self::Configuration { reason, .. } => Self::Configuration { axis, reason },
            Self::SingularSystem { len, degree, .. } => Self::SingularSystem { axis, len, degree },
            Self::OutOfDomain {
                coordinate, lo, hi, ..
            } => Self::OutOfDomain {
                axis,
                coordinate,
                lo,
                hi,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod test {
    use super::InterpError;
    use alloc::string::ToString;

    #[test]
    fn test_messages_name_the_axis() {
        let err = InterpError::SingularSystem {
            axis: 2,
            len: 2,
            degree: 2,
        };
        assert_eq!(
            err.to_string(),
            "axis 2: 2 samples cannot support a degree 2 spline"
        );

        let err = InterpError::OutOfDomain {
            axis: 0,
            coordinate: -1.0,
            lo: 1.0,
            hi: 10.0,
        };
        assert_eq!(err.to_string(), "axis 0: coordinate -1 outside of [1, 10]");
    }
}
