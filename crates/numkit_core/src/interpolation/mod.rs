//! Polynomial interpolation over sampled data.
//!
//! - [`lagrange`]: full-basis Lagrange polynomial through every sample.
//! - [`newton`]: local quadratic Newton interpolant over a 3-point window, with a
//!   truncation-error estimate.
//! - [`inverse`]: linear and quadratic inverse interpolation (solve for `x` given `y`)
//!   on equidistant samples.

pub mod inverse;
pub mod lagrange;
pub mod newton;

pub use inverse::{inverse_linear, inverse_quadratic, InverseLinear, InverseQuadratic};
pub use lagrange::{lagrange, LagrangeResult};
pub use newton::{
    estimate_quadratic_error, newton_forward, select_window, NewtonQuadratic, TruncationEstimate,
};

use serde::{Deserialize, Serialize};

use crate::traits::Scalar;

/// Absolute and relative error of an estimate against a known reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorMetrics<T> {
    /// `estimate - reference`
    pub absolute: T,
    /// `|absolute / reference|`. Zero for an exact estimate, infinite when only
    /// the reference is zero.
    pub relative: T,
}

impl<T: Scalar> ErrorMetrics<T> {
    pub fn against(estimate: T, reference: T) -> Self {
        let absolute = estimate - reference;
        let relative = if absolute == T::zero() {
            T::zero()
        } else if reference == T::zero() {
            T::infinity()
        } else {
            (absolute / reference).abs()
        };
        Self { absolute, relative }
    }
}

/// `true` when `value` lies between `a` and `b` inclusive, in either order.
pub(crate) fn between<T: Scalar>(value: T, a: T, b: T) -> bool {
    (a >= value && value >= b) || (a <= value && value <= b)
}

#[cfg(test)]
mod tests {
    use super::{between, ErrorMetrics};

    #[test]
    fn error_metrics_match_census_comparison() {
        let metrics = ErrorMetrics::against(191_767.36_f64, 189_703.0);
        assert!((metrics.absolute - 2_064.36).abs() < 1e-6);
        assert!((metrics.relative - 0.010882).abs() < 1e-5);
    }

    #[test]
    fn error_metrics_against_a_zero_reference() {
        let exact = ErrorMetrics::against(0.0_f64, 0.0);
        assert_eq!(exact.absolute, 0.0);
        assert_eq!(exact.relative, 0.0);

        let off = ErrorMetrics::against(-0.5_f64, 0.0);
        assert_eq!(off.absolute, -0.5);
        assert!(off.relative.is_infinite() && off.relative > 0.0);
    }

    #[test]
    fn between_accepts_either_orientation() {
        assert!(between(2.0, 1.0, 3.0));
        assert!(between(2.0, 3.0, 1.0));
        assert!(between(1.0, 1.0, 3.0));
        assert!(!between(4.0, 1.0, 3.0));
    }
}
