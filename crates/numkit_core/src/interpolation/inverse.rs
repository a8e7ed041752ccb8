//! Inverse interpolation: find `x` such that the interpolant through equidistant
//! samples takes a given value.

use serde::{Deserialize, Serialize};

use crate::differences::{
    check_equidistant, forward_differences, validate_samples, DifferenceTable,
    EquidistanceSettings,
};
use crate::error::{NumericError, Result};
use crate::trace::Trace;
use crate::traits::Scalar;

use super::between;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InverseLinear<T> {
    pub x: T,
    /// Index `i` of the segment `[x_i, x_{i+1}]` used.
    pub bracket: usize,
    pub step: T,
    pub table: DifferenceTable<T>,
    pub trace: Trace,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InverseQuadratic<T> {
    pub x: T,
    /// Index of the first of the three samples used.
    pub bracket: usize,
    pub step: T,
    /// `[a, b, c]` of `a·x² + b·x + c = 0`.
    pub coefficients: [T; 3],
    pub discriminant: T,
    /// Both roots, `+` branch first.
    pub roots: [T; 2],
    pub table: DifferenceTable<T>,
    pub trace: Trace,
}

fn prepare<T: Scalar>(
    x: &[T],
    y: &[T],
    min_samples: usize,
    operation: &'static str,
) -> Result<(T, DifferenceTable<T>)> {
    validate_samples(x, y)?;
    if x.len() < min_samples {
        return Err(NumericError::invalid_size(
            operation,
            format!("needs at least {min_samples} samples, got {}", x.len()),
        ));
    }
    let h = check_equidistant(x, EquidistanceSettings::default())?;
    Ok((h, forward_differences(y)))
}

/// Linear inverse interpolation on the first segment whose ordinates bracket
/// `target`: `x = x_i + h (target - y_i) / (y_{i+1} - y_i)`.
pub fn inverse_linear<T: Scalar>(x: &[T], y: &[T], target: T) -> Result<InverseLinear<T>> {
    let (h, table) = prepare(x, y, 2, "inverse_linear")?;

    let i = (0..y.len() - 1)
        .find(|&i| between(target, y[i], y[i + 1]))
        .ok_or(NumericError::OutOfRange)?;

    let dy = y[i + 1] - y[i];
    let value = if dy == T::zero() {
        x[i]
    } else {
        x[i] + h * (target - y[i]) / dy
    };

    let mut trace = Trace::new();
    trace.scalar("h", h);
    trace.scalar("x_i", x[i]);
    trace.scalar("y_i", y[i]);
    trace.scalar("delta y_i", dy);
    trace.scalar("x", value);
    log::debug!("inverse_linear: segment {i}, x = {value:?}");

    Ok(InverseLinear {
        x: value,
        bracket: i,
        step: h,
        table,
        trace,
    })
}

/// Quadratic inverse interpolation.
///
/// Uses the forward-difference quadratic through `x_i, x_{i+1}, x_{i+2}`,
///
/// `target = y0 + (Δy0/h)(x - x0) + (Δ²y0/2h²)(x - x0)(x - x1)`,
///
/// rearranged into `a·x² + b·x + c = 0` and solved for the root inside `[x0, x2]`.
/// The window starts at the first segment `[x_i, x_{i+1}]` with `i <= n - 3`
/// whose ordinates bracket `target`; a target bracketed only by the final segment
/// is [`NumericError::OutOfRange`]. Locally linear data (`Δ²y0 == 0`) has no
/// quadratic root and fails with [`NumericError::RootOutOfRange`].
pub fn inverse_quadratic<T: Scalar>(
    x: &[T],
    y: &[T],
    target: T,
) -> Result<InverseQuadratic<T>> {
    let (h, table) = prepare(x, y, 3, "inverse_quadratic")?;
    let n = y.len();

    let i = (0..n - 2)
        .find(|&i| between(target, y[i], y[i + 1]))
        .ok_or(NumericError::OutOfRange)?;

    let (x0, x1, x2) = (x[i], x[i + 1], x[i + 2]);
    let y0 = y[i];
    let dy0 = table.get(1, i).unwrap_or_else(T::nan);
    let d2y0 = table.get(2, i).unwrap_or_else(T::nan);

    let two = T::constant(2.0);
    let a = d2y0 / (two * h * h);
    let b = dy0 / h - a * (x0 + x1);
    let c = y0 - target - (dy0 / h) * x0 + a * x0 * x1;
    if a == T::zero() {
        return Err(NumericError::RootOutOfRange { start: i });
    }

    let (discriminant, roots) = quadratic_roots(a, b, c)?;
    let slack = h.abs() * T::constant(1e-12);
    let value = select_root(roots, x0 - slack, x2 + slack).ok_or(NumericError::RootOutOfRange {
        start: i,
    })?;

    let mut trace = Trace::new();
    trace.scalar("h", h);
    trace.vector("window nodes", &[x0, x1, x2]);
    trace.scalar("delta y0", dy0);
    trace.scalar("delta^2 y0", d2y0);
    trace.vector("coefficients", &[a, b, c]);
    trace.scalar("discriminant", discriminant);
    trace.vector("roots", &roots);
    trace.scalar("x", value);
    log::debug!("inverse_quadratic: window starting at {i}, x = {value:?}");

    Ok(InverseQuadratic {
        x: value,
        bracket: i,
        step: h,
        coefficients: [a, b, c],
        discriminant,
        roots,
        table,
        trace,
    })
}

/// Real roots of `a·x² + b·x + c` for nonzero `a`, `+` branch first.
fn quadratic_roots<T: Scalar>(a: T, b: T, c: T) -> Result<(T, [T; 2])> {
    let two = T::constant(2.0);
    let four = T::constant(4.0);
    let discriminant = b * b - four * a * c;

    if discriminant < T::zero() {
        return Err(NumericError::NoRealSolution {
            discriminant: discriminant.to_f64_lossy(),
        });
    }

    let sqrt = discriminant.sqrt();
    Ok((
        discriminant,
        [(-b + sqrt) / (two * a), (-b - sqrt) / (two * a)],
    ))
}

fn select_root<T: Scalar>(roots: [T; 2], low: T, high: T) -> Option<T> {
    roots.into_iter().find(|&r| r >= low && r <= high)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_round_trips_through_the_segment() {
        let x = [1.0_f64, 2.0, 3.0, 4.0];
        let y = [2.0, 3.5, 7.0, 7.5];
        let target = 5.2;
        let result = inverse_linear(&x, &y, target).unwrap();
        assert_eq!(result.bracket, 1);

        let i = result.bracket;
        let forward = y[i] + (y[i + 1] - y[i]) * (result.x - x[i]) / result.step;
        assert!((forward - target).abs() < 1e-6);
        assert_eq!(result.table.order(0), Some(&y[..]));
    }

    #[test]
    fn linear_handles_decreasing_data() {
        let x = [0.0_f64, 0.5, 1.0];
        let y = [10.0, 6.0, 4.0];
        let result = inverse_linear(&x, &y, 5.0).unwrap();
        assert_eq!(result.bracket, 1);
        assert!((result.x - 0.75).abs() < 1e-12);
    }

    #[test]
    fn linear_reports_out_of_range_and_bad_spacing() {
        let x = [0.0_f64, 1.0, 2.0];
        let y = [0.0, 1.0, 2.0];
        assert_eq!(inverse_linear(&x, &y, 3.0).unwrap_err(), NumericError::OutOfRange);
        assert!(matches!(
            inverse_linear(&[0.0_f64, 1.0, 3.0], &y, 0.5),
            Err(NumericError::NonEquidistantSamples { .. })
        ));
        assert!(matches!(
            inverse_linear(&[0.0], &[1.0], 1.0),
            Err(NumericError::InvalidSize { .. })
        ));
    }

    #[test]
    fn quadratic_inverts_a_square() {
        let x = [1.0_f64, 2.0, 3.0, 4.0];
        let y = [1.0, 4.0, 9.0, 16.0];
        let result = inverse_quadratic(&x, &y, 6.25).unwrap();
        assert_eq!(result.bracket, 1);
        assert!((result.x - 2.5).abs() < 1e-12);
        assert!((result.discriminant - 25.0).abs() < 1e-12);
    }

    #[test]
    fn quadratic_picks_the_root_inside_the_window() {
        let x = [0.0_f64, 1.0, 2.0, 3.0];
        let y = [10.0, 6.0, 4.0, 3.0];
        let result = inverse_quadratic(&x, &y, 5.0).unwrap();
        assert_eq!(result.bracket, 1);
        assert!(result.roots[0] > 3.0, "the + root lies outside [1, 3]");
        assert!(result.x > 1.0 && result.x < 2.0);

        let (x0, x1) = (x[1], x[2]);
        let forward = y[1] + (-2.0) * (result.x - x0) + 0.5 * (result.x - x0) * (result.x - x1);
        assert!((forward - 5.0).abs() < 1e-9);
    }

    #[test]
    fn quadratic_rejects_targets_only_in_the_final_segment() {
        let x = [0.0_f64, 1.0, 2.0, 3.0];
        let y = [0.0, 1.0, 4.0, 9.0];
        assert_eq!(inverse_quadratic(&x, &y, 6.25).unwrap_err(), NumericError::OutOfRange);
        assert_eq!(inverse_quadratic(&x, &y, 10.0).unwrap_err(), NumericError::OutOfRange);

        // The same target is reachable once a later sample opens another window.
        let x = [0.0_f64, 1.0, 2.0, 3.0, 4.0];
        let y = [0.0, 1.0, 4.0, 9.0, 16.0];
        let result = inverse_quadratic(&x, &y, 6.25).unwrap();
        assert_eq!(result.bracket, 2);
        assert!((result.x - 2.5).abs() < 1e-12);
    }

    #[test]
    fn quadratic_fails_on_straight_data() {
        let x = [0.0_f64, 2.0, 4.0];
        let y = [1.0, 3.0, 5.0];
        assert_eq!(
            inverse_quadratic(&x, &y, 2.0).unwrap_err(),
            NumericError::RootOutOfRange { start: 0 }
        );
        assert!(inverse_linear(&x, &y, 2.0).is_ok());
    }

    #[test]
    fn quadratic_root_helpers_report_failures() {
        assert!(matches!(
            quadratic_roots(1.0_f64, 0.0, 1.0),
            Err(NumericError::NoRealSolution { discriminant }) if discriminant == -4.0
        ));
        let (_, roots) = quadratic_roots(1.0_f64, -3.0, 2.0).unwrap();
        assert_eq!(roots, [2.0, 1.0]);
        assert_eq!(select_root(roots, 0.0, 1.5), Some(1.0));
        assert_eq!(select_root(roots, 5.0, 6.0), None);
    }
}
