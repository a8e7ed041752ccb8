//! Local quadratic Newton interpolation ("parabolic progressive").

use serde::{Deserialize, Serialize};

use crate::differences::{divided_differences, validate_samples, DifferenceTable};
use crate::error::{NumericError, Result};
use crate::trace::Trace;
use crate::traits::Scalar;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewtonQuadratic<T> {
    /// Indices of the three samples used.
    pub window: [usize; 3],
    pub nodes: [T; 3],
    pub values: [T; 3],
    /// `f[x0]`
    pub f0: T,
    /// `f[x0, x1]`
    pub f01: T,
    /// `f[x0, x1, x2]`, reused by truncation-error estimates.
    pub f012: T,
    pub table: DifferenceTable<T>,
    pub x_eval: T,
    pub value: T,
    pub trace: Trace,
}

impl<T: Scalar> NewtonQuadratic<T> {
    /// Evaluates the same quadratic at another point.
    pub fn evaluate(&self, x: T) -> T {
        let [x0, x1, _] = self.nodes;
        self.f0 + self.f01 * (x - x0) + self.f012 * (x - x0) * (x - x1)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TruncationEstimate<T> {
    /// First index of the four samples used for the third divided difference.
    pub start: usize,
    pub third_divided_difference: T,
    /// `(x - x0)(x - x1)(x - x2)` over the quadratic's window.
    pub node_product: T,
    pub estimate: T,
}

/// Picks the three consecutive samples used for `x_eval`.
///
/// Takes the first interval `[x[i], x[i+1]]` containing `x_eval` and returns
/// `[i, i+1, i+2]`, or `[i-1, i, i+1]` when `i+2` runs past the end. Points
/// outside every interval use the last three samples.
pub fn select_window<T: Scalar>(x: &[T], x_eval: T) -> Result<[usize; 3]> {
    let n = x.len();
    if n < 3 {
        return Err(NumericError::invalid_size(
            "select_window",
            format!("quadratic interpolation needs at least 3 samples, got {n}"),
        ));
    }
    for i in 0..n - 1 {
        if x[i] <= x_eval && x_eval <= x[i + 1] {
            return Ok(if i + 2 < n {
                [i, i + 1, i + 2]
            } else {
                [i - 1, i, i + 1]
            });
        }
    }
    Ok([n - 3, n - 2, n - 1])
}

/// Quadratic Newton interpolant over the window chosen by [`select_window`].
pub fn newton_forward<T: Scalar>(x: &[T], y: &[T], x_eval: T) -> Result<NewtonQuadratic<T>> {
    validate_samples(x, y)?;
    let window = select_window(x, x_eval)?;
    let nodes = window.map(|i| x[i]);
    let values = window.map(|i| y[i]);

    let table = divided_differences(&nodes, &values)?;
    let leading = table.leading();
    let (f0, f01, f012) = (leading[0], leading[1], leading[2]);

    let [x0, x1, _] = nodes;
    let term0 = f0;
    let term1 = f01 * (x_eval - x0);
    let term2 = f012 * (x_eval - x0) * (x_eval - x1);
    let value = term0 + term1 + term2;

    let mut trace = Trace::new();
    trace.vector("window nodes", &nodes);
    trace.vector("window values", &values);
    trace.vector("coefficients", &leading);
    trace.scalar("term 0", term0);
    trace.scalar("term 1", term1);
    trace.scalar("term 2", term2);
    trace.scalar("P(x)", value);

    log::debug!("newton_forward: window {window:?}, P({x_eval:?}) = {value:?}");

    Ok(NewtonQuadratic {
        window,
        nodes,
        values,
        f0,
        f01,
        f012,
        table,
        x_eval,
        value,
        trace,
    })
}

/// Estimates the truncation error of a quadratic fitted on `window`.
///
/// The third divided difference over four consecutive samples (starting at the
/// window, or at `n - 4` near the end) approximates `f'''/3!`; multiplying by the
/// node product gives the leading error term.
pub fn estimate_quadratic_error<T: Scalar>(
    x: &[T],
    y: &[T],
    x_eval: T,
    window: [usize; 3],
) -> Result<TruncationEstimate<T>> {
    validate_samples(x, y)?;
    let n = x.len();
    if n < 4 {
        return Err(NumericError::invalid_size(
            "estimate_quadratic_error",
            format!("the third divided difference needs 4 samples, got {n}"),
        ));
    }
    if window[2] >= n {
        return Err(NumericError::invalid_size(
            "estimate_quadratic_error",
            format!("window {window:?} exceeds {n} samples"),
        ));
    }

    let mut start = window[0];
    if start + 3 >= n {
        start = n - 4;
    }
    let table = divided_differences(&x[start..start + 4], &y[start..start + 4])?;
    let third = table.get(3, 0).unwrap_or_else(T::nan);

    let node_product = window
        .iter()
        .fold(T::one(), |acc, &i| acc * (x_eval - x[i]));

    Ok(TruncationEstimate {
        start,
        third_divided_difference: third,
        node_product,
        estimate: third * node_product,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPERATURE: [f64; 5] = [102.0, 245.0, 327.0, 423.0, 565.0];
    const DENSITY: [f64; 5] = [0.564642, 0.644218, 0.717356, 0.783327, 0.853329];

    #[test]
    fn density_at_275_uses_interior_window() {
        let result = newton_forward(&TEMPERATURE, &DENSITY, 275.0).unwrap();
        assert_eq!(result.window, [1, 2, 3]);
        assert_eq!(result.nodes, [245.0, 327.0, 423.0]);
        assert!((result.value - 0.672770058).abs() < 1e-8);
        assert!((result.f012 + 1.15016243e-6).abs() < 1e-12);
        assert_eq!(result.table.order(0), Some(&result.values[..]));
    }

    #[test]
    fn error_estimate_for_density_example() {
        let result = newton_forward(&TEMPERATURE, &DENSITY, 275.0).unwrap();
        let estimate =
            estimate_quadratic_error(&TEMPERATURE, &DENSITY, 275.0, result.window).unwrap();
        assert_eq!(estimate.start, 1);
        assert_eq!(estimate.node_product, 230_880.0);
        assert!((estimate.estimate - 2.41043e-4).abs() < 1e-8);
    }

    #[test]
    fn error_estimate_shifts_back_near_the_end() {
        let estimate =
            estimate_quadratic_error(&TEMPERATURE, &DENSITY, 500.0, [2, 3, 4]).unwrap();
        assert_eq!(estimate.start, 1);
        assert!(
            estimate_quadratic_error(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0], 0.5, [0, 1, 2]).is_err()
        );
    }

    #[test]
    fn window_selection_at_the_edges() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        assert_eq!(select_window(&x, 0.0).unwrap(), [0, 1, 2]);
        assert_eq!(select_window(&x, 2.5).unwrap(), [2, 3, 4]);
        // Last interval: no room for i+2, fall back one index.
        assert_eq!(select_window(&x, 3.5).unwrap(), [2, 3, 4]);
        // Exactly on an interior node: the earlier interval wins.
        assert_eq!(select_window(&x, 1.0).unwrap(), [0, 1, 2]);
        // Outside every interval, on either side: last three points.
        assert_eq!(select_window(&x, 10.0).unwrap(), [2, 3, 4]);
        assert_eq!(select_window(&x, -1.0).unwrap(), [2, 3, 4]);
        assert!(select_window(&[0.0, 1.0], 0.5).is_err());
    }

    #[test]
    fn three_samples_always_use_the_whole_set() {
        let x = [0.0, 1.0, 2.0];
        for probe in [0.0, 0.5, 1.5, 2.0, 7.0] {
            assert_eq!(select_window(&x, probe).unwrap(), [0, 1, 2]);
        }
    }

    #[test]
    fn exact_for_quadratic_data() {
        let x = [0.0, 1.0, 2.0, 4.0, 7.0];
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v * v - v + 3.0).collect();
        let result = newton_forward(&x, &y, 3.0).unwrap();
        assert!((result.value - 18.0).abs() < 1e-12);
        assert!((result.f012 - 2.0).abs() < 1e-12);
        assert!((result.evaluate(5.0) - 48.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_unsorted_samples() {
        let err = newton_forward(&[0.0, 2.0, 1.0], &[0.0, 1.0, 2.0], 0.5).unwrap_err();
        assert_eq!(err, NumericError::NotIncreasing { index: 2 });
    }
}
