//! Gauss-Seidel fixed-point iteration.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::{NumericError, Result};
use crate::matrix_ops::ensure_square;
use crate::trace::Trace;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GaussSeidelSettings {
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for GaussSeidelSettings {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 100,
        }
    }
}

impl GaussSeidelSettings {
    fn validate(&self) -> Result<()> {
        if self.tolerance.is_nan() || self.tolerance <= 0.0 {
            return Err(NumericError::InvalidSettings(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(NumericError::InvalidSettings(
                "max_iterations must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RowDominance {
    pub diagonal: f64,
    pub off_diagonal_sum: f64,
    /// `|a_ii| >= Σ_{j≠i} |a_ij|`
    pub dominant: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagonalDominance {
    pub rows: Vec<RowDominance>,
    /// Every row satisfies `|a_ii| >= Σ_{j≠i} |a_ij|`.
    pub is_dominant: bool,
    /// Every row satisfies `|a_ii| > Σ_{j≠i} |a_ij|`.
    pub is_strictly_dominant: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaussSeidelResult {
    pub solution: Vec<f64>,
    pub iterations: usize,
    pub converged: bool,
    /// `max_i |x_i - x_prev_i|` of the last sweep.
    pub final_error: f64,
    pub trace: Trace,
}

/// Reports diagonal dominance row by row. The solver does not enforce it.
pub fn check_diagonal_dominance(a: &DMatrix<f64>) -> Result<DiagonalDominance> {
    let n = ensure_square("check_diagonal_dominance", a)?;
    let rows: Vec<RowDominance> = (0..n)
        .map(|i| {
            let diagonal = a[(i, i)].abs();
            let off_diagonal_sum = (0..n)
                .filter(|&j| j != i)
                .map(|j| a[(i, j)].abs())
                .sum::<f64>();
            RowDominance {
                diagonal,
                off_diagonal_sum,
                dominant: diagonal >= off_diagonal_sum,
            }
        })
        .collect();

    let is_dominant = rows.iter().all(|r| r.dominant);
    let is_strictly_dominant = rows.iter().all(|r| r.diagonal > r.off_diagonal_sum);
    Ok(DiagonalDominance {
        rows,
        is_dominant,
        is_strictly_dominant,
    })
}

/// `max_i |x_i - prev_i|`, or NaN if any component is NaN.
fn max_change(x: &[f64], prev: &[f64]) -> f64 {
    let mut largest = 0.0_f64;
    for (xi, pi) in x.iter().zip(prev) {
        let diff = (xi - pi).abs();
        if diff.is_nan() {
            return f64::NAN;
        }
        largest = largest.max(diff);
    }
    largest
}

/// Solves `A·x = b` by Gauss-Seidel sweeps starting from `x0`.
///
/// Each sweep updates `x` in place, so later rows see the values computed earlier
/// in the same sweep. Exhausting `max_iterations` is not an error: the last
/// iterate is returned with `converged == false`.
///
/// The diagonal of `a` must be nonzero.
pub fn gauss_seidel(
    a: &DMatrix<f64>,
    b: &[f64],
    x0: &[f64],
    settings: GaussSeidelSettings,
) -> Result<GaussSeidelResult> {
    settings.validate()?;
    let n = ensure_square("gauss_seidel", a)?;
    if n == 0 {
        return Err(NumericError::invalid_size(
            "gauss_seidel",
            "system has zero dimension",
        ));
    }
    if b.len() != n {
        return Err(NumericError::mismatch("gauss_seidel", (n, n), (b.len(), 1)));
    }
    if x0.len() != n {
        return Err(NumericError::mismatch("gauss_seidel", (n, n), (x0.len(), 1)));
    }

    if !check_diagonal_dominance(a)?.is_dominant {
        log::warn!(
            "gauss_seidel: matrix is not diagonally dominant, convergence is not guaranteed"
        );
    }

    let mut x = x0.to_vec();
    let mut trace = Trace::new();
    let mut error = f64::INFINITY;

    for iter in 1..=settings.max_iterations {
        let prev = x.clone();

        for i in 0..n {
            let sum: f64 = (0..n)
                .filter(|&j| j != i)
                .map(|j| a[(i, j)] * x[j])
                .sum();
            x[i] = (b[i] - sum) / a[(i, i)];
        }

        error = max_change(&x, &prev);

        trace.vector(format!("iteration {iter}"), &x);
        trace.scalar(format!("iteration {iter} error"), error);
        log::trace!("gauss_seidel: iteration {iter}: x = {x:?}, error = {error:e}");

        if error < settings.tolerance {
            log::debug!("gauss_seidel: converged after {iter} iterations");
            return Ok(GaussSeidelResult {
                solution: x,
                iterations: iter,
                converged: true,
                final_error: error,
                trace,
            });
        }
    }

    log::warn!(
        "gauss_seidel: no convergence within {} iterations (last error {error:e})",
        settings.max_iterations
    );
    Ok(GaussSeidelResult {
        solution: x,
        iterations: settings.max_iterations,
        converged: false,
        final_error: error,
        trace,
    })
}
