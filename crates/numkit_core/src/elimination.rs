//! Row reduction with partial pivoting.
//!
//! One elimination core serves two modes: a Gauss-Jordan full solve that turns
//! `A` into the identity while carrying the right-hand side along, and a
//! triangular reduction used before back-substitution (see
//! [`crate::eigen::eigenvector`]).

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::{NumericError, Result};
use crate::matrix_ops::{ensure_square, to_rows};
use crate::trace::Trace;

/// Pivot magnitude below which Gauss-Jordan declares the system singular.
pub const GAUSS_JORDAN_PIVOT_TOLERANCE: f64 = 1e-14;

/// Pivot magnitude below which triangular reduction skips a column.
pub const REDUCTION_PIVOT_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EliminationSettings {
    pub pivot_tolerance: f64,
}

impl Default for EliminationSettings {
    fn default() -> Self {
        Self {
            pivot_tolerance: GAUSS_JORDAN_PIVOT_TOLERANCE,
        }
    }
}

impl EliminationSettings {
    fn validate(&self) -> Result<()> {
        if !self.pivot_tolerance.is_finite() || self.pivot_tolerance < 0.0 {
            return Err(NumericError::InvalidSettings(format!(
                "pivot_tolerance must be finite and non-negative, got {}",
                self.pivot_tolerance
            )));
        }
        Ok(())
    }
}

/// A row interchange performed while pivoting on `column`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSwap {
    pub column: usize,
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaussJordanSolution {
    pub solution: Vec<f64>,
    /// The coefficient matrix after reduction (identity up to rounding).
    pub reduced: Vec<Vec<f64>>,
    pub swaps: Vec<RowSwap>,
    pub trace: Trace,
}

#[derive(Debug, Clone)]
pub struct TriangularReduction {
    pub matrix: DMatrix<f64>,
    pub swaps: Vec<RowSwap>,
    /// Columns whose best pivot fell below tolerance and were left unreduced.
    pub skipped_columns: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct EchelonForm {
    pub matrix: DMatrix<f64>,
    pub pivot_columns: Vec<usize>,
}

impl EchelonForm {
    pub fn rank(&self) -> usize {
        self.pivot_columns.len()
    }
}

/// Index and magnitude of the largest |entry| in `column` among rows
/// `start_row..`. Ties keep the lowest row index.
fn select_pivot(m: &DMatrix<f64>, column: usize, start_row: usize) -> (usize, f64) {
    let mut best_row = start_row;
    let mut best_abs = m[(start_row, column)].abs();
    for row in start_row + 1..m.nrows() {
        let value = m[(row, column)].abs();
        if value > best_abs {
            best_abs = value;
            best_row = row;
        }
    }
    (best_row, best_abs)
}

/// Solves `A·x = b` by Gauss-Jordan elimination with the default pivot tolerance.
pub fn solve(a: &DMatrix<f64>, b: &[f64]) -> Result<Vec<f64>> {
    gauss_jordan(a, b, EliminationSettings::default()).map(|result| result.solution)
}

/// Gauss-Jordan elimination with partial pivoting.
///
/// Works on private copies of `a` and `b`. Each column is pivoted on the row with
/// the largest magnitude, the pivot row is normalized, and the column is cleared
/// from every other row, so the right-hand side ends up holding the solution.
pub fn gauss_jordan(
    a: &DMatrix<f64>,
    b: &[f64],
    settings: EliminationSettings,
) -> Result<GaussJordanSolution> {
    settings.validate()?;
    let n = ensure_square("gauss_jordan", a)?;
    if n == 0 {
        return Err(NumericError::invalid_size(
            "gauss_jordan",
            "system has zero dimension",
        ));
    }
    if b.len() != n {
        return Err(NumericError::mismatch("gauss_jordan", (n, n), (b.len(), 1)));
    }

    let mut m = a.clone();
    let mut rhs = b.to_vec();
    let mut swaps = Vec::new();
    let mut trace = Trace::new();
    trace.matrix("initial matrix", &m);
    trace.vector("initial rhs", &rhs);

    log::debug!("gauss_jordan: solving {n}x{n} system");

    for col in 0..n {
        let (pivot_row, pivot_abs) = select_pivot(&m, col, col);
        if pivot_abs < settings.pivot_tolerance {
            return Err(NumericError::SingularMatrix {
                column: col,
                pivot: m[(pivot_row, col)],
                tolerance: settings.pivot_tolerance,
            });
        }

        if pivot_row != col {
            m.swap_rows(col, pivot_row);
            rhs.swap(col, pivot_row);
            swaps.push(RowSwap {
                column: col,
                from: pivot_row,
                to: col,
            });
            log::trace!("gauss_jordan: column {col}: swapped rows {col} and {pivot_row}");
        }

        let pivot = m[(col, col)];
        trace.scalar(format!("column {col} pivot"), pivot);
        for j in 0..n {
            m[(col, j)] /= pivot;
        }
        rhs[col] /= pivot;

        for r in 0..n {
            if r == col {
                continue;
            }
            let factor = m[(r, col)];
            for j in 0..n {
                m[(r, j)] -= factor * m[(col, j)];
            }
            rhs[r] -= factor * rhs[col];
        }

        trace.matrix(format!("column {col} reduced matrix"), &m);
        trace.vector(format!("column {col} reduced rhs"), &rhs);
    }

    trace.vector("solution", &rhs);
    log::debug!("gauss_jordan: done after {} row swaps", swaps.len());

    Ok(GaussJordanSolution {
        solution: rhs,
        reduced: to_rows(&m),
        swaps,
        trace,
    })
}

/// Reduces the first `pivot_columns` columns of `m` to upper-triangular form.
///
/// Rows are interchanged by partial pivoting and only the rows below each pivot
/// are eliminated. A column whose best pivot is below `tolerance` is skipped and
/// reported in [`TriangularReduction::skipped_columns`].
pub fn reduce_upper_triangular(
    m: &DMatrix<f64>,
    pivot_columns: usize,
    tolerance: f64,
) -> Result<TriangularReduction> {
    if pivot_columns > m.ncols() {
        return Err(NumericError::invalid_size(
            "reduce_upper_triangular",
            format!(
                "cannot pivot on {pivot_columns} columns of a matrix with {}",
                m.ncols()
            ),
        ));
    }

    let mut work = m.clone();
    let rows = work.nrows();
    let cols = work.ncols();
    let mut swaps = Vec::new();
    let mut skipped_columns = Vec::new();

    for k in 0..pivot_columns.min(rows) {
        let (pivot_row, pivot_abs) = select_pivot(&work, k, k);
        if pivot_row != k {
            work.swap_rows(k, pivot_row);
            swaps.push(RowSwap {
                column: k,
                from: pivot_row,
                to: k,
            });
        }

        if pivot_abs < tolerance {
            log::trace!("reduce_upper_triangular: column {k} has no usable pivot");
            skipped_columns.push(k);
            continue;
        }

        let pivot = work[(k, k)];
        for i in k + 1..rows {
            let factor = work[(i, k)] / pivot;
            for j in k..cols {
                work[(i, j)] -= factor * work[(k, j)];
            }
        }
    }

    Ok(TriangularReduction {
        matrix: work,
        swaps,
        skipped_columns,
    })
}

/// Reduced row-echelon form.
///
/// Pivots on the first entry at or below the current row whose magnitude is at
/// least `tolerance`; columns without one are passed over.
pub fn reduced_row_echelon(m: &DMatrix<f64>, tolerance: f64) -> EchelonForm {
    let mut work = m.clone();
    let rows = work.nrows();
    let cols = work.ncols();
    let mut pivot_columns = Vec::new();
    let mut row = 0;

    for col in 0..cols {
        if row >= rows {
            break;
        }
        let Some(sel) = (row..rows).find(|&r| work[(r, col)].abs() >= tolerance) else {
            continue;
        };
        work.swap_rows(row, sel);

        let pivot = work[(row, col)];
        for j in col..cols {
            work[(row, j)] /= pivot;
        }
        for i in 0..rows {
            if i == row {
                continue;
            }
            let factor = work[(i, col)];
            if factor.abs() > tolerance {
                for j in col..cols {
                    work[(i, j)] -= factor * work[(row, j)];
                }
            }
        }

        pivot_columns.push(col);
        row += 1;
    }

    EchelonForm {
        matrix: work,
        pivot_columns,
    }
}

/// Numerical rank via [`reduced_row_echelon`].
pub fn rank(m: &DMatrix<f64>) -> usize {
    reduced_row_echelon(m, REDUCTION_PIVOT_TOLERANCE).rank()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix_ops::{max_abs, residual};

    fn production_system() -> (DMatrix<f64>, Vec<f64>) {
        let a = DMatrix::from_row_slice(3, 3, &[4.3, 3.0, 2.0, 1.0, 3.0, 1.0, 2.0, 1.0, 3.0]);
        (a, vec![960.0, 510.0, 610.0])
    }

    #[test]
    fn gauss_jordan_solves_production_system() {
        let (a, b) = production_system();
        let result = gauss_jordan(&a, &b, EliminationSettings::default()).expect("solvable");

        let r = residual(&a, &result.solution, &b).unwrap();
        assert!(max_abs(&r) < 1e-6, "residual too large: {r:?}");
        assert!((result.solution[0] - 106.542056).abs() < 1e-5);
        assert!((result.solution[1] - 101.682243).abs() < 1e-5);
        assert!((result.solution[2] - 98.411215).abs() < 1e-5);
    }

    #[test]
    fn gauss_jordan_leaves_inputs_untouched_and_reduces_to_identity() {
        let (a, b) = production_system();
        let a_before = a.clone();
        let b_before = b.clone();
        let result = gauss_jordan(&a, &b, EliminationSettings::default()).unwrap();

        assert_eq!(a, a_before);
        assert_eq!(b, b_before);
        for (i, row) in result.reduced.iter().enumerate() {
            for (j, v) in row.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((v - expected).abs() < 1e-12);
            }
        }
        assert!(result.trace.find("solution").is_some());
    }

    #[test]
    fn gauss_jordan_pivots_on_largest_entry() {
        let a = DMatrix::from_row_slice(2, 2, &[1e-3, 1.0, 2.0, 1.0]);
        let result = gauss_jordan(&a, &[1.0, 3.0], EliminationSettings::default()).unwrap();
        assert_eq!(
            result.swaps,
            vec![RowSwap {
                column: 0,
                from: 1,
                to: 0
            }]
        );
        let r = residual(&a, &result.solution, &[1.0, 3.0]).unwrap();
        assert!(max_abs(&r) < 1e-12);
    }

    #[test]
    fn pivot_ties_keep_the_upper_row() {
        let a = DMatrix::from_row_slice(2, 2, &[-2.0, 1.0, 2.0, 3.0]);
        let result = gauss_jordan(&a, &[0.0, 8.0], EliminationSettings::default()).unwrap();
        assert!(result.swaps.is_empty());
        assert!((result.solution[0] - 1.0).abs() < 1e-12);
        assert!((result.solution[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn gauss_jordan_reports_singular_matrix() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let err = gauss_jordan(&a, &[1.0, 2.0], EliminationSettings::default())
            .expect_err("singular");
        assert!(matches!(err, NumericError::SingularMatrix { column: 1, .. }));
    }

    #[test]
    fn gauss_jordan_validates_shapes_and_settings() {
        let rect = DMatrix::from_element(2, 3, 1.0);
        assert!(matches!(
            solve(&rect, &[1.0, 2.0]),
            Err(NumericError::NotSquare { .. })
        ));
        let (a, _) = production_system();
        assert!(matches!(
            solve(&a, &[1.0]),
            Err(NumericError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            solve(&DMatrix::zeros(0, 0), &[]),
            Err(NumericError::InvalidSize { .. })
        ));
        let bad = EliminationSettings {
            pivot_tolerance: -1.0,
        };
        assert!(matches!(
            gauss_jordan(&a, &[1.0, 2.0, 3.0], bad),
            Err(NumericError::InvalidSettings(_))
        ));
    }

    #[test]
    fn triangular_reduction_zeroes_below_diagonal() {
        let m = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let reduced = reduce_upper_triangular(&m, 2, REDUCTION_PIVOT_TOLERANCE).unwrap();
        assert_eq!(reduced.swaps.len(), 1);
        assert_eq!(reduced.matrix[(0, 0)], 4.0);
        assert!(reduced.matrix[(1, 0)].abs() < 1e-15);
        assert!(reduced.skipped_columns.is_empty());
        assert_eq!(m[(0, 0)], 1.0);
    }

    #[test]
    fn triangular_reduction_skips_zero_columns() {
        let m = DMatrix::from_row_slice(2, 3, &[0.0, 1.0, 2.0, 0.0, 3.0, 4.0]);
        let reduced = reduce_upper_triangular(&m, 2, REDUCTION_PIVOT_TOLERANCE).unwrap();
        assert_eq!(reduced.skipped_columns, vec![0]);
        assert!(reduce_upper_triangular(&m, 4, REDUCTION_PIVOT_TOLERANCE).is_err());
    }

    #[test]
    fn row_echelon_reports_rank() {
        let full = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        assert_eq!(rank(&full), 2);

        let deficient =
            DMatrix::from_row_slice(3, 3, &[1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 1.0, 0.0, 1.0]);
        let form = reduced_row_echelon(&deficient, REDUCTION_PIVOT_TOLERANCE);
        assert_eq!(form.pivot_columns, vec![0, 1]);
        assert_eq!(form.rank(), 2);
        assert!((form.matrix[(0, 0)] - 1.0).abs() < 1e-12);
        assert!(form.matrix.row(2).iter().all(|v| v.abs() < 1e-12));
    }
}
