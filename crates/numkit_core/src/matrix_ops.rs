//! Dense matrix and vector primitives.
//!
//! Thin, shape-checked wrappers over `nalgebra::DMatrix<f64>`. Every operation
//! returns a new value and leaves its operands untouched.

use nalgebra::{DMatrix, DVector};

use crate::error::{NumericError, Result};

fn shape(m: &DMatrix<f64>) -> (usize, usize) {
    (m.nrows(), m.ncols())
}

pub(crate) fn ensure_square(operation: &'static str, m: &DMatrix<f64>) -> Result<usize> {
    if m.nrows() != m.ncols() {
        return Err(NumericError::NotSquare {
            operation,
            rows: m.nrows(),
            cols: m.ncols(),
        });
    }
    Ok(m.nrows())
}

/// Builds a matrix from row vectors. All rows must have the same length.
pub fn matrix_from_rows(rows: &[Vec<f64>]) -> Result<DMatrix<f64>> {
    let nrows = rows.len();
    let ncols = rows.first().map_or(0, |r| r.len());
    if let Some(bad) = rows.iter().find(|r| r.len() != ncols) {
        return Err(NumericError::mismatch(
            "matrix_from_rows",
            (nrows, ncols),
            (1, bad.len()),
        ));
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Ok(DMatrix::from_row_slice(nrows, ncols, &flat))
}

/// Row-major copy of the matrix entries.
pub fn to_rows(m: &DMatrix<f64>) -> Vec<Vec<f64>> {
    m.row_iter()
        .map(|row| row.iter().copied().collect())
        .collect()
}

pub fn add(a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    if shape(a) != shape(b) {
        return Err(NumericError::mismatch("add", shape(a), shape(b)));
    }
    Ok(a + b)
}

pub fn subtract(a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    if shape(a) != shape(b) {
        return Err(NumericError::mismatch("subtract", shape(a), shape(b)));
    }
    Ok(a - b)
}

/// Standard matrix product; requires `a.ncols() == b.nrows()`.
pub fn multiply(a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    if a.ncols() != b.nrows() {
        return Err(NumericError::mismatch("multiply", shape(a), shape(b)));
    }
    Ok(a * b)
}

pub fn scalar_multiply(a: &DMatrix<f64>, k: f64) -> Result<DMatrix<f64>> {
    if !k.is_finite() {
        return Err(NumericError::InvalidScalar(k));
    }
    Ok(a.scale(k))
}

/// Sum of the diagonal entries of a square matrix.
pub fn trace(a: &DMatrix<f64>) -> Result<f64> {
    ensure_square("trace", a)?;
    Ok(a.diagonal().iter().sum())
}

pub fn identity(n: usize) -> Result<DMatrix<f64>> {
    if n == 0 {
        return Err(NumericError::invalid_size(
            "identity",
            "dimension must be positive",
        ));
    }
    Ok(DMatrix::identity(n, n))
}

pub fn mat_vec_mul(a: &DMatrix<f64>, v: &[f64]) -> Result<Vec<f64>> {
    if a.ncols() != v.len() {
        return Err(NumericError::mismatch("mat_vec_mul", shape(a), (v.len(), 1)));
    }
    let product = a * DVector::from_column_slice(v);
    Ok(product.iter().copied().collect())
}

/// Computes `A·x − b`.
pub fn residual(a: &DMatrix<f64>, x: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    let ax = mat_vec_mul(a, x)?;
    if ax.len() != b.len() {
        return Err(NumericError::mismatch("residual", (ax.len(), 1), (b.len(), 1)));
    }
    Ok(ax.iter().zip(b).map(|(lhs, rhs)| lhs - rhs).collect())
}

/// Largest absolute entry; zero for an empty slice.
pub fn max_abs(v: &[f64]) -> f64 {
    v.iter().fold(0.0, |acc: f64, x| acc.max(x.abs()))
}
