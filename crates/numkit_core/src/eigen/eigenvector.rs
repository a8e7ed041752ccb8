use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::elimination::{reduce_upper_triangular, REDUCTION_PIVOT_TOLERANCE};
use crate::error::{NumericError, Result};
use crate::matrix_ops::{ensure_square, identity, scalar_multiply, subtract, to_rows};
use crate::trace::Trace;

/// Value the last component of every eigenvector is pinned to.
pub const PINNED_COMPONENT: f64 = -1.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EigenvectorSolution {
    pub vector: Vec<f64>,
    /// Upper-triangular form of the first `n - 1` rows of `A - λI`.
    pub reduced: Vec<Vec<f64>>,
    pub trace: Trace,
}

/// Eigenvector of `a` for the eigenvalue `lambda`, with the last component
/// fixed at `-1`.
///
/// The first `n - 1` rows of `A - λI` are reduced to upper-triangular form and
/// back-substituted for the remaining components. Fails with
/// [`NumericError::DegeneratePivot`] when a diagonal entry of the reduced rows
/// vanishes, which happens for repeated eigenvalues and for eigenvectors whose
/// last component is zero.
pub fn eigenvector(a: &DMatrix<f64>, lambda: f64) -> Result<EigenvectorSolution> {
    let n = ensure_square("eigenvector", a)?;
    if n == 0 {
        return Err(NumericError::invalid_size(
            "eigenvector",
            "matrix has zero dimension",
        ));
    }
    if !lambda.is_finite() {
        return Err(NumericError::InvalidScalar(lambda));
    }

    let shifted = subtract(a, &scalar_multiply(&identity(n)?, lambda)?)?;
    let mut trace = Trace::new();
    trace.scalar("lambda", lambda);
    trace.matrix("A - lambda I", &shifted);

    if n == 1 {
        trace.vector("v", &[PINNED_COMPONENT]);
        return Ok(EigenvectorSolution {
            vector: vec![PINNED_COMPONENT],
            reduced: Vec::new(),
            trace,
        });
    }

    let m = n - 1;
    let head = shifted.rows(0, m).into_owned();
    let reduction = reduce_upper_triangular(&head, m, REDUCTION_PIVOT_TOLERANCE)?;
    let u = &reduction.matrix;
    trace.matrix("reduced", u);

    let mut x = vec![0.0; n];
    x[m] = PINNED_COMPONENT;
    for i in (0..m).rev() {
        let diagonal = u[(i, i)];
        if diagonal.abs() < REDUCTION_PIVOT_TOLERANCE {
            return Err(NumericError::DegeneratePivot {
                row: i,
                value: diagonal,
            });
        }
        let sum: f64 = (i + 1..n).map(|j| u[(i, j)] * x[j]).sum();
        x[i] = -sum / diagonal;
    }

    trace.vector("v", &x);
    log::debug!("eigenvector: lambda = {lambda}, v = {x:?}");

    Ok(EigenvectorSolution {
        vector: x,
        reduced: to_rows(u),
        trace,
    })
}
