use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::{NumericError, Result};
use crate::matrix_ops::{ensure_square, identity, multiply, scalar_multiply, subtract, trace};
use crate::polynomial::Polynomial;
use crate::trace::Trace;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacteristicPolynomial {
    /// `b1..bn` of `λ^n - b1·λ^(n-1) - ... - bn`.
    pub b: Vec<f64>,
    /// `[1, -b1, ..., -bn]`, highest degree first.
    pub polynomial: Polynomial<f64>,
    pub trace: Trace,
}

/// Characteristic polynomial of a square matrix by the Fadeev-Leverrier recurrence.
///
/// `B1 = A`, `b1 = tr(B1)`, then for `k = 2..n`: `Bk = A·(B(k-1) - b(k-1)·I)`,
/// `bk = tr(Bk) / k`. No stabilization is attempted; rounding error grows with
/// `n` and with the conditioning of `A`.
pub fn fadeev_leverrier(a: &DMatrix<f64>) -> Result<CharacteristicPolynomial> {
    let n = ensure_square("fadeev_leverrier", a)?;
    if n == 0 {
        return Err(NumericError::invalid_size(
            "fadeev_leverrier",
            "matrix has zero dimension",
        ));
    }

    let eye = identity(n)?;
    let mut steps = Trace::new();
    let mut b = Vec::with_capacity(n);

    let mut current = a.clone();
    b.push(trace(&current)?);
    steps.matrix("B1", &current);
    steps.scalar("b1", b[0]);

    for k in 2..=n {
        let shift = scalar_multiply(&eye, b[k - 2])?;
        current = multiply(a, &subtract(&current, &shift)?)?;
        let bk = trace(&current)? / k as f64;
        steps.matrix(format!("B{k}"), &current);
        steps.scalar(format!("b{k}"), bk);
        b.push(bk);
    }

    let polynomial = Polynomial::from_leverrier(&b);
    steps.vector("coefficients", polynomial.coefficients());
    log::debug!("fadeev_leverrier: n = {n}, b = {b:?}");

    Ok(CharacteristicPolynomial {
        b,
        polynomial,
        trace: steps,
    })
}
