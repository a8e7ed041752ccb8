use serde::{Deserialize, Serialize};

use crate::traits::Scalar;

/// Polynomial `a0·x^N + a1·x^(N-1) + ... + aN`, coefficients highest degree first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polynomial<T> {
    coefficients: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deflation<T> {
    pub quotient: Polynomial<T>,
    pub remainder: T,
}

impl<T: Scalar> Polynomial<T> {
    pub fn new(coefficients: Vec<T>) -> Self {
        Self { coefficients }
    }

    /// Characteristic polynomial `λ^n - b1·λ^(n-1) - ... - bn` from the
    /// Fadeev-Leverrier coefficients `b1..bn`.
    pub fn from_leverrier(b: &[T]) -> Self {
        let mut coefficients = Vec::with_capacity(b.len() + 1);
        coefficients.push(T::one());
        coefficients.extend(b.iter().map(|&bk| -bk));
        Self { coefficients }
    }

    pub fn coefficients(&self) -> &[T] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Horner evaluation; the empty polynomial evaluates to zero.
    pub fn evaluate(&self, x: T) -> T {
        self.coefficients
            .iter()
            .fold(T::zero(), |acc, &c| acc * x + c)
    }

    pub fn derivative(&self) -> Self {
        let n = self.degree();
        if n == 0 {
            return Self::new(vec![T::zero()]);
        }
        let coefficients = self.coefficients[..n]
            .iter()
            .enumerate()
            .map(|(i, &c)| c * T::constant((n - i) as f64))
            .collect();
        Self { coefficients }
    }

    /// Synthetic division by `(x - root)`.
    pub fn deflate(&self, root: T) -> Deflation<T> {
        let mut quotient = Vec::with_capacity(self.coefficients.len());
        let mut carry = T::zero();
        for &c in &self.coefficients {
            carry = c + carry * root;
            quotient.push(carry);
        }
        let remainder = quotient.pop().unwrap_or_else(T::zero);
        Deflation {
            quotient: Self::new(quotient),
            remainder,
        }
    }
}
