use serde::{Deserialize, Serialize};

use crate::error::{NumericError, Result};
use crate::trace::Trace;
use crate::traits::Scalar;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LagrangeResult<T> {
    pub value: T,
    /// `L_i(x_eval)` for every node.
    pub basis: Vec<T>,
    /// `L_i(x_eval) * y_i` for every node.
    pub terms: Vec<T>,
    pub trace: Trace,
}

/// Evaluates the Lagrange polynomial through all samples at `x_eval`.
///
/// Nodes need not be sorted but must be distinct. Evaluation outside
/// `[min(x), max(x)]` is allowed; accuracy degrades with the distance.
pub fn lagrange<T: Scalar>(x: &[T], y: &[T], x_eval: T) -> Result<LagrangeResult<T>> {
    if x.len() != y.len() {
        return Err(NumericError::mismatch("lagrange", (x.len(), 1), (y.len(), 1)));
    }
    if x.is_empty() {
        return Err(NumericError::invalid_size(
            "lagrange",
            "at least one sample is required",
        ));
    }
    for i in 0..x.len() {
        for j in i + 1..x.len() {
            if x[i] == x[j] {
                return Err(NumericError::DuplicateAbscissa {
                    first: i,
                    second: j,
                });
            }
        }
    }

    let mut trace = Trace::new();
    let mut basis = Vec::with_capacity(x.len());
    let mut terms = Vec::with_capacity(x.len());
    let mut value = T::zero();

    for i in 0..x.len() {
        let l_i = (0..x.len())
            .filter(|&j| j != i)
            .fold(T::one(), |acc, j| acc * (x_eval - x[j]) / (x[i] - x[j]));
        let term = l_i * y[i];
        trace.scalar(format!("L_{i}"), l_i);
        trace.scalar(format!("term {i}"), term);
        basis.push(l_i);
        terms.push(term);
        value = value + term;
    }

    trace.scalar("P(x)", value);
    log::debug!("lagrange: {} nodes, P({:?}) = {:?}", x.len(), x_eval, value);

    Ok(LagrangeResult {
        value,
        basis,
        terms,
        trace,
    })
}
