//! Structured step-by-step traces.
//!
//! Every algorithm returns its intermediate values as a [`Trace`] next to the final
//! answer. Rendering is left to the caller.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::traits::Scalar;

/// A value captured at one step of an algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum TraceValue {
    Scalar(f64),
    Vector(Vec<f64>),
    /// Row-major rows.
    Matrix(Vec<Vec<f64>>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    pub label: String,
    pub value: TraceValue,
}

/// Ordered list of labeled intermediate values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub steps: Vec<TraceStep>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scalar<T: Scalar>(&mut self, label: impl Into<String>, value: T) {
        self.push(label, TraceValue::Scalar(value.to_f64_lossy()));
    }

    pub fn vector<T: Scalar>(&mut self, label: impl Into<String>, values: &[T]) {
        let values = values.iter().map(|v| v.to_f64_lossy()).collect();
        self.push(label, TraceValue::Vector(values));
    }

    pub fn matrix(&mut self, label: impl Into<String>, matrix: &DMatrix<f64>) {
        self.push(label, TraceValue::Matrix(crate::matrix_ops::to_rows(matrix)));
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the first step carrying `label`.
    pub fn find(&self, label: &str) -> Option<&TraceValue> {
        self.steps
            .iter()
            .find(|step| step.label == label)
            .map(|step| &step.value)
    }

    fn push(&mut self, label: impl Into<String>, value: TraceValue) {
        self.steps.push(TraceStep {
            label: label.into(),
            value,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::{Trace, TraceValue};
    use nalgebra::DMatrix;

    #[test]
    fn records_steps_in_order() {
        let mut trace = Trace::new();
        trace.scalar("pivot", 2.0_f64);
        trace.vector("rhs", &[1.0_f32, 2.0]);
        trace.matrix("augmented", &DMatrix::from_row_slice(1, 2, &[3.0, 4.0]));

        assert_eq!(trace.len(), 3);
        assert_eq!(trace.steps[0].label, "pivot");
        assert_eq!(trace.find("rhs"), Some(&TraceValue::Vector(vec![1.0, 2.0])));
        assert_eq!(
            trace.find("augmented"),
            Some(&TraceValue::Matrix(vec![vec![3.0, 4.0]]))
        );
        assert!(trace.find("missing").is_none());
    }
}
