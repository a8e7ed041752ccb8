use thiserror::Error;

/// Errors raised by the numerical kernels.
///
/// Every variant is a local, recoverable condition: the kernel reports it to the
/// immediate caller and never retries or substitutes a fallback value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumericError {
    #[error("dimension mismatch in {operation}: left is {left_rows}x{left_cols}, right is {right_rows}x{right_cols}")]
    DimensionMismatch {
        operation: &'static str,
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },

    #[error("{operation} requires a square matrix, got {rows}x{cols}")]
    NotSquare {
        operation: &'static str,
        rows: usize,
        cols: usize,
    },

    #[error("invalid size for {operation}: {reason}")]
    InvalidSize {
        operation: &'static str,
        reason: String,
    },

    #[error("scalar multiplier must be a finite real number, got {0}")]
    InvalidScalar(f64),

    #[error("singular matrix: pivot in column {column} is {pivot:e} (tolerance {tolerance:e})")]
    SingularMatrix {
        column: usize,
        pivot: f64,
        tolerance: f64,
    },

    #[error("degenerate pivot at row {row}: diagonal entry {value:e} is effectively zero")]
    DegeneratePivot { row: usize, value: f64 },

    #[error("duplicate abscissa: x[{first}] and x[{second}] coincide")]
    DuplicateAbscissa { first: usize, second: usize },

    #[error("sample abscissae must be strictly increasing (violated at index {index})")]
    NotIncreasing { index: usize },

    #[error("sample abscissae are not equidistant (spacing at index {index} deviates from the first step)")]
    NonEquidistantSamples { index: usize },

    #[error("target value is outside the range of the sampled data")]
    OutOfRange,

    #[error("no root of the inverse quadratic lies within the bracket starting at index {start}")]
    RootOutOfRange { start: usize },

    #[error("no real solution: discriminant is negative ({discriminant:e})")]
    NoRealSolution { discriminant: f64 },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T> = std::result::Result<T, NumericError>;

impl NumericError {
    pub(crate) fn mismatch(
        operation: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    ) -> Self {
        NumericError::DimensionMismatch {
            operation,
            left_rows: left.0,
            left_cols: left.1,
            right_rows: right.0,
            right_cols: right.1,
        }
    }

    pub(crate) fn invalid_size(operation: &'static str, reason: impl Into<String>) -> Self {
        NumericError::InvalidSize {
            operation,
            reason: reason.into(),
        }
    }
}
