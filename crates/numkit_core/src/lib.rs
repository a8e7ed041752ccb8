pub mod differences;
pub mod eigen;
pub mod elimination;
pub mod error;
pub mod gauss_seidel;
pub mod interpolation;
pub mod matrix_ops;
pub mod polynomial;
pub mod trace;
/// The `numkit_core` crate provides the numerical kernels behind the numkit tools.
/// Linear algebra works on dense `f64` matrices (`nalgebra::DMatrix`); the
/// interpolation and polynomial routines are generic over any `Scalar` (`f32`, `f64`).
///
/// Key components:
/// - **Matrix ops**: dimension-checked arithmetic, identity, trace and residuals.
/// - **Elimination**: Gauss-Jordan with partial pivoting, triangular reduction, rank.
/// - **Gauss-Seidel**: iterative solver with a diagonal-dominance check.
/// - **Differences / Interpolation**: difference tables, Lagrange, local quadratic Newton,
///   inverse interpolation.
/// - **Eigen**: Fadeev-Leverrier characteristic polynomial, grid root scan, pinned eigenvectors.
///
/// Every algorithm returns its result together with a [`trace::Trace`] of intermediate values.
pub mod traits;

pub use error::{NumericError, Result};
