//! Real eigenvalues and eigenvectors of small dense matrices.
//!
//! The pipeline is Fadeev-Leverrier for the characteristic polynomial, a
//! fixed-grid scan for its real roots (optionally sharpened by bisection), and
//! a pinned-component back-substitution for each eigenvector.

pub mod eigenvector;
pub mod leverrier;
pub mod roots;

pub use eigenvector::{eigenvector, EigenvectorSolution, PINNED_COMPONENT};
pub use leverrier::{fadeev_leverrier, CharacteristicPolynomial};
pub use roots::{
    refine_roots, scan_roots, BisectionSettings, Detection, RootScan, RootScanSettings,
    ScannedRoot,
};

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EigenPair {
    pub lambda: f64,
    pub vector: Vec<f64>,
}

/// An eigenvalue whose eigenvector could not be recovered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnresolvedEigenvalue {
    pub lambda: f64,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EigenAnalysis {
    pub characteristic: CharacteristicPolynomial,
    pub scan: RootScan<f64>,
    /// Eigenvalues passed to the eigenvector solver, refined when requested.
    pub eigenvalues: Vec<f64>,
    pub pairs: Vec<EigenPair>,
    pub unresolved: Vec<UnresolvedEigenvalue>,
}

/// Runs the full eigen pipeline on `a`.
///
/// Structural failures (non-square input, invalid settings) abort the run. An
/// eigenvector failure for a single eigenvalue is recorded in
/// [`EigenAnalysis::unresolved`] and the remaining eigenvalues are still
/// processed.
pub fn eigen_analysis(
    a: &DMatrix<f64>,
    scan_settings: RootScanSettings,
    refinement: Option<BisectionSettings>,
) -> Result<EigenAnalysis> {
    let characteristic = fadeev_leverrier(a)?;
    let scan = scan_roots(&characteristic.polynomial, scan_settings)?;
    let eigenvalues = match refinement {
        Some(settings) => refine_roots(&characteristic.polynomial, &scan, settings)?,
        None => scan.values(),
    };

    let mut pairs = Vec::with_capacity(eigenvalues.len());
    let mut unresolved = Vec::new();
    for &lambda in &eigenvalues {
        match eigenvector(a, lambda) {
            Ok(solution) => pairs.push(EigenPair {
                lambda,
                vector: solution.vector,
            }),
            Err(err) => {
                log::warn!("eigen_analysis: no eigenvector for lambda = {lambda}: {err}");
                unresolved.push(UnresolvedEigenvalue {
                    lambda,
                    reason: err.to_string(),
                });
            }
        }
    }

    log::info!(
        "eigen_analysis: {} eigenvalue(s), {} eigenvector(s)",
        eigenvalues.len(),
        pairs.len()
    );

    Ok(EigenAnalysis {
        characteristic,
        scan,
        eigenvalues,
        pairs,
        unresolved,
    })
}
