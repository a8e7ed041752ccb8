use serde::{Deserialize, Serialize};

use crate::error::{NumericError, Result};
use crate::polynomial::Polynomial;
use crate::traits::Scalar;

/// Largest number of grid steps a scan may take.
pub const MAX_SCAN_STEPS: f64 = 1e8;

/// Settings for the fixed-grid root scan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RootScanSettings {
    pub lower: f64,
    pub upper: f64,
    pub step: f64,
    /// `|p(x)|` below this counts as a root.
    pub tolerance: f64,
}

impl Default for RootScanSettings {
    fn default() -> Self {
        Self {
            lower: -200.0,
            upper: 200.0,
            step: 0.1,
            tolerance: 1e-6,
        }
    }
}

impl RootScanSettings {
    pub fn validate(&self) -> Result<()> {
        if !self.lower.is_finite() || !self.upper.is_finite() || self.lower >= self.upper {
            return Err(NumericError::InvalidSettings(format!(
                "scan interval [{}, {}] must be finite and non-empty",
                self.lower, self.upper
            )));
        }
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(NumericError::InvalidSettings(format!(
                "scan step must be positive, got {}",
                self.step
            )));
        }
        let steps = (self.upper - self.lower) / self.step;
        if !steps.is_finite() || steps > MAX_SCAN_STEPS {
            return Err(NumericError::InvalidSettings(format!(
                "scan step {} over [{}, {}] exceeds {MAX_SCAN_STEPS:e} grid points",
                self.step, self.lower, self.upper
            )));
        }
        if self.tolerance.is_nan() || self.tolerance < 0.0 {
            return Err(NumericError::InvalidSettings(format!(
                "scan tolerance must be non-negative, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }

    /// Number of steps after the starting sample.
    pub fn steps(&self) -> usize {
        ((self.upper - self.lower) / self.step + 1e-9).floor() as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Detection {
    /// `|p(x)|` fell below the tolerance at a grid point.
    NearZero,
    /// `p` changed sign between two consecutive grid points.
    SignChange,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScannedRoot<T> {
    /// Grid point rounded to six decimals.
    pub value: T,
    /// The previous and current grid points.
    pub bracket: (T, T),
    pub detection: Detection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootScan<T> {
    pub roots: Vec<ScannedRoot<T>>,
    pub evaluations: usize,
}

impl<T: Scalar> RootScan<T> {
    pub fn values(&self) -> Vec<T> {
        self.roots.iter().map(|r| r.value).collect()
    }
}

fn round_to_micro<T: Scalar>(x: T) -> T {
    let scale = T::constant(1e6);
    (x * scale).round() / scale
}

/// Finds real roots of `p` by stepping across `[lower, upper]`.
///
/// At each grid point `x` (after the first) a root is recorded when `|p(x)|` is
/// below the tolerance or `p` changes sign against the previous grid point. The
/// recorded value is `x` itself, rounded to six decimals, so precision is
/// bounded by the step. A candidate within one step of an already recorded
/// root is dropped. Roots outside the interval are never found and complex roots
/// are silently absent.
pub fn scan_roots<T: Scalar>(
    p: &Polynomial<T>,
    settings: RootScanSettings,
) -> Result<RootScan<T>> {
    settings.validate()?;

    let lower = T::constant(settings.lower);
    let step = T::constant(settings.step);
    let tolerance = T::constant(settings.tolerance);
    let steps = settings.steps();

    let mut roots: Vec<ScannedRoot<T>> = Vec::new();
    let mut prev_x = lower;
    let mut prev_p = p.evaluate(prev_x);

    for k in 1..=steps {
        let x = lower + T::constant(k as f64) * step;
        let px = p.evaluate(x);

        let detection = if px.abs() < tolerance {
            Some(Detection::NearZero)
        } else if prev_p * px < T::zero() {
            Some(Detection::SignChange)
        } else {
            None
        };

        if let Some(detection) = detection {
            let value = round_to_micro(x);
            if roots.iter().all(|r| (r.value - value).abs() >= step) {
                log::trace!("scan_roots: {detection:?} at x = {value:?}");
                roots.push(ScannedRoot {
                    value,
                    bracket: (prev_x, x),
                    detection,
                });
            }
        }

        prev_x = x;
        prev_p = px;
    }

    log::debug!(
        "scan_roots: {} root(s) over [{}, {}] with step {}",
        roots.len(),
        settings.lower,
        settings.upper,
        settings.step
    );

    Ok(RootScan {
        roots,
        evaluations: steps + 1,
    })
}

/// Settings for bisection refinement of scanned roots.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct BisectionSettings {
    /// Stop once the bracket is narrower than this.
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for BisectionSettings {
    fn default() -> Self {
        Self {
            tolerance: 1e-12,
            max_iterations: 100,
        }
    }
}

impl BisectionSettings {
    pub fn validate(&self) -> Result<()> {
        if self.tolerance.is_nan() || self.tolerance <= 0.0 {
            return Err(NumericError::InvalidSettings(format!(
                "bisection tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(NumericError::InvalidSettings(
                "bisection needs at least one iteration".to_string(),
            ));
        }
        Ok(())
    }
}

/// Sharpens scanned roots by bisection on their brackets.
///
/// Sign-change roots are bisected until the bracket is below the tolerance.
/// Near-zero roots whose bracket carries no sign change keep the unrounded
/// grid point.
pub fn refine_roots<T: Scalar>(
    p: &Polynomial<T>,
    scan: &RootScan<T>,
    settings: BisectionSettings,
) -> Result<Vec<T>> {
    settings.validate()?;
    let tolerance = T::constant(settings.tolerance);
    let half = T::constant(0.5);

    let refined = scan
        .roots
        .iter()
        .map(|root| {
            let (mut lo, mut hi) = root.bracket;
            let mut p_lo = p.evaluate(lo);
            let p_hi = p.evaluate(hi);
            if p_hi == T::zero() || p_lo * p_hi > T::zero() {
                return hi;
            }
            if p_lo == T::zero() {
                return lo;
            }
            let mut iterations = 0;
            while (hi - lo).abs() > tolerance && iterations < settings.max_iterations {
                let mid = (lo + hi) * half;
                let p_mid = p.evaluate(mid);
                if p_mid == T::zero() {
                    return mid;
                }
                if p_lo * p_mid < T::zero() {
                    hi = mid;
                } else {
                    lo = mid;
                    p_lo = p_mid;
                }
                iterations += 1;
            }
            if iterations == settings.max_iterations {
                log::warn!(
                    "refine_roots: bracket around {:?} still {:?} wide after {} iterations",
                    root.value,
                    hi - lo,
                    iterations
                );
            }
            (lo + hi) * half
        })
        .collect();

    Ok(refined)
}
