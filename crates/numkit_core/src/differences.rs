//! Forward- and divided-difference tables plus sample validation.
//!
//! Tables are stored by order: `table[0]` holds the raw ordinates and
//! `table[k]` the k-th differences, one entry shorter than `table[k - 1]`.

use serde::{Deserialize, Serialize};

use crate::error::{NumericError, Result};
use crate::traits::Scalar;

/// Default tolerance on the deviation of each step from the first one.
pub const EQUIDISTANCE_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EquidistanceSettings {
    pub tolerance: f64,
}

impl Default for EquidistanceSettings {
    fn default() -> Self {
        Self {
            tolerance: EQUIDISTANCE_TOLERANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferenceTable<T> {
    orders: Vec<Vec<T>>,
}

impl<T: Scalar> DifferenceTable<T> {
    /// Number of sample points the table was built from.
    pub fn len(&self) -> usize {
        self.orders.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Highest order stored (`len - 1`).
    pub fn max_order(&self) -> usize {
        self.orders.len().saturating_sub(1)
    }

    /// The entries of difference order `k`, if present.
    pub fn order(&self, k: usize) -> Option<&[T]> {
        self.orders.get(k).map(Vec::as_slice)
    }

    /// Entry `i` of order `k`; only `i < len - k` is meaningful.
    pub fn get(&self, k: usize, i: usize) -> Option<T> {
        self.orders.get(k).and_then(|row| row.get(i)).copied()
    }

    /// Leading entry of every order, i.e. the Newton coefficients.
    pub fn leading(&self) -> Vec<T> {
        self.orders.iter().filter_map(|row| row.first()).copied().collect()
    }

    pub fn orders(&self) -> &[Vec<T>] {
        &self.orders
    }

    pub fn to_f64_rows(&self) -> Vec<Vec<f64>> {
        self.orders
            .iter()
            .map(|row| row.iter().map(|v| v.to_f64_lossy()).collect())
            .collect()
    }
}

/// Plain forward differences, `Δ^k y_i = Δ^{k-1} y_{i+1} - Δ^{k-1} y_i`.
pub fn forward_differences<T: Scalar>(y: &[T]) -> DifferenceTable<T> {
    let mut orders = vec![y.to_vec()];
    while let Some(last) = orders.last() {
        if last.len() <= 1 {
            break;
        }
        let next: Vec<T> = last.windows(2).map(|w| w[1] - w[0]).collect();
        orders.push(next);
    }
    DifferenceTable { orders }
}

/// Newton divided differences,
/// `f[x_i..x_{i+k}] = (f[x_{i+1}..x_{i+k}] - f[x_i..x_{i+k-1}]) / (x_{i+k} - x_i)`.
pub fn divided_differences<T: Scalar>(x: &[T], y: &[T]) -> Result<DifferenceTable<T>> {
    if x.len() != y.len() {
        return Err(NumericError::mismatch(
            "divided_differences",
            (x.len(), 1),
            (y.len(), 1),
        ));
    }
    let n = x.len();
    let mut orders = vec![y.to_vec()];
    for k in 1..n {
        let prev = &orders[k - 1];
        let mut next = Vec::with_capacity(n - k);
        for i in 0..n - k {
            let span = x[i + k] - x[i];
            if span == T::zero() {
                return Err(NumericError::DuplicateAbscissa {
                    first: i,
                    second: i + k,
                });
            }
            next.push((prev[i + 1] - prev[i]) / span);
        }
        orders.push(next);
    }
    Ok(DifferenceTable { orders })
}

/// Checks equal lengths and strictly increasing abscissae.
pub fn validate_samples<T: Scalar>(x: &[T], y: &[T]) -> Result<()> {
    if x.len() != y.len() {
        return Err(NumericError::mismatch(
            "samples",
            (x.len(), 1),
            (y.len(), 1),
        ));
    }
    if let Some(i) = (1..x.len()).find(|&i| !(x[i] > x[i - 1])) {
        return Err(NumericError::NotIncreasing { index: i });
    }
    Ok(())
}

/// Returns the common step `h = x[1] - x[0]` when every step matches it within
/// the tolerance. Fewer than two points are trivially equidistant (`h = 0`).
pub fn check_equidistant<T: Scalar>(x: &[T], settings: EquidistanceSettings) -> Result<T> {
    if x.len() < 2 {
        return Ok(T::zero());
    }
    let h = x[1] - x[0];
    let tolerance = T::constant(settings.tolerance);
    for i in 1..x.len() - 1 {
        if ((x[i + 1] - x[i]) - h).abs() > tolerance {
            return Err(NumericError::NonEquidistantSamples { index: i });
        }
    }
    Ok(h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_table_keeps_ordinates_in_order_zero() {
        let y = vec![1.0, 4.0, 9.0, 16.0, 25.0];
        let table = forward_differences(&y);
        assert_eq!(table.order(0), Some(y.as_slice()));
        assert_eq!(table.order(1), Some(&[3.0, 5.0, 7.0, 9.0][..]));
        assert_eq!(table.order(2), Some(&[2.0, 2.0, 2.0][..]));
        assert_eq!(table.order(4), Some(&[0.0][..]));
        assert_eq!(table.max_order(), 4);
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn forward_table_of_single_point_has_one_order() {
        let table = forward_differences(&[7.0_f32]);
        assert_eq!(table.max_order(), 0);
        assert_eq!(table.get(0, 0), Some(7.0));
        assert_eq!(table.get(1, 0), None);
    }

    #[test]
    fn divided_table_divides_by_spacing() {
        let x = [0.0, 1.0, 3.0];
        let y = [1.0, 3.0, 13.0]; // 1 + x + x^2
        let table = divided_differences(&x, &y).unwrap();
        assert_eq!(table.order(0), Some(&y[..]));
        assert_eq!(table.order(1), Some(&[2.0, 5.0][..]));
        assert_eq!(table.leading(), vec![1.0, 2.0, 1.0]);
    }

    #[test]
    fn divided_table_reports_duplicate_nodes() {
        let err = divided_differences(&[1.0, 1.0], &[2.0, 3.0]).unwrap_err();
        assert_eq!(err, NumericError::DuplicateAbscissa { first: 0, second: 1 });
        assert!(divided_differences(&[1.0], &[2.0, 3.0]).is_err());
    }

    #[test]
    fn equidistance_within_tolerance() {
        let h = check_equidistant(&[1.0, 1.5, 2.0, 2.5000001], EquidistanceSettings::default())
            .unwrap();
        assert_eq!(h, 0.5);
        let err = check_equidistant(&[0.0, 1.0, 2.5], EquidistanceSettings::default()).unwrap_err();
        assert_eq!(err, NumericError::NonEquidistantSamples { index: 1 });
        assert_eq!(
            check_equidistant(&[3.0], EquidistanceSettings::default()).unwrap(),
            0.0
        );
    }

    #[test]
    fn samples_must_increase_strictly() {
        assert!(validate_samples(&[1.0, 2.0, 3.0], &[0.0, 0.0, 0.0]).is_ok());
        assert_eq!(
            validate_samples(&[1.0, 2.0, 2.0], &[0.0, 0.0, 0.0]).unwrap_err(),
            NumericError::NotIncreasing { index: 2 }
        );
        assert!(matches!(
            validate_samples(&[1.0], &[0.0, 1.0]),
            Err(NumericError::DimensionMismatch { .. })
        ));
    }
}
