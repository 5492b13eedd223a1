//! Evaluation metrics.
//!
//! Regression metrics (R², MSE, MAE) score the two regressors, [`inertia`]
//! scores a clustering, and [`classification::accuracy`] scores the linear
//! classifier.

pub mod classification;

pub use classification::accuracy;

use crate::error::{Result, ValuatorError};
use crate::primitives::{Matrix, Vector};

fn check_pair(y_pred: &Vector<f64>, y_true: &Vector<f64>) -> Result<()> {
    if y_true.is_empty() {
        return Err(ValuatorError::empty("metric targets"));
    }
    if y_pred.len() != y_true.len() {
        return Err(ValuatorError::rows(y_true.len(), y_pred.len()));
    }
    Ok(())
}

/// Computes the coefficient of determination (R²).
///
/// R² = 1 - (`SS_res` / `SS_tot`); returns 0.0 when `y_true` is constant.
///
/// # Examples
///
/// ```
/// use valuator::metrics::r_squared;
/// use valuator::primitives::Vector;
///
/// let y_true = Vector::from_slice(&[3.0, -0.5, 2.0, 7.0]);
/// let y_pred = Vector::from_slice(&[2.5, 0.0, 2.0, 8.0]);
/// let r2 = r_squared(&y_pred, &y_true).unwrap();
/// assert!(r2 > 0.9);
/// ```
///
/// # Errors
///
/// Returns an error if the vectors are empty or have different lengths.
pub fn r_squared(y_pred: &Vector<f64>, y_true: &Vector<f64>) -> Result<f64> {
    check_pair(y_pred, y_true)?;

    let y_mean = y_true.mean();
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - y_mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return Ok(0.0);
    }

    Ok(1.0 - ss_res / ss_tot)
}

/// Computes the Mean Squared Error (MSE).
///
/// # Examples
///
/// ```
/// use valuator::metrics::mse;
/// use valuator::primitives::Vector;
///
/// let y_true = Vector::from_slice(&[3.0, -0.5, 2.0, 7.0]);
/// let y_pred = Vector::from_slice(&[2.5, 0.0, 2.0, 8.0]);
/// assert!((mse(&y_pred, &y_true).unwrap() - 0.375).abs() < 1e-12);
/// ```
///
/// # Errors
///
/// Returns an error if the vectors are empty or have different lengths.
pub fn mse(y_pred: &Vector<f64>, y_true: &Vector<f64>) -> Result<f64> {
    check_pair(y_pred, y_true)?;

    let sum_sq_error: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();

    Ok(sum_sq_error / y_true.len() as f64)
}

/// Computes the Mean Absolute Error (MAE).
///
/// # Errors
///
/// Returns an error if the vectors are empty or have different lengths.
pub fn mae(y_pred: &Vector<f64>, y_true: &Vector<f64>) -> Result<f64> {
    check_pair(y_pred, y_true)?;

    let sum_abs_error: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).abs())
        .sum();

    Ok(sum_abs_error / y_true.len() as f64)
}

/// Computes the inertia (within-cluster sum of squared distances).
///
/// # Errors
///
/// Returns an error if `labels` doesn't have one entry per row of `data`,
/// a label has no centroid, or the widths differ.
pub fn inertia(data: &Matrix<f64>, centroids: &Matrix<f64>, labels: &[usize]) -> Result<f64> {
    if labels.len() != data.n_rows() {
        return Err(ValuatorError::rows(data.n_rows(), labels.len()));
    }
    if data.n_cols() != centroids.n_cols() {
        return Err(ValuatorError::columns(centroids.n_cols(), data.n_cols()));
    }

    let mut total = 0.0;
    for (point, &label) in data.rows().zip(labels) {
        if label >= centroids.n_rows() {
            return Err(ValuatorError::DimensionMismatch {
                expected: format!("label < {}", centroids.n_rows()),
                actual: format!("label {label}"),
            });
        }
        total += point
            .iter()
            .zip(centroids.row_slice(label))
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>();
    }

    Ok(total)
}

#[cfg(test)]
#[path = "tests_regression_contract.rs"]
mod tests_regression_contract;
