//! Classification metrics.

use crate::error::{Result, ValuatorError};

/// Compute classification accuracy.
///
/// accuracy = `correct_predictions` / `total_predictions`
///
/// # Examples
///
/// ```
/// use valuator::metrics::classification::accuracy;
///
/// let y_true = vec![1, 1, 0, 1, 0];
/// let y_pred = vec![1, 0, 0, 1, 0];
/// assert!((accuracy(&y_pred, &y_true).unwrap() - 0.8).abs() < 1e-12);
/// ```
///
/// # Errors
///
/// Returns an error if the slices are empty or have different lengths.
pub fn accuracy(y_pred: &[usize], y_true: &[usize]) -> Result<f64> {
    if y_true.is_empty() {
        return Err(ValuatorError::empty("accuracy labels"));
    }
    if y_pred.len() != y_true.len() {
        return Err(ValuatorError::rows(y_true.len(), y_pred.len()));
    }

    let correct = y_pred
        .iter()
        .zip(y_true.iter())
        .filter(|(p, t)| p == t)
        .count();

    Ok(correct as f64 / y_true.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_all_correct() {
        let y = vec![0, 1, 1, 0];
        assert!((accuracy(&y, &y).expect("ok") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_accuracy_none_correct() {
        assert_eq!(accuracy(&[1, 0], &[0, 1]).expect("ok"), 0.0);
    }

    #[test]
    fn test_accuracy_errors() {
        assert!(accuracy(&[], &[]).is_err());
        assert!(accuracy(&[1], &[1, 0]).is_err());
    }
}
