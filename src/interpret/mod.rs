//! Feature attribution.
//!
//! Two importance measures are provided:
//!
//! - **Permutation importance**: how much a fitted model's mean squared error
//!   grows when one feature column is scrambled while every other column and
//!   the model itself are held fixed.
//! - **Weight magnitude**: the share of a linear model's total absolute
//!   weight carried by each feature.
//!
//! Both are reported as vectors that sum to one (see [`normalize_importances`]).
//!
//! # References
//!
//! - Breiman, L. (2001). Random Forests. Machine Learning, 45(1), 5-32.

use crate::error::{Result, ValuatorError};
use crate::metrics::mse;
use crate::primitives::{Matrix, Vector};
use rand::Rng;
use tracing::warn;

/// Permutation feature importance of a fitted regressor.
///
/// # Example
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use valuator::interpret::PermutationImportance;
/// use valuator::prelude::*;
///
/// let x = Matrix::from_rows(&[
///     vec![1.0, 5.0],
///     vec![2.0, 5.0],
///     vec![3.0, 5.0],
///     vec![4.0, 5.0],
/// ]).unwrap();
/// let y = Vector::from_slice(&[2.0, 4.0, 6.0, 8.0]);
///
/// // y = 2 * x0; the second column is constant.
/// let model = |m: &Matrix<f64>| -> valuator::Result<Vector<f64>> {
///     Ok(Vector::from_vec(m.rows().map(|r| 2.0 * r[0]).collect()))
/// };
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let importance = PermutationImportance::compute(model, &x, &y, &mut rng).unwrap();
/// assert_eq!(importance.importance[1], 0.0);
/// assert_eq!(importance.ranking()[0], 0);
/// ```
#[derive(Debug, Clone)]
pub struct PermutationImportance {
    /// Increase in MSE per permuted feature
    pub importance: Vector<f64>,
    /// MSE of the unpermuted data
    pub baseline_score: f64,
}

impl PermutationImportance {
    /// Computes permutation importance.
    ///
    /// For each feature `j`, every row's value in column `j` is replaced by
    /// the column-`j` value of a uniformly drawn row (draws are independent,
    /// with replacement). The raw importance of `j` is the MSE on that
    /// scrambled copy minus the baseline MSE. Raw importances may be negative.
    ///
    /// # Arguments
    ///
    /// * `predict_fn` - Batch prediction of the fitted model
    /// * `x` - Feature matrix the model is evaluated on
    /// * `y` - Targets matching the rows of `x`
    /// * `rng` - Source of the row draws
    ///
    /// # Errors
    ///
    /// Returns an error if `x` is empty, the lengths disagree, or
    /// `predict_fn` fails.
    pub fn compute<P, R>(predict_fn: P, x: &Matrix<f64>, y: &Vector<f64>, rng: &mut R) -> Result<Self>
    where
        P: Fn(&Matrix<f64>) -> Result<Vector<f64>>,
        R: Rng + ?Sized,
    {
        let (n_samples, n_features) = x.shape();
        if n_samples == 0 {
            return Err(ValuatorError::empty("permutation importance input"));
        }
        if y.len() != n_samples {
            return Err(ValuatorError::rows(n_samples, y.len()));
        }

        let baseline_score = mse(&predict_fn(x)?, y)?;
        let mut importance = Vec::with_capacity(n_features);

        for feature in 0..n_features {
            let column = x.column(feature);
            let mut permuted = x.clone();
            for row in 0..n_samples {
                let source = rng.gen_range(0..n_samples);
                permuted.set(row, feature, column[source]);
            }
            let score = mse(&predict_fn(&permuted)?, y)?;
            importance.push(score - baseline_score);
        }

        Ok(Self {
            importance: Vector::from_vec(importance),
            baseline_score,
        })
    }

    /// Importance scores rescaled to sum to one.
    #[must_use]
    pub fn normalized(&self) -> Vec<f64> {
        normalize_importances(self.importance.as_slice())
    }

    /// Feature indices sorted by importance, highest first.
    #[must_use]
    pub fn ranking(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.importance.len()).collect();
        indices.sort_by(|&a, &b| self.importance[b].total_cmp(&self.importance[a]));
        indices
    }
}

/// Raw permutation importances of `predict_fn` on `(x, y)`.
///
/// Shorthand for [`PermutationImportance::compute`] returning only the scores.
///
/// # Errors
///
/// Same as [`PermutationImportance::compute`].
pub fn permutation_importance<P, R>(
    predict_fn: P,
    x: &Matrix<f64>,
    y: &Vector<f64>,
    rng: &mut R,
) -> Result<Vec<f64>>
where
    P: Fn(&Matrix<f64>) -> Result<Vector<f64>>,
    R: Rng + ?Sized,
{
    Ok(PermutationImportance::compute(predict_fn, x, y, rng)?
        .importance
        .into_vec())
}

/// Divides every entry by the sum of all entries.
///
/// When the entries sum to exactly zero there is nothing to apportion and a
/// uniform vector is returned instead.
#[must_use]
pub fn normalize_importances(raw: &[f64]) -> Vec<f64> {
    let total: f64 = raw.iter().sum();
    if total == 0.0 || !total.is_finite() {
        if !raw.is_empty() {
            warn!(
                n_features = raw.len(),
                total, "importances do not sum to a usable total, reporting uniform shares"
            );
        }
        let uniform = 1.0 / raw.len().max(1) as f64;
        return vec![uniform; raw.len()];
    }
    raw.iter().map(|v| v / total).collect()
}

/// `|w_j| / Σ|w|` for each weight.
#[must_use]
pub fn weight_magnitude_importance(weights: &[f64]) -> Vec<f64> {
    let magnitudes: Vec<f64> = weights.iter().map(|w| w.abs()).collect();
    normalize_importances(&magnitudes)
}
