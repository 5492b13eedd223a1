//! Linear models for regression.
//!
//! [`LinearRegressionModel`] fits `y = X w + b` by full-batch gradient descent
//! on z-score standardized features, for a fixed number of epochs.

use crate::error::{Result, ValuatorError};
use crate::interpret::weight_magnitude_importance;
use crate::preprocessing::{FeatureScaling, NormalizationMode};
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Linear regression trained by batch gradient descent.
///
/// Each epoch computes predictions over the whole standardized training
/// set and takes one step along the mean-squared-error gradient:
///
/// ```text
/// grad_j = mean_i((pred_i - y_i) * x_ij)
/// grad_b = mean_i(pred_i - y_i)
/// w_j   -= lr * grad_j
/// b     -= lr * grad_b
/// ```
///
/// There is no stopping criterion; every epoch runs.
///
/// # Examples
///
/// ```
/// use valuator::linear_model::LinearRegressionModel;
/// use valuator::prelude::*;
///
/// // y = 2x + 1
/// let x = Matrix::from_rows(&[vec![1.0], vec![2.0], vec![3.0], vec![4.0]]).unwrap();
/// let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
///
/// let mut model = LinearRegressionModel::new().with_learning_rate(0.1);
/// model.fit(&x, &y).unwrap();
///
/// let r2 = model.score(&x, &y).unwrap();
/// assert!(r2 > 0.99);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegressionModel {
    /// Coefficients for the standardized features.
    weights: Option<Vector<f64>>,
    /// Intercept (bias) term.
    bias: f64,
    learning_rate: f64,
    epochs: usize,
    /// Training MSE measured at the start of each epoch.
    loss_history: Vec<f64>,
    scaling: FeatureScaling,
}

impl Default for LinearRegressionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegressionModel {
    /// Creates a model with `learning_rate = 0.01` and `epochs = 1000`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            weights: None,
            bias: 0.0,
            learning_rate: 0.01,
            epochs: 1000,
            loss_history: Vec::new(),
            scaling: FeatureScaling::default(),
        }
    }

    /// Sets the gradient descent step size.
    #[must_use]
    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    /// Sets the number of epochs.
    #[must_use]
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Sets how prediction batches are standardized.
    #[must_use]
    pub fn with_normalization(mut self, mode: NormalizationMode) -> Self {
        self.scaling = FeatureScaling::new(mode);
        self
    }

    /// Returns the learned weights (in standardized feature space).
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted.
    pub fn weights(&self) -> Result<&Vector<f64>> {
        self.weights.as_ref().ok_or(ValuatorError::NotFitted {
            model: "LinearRegressionModel",
        })
    }

    /// Returns the bias term.
    #[must_use]
    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Per-epoch training MSE of the last fit.
    #[must_use]
    pub fn loss_history(&self) -> &[f64] {
        &self.loss_history
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.weights.is_some()
    }

    /// Share of the total absolute weight carried by each feature.
    ///
    /// Returns `|w_j| / Σ|w|`; a uniform vector when every weight is zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted.
    pub fn feature_importance(&self) -> Result<Vec<f64>> {
        Ok(weight_magnitude_importance(self.weights()?.as_slice()))
    }
}

impl Estimator for LinearRegressionModel {
    /// Fits the model with batch gradient descent.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or non-finite, `x` and `y`
    /// disagree in length, or the learning rate is not positive.
    fn fit(&mut self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<()> {
        let (n_samples, n_features) = x.shape();

        if n_samples == 0 {
            return Err(ValuatorError::empty("regression training set"));
        }
        if n_samples != y.len() {
            return Err(ValuatorError::rows(n_samples, y.len()));
        }
        if !y.is_finite() {
            return Err(ValuatorError::NonFinite {
                context: "regression targets".to_string(),
            });
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(ValuatorError::hyperparameter(
                "learning_rate",
                self.learning_rate,
                "a positive finite number",
            ));
        }

        let x_scaled = self.scaling.fit_transform(x)?;
        let n = n_samples as f64;
        let mut weights = Vector::zeros(n_features);
        self.bias = 0.0;
        self.loss_history = Vec::with_capacity(self.epochs);

        for _ in 0..self.epochs {
            let residuals: Vec<f64> = x_scaled
                .matvec(&weights)?
                .iter()
                .zip(y.iter())
                .map(|(p, target)| p + self.bias - target)
                .collect();

            let mut gradient = vec![0.0; n_features];
            for (row, r) in x_scaled.rows().zip(&residuals) {
                for (g, xj) in gradient.iter_mut().zip(row) {
                    *g += r * xj;
                }
            }

            for (j, g) in gradient.iter().enumerate() {
                weights[j] -= self.learning_rate * g / n;
            }
            self.bias -= self.learning_rate * residuals.iter().sum::<f64>() / n;
            self.loss_history
                .push(residuals.iter().map(|r| r * r).sum::<f64>() / n);
        }

        debug!(
            n_samples,
            n_features,
            epochs = self.epochs,
            final_loss = self.loss_history.last().copied(),
            "fitted linear regression"
        );

        self.weights = Some(weights);
        Ok(())
    }

    /// Predicts `x · w + b` per row after standardizing `x`.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or `x` has the wrong width.
    fn predict(&self, x: &Matrix<f64>) -> Result<Vector<f64>> {
        let weights = self.weights()?;
        if x.n_cols() != weights.len() {
            return Err(ValuatorError::columns(weights.len(), x.n_cols()));
        }

        let x_scaled = self.scaling.transform(x)?;
        let scores = x_scaled.matvec(weights)?;
        Ok(Vector::from_vec(
            scores.iter().map(|z| z + self.bias).collect(),
        ))
    }
}

#[cfg(test)]
mod tests;
