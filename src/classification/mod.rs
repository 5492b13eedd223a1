//! Binary classification.
//!
//! [`LinearUnitClassifier`] is a single linear threshold unit trained with the
//! delta rule: one stochastic update per training row, repeated for a fixed
//! number of epochs. It is sometimes labelled "SVM" in the application, but
//! it optimizes no margin.
//!
//! # Example
//!
//! ```
//! use valuator::classification::LinearUnitClassifier;
//! use valuator::prelude::*;
//!
//! let x = Matrix::from_rows(&[
//!     vec![0.0, 0.0],
//!     vec![0.0, 1.0],
//!     vec![1.0, 0.0],
//!     vec![1.0, 1.0],
//! ]).unwrap();
//! let y = vec![0, 0, 0, 1];
//!
//! let mut model = LinearUnitClassifier::new()
//!     .with_learning_rate(0.1)
//!     .with_epochs(500);
//! model.fit(&x, &y).unwrap();
//!
//! for pred in model.predict(&x).unwrap() {
//!     assert!(pred == 0 || pred == 1);
//! }
//! ```

use crate::error::{Result, ValuatorError};
use crate::metrics::accuracy;
use crate::preprocessing::{FeatureScaling, NormalizationMode};
use crate::primitives::{Matrix, Vector};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Logistic function `1 / (1 + e^-z)`.
///
/// Evaluated in two branches so that large |z| saturates to 0.0 or 1.0
/// instead of overflowing `exp`.
#[must_use]
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Single-layer linear unit trained by delta-rule updates.
///
/// For every epoch and every row `i` (in order):
///
/// ```text
/// error = y_i - sigmoid(w·x_i + b)
/// w_j  += lr * error * x_ij
/// b    += lr * error
/// ```
///
/// Inputs are z-score standardized before training; see
/// [`NormalizationMode`] for how prediction batches are standardized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearUnitClassifier {
    /// Model weights, one per feature
    weights: Option<Vector<f64>>,
    /// Bias term
    bias: f64,
    /// Step size of each delta-rule update
    learning_rate: f64,
    /// Number of passes over the training rows
    epochs: usize,
    scaling: FeatureScaling,
}

impl Default for LinearUnitClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearUnitClassifier {
    /// Creates a classifier with `learning_rate = 0.01` and `epochs = 100`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            weights: None,
            bias: 0.0,
            learning_rate: 0.01,
            epochs: 100,
            scaling: FeatureScaling::default(),
        }
    }

    /// Sets the learning rate.
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

    /// Returns the learned weights.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted.
    pub fn weights(&self) -> Result<&Vector<f64>> {
        self.weights.as_ref().ok_or(ValuatorError::NotFitted {
            model: "LinearUnitClassifier",
        })
    }

    /// Returns the bias term.
    #[must_use]
    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.weights.is_some()
    }

    /// Fits the classifier.
    ///
    /// # Arguments
    ///
    /// * `x` - Feature matrix (`n_samples` × `n_features`)
    /// * `y` - Binary labels (`n_samples`), must be 0 or 1
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, `x` and `y` disagree in
    /// length, a label is not 0/1, or a hyperparameter is out of range.
    pub fn fit(&mut self, x: &Matrix<f64>, y: &[usize]) -> Result<()> {
        let (n_samples, n_features) = x.shape();

        if n_samples == 0 {
            return Err(ValuatorError::empty("classifier training set"));
        }
        if n_samples != y.len() {
            return Err(ValuatorError::rows(n_samples, y.len()));
        }
        if let Some((row, &label)) = y.iter().enumerate().find(|&(_, &l)| l > 1) {
            return Err(ValuatorError::InvalidLabel { row, label });
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(ValuatorError::hyperparameter(
                "learning_rate",
                self.learning_rate,
                "a positive finite number",
            ));
        }

        let x_scaled = self.scaling.fit_transform(x)?;
        let mut weights = Vector::zeros(n_features);
        let mut bias = 0.0;

        for _ in 0..self.epochs {
            for (i, &label) in y.iter().enumerate() {
                let row = x_scaled.row(i);
                let error = label as f64 - sigmoid(weights.dot(&row) + bias);
                for (j, &xj) in row.iter().enumerate() {
                    weights[j] += self.learning_rate * error * xj;
                }
                bias += self.learning_rate * error;
            }
        }

        debug!(
            n_samples,
            n_features,
            epochs = self.epochs,
            bias,
            "fitted linear unit classifier"
        );

        self.weights = Some(weights);
        self.bias = bias;
        Ok(())
    }

    /// Predicts `P(y = 1)` for each row.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or `x` has the wrong width.
    pub fn predict_proba(&self, x: &Matrix<f64>) -> Result<Vector<f64>> {
        let weights = self.weights()?;
        if x.n_cols() != weights.len() {
            return Err(ValuatorError::columns(weights.len(), x.n_cols()));
        }

        let x_scaled = self.scaling.transform(x)?;
        let probas = x_scaled
            .matvec(weights)?
            .iter()
            .map(|z| sigmoid(z + self.bias))
            .collect();

        Ok(Vector::from_vec(probas))
    }

    /// Predicts a label per row: 1 when `P(y = 1) >= 0.5`, else 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or `x` has the wrong width.
    pub fn predict(&self, x: &Matrix<f64>) -> Result<Vec<usize>> {
        let probas = self.predict_proba(x)?;
        Ok(probas.iter().map(|&p| usize::from(p >= 0.5)).collect())
    }

    /// Fraction of rows whose predicted label matches `y`.
    ///
    /// # Errors
    ///
    /// Returns an error if prediction fails or the lengths disagree.
    pub fn score(&self, x: &Matrix<f64>, y: &[usize]) -> Result<f64> {
        accuracy(&self.predict(x)?, y)
    }
}
