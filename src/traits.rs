//! Core traits for models and transformers.
//!
//! These traits define the fit/predict contracts shared by the regressors,
//! the clusterer and the normalizer.

use crate::error::Result;
use crate::primitives::{Matrix, Vector};

/// Primary trait for supervised regression estimators.
///
/// # Examples
///
/// ```
/// use valuator::prelude::*;
///
/// let x = Matrix::from_rows(&[vec![1.0], vec![2.0], vec![3.0], vec![4.0]]).unwrap();
/// let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
///
/// let mut tree = RegressionTree::new();
/// tree.fit(&x, &y).unwrap();
/// let predictions = tree.predict(&x).unwrap();
/// assert_eq!(predictions.len(), 4);
/// ```
pub trait Estimator {
    /// Fits the model to training data.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, the shapes disagree, or a
    /// hyperparameter is out of range.
    fn fit(&mut self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<()>;

    /// Predicts target values for input data.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or `x` has the wrong width.
    fn predict(&self, x: &Matrix<f64>) -> Result<Vector<f64>>;

    /// Computes the R² score on `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns an error if prediction fails or the lengths disagree.
    fn score(&self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<f64> {
        let predictions = self.predict(x)?;
        crate::metrics::r_squared(&predictions, y)
    }
}

/// Trait for unsupervised models.
///
/// # Examples
///
/// ```
/// use valuator::prelude::*;
///
/// let data = Matrix::from_rows(&[
///     vec![0.0, 0.0], vec![0.1, 0.1], vec![0.2, 0.0],
///     vec![10.0, 10.0], vec![10.1, 10.1], vec![10.0, 10.2],
/// ]).unwrap();
///
/// let mut kmeans = KMeansClusterer::new(2).with_random_state(42);
/// kmeans.fit(&data).unwrap();
/// let labels = kmeans.predict(&data).unwrap();
/// assert_eq!(labels.len(), 6);
/// ```
pub trait UnsupervisedEstimator {
    /// The type of labels produced.
    type Labels;

    /// Fits the model to data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails (empty data, invalid parameters, etc.).
    fn fit(&mut self, x: &Matrix<f64>) -> Result<()>;

    /// Predicts cluster assignments.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or `x` has the wrong width.
    fn predict(&self, x: &Matrix<f64>) -> Result<Self::Labels>;
}

/// Trait for data transformers.
pub trait Transformer {
    /// Fits the transformer to data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit(&mut self, x: &Matrix<f64>) -> Result<()>;

    /// Transforms data using fitted parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the transformer is not fitted.
    fn transform(&self, x: &Matrix<f64>) -> Result<Matrix<f64>>;

    /// Fits and transforms in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit_transform(&mut self, x: &Matrix<f64>) -> Result<Matrix<f64>> {
        self.fit(x)?;
        self.transform(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValuatorError;

    // Scales by the mean of all values; exercises the trait defaults.
    struct MeanScaler {
        scale: Option<f64>,
    }

    impl Transformer for MeanScaler {
        fn fit(&mut self, x: &Matrix<f64>) -> Result<()> {
            if x.is_empty() {
                return Err(ValuatorError::empty("MeanScaler input"));
            }
            let mean = x.as_slice().iter().sum::<f64>() / x.as_slice().len() as f64;
            self.scale = Some(if mean == 0.0 { 1.0 } else { mean });
            Ok(())
        }

        fn transform(&self, x: &Matrix<f64>) -> Result<Matrix<f64>> {
            let scale = self.scale.ok_or(ValuatorError::NotFitted {
                model: "MeanScaler",
            })?;
            let data = x.as_slice().iter().map(|v| v / scale).collect();
            Matrix::from_vec(x.n_rows(), x.n_cols(), data)
        }
    }

    struct ConstantModel(f64);

    impl Estimator for ConstantModel {
        fn fit(&mut self, _x: &Matrix<f64>, y: &Vector<f64>) -> Result<()> {
            self.0 = y.mean();
            Ok(())
        }

        fn predict(&self, x: &Matrix<f64>) -> Result<Vector<f64>> {
            Ok(Vector::from_vec(vec![self.0; x.n_rows()]))
        }
    }

    #[test]
    fn test_transformer_fit_transform_default() {
        let mut scaler = MeanScaler { scale: None };
        let x = Matrix::from_vec(2, 2, vec![2.0, 4.0, 6.0, 8.0]).expect("matrix");

        let scaled = scaler.fit_transform(&x).expect("fit_transform");
        assert!((scaled.get(0, 0) - 0.4).abs() < 1e-12);
        assert!((scaled.get(1, 1) - 1.6).abs() < 1e-12);
    }

    #[test]
    fn test_transformer_transform_without_fit() {
        let scaler = MeanScaler { scale: None };
        let x = Matrix::from_vec(1, 1, vec![1.0]).expect("matrix");
        let err = scaler.transform(&x).expect_err("not fitted");
        assert!(err.to_string().contains("MeanScaler is not fitted"));
    }

    #[test]
    fn test_transformer_fit_transform_propagates_fit_error() {
        let mut scaler = MeanScaler { scale: None };
        let x = Matrix::from_vec(0, 2, vec![]).expect("matrix");
        assert!(scaler.fit_transform(&x).is_err());
    }

    #[test]
    fn test_estimator_default_score() {
        let x = Matrix::from_vec(3, 1, vec![1.0, 2.0, 3.0]).expect("matrix");
        let y = Vector::from_slice(&[1.0, 2.0, 3.0]);
        let mut model = ConstantModel(0.0);
        model.fit(&x, &y).expect("fit");
        // Predicting the mean gives R² of exactly zero.
        let r2 = model.score(&x, &y).expect("score");
        assert!(r2.abs() < 1e-12);
    }
}
