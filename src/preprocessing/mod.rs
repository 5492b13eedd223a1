//! Per-column z-score standardization.
//!
//! Three of the four models put their features on a comparable scale before
//! training. Two flavours are provided:
//!
//! - [`normalize`] recomputes the column statistics from whatever matrix it
//!   is given. Applied to a single query row this degenerates to a no-op
//!   centering (every column has zero spread, so every value maps to 0).
//!   This is the default behaviour of the models ([`NormalizationMode::PerCall`]).
//! - [`Normalizer`] persists the statistics seen at fit time and reuses them
//!   for every later `transform` ([`NormalizationMode::FitStatistics`]).
//!
//! # Example
//!
//! ```
//! use valuator::prelude::*;
//! use valuator::preprocessing::normalize;
//!
//! let x = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
//! let z = normalize(&x).unwrap();
//! assert!((z.get(0, 0) + 1.224_744_871).abs() < 1e-6);
//! ```

use crate::error::{Result, ValuatorError};
use crate::primitives::Matrix;
use crate::traits::Transformer;
use serde::{Deserialize, Serialize};

/// How a model standardizes its inputs at prediction time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationMode {
    /// Recompute mean/std from the matrix being predicted on.
    #[default]
    PerCall,
    /// Reuse the mean/std captured during `fit`.
    FitStatistics,
}

/// Per-column mean and population standard deviation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    /// Mean of each column.
    pub mean: Vec<f64>,
    /// Standard deviation of each column; a zero spread is stored as 1.0.
    pub std: Vec<f64>,
}

impl ColumnStats {
    /// Computes the statistics of `x` (divisor = row count).
    ///
    /// # Errors
    ///
    /// Returns an error if `x` is empty or contains non-finite values.
    pub fn compute(x: &Matrix<f64>) -> Result<Self> {
        let (n_rows, n_cols) = x.shape();
        if n_rows == 0 || n_cols == 0 {
            return Err(ValuatorError::empty(format!(
                "cannot normalize a {n_rows}x{n_cols} matrix"
            )));
        }
        if !x.is_finite() {
            return Err(ValuatorError::NonFinite {
                context: "normalizer input".to_string(),
            });
        }

        let n = n_rows as f64;
        let mut mean = vec![0.0; n_cols];
        for row in x.rows() {
            for (m, v) in mean.iter_mut().zip(row) {
                *m += v;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        let mut std = vec![0.0; n_cols];
        for row in x.rows() {
            for ((s, v), m) in std.iter_mut().zip(row).zip(&mean) {
                *s += (v - m).powi(2);
            }
        }
        for s in &mut std {
            *s = (*s / n).sqrt();
            if *s == 0.0 {
                *s = 1.0;
            }
        }

        Ok(Self { mean, std })
    }

    /// Number of columns these statistics describe.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Applies `(x - mean) / std` column-wise.
    ///
    /// # Errors
    ///
    /// Returns an error if `x` has a different width than the statistics.
    pub fn apply(&self, x: &Matrix<f64>) -> Result<Matrix<f64>> {
        let (n_rows, n_cols) = x.shape();
        if n_cols != self.n_features() {
            return Err(ValuatorError::columns(self.n_features(), n_cols));
        }

        let mut data = Vec::with_capacity(n_rows * n_cols);
        for row in x.rows() {
            data.extend(
                row.iter()
                    .zip(self.mean.iter().zip(&self.std))
                    .map(|(v, (m, s))| (v - m) / s),
            );
        }

        Matrix::from_vec(n_rows, n_cols, data)
    }
}

/// Standardizes every column of `x` using statistics computed from `x` itself.
///
/// # Errors
///
/// Returns an error if `x` is empty or contains non-finite values.
pub fn normalize(x: &Matrix<f64>) -> Result<Matrix<f64>> {
    ColumnStats::compute(x)?.apply(x)
}

/// Standardizes features using statistics persisted at fit time.
///
/// # Example
///
/// ```
/// use valuator::prelude::*;
/// use valuator::preprocessing::Normalizer;
///
/// let train = Matrix::from_rows(&[vec![0.0, 10.0], vec![2.0, 30.0]]).unwrap();
/// let mut normalizer = Normalizer::new();
/// normalizer.fit(&train).unwrap();
///
/// // A single row keeps its position relative to the training data.
/// let query = Matrix::from_rows(&[vec![2.0, 30.0]]).unwrap();
/// let z = normalizer.transform(&query).unwrap();
/// assert!((z.get(0, 0) - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Normalizer {
    stats: Option<ColumnStats>,
}

impl Normalizer {
    /// Creates an unfitted normalizer.
    #[must_use]
    pub fn new() -> Self {
        Self { stats: None }
    }

    /// Returns the fitted statistics, if any.
    #[must_use]
    pub fn stats(&self) -> Option<&ColumnStats> {
        self.stats.as_ref()
    }

    /// Returns true if the normalizer has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.stats.is_some()
    }
}

impl Transformer for Normalizer {
    fn fit(&mut self, x: &Matrix<f64>) -> Result<()> {
        self.stats = Some(ColumnStats::compute(x)?);
        Ok(())
    }

    fn transform(&self, x: &Matrix<f64>) -> Result<Matrix<f64>> {
        self.stats
            .as_ref()
            .ok_or(ValuatorError::NotFitted {
                model: "Normalizer",
            })?
            .apply(x)
    }
}

/// Normalization state owned by a model: the mode plus fit-time statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct FeatureScaling {
    pub(crate) mode: NormalizationMode,
    normalizer: Normalizer,
}

impl FeatureScaling {
    pub(crate) fn new(mode: NormalizationMode) -> Self {
        Self {
            mode,
            normalizer: Normalizer::new(),
        }
    }

    /// Fits on the training matrix and returns it standardized.
    pub(crate) fn fit_transform(&mut self, x: &Matrix<f64>) -> Result<Matrix<f64>> {
        self.normalizer.fit_transform(x)
    }

    /// Standardizes a prediction batch according to the mode.
    pub(crate) fn transform(&self, x: &Matrix<f64>) -> Result<Matrix<f64>> {
        match self.mode {
            NormalizationMode::PerCall => normalize(x),
            NormalizationMode::FitStatistics => self.normalizer.transform(x),
        }
    }
}
