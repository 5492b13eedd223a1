//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use valuator::prelude::*;
//! ```

pub use crate::classification::LinearUnitClassifier;
pub use crate::cluster::KMeansClusterer;
pub use crate::linear_model::LinearRegressionModel;
pub use crate::metrics::{accuracy, inertia, mae, mse, r_squared};
pub use crate::preprocessing::{normalize, NormalizationMode, Normalizer};
pub use crate::primitives::{Matrix, Vector};
pub use crate::traits::{Estimator, Transformer, UnsupervisedEstimator};
pub use crate::tree::{RandomForestRegressor, RegressionTree};
