//! Valuator: property valuation models in pure Rust.
//!
//! Four small models turn listing features into valuation signals: a
//! buy-now / wait classifier, a gradient-descent price regressor, a k-means
//! market segmentation and a random forest price regressor with permutation
//! feature importance.
//!
//! # Quick Start
//!
//! ```
//! use valuator::prelude::*;
//!
//! // Create training data (y = 2*x + 1)
//! let x = Matrix::from_rows(&[vec![1.0], vec![2.0], vec![3.0], vec![4.0]]).unwrap();
//! let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
//!
//! // Train linear regression
//! let mut model = LinearRegressionModel::new().with_learning_rate(0.1);
//! model.fit(&x, &y).unwrap();
//!
//! let r2 = model.score(&x, &y).unwrap();
//! assert!(r2 > 0.99);
//! ```
//!
//! Running every analysis on the embedded datasets:
//!
//! ```
//! use valuator::analysis::{run_all_analyses_with, AnalysisConfig};
//!
//! let report = run_all_analyses_with(&AnalysisConfig::default().with_seed(1)).unwrap();
//! println!("{report}");
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`preprocessing`]: Z-score normalization
//! - [`classification`]: Delta-rule linear classifier
//! - [`linear_model`]: Gradient-descent linear regression
//! - [`cluster`]: K-Means with k-means++ initialization
//! - [`tree`]: Regression trees and random forests
//! - [`interpret`]: Permutation and weight-magnitude feature importance
//! - [`metrics`]: Evaluation metrics
//! - [`analysis`]: Embedded datasets and the combined analysis run

pub mod analysis;
pub mod classification;
pub mod cluster;
pub mod error;
pub mod interpret;
pub mod linear_model;
pub mod metrics;
pub mod prelude;
pub mod preprocessing;
pub mod primitives;
pub mod traits;
pub mod tree;

pub use error::{Result, ValuatorError};
pub use primitives::{Matrix, Vector};
pub use traits::{Estimator, Transformer, UnsupervisedEstimator};
