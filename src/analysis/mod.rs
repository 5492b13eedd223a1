//! Property analyses over the embedded datasets.
//!
//! Each analysis fits one model on its own dataset and predicts on one
//! example listing. [`run_all_analyses`] runs all four and bundles the
//! results into an [`AnalysisReport`].
//!
//! # Example
//!
//! ```
//! use valuator::analysis::{run_all_analyses_with, AnalysisConfig};
//!
//! let report = run_all_analyses_with(&AnalysisConfig::default().with_seed(42)).unwrap();
//! assert!(report.clustering.cluster < 3);
//! assert!((35.0..=120.0).contains(&report.ensemble.prediction));
//! ```

mod config;
pub mod datasets;
mod report;

pub use config::{AnalysisConfig, ClassifierConfig, ClusteringConfig, ForestConfig, RegressionConfig};
pub use report::{
    segment_name, AnalysisReport, ClassificationResult, ClusteringResult, FeatureMap,
    RegressionResult, BUY_NOW, WAIT,
};

use crate::classification::LinearUnitClassifier;
use crate::cluster::KMeansClusterer;
use crate::error::Result;
use crate::linear_model::LinearRegressionModel;
use crate::metrics::{mae, mse, r_squared};
use crate::traits::{Estimator, UnsupervisedEstimator};
use crate::tree::RandomForestRegressor;
use tracing::info;

const CLUSTERING_STREAM: u64 = 2;
const ENSEMBLE_STREAM: u64 = 3;

/// Seed for one model, offset from the run's base seed.
fn model_seed(base: Option<u64>, stream: u64) -> Option<u64> {
    base.map(|seed| seed.wrapping_add(stream))
}

fn feature_map<'a>(names: &[&str], values: impl IntoIterator<Item = &'a f64>) -> FeatureMap {
    names
        .iter()
        .zip(values)
        .map(|(name, &value)| ((*name).to_string(), value))
        .collect()
}

/// Fits the linear classifier and labels the example listing.
///
/// # Errors
///
/// Returns an error if fitting or prediction fails.
pub fn run_classification(config: &AnalysisConfig) -> Result<ClassificationResult> {
    let data = datasets::classification()?;
    let mut model = LinearUnitClassifier::new()
        .with_learning_rate(config.classifier.learning_rate)
        .with_epochs(config.classifier.epochs)
        .with_normalization(config.normalization);
    model.fit(&data.x, &data.targets)?;

    let p_buy = model.predict_proba(&data.query_matrix()?)?[0];
    let class = usize::from(p_buy >= 0.5);
    let confidence = if class == 1 { p_buy } else { 1.0 - p_buy };
    let training_accuracy = model.score(&data.x, &data.targets)?;

    let label = if class == 1 { BUY_NOW } else { WAIT };
    info!(label, confidence, training_accuracy, "classification analysis");

    Ok(ClassificationResult {
        label: label.to_string(),
        class,
        confidence,
        features: feature_map(data.feature_names, &data.query),
        training_accuracy,
    })
}

/// Fits the gradient-descent regressor and prices the example listing.
///
/// # Errors
///
/// Returns an error if fitting or prediction fails.
pub fn run_regression(config: &AnalysisConfig) -> Result<RegressionResult> {
    let data = datasets::regression()?;
    let mut model = LinearRegressionModel::new()
        .with_learning_rate(config.regression.learning_rate)
        .with_epochs(config.regression.epochs)
        .with_normalization(config.normalization);
    model.fit(&data.x, &data.targets)?;

    let prediction = model.predict(&data.query_matrix()?)?[0];
    let fitted = model.predict(&data.x)?;
    let training_mse = mse(&fitted, &data.targets)?;
    let training_mae = mae(&fitted, &data.targets)?;
    let training_r2 = r_squared(&fitted, &data.targets)?;
    let importance = model.feature_importance()?;

    info!(prediction, training_mse, training_r2, "regression analysis");

    Ok(RegressionResult {
        prediction,
        feature_importance: feature_map(data.feature_names, &importance),
        training_mse,
        training_mae,
        training_r2,
    })
}

/// Clusters the listings and assigns the example listing to a segment.
///
/// # Errors
///
/// Returns an error if fitting or prediction fails.
pub fn run_clustering(config: &AnalysisConfig) -> Result<ClusteringResult> {
    let data = datasets::clustering()?;
    let mut model = KMeansClusterer::new(config.clustering.k)
        .with_max_iter(config.clustering.max_iterations)
        .with_tol(config.clustering.tolerance)
        .with_normalization(config.normalization);
    if let Some(seed) = model_seed(config.seed, CLUSTERING_STREAM) {
        model = model.with_random_state(seed);
    }
    model.fit(&data.x)?;

    let cluster = model.predict(&data.query_matrix()?)?[0];
    let segment = segment_name(cluster);
    info!(
        cluster,
        segment,
        inertia = model.inertia(),
        iterations = model.n_iter(),
        "clustering analysis"
    );

    Ok(ClusteringResult {
        cluster,
        segment: segment.to_string(),
        features: feature_map(data.feature_names, &data.query),
        inertia: model.inertia(),
        iterations: model.n_iter(),
    })
}

/// Fits the random forest and prices the example listing.
///
/// # Errors
///
/// Returns an error if fitting or prediction fails.
pub fn run_ensemble(config: &AnalysisConfig) -> Result<RegressionResult> {
    let data = datasets::ensemble()?;
    let mut model = RandomForestRegressor::new(config.forest.n_trees)
        .with_max_depth(config.forest.max_depth)
        .with_min_samples_split(config.forest.min_samples_split);
    if let Some(seed) = model_seed(config.seed, ENSEMBLE_STREAM) {
        model = model.with_random_state(seed);
    }
    model.fit(&data.x, &data.targets)?;

    let prediction = model.predict(&data.query_matrix()?)?[0];
    let fitted = model.predict(&data.x)?;
    let training_mse = mse(&fitted, &data.targets)?;
    let training_mae = mae(&fitted, &data.targets)?;
    let training_r2 = r_squared(&fitted, &data.targets)?;

    info!(prediction, training_mse, training_r2, "ensemble analysis");

    Ok(RegressionResult {
        prediction,
        feature_importance: feature_map(data.feature_names, model.feature_importances()?),
        training_mse,
        training_mae,
        training_r2,
    })
}

/// Runs all four analyses with the default configuration.
///
/// Unseeded: the clustering and ensemble results may differ between calls.
///
/// # Errors
///
/// Returns an error if any analysis fails.
pub fn run_all_analyses() -> Result<AnalysisReport> {
    run_all_analyses_with(&AnalysisConfig::default())
}

/// Runs all four analyses with `config`.
///
/// With `config.parallel` the analyses run on the rayon pool; the report is
/// the same either way for a given seed.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or any analysis fails.
pub fn run_all_analyses_with(config: &AnalysisConfig) -> Result<AnalysisReport> {
    config.validate()?;

    let (classification, regression, clustering, ensemble) = if config.parallel {
        let ((classification, regression), (clustering, ensemble)) = rayon::join(
            || rayon::join(|| run_classification(config), || run_regression(config)),
            || rayon::join(|| run_clustering(config), || run_ensemble(config)),
        );
        (classification?, regression?, clustering?, ensemble?)
    } else {
        (
            run_classification(config)?,
            run_regression(config)?,
            run_clustering(config)?,
            run_ensemble(config)?,
        )
    };

    Ok(AnalysisReport {
        classification,
        regression,
        clustering,
        ensemble,
    })
}

#[cfg(test)]
mod tests;
