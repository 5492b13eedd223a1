//! Result bundle returned by an analysis run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Feature name to value.
pub type FeatureMap = BTreeMap<String, f64>;

/// Label shown for class 1.
pub const BUY_NOW: &str = "Buy Now";
/// Label shown for class 0.
pub const WAIT: &str = "Wait";

/// Market segment shown for a cluster index.
///
/// Clusters 0 and 1 are "Premium" and "Mid-Range"; every other index is
/// "Budget". The name follows the index only, not the cluster's prices.
#[must_use]
pub fn segment_name(cluster: usize) -> &'static str {
    match cluster {
        0 => "Premium",
        1 => "Mid-Range",
        _ => "Budget",
    }
}

/// Buy-now / wait recommendation for the example listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// `"Buy Now"` or `"Wait"`
    pub label: String,
    /// Predicted class (1 = buy now)
    pub class: usize,
    /// Model probability of the predicted class
    pub confidence: f64,
    /// The query, keyed by feature name
    pub features: FeatureMap,
    /// Fraction of training rows classified correctly
    pub training_accuracy: f64,
}

/// Price estimate with per-feature importance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    /// Predicted price in lakhs
    pub prediction: f64,
    /// Importance shares, summing to one.
    ///
    /// Permutation importances (the random forest) can be negative when
    /// scrambling a feature happens to lower the training error, so single
    /// shares may fall outside `[0, 1]`.
    pub feature_importance: FeatureMap,
    /// Mean squared error on the training rows
    pub training_mse: f64,
    /// Mean absolute error on the training rows
    pub training_mae: f64,
    /// R² on the training rows
    pub training_r2: f64,
}

/// Market segment of the example listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringResult {
    /// Cluster index in `[0, k)`
    pub cluster: usize,
    /// Segment name for `cluster`, see [`segment_name`]
    pub segment: String,
    /// The query, keyed by feature name
    pub features: FeatureMap,
    /// Within-cluster sum of squares of the training rows
    pub inertia: f64,
    /// Lloyd iterations run
    pub iterations: usize,
}

/// The four analyses of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Linear classifier result
    pub classification: ClassificationResult,
    /// Gradient-descent regression result
    pub regression: RegressionResult,
    /// K-means result
    pub clustering: ClusteringResult,
    /// Random forest result
    pub ensemble: RegressionResult,
}

fn write_map(f: &mut fmt::Formatter<'_>, map: &FeatureMap, percent: bool) -> fmt::Result {
    for (name, value) in map {
        if percent {
            // Negative shares are printed as-is and flagged.
            let flag = if *value < 0.0 { "  (lowers error when scrambled)" } else { "" };
            writeln!(f, "    {name:<22} {:>6.1}%{flag}", value * 100.0)?;
        } else {
            writeln!(f, "    {name:<22} {value}")?;
        }
    }
    Ok(())
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.classification;
        writeln!(f, "Classification")?;
        writeln!(
            f,
            "  recommendation: {} (confidence {:.1}%, training accuracy {:.0}%)",
            c.label,
            c.confidence * 100.0,
            c.training_accuracy * 100.0
        )?;
        write_map(f, &c.features, false)?;

        for (title, r) in [("Linear regression", &self.regression), ("Random forest", &self.ensemble)] {
            writeln!(f)?;
            writeln!(f, "{title}")?;
            writeln!(
                f,
                "  predicted price: {:.2} lakhs (training MSE {:.2}, MAE {:.2}, R² {:.3})",
                r.prediction, r.training_mse, r.training_mae, r.training_r2
            )?;
            writeln!(f, "  feature importance:")?;
            write_map(f, &r.feature_importance, true)?;
        }

        let k = &self.clustering;
        writeln!(f)?;
        writeln!(f, "Clustering")?;
        writeln!(
            f,
            "  segment: {} (cluster {}, inertia {:.3}, {} iterations)",
            k.segment, k.cluster, k.inertia, k.iterations
        )?;
        write_map(f, &k.features, false)
    }
}
