//! Analysis configuration.

use crate::error::{Result, ValuatorError};
use crate::preprocessing::NormalizationMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Hyperparameters of the linear classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Delta-rule step size.
    pub learning_rate: f64,
    /// Passes over the training rows.
    pub epochs: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            epochs: 100,
        }
    }
}

/// Hyperparameters of the gradient-descent regressor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegressionConfig {
    /// Gradient descent step size.
    pub learning_rate: f64,
    /// Full-batch epochs.
    pub epochs: usize,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            epochs: 1000,
        }
    }
}

/// Hyperparameters of the k-means clusterer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Number of clusters.
    pub k: usize,
    /// Lloyd iteration cap.
    pub max_iterations: usize,
    /// Summed centroid shift below which iteration stops.
    pub tolerance: f64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            k: 3,
            max_iterations: 100,
            tolerance: 1e-3,
        }
    }
}

/// Hyperparameters of the random forest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Number of bootstrap trees.
    pub n_trees: usize,
    /// Depth limit of each tree.
    pub max_depth: usize,
    /// Minimum rows to split a node, and per side of a split.
    pub min_samples_split: usize,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 10,
            max_depth: 5,
            min_samples_split: 2,
        }
    }
}

/// Configuration of a full analysis run.
///
/// Every field has a default, so a JSON file only needs the keys it changes.
///
/// # Example
///
/// ```
/// use valuator::analysis::AnalysisConfig;
///
/// let config: AnalysisConfig = serde_json::from_str(r#"{"seed": 7, "forest": {"n_trees": 25}}"#).unwrap();
/// assert_eq!(config.seed, Some(7));
/// assert_eq!(config.forest.n_trees, 25);
/// assert_eq!(config.forest.max_depth, 5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Linear classifier settings.
    pub classifier: ClassifierConfig,
    /// Linear regression settings.
    pub regression: RegressionConfig,
    /// K-means settings.
    pub clustering: ClusteringConfig,
    /// Random forest settings.
    pub forest: ForestConfig,
    /// Base seed; `None` draws fresh entropy on every run.
    pub seed: Option<u64>,
    /// How the normalizing models standardize their queries.
    pub normalization: NormalizationMode,
    /// Run the four analyses concurrently.
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            regression: RegressionConfig::default(),
            clustering: ClusteringConfig::default(),
            forest: ForestConfig::default(),
            seed: None,
            normalization: NormalizationMode::PerCall,
            parallel: true,
        }
    }
}

impl AnalysisConfig {
    /// Sets the base seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the normalization mode.
    #[must_use]
    pub fn with_normalization(mut self, mode: NormalizationMode) -> Self {
        self.normalization = mode;
        self
    }

    /// Enables or disables concurrent execution.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails [`AnalysisConfig::validate`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every hyperparameter is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ValuatorError::Config`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, value: f64| {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ValuatorError::Config(format!(
                    "{name} must be a positive finite number, got {value}"
                )))
            }
        };
        let nonzero = |name: &str, value: usize| {
            if value > 0 {
                Ok(())
            } else {
                Err(ValuatorError::Config(format!("{name} must be at least 1")))
            }
        };

        positive("classifier.learning_rate", self.classifier.learning_rate)?;
        nonzero("classifier.epochs", self.classifier.epochs)?;
        positive("regression.learning_rate", self.regression.learning_rate)?;
        nonzero("regression.epochs", self.regression.epochs)?;
        nonzero("clustering.k", self.clustering.k)?;
        nonzero("clustering.max_iterations", self.clustering.max_iterations)?;
        if !(self.clustering.tolerance >= 0.0 && self.clustering.tolerance.is_finite()) {
            return Err(ValuatorError::Config(format!(
                "clustering.tolerance must be a non-negative finite number, got {}",
                self.clustering.tolerance
            )));
        }
        nonzero("forest.n_trees", self.forest.n_trees)?;
        Ok(())
    }
}
