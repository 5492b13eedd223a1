//! Bootstrap-aggregated regression trees.

use super::{validate_training_set, RegressionTree};
use crate::error::{Result, ValuatorError};
use crate::interpret::PermutationImportance;
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use rand::distributions::{Distribution, Uniform};
use rand::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Random forest regressor.
///
/// Each tree is grown on its own bootstrap resample of the training rows
/// (uniform draws with replacement, as many draws as rows). Predictions are
/// the unweighted mean over trees.
///
/// After training, feature importance is measured by permutation: each
/// column in turn is scrambled and the rise in the forest's training MSE is
/// recorded. The importances are normalized to sum to one.
///
/// Bootstrap draws and permutations come from one generator in a fixed
/// order, so a seeded forest is reproducible even though its trees are
/// grown in parallel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    trees: Vec<RegressionTree>,
    n_trees: usize,
    max_depth: usize,
    min_samples_split: usize,
    random_state: Option<u64>,
    feature_importances: Option<Vec<f64>>,
}

impl Default for RandomForestRegressor {
    fn default() -> Self {
        Self::new(10)
    }
}

impl RandomForestRegressor {
    /// Creates a forest of `n_trees` trees, each with `max_depth = 5` and
    /// `min_samples_split = 2`.
    #[must_use]
    pub fn new(n_trees: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_trees,
            max_depth: 5,
            min_samples_split: 2,
            random_state: None,
            feature_importances: None,
        }
    }

    /// Sets the maximum depth of every tree.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the per-tree minimum split size.
    #[must_use]
    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split;
        self
    }

    /// Sets the random seed for reproducibility.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Number of trees grown by `fit`.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    /// The fitted trees, in bootstrap order.
    #[must_use]
    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    /// Returns true if the forest has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    /// Normalized permutation importance of each feature.
    ///
    /// # Errors
    ///
    /// Returns an error if the forest is not fitted.
    pub fn feature_importances(&self) -> Result<&[f64]> {
        self.feature_importances
            .as_deref()
            .ok_or(ValuatorError::NotFitted {
                model: "RandomForestRegressor",
            })
    }

    /// Fits the forest drawing all randomness from `rng`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or non-finite, `x` and `y`
    /// disagree in length, or `n_trees` is zero.
    pub fn fit_with_rng<R: Rng + ?Sized>(
        &mut self,
        x: &Matrix<f64>,
        y: &Vector<f64>,
        rng: &mut R,
    ) -> Result<()> {
        validate_training_set(x, y, "random forest")?;
        if self.n_trees == 0 {
            return Err(ValuatorError::hyperparameter("n_trees", 0, ">= 1"));
        }

        let n_samples = x.n_rows();
        let samples: Vec<Vec<usize>> = (0..self.n_trees)
            .map(|_| bootstrap_sample(n_samples, &mut *rng))
            .collect();

        let trees = samples
            .par_iter()
            .map(|indices| {
                let x_boot = x.select_rows(indices);
                let y_boot = Vector::from_vec(indices.iter().map(|&i| y[i]).collect());
                let mut tree = RegressionTree::new()
                    .with_max_depth(self.max_depth)
                    .with_min_samples_split(self.min_samples_split);
                tree.fit(&x_boot, &y_boot)?;
                Ok(tree)
            })
            .collect::<Result<Vec<_>>>()?;

        self.trees = trees;
        self.feature_importances = None;

        let permutation = PermutationImportance::compute(|m| self.predict(m), x, y, rng)?;
        let importances = permutation.normalized();
        debug!(
            n_trees = self.n_trees,
            n_samples,
            training_mse = permutation.baseline_score,
            ranking = ?permutation.ranking(),
            ?importances,
            "fitted random forest"
        );
        self.feature_importances = Some(importances);

        Ok(())
    }
}

impl Estimator for RandomForestRegressor {
    /// Fits the forest, seeding from `random_state` or from entropy.
    ///
    /// # Errors
    ///
    /// See [`RandomForestRegressor::fit_with_rng`].
    fn fit(&mut self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<()> {
        let mut rng = match self.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.fit_with_rng(x, y, &mut rng)
    }

    /// Averages the predictions of every tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the forest is not fitted or `x` has the wrong width.
    fn predict(&self, x: &Matrix<f64>) -> Result<Vector<f64>> {
        if self.trees.is_empty() {
            return Err(ValuatorError::NotFitted {
                model: "RandomForestRegressor",
            });
        }

        let per_tree = self
            .trees
            .par_iter()
            .map(|tree| tree.predict(x))
            .collect::<Result<Vec<_>>>()?;

        // Summed in tree order so the result does not depend on scheduling.
        let mut sums = vec![0.0; x.n_rows()];
        for predictions in &per_tree {
            for (s, p) in sums.iter_mut().zip(predictions.iter()) {
                *s += p;
            }
        }

        let n_trees = self.trees.len() as f64;
        Ok(Vector::from_vec(sums.into_iter().map(|s| s / n_trees).collect()))
    }
}

/// Row indices of a bootstrap resample (uniform, with replacement).
fn bootstrap_sample<R: Rng + ?Sized>(n_samples: usize, rng: &mut R) -> Vec<usize> {
    let dist = Uniform::from(0..n_samples);
    (0..n_samples).map(|_| dist.sample(rng)).collect()
}

#[cfg(test)]
#[path = "random_forest_tests_regressor.rs"]
mod random_forest_tests_regressor;
