//! Regression trees and bagged ensembles.
//!
//! This module implements:
//! - [`RegressionTree`]: greedy variance-reduction (CART-style) regression tree
//! - [`RandomForestRegressor`]: bootstrap aggregation of regression trees with
//!   permutation feature importance
//!
//! # Example
//!
//! ```
//! use valuator::prelude::*;
//! use valuator::tree::RandomForestRegressor;
//!
//! let x = Matrix::from_rows(&[
//!     vec![1.0, 0.0],
//!     vec![2.0, 1.0],
//!     vec![3.0, 0.0],
//!     vec![4.0, 1.0],
//!     vec![5.0, 0.0],
//! ]).unwrap();
//! let y = Vector::from_slice(&[10.0, 20.0, 30.0, 40.0, 50.0]);
//!
//! let mut forest = RandomForestRegressor::new(10).with_random_state(42);
//! forest.fit(&x, &y).unwrap();
//!
//! let prediction = forest.predict(&x).unwrap();
//! assert!(prediction.iter().all(|p| (10.0..=50.0).contains(p)));
//! ```

mod helpers;
mod random_forest;

pub use random_forest::RandomForestRegressor;

use crate::error::{Result, ValuatorError};
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use helpers::{all_equal, best_split, partition, subset_mean};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A node in a regression tree.
///
/// Children are owned exclusively through `Box`, so a tree is always a
/// strict binary tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    /// Terminal node predicting the mean target of its training rows
    Leaf {
        /// Predicted value
        value: f64,
        /// Number of training samples that reached this leaf
        n_samples: usize,
    },
    /// Decision node: `x[feature] <= threshold` goes left, otherwise right
    Internal {
        /// Index of the feature to split on
        feature: usize,
        /// Threshold value for the split
        threshold: f64,
        /// Left subtree (samples where feature <= threshold)
        left: Box<TreeNode>,
        /// Right subtree (samples where feature > threshold)
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    /// Returns the depth of the tree rooted at this node.
    ///
    /// Leaf nodes have depth 0, internal nodes have depth 1 + max(left, right).
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Number of leaves below (and including) this node.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Internal { left, right, .. } => left.n_leaves() + right.n_leaves(),
        }
    }

    /// Follows the split conditions for `row` down to a leaf value.
    fn predict_row(&self, row: &[f64]) -> f64 {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { value, .. } => return *value,
                TreeNode::Internal {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold {
                        left.as_ref()
                    } else {
                        right.as_ref()
                    };
                }
            }
        }
    }
}

/// Regression tree grown by greedy variance reduction.
///
/// A node becomes a leaf (predicting the mean of its targets) when the
/// depth reaches `max_depth`, fewer than `min_samples_split` rows remain,
/// all targets are identical, or no split has a positive gain. Candidate
/// splits that leave fewer than `min_samples_split` rows on either side are
/// rejected. There is no pruning pass.
///
/// # Examples
///
/// ```
/// use valuator::prelude::*;
///
/// let x = Matrix::from_rows(&[vec![1.0], vec![2.0], vec![3.0], vec![4.0]]).unwrap();
/// let y = Vector::from_slice(&[5.0, 5.0, 9.0, 9.0]);
///
/// let mut tree = RegressionTree::new();
/// tree.fit(&x, &y).unwrap();
///
/// let query = Matrix::from_rows(&[vec![1.5], vec![3.5]]).unwrap();
/// let pred = tree.predict(&query).unwrap();
/// assert_eq!(pred.as_slice(), &[5.0, 9.0]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    root: Option<TreeNode>,
    max_depth: usize,
    min_samples_split: usize,
    n_features: usize,
}

impl Default for RegressionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RegressionTree {
    /// Creates a tree with `max_depth = 5` and `min_samples_split = 2`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: None,
            max_depth: 5,
            min_samples_split: 2,
            n_features: 0,
        }
    }

    /// Sets the maximum depth; 0 grows a single leaf.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the minimum number of rows needed to split a node, and on each
    /// side of a split.
    #[must_use]
    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split;
        self
    }

    /// Returns the root node.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree is not fitted.
    pub fn root(&self) -> Result<&TreeNode> {
        self.root.as_ref().ok_or(ValuatorError::NotFitted {
            model: "RegressionTree",
        })
    }

    /// Depth of the fitted tree (0 when unfitted or a single leaf).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, TreeNode::depth)
    }

    /// Returns true if the tree has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.root.is_some()
    }

    fn build(&self, x: &Matrix<f64>, y: &Vector<f64>, indices: &[usize], depth: usize) -> TreeNode {
        let leaf = || TreeNode::Leaf {
            value: subset_mean(y, indices),
            n_samples: indices.len(),
        };

        if depth >= self.max_depth
            || indices.len() < self.min_samples_split
            || all_equal(y, indices)
        {
            return leaf();
        }

        let Some(split) = best_split(x, y, indices, self.min_samples_split) else {
            return leaf();
        };
        if split.gain <= 0.0 {
            return leaf();
        }

        let (left, right) = partition(x, indices, split.feature, split.threshold);
        TreeNode::Internal {
            feature: split.feature,
            threshold: split.threshold,
            left: Box::new(self.build(x, y, &left, depth + 1)),
            right: Box::new(self.build(x, y, &right, depth + 1)),
        }
    }
}

/// Shape and finiteness checks shared by the tree and the forest.
pub(crate) fn validate_training_set(x: &Matrix<f64>, y: &Vector<f64>, what: &str) -> Result<()> {
    let (n_samples, n_features) = x.shape();
    if n_samples == 0 || n_features == 0 {
        return Err(ValuatorError::empty(format!(
            "{what} training set is {n_samples}x{n_features}"
        )));
    }
    if y.len() != n_samples {
        return Err(ValuatorError::rows(n_samples, y.len()));
    }
    if !x.is_finite() || !y.is_finite() {
        return Err(ValuatorError::NonFinite {
            context: format!("{what} training set"),
        });
    }
    Ok(())
}

impl Estimator for RegressionTree {
    /// Grows the tree on `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or non-finite, or `x` and `y`
    /// disagree in length.
    fn fit(&mut self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<()> {
        validate_training_set(x, y, "regression tree")?;

        let indices: Vec<usize> = (0..x.n_rows()).collect();
        let root = self.build(x, y, &indices, 0);
        debug!(
            n_samples = x.n_rows(),
            depth = root.depth(),
            n_leaves = root.n_leaves(),
            "grew regression tree"
        );

        self.n_features = x.n_cols();
        self.root = Some(root);
        Ok(())
    }

    /// Predicts by walking each row from the root to a leaf.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree is not fitted or `x` has the wrong width.
    fn predict(&self, x: &Matrix<f64>) -> Result<Vector<f64>> {
        let root = self.root()?;
        if x.n_cols() != self.n_features {
            return Err(ValuatorError::columns(self.n_features, x.n_cols()));
        }
        Ok(Vector::from_vec(
            x.rows().map(|row| root.predict_row(row)).collect(),
        ))
    }
}
