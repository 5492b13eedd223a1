//! Clustering algorithms.
//!
//! K-Means clustering with k-means++ initialization over z-score
//! standardized features.

use crate::error::{Result, ValuatorError};
use crate::metrics::inertia;
use crate::preprocessing::{FeatureScaling, NormalizationMode};
use crate::primitives::Matrix;
use crate::traits::UnsupervisedEstimator;
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// K-Means clustering.
///
/// # Algorithm
///
/// 1. Standardize the training data
/// 2. Initialize centroids with k-means++: the first uniformly at random,
///    each further one sampled with probability proportional to a point's
///    distance to its nearest chosen centroid
/// 3. Assign each sample to the nearest centroid (ties go to the lowest index)
/// 4. Move each centroid to the mean of its samples; a centroid with no
///    samples stays where it is
/// 5. Stop once the summed centroid shift drops below `tol`, or after
///    `max_iter` iterations
///
/// After fitting, cluster ids are renumbered in order of first appearance
/// over the training rows, so row 0 is always in cluster 0. This fixes the
/// numbering of a partition regardless of which point seeded it.
///
/// # Examples
///
/// ```
/// use valuator::prelude::*;
///
/// let data = Matrix::from_rows(&[
///     vec![1.0, 2.0],
///     vec![1.5, 1.8],
///     vec![1.0, 0.6],
///     vec![8.0, 8.0],
///     vec![9.0, 11.0],
///     vec![8.5, 9.0],
/// ]).unwrap();
///
/// let mut kmeans = KMeansClusterer::new(2).with_random_state(7);
/// kmeans.fit(&data).unwrap();
///
/// let labels = kmeans.labels().unwrap();
/// assert_eq!(labels, &[0, 0, 0, 1, 1, 1]);
/// ```
///
/// # Performance
///
/// - Time complexity: O(nkdi) where n=samples, k=clusters, d=features, i=iterations
/// - Space complexity: O(nk)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KMeansClusterer {
    /// Number of clusters.
    n_clusters: usize,
    /// Maximum iterations.
    max_iter: usize,
    /// Convergence tolerance on the summed centroid shift.
    tol: f64,
    /// Random seed for initialization.
    random_state: Option<u64>,
    /// Cluster centroids (standardized space) after fitting.
    centroids: Option<Matrix<f64>>,
    /// Labels for training data.
    labels: Option<Vec<usize>>,
    /// Sum of squared distances (inertia).
    inertia: f64,
    /// Number of iterations run.
    n_iter: usize,
    scaling: FeatureScaling,
}

impl KMeansClusterer {
    /// Creates a clusterer with `n_clusters` clusters, `max_iter = 100` and
    /// `tol = 0.001`.
    #[must_use]
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            max_iter: 100,
            tol: 1e-3,
            random_state: None,
            centroids: None,
            labels: None,
            inertia: 0.0,
            n_iter: 0,
            scaling: FeatureScaling::default(),
        }
    }

    /// Sets the maximum number of iterations.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the convergence tolerance.
    #[must_use]
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Sets the random seed for reproducibility.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Sets how prediction batches are standardized.
    #[must_use]
    pub fn with_normalization(mut self, mode: NormalizationMode) -> Self {
        self.scaling = FeatureScaling::new(mode);
        self
    }

    /// Number of clusters.
    #[must_use]
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Returns the cluster centroids in standardized feature space.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted.
    pub fn centroids(&self) -> Result<&Matrix<f64>> {
        self.centroids.as_ref().ok_or(ValuatorError::NotFitted {
            model: "KMeansClusterer",
        })
    }

    /// Returns the cluster of each training row.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted.
    pub fn labels(&self) -> Result<&[usize]> {
        self.labels
            .as_deref()
            .ok_or(ValuatorError::NotFitted {
                model: "KMeansClusterer",
            })
    }

    /// Returns the inertia (within-cluster sum of squares).
    #[must_use]
    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    /// Returns the number of iterations run.
    #[must_use]
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.centroids.is_some()
    }

    /// Fits the model drawing all randomness from `rng`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is empty or non-finite, `n_clusters` is
    /// zero or larger than the number of samples, `max_iter` is zero, or
    /// `tol` is negative.
    pub fn fit_with_rng<R: Rng + ?Sized>(&mut self, x: &Matrix<f64>, rng: &mut R) -> Result<()> {
        let (n_samples, n_features) = x.shape();

        if n_samples == 0 {
            return Err(ValuatorError::empty("k-means training set"));
        }
        if self.n_clusters == 0 || self.n_clusters > n_samples {
            return Err(ValuatorError::hyperparameter(
                "n_clusters",
                self.n_clusters,
                format!("1 <= n_clusters <= {n_samples} (number of samples)"),
            ));
        }
        if self.max_iter == 0 {
            return Err(ValuatorError::hyperparameter("max_iter", 0, ">= 1"));
        }
        if !(self.tol >= 0.0 && self.tol.is_finite()) {
            return Err(ValuatorError::hyperparameter(
                "tol",
                self.tol,
                "a non-negative finite number",
            ));
        }

        let x_scaled = self.scaling.fit_transform(x)?;

        let distinct = distinct_rows(&x_scaled);
        if distinct < self.n_clusters {
            warn!(
                n_clusters = self.n_clusters,
                distinct, "fewer distinct points than clusters, centroids will repeat"
            );
        }

        let mut centroids = self.kmeans_plusplus_init(&x_scaled, rng);
        let mut labels = vec![0; n_samples];

        for iter in 0..self.max_iter {
            labels = self.assign_labels(&x_scaled, &centroids);
            let new_centroids = self.update_centroids(&x_scaled, &labels, &centroids);
            let shift = centroid_shift(&centroids, &new_centroids, n_features);

            centroids = new_centroids;
            self.n_iter = iter + 1;
            if shift < self.tol {
                break;
            }
        }

        let (labels, centroids) = relabel_by_first_appearance(labels, &centroids, n_features);
        let centroids = Matrix::from_vec(self.n_clusters, n_features, centroids)?;

        self.inertia = inertia(&x_scaled, &centroids, &labels)?;
        debug!(
            n_samples,
            n_clusters = self.n_clusters,
            n_iter = self.n_iter,
            inertia = self.inertia,
            "fitted k-means"
        );

        self.labels = Some(labels);
        self.centroids = Some(centroids);
        Ok(())
    }

    /// Initializes centroids using k-means++.
    fn kmeans_plusplus_init<R: Rng + ?Sized>(&self, x: &Matrix<f64>, rng: &mut R) -> Vec<f64> {
        let (n_samples, n_features) = x.shape();
        let mut centroids = Vec::with_capacity(self.n_clusters * n_features);

        let first = rng.gen_range(0..n_samples);
        centroids.extend_from_slice(x.row_slice(first));

        for _ in 1..self.n_clusters {
            let distances: Vec<f64> = x
                .rows()
                .map(|point| {
                    centroids
                        .chunks_exact(n_features)
                        .map(|c| euclidean(point, c))
                        .fold(f64::INFINITY, f64::min)
                })
                .collect();

            // All-zero weights means every point already coincides with a centroid.
            let next = match WeightedIndex::new(&distances) {
                Ok(dist) => dist.sample(rng),
                Err(_) => rng.gen_range(0..n_samples),
            };
            centroids.extend_from_slice(x.row_slice(next));
        }

        centroids
    }

    /// Assigns each sample to the nearest centroid.
    fn assign_labels(&self, x: &Matrix<f64>, centroids: &[f64]) -> Vec<usize> {
        let n_features = x.n_cols();
        x.rows()
            .map(|point| {
                let mut min_dist = f64::INFINITY;
                let mut min_cluster = 0;
                for (k, centroid) in centroids.chunks_exact(n_features).enumerate() {
                    let dist = euclidean(point, centroid);
                    if dist < min_dist {
                        min_dist = dist;
                        min_cluster = k;
                    }
                }
                min_cluster
            })
            .collect()
    }

    /// Moves each centroid to the mean of its assigned samples.
    fn update_centroids(&self, x: &Matrix<f64>, labels: &[usize], previous: &[f64]) -> Vec<f64> {
        let n_features = x.n_cols();
        let mut sums = vec![0.0; self.n_clusters * n_features];
        let mut counts = vec![0usize; self.n_clusters];

        for (point, &label) in x.rows().zip(labels) {
            counts[label] += 1;
            for (s, v) in sums[label * n_features..(label + 1) * n_features]
                .iter_mut()
                .zip(point)
            {
                *s += v;
            }
        }

        for (k, &count) in counts.iter().enumerate() {
            let block = k * n_features..(k + 1) * n_features;
            if count == 0 {
                sums[block.clone()].copy_from_slice(&previous[block]);
            } else {
                for s in &mut sums[block] {
                    *s /= count as f64;
                }
            }
        }

        sums
    }
}

impl UnsupervisedEstimator for KMeansClusterer {
    type Labels = Vec<usize>;

    /// Fits the model, seeding from `random_state` or from entropy.
    ///
    /// # Errors
    ///
    /// See [`KMeansClusterer::fit_with_rng`].
    fn fit(&mut self, x: &Matrix<f64>) -> Result<()> {
        let mut rng = match self.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.fit_with_rng(x, &mut rng)
    }

    /// Assigns each row to its nearest centroid without moving any centroid.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or `x` has the wrong width.
    fn predict(&self, x: &Matrix<f64>) -> Result<Vec<usize>> {
        let centroids = self.centroids()?;
        if x.n_cols() != centroids.n_cols() {
            return Err(ValuatorError::columns(centroids.n_cols(), x.n_cols()));
        }

        let x_scaled = self.scaling.transform(x)?;
        Ok(self.assign_labels(&x_scaled, centroids.as_slice()))
    }
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

fn centroid_shift(old: &[f64], new: &[f64], n_features: usize) -> f64 {
    old.chunks_exact(n_features)
        .zip(new.chunks_exact(n_features))
        .map(|(a, b)| euclidean(a, b))
        .sum()
}

fn distinct_rows(x: &Matrix<f64>) -> usize {
    x.rows()
        .map(|row| row.iter().map(|v| v.to_bits()).collect::<Vec<_>>())
        .collect::<BTreeSet<_>>()
        .len()
}

/// Renumbers clusters by first appearance in `labels`; clusters that own no
/// row keep their relative order after the populated ones.
fn relabel_by_first_appearance(
    labels: Vec<usize>,
    centroids: &[f64],
    n_features: usize,
) -> (Vec<usize>, Vec<f64>) {
    let n_clusters = centroids.len() / n_features;
    let mut order: Vec<usize> = Vec::with_capacity(n_clusters);
    for &label in &labels {
        if !order.contains(&label) {
            order.push(label);
        }
    }
    for k in 0..n_clusters {
        if !order.contains(&k) {
            order.push(k);
        }
    }

    let mut mapping = vec![0; n_clusters];
    let mut reordered = Vec::with_capacity(centroids.len());
    for (new_id, &old_id) in order.iter().enumerate() {
        mapping[old_id] = new_id;
        reordered.extend_from_slice(&centroids[old_id * n_features..(old_id + 1) * n_features]);
    }

    (labels.into_iter().map(|l| mapping[l]).collect(), reordered)
}

#[cfg(test)]
#[path = "tests_kmeans_contract.rs"]
mod tests_kmeans_contract;
