//! Split search for variance-reduction regression trees.
//!
//! All helpers work on a subset of the training rows given as indices into
//! the full matrix, so recursion never copies feature data.

use crate::primitives::{Matrix, Vector};

/// A candidate split: `x[feature] <= threshold` goes left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Split {
    pub(crate) feature: usize,
    pub(crate) threshold: f64,
    pub(crate) gain: f64,
}

/// Mean of the targets at `indices` (0.0 for an empty subset).
pub(crate) fn subset_mean(y: &Vector<f64>, indices: &[usize]) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    indices.iter().map(|&i| y[i]).sum::<f64>() / indices.len() as f64
}

/// Mean squared deviation of the targets at `indices` from their own mean.
pub(crate) fn subset_variance(y: &Vector<f64>, indices: &[usize]) -> f64 {
    if indices.len() <= 1 {
        return 0.0;
    }
    let mean = subset_mean(y, indices);
    indices.iter().map(|&i| (y[i] - mean).powi(2)).sum::<f64>() / indices.len() as f64
}

/// True when every target at `indices` has the same value.
pub(crate) fn all_equal(y: &Vector<f64>, indices: &[usize]) -> bool {
    match indices.split_first() {
        Some((&first, rest)) => rest.iter().all(|&i| y[i] == y[first]),
        None => true,
    }
}

/// Midpoints between consecutive distinct values of `feature` in the subset.
pub(crate) fn candidate_thresholds(x: &Matrix<f64>, indices: &[usize], feature: usize) -> Vec<f64> {
    let mut values: Vec<f64> = indices.iter().map(|&i| x.get(i, feature)).collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    values.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
}

/// Splits `indices` into rows with `x[feature] <= threshold` and the rest.
pub(crate) fn partition(
    x: &Matrix<f64>,
    indices: &[usize],
    feature: usize,
    threshold: f64,
) -> (Vec<usize>, Vec<usize>) {
    indices
        .iter()
        .partition(|&&i| x.get(i, feature) <= threshold)
}

/// Best split of the subset by variance reduction.
///
/// Candidates leaving fewer than `min_samples_split` rows on either side are
/// skipped. Among equal gains the first candidate found (lowest feature,
/// then lowest threshold) wins. Returns `None` when no candidate survives.
pub(crate) fn best_split(
    x: &Matrix<f64>,
    y: &Vector<f64>,
    indices: &[usize],
    min_samples_split: usize,
) -> Option<Split> {
    let parent_variance = subset_variance(y, indices);
    let n = indices.len() as f64;
    let mut best: Option<Split> = None;

    for feature in 0..x.n_cols() {
        for threshold in candidate_thresholds(x, indices, feature) {
            let (left, right) = partition(x, indices, feature, threshold);
            if left.len() < min_samples_split || right.len() < min_samples_split {
                continue;
            }

            let weighted = (left.len() as f64 / n) * subset_variance(y, &left)
                + (right.len() as f64 / n) * subset_variance(y, &right);
            let gain = parent_variance - weighted;

            if best.map_or(true, |b| gain > b.gain) {
                best = Some(Split {
                    feature,
                    threshold,
                    gain,
                });
            }
        }
    }

    best
}

#[cfg(test)]
#[path = "helpers_tests_split.rs"]
mod helpers_tests_split;
