use super::*;

fn all_rows(n: usize) -> Vec<usize> {
    (0..n).collect()
}

#[test]
fn test_subset_mean_and_variance() {
    let y = Vector::from_slice(&[1.0, 2.0, 3.0, 10.0]);
    assert!((subset_mean(&y, &[0, 1, 2]) - 2.0).abs() < 1e-12);
    assert!((subset_variance(&y, &[0, 1, 2]) - 2.0 / 3.0).abs() < 1e-12);
    assert_eq!(subset_variance(&y, &[3]), 0.0);
    assert_eq!(subset_mean(&y, &[]), 0.0);
}

#[test]
fn test_all_equal() {
    let y = Vector::from_slice(&[4.0, 4.0, 5.0]);
    assert!(all_equal(&y, &[0, 1]));
    assert!(!all_equal(&y, &[0, 1, 2]));
    assert!(all_equal(&y, &[]));
}

#[test]
fn test_candidate_thresholds_are_midpoints_of_distinct_values() {
    let x = Matrix::from_rows(&[vec![3.0], vec![1.0], vec![3.0], vec![2.0]]).expect("4x1");
    assert_eq!(candidate_thresholds(&x, &all_rows(4), 0), vec![1.5, 2.5]);
    assert!(candidate_thresholds(&x, &[0, 2], 0).is_empty());
}

#[test]
fn test_partition_threshold_goes_left() {
    let x = Matrix::from_rows(&[vec![1.0], vec![2.0], vec![3.0]]).expect("3x1");
    let (left, right) = partition(&x, &all_rows(3), 0, 2.0);
    assert_eq!(left, vec![0, 1]);
    assert_eq!(right, vec![2]);
}

#[test]
fn test_best_split_picks_informative_feature() {
    // Column 1 is noise; column 0 separates the targets perfectly.
    let x = Matrix::from_rows(&[
        vec![1.0, 5.0],
        vec![2.0, 1.0],
        vec![10.0, 4.0],
        vec![11.0, 2.0],
    ])
    .expect("4x2");
    let y = Vector::from_slice(&[1.0, 1.0, 9.0, 9.0]);

    let split = best_split(&x, &y, &all_rows(4), 2).expect("split");
    assert_eq!(split.feature, 0);
    assert!((split.threshold - 6.0).abs() < 1e-12);
    assert!((split.gain - 16.0).abs() < 1e-12);
}

#[test]
fn test_best_split_respects_min_samples_split() {
    let x = Matrix::from_rows(&[vec![1.0], vec![2.0], vec![3.0]]).expect("3x1");
    let y = Vector::from_slice(&[0.0, 0.0, 100.0]);

    // Only a 2/1 split exists, so requiring two rows per side rules it out.
    assert!(best_split(&x, &y, &all_rows(3), 2).is_none());
    let split = best_split(&x, &y, &all_rows(3), 1).expect("split");
    assert!((split.threshold - 2.5).abs() < 1e-12);
}

#[test]
fn test_best_split_constant_feature_has_no_candidates() {
    let x = Matrix::from_rows(&[vec![7.0], vec![7.0], vec![7.0], vec![7.0]]).expect("4x1");
    let y = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0]);
    assert!(best_split(&x, &y, &all_rows(4), 1).is_none());
}
