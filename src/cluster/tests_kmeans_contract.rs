use super::*;

fn sample_data() -> Matrix<f64> {
    // Two well-separated clusters
    Matrix::from_rows(&[
        vec![1.0, 2.0],
        vec![1.5, 1.8],
        vec![1.0, 0.6],
        vec![8.0, 8.0],
        vec![9.0, 11.0],
        vec![8.5, 9.0],
    ])
    .expect("6x2")
}

fn property_points() -> Matrix<f64> {
    Matrix::from_rows(&[
        vec![45.0, 1200.0, 0.9, 0.85],
        vec![85.0, 2200.0, 0.95, 0.95],
        vec![120.0, 3000.0, 0.9, 0.9],
        vec![35.0, 650.0, 0.85, 0.8],
        vec![65.0, 1800.0, 0.8, 0.75],
    ])
    .expect("5x4")
}

#[test]
fn test_new() {
    let kmeans = KMeansClusterer::new(3);
    assert_eq!(kmeans.n_clusters(), 3);
    assert_eq!(kmeans.max_iter, 100);
    assert!((kmeans.tol - 0.001).abs() < 1e-15);
    assert!(!kmeans.is_fitted());
}

#[test]
fn test_builders() {
    let kmeans = KMeansClusterer::new(2)
        .with_max_iter(10)
        .with_tol(1e-6)
        .with_random_state(5)
        .with_normalization(NormalizationMode::FitStatistics);
    assert_eq!(kmeans.max_iter, 10);
    assert!((kmeans.tol - 1e-6).abs() < 1e-15);
    assert_eq!(kmeans.random_state, Some(5));
    assert_eq!(kmeans.scaling.mode, NormalizationMode::FitStatistics);
}

/// Labels are valid cluster indices in [0, k)
#[test]
fn test_predict_indices_in_range() {
    let data = property_points();
    for k in 1..=5 {
        let mut km = KMeansClusterer::new(k).with_random_state(42);
        km.fit(&data).expect("fit succeeds");
        for &label in &km.predict(&data).expect("predict") {
            assert!(label < k, "label {label} out of range for k = {k}");
        }
        assert_eq!(km.centroids().expect("fitted").shape(), (k, 4));
    }
}

#[test]
fn test_separated_clusters() {
    let mut km = KMeansClusterer::new(2).with_random_state(42);
    km.fit(&sample_data()).expect("fit");
    assert_eq!(km.labels().expect("labels"), &[0, 0, 0, 1, 1, 1]);
}

#[test]
fn test_first_row_is_always_cluster_zero() {
    let data = property_points();
    for seed in 0..25 {
        let mut km = KMeansClusterer::new(3).with_random_state(seed);
        km.fit(&data).expect("fit");
        assert_eq!(km.labels().expect("labels")[0], 0, "seed {seed}");
    }
}

#[test]
fn test_query_cluster_stable_across_seeds() {
    let data = property_points();
    let query = Matrix::from_rows(&[vec![52.0, 1500.0, 0.88, 0.83]]).expect("1x4");

    let assignments: Vec<usize> = (0..20)
        .map(|seed| {
            let mut km = KMeansClusterer::new(3).with_random_state(seed);
            km.fit(&data).expect("fit");
            km.predict(&query).expect("predict")[0]
        })
        .collect();

    let first = assignments[0];
    let agreeing = assignments.iter().filter(|&&c| c == first).count();
    assert!(agreeing >= 18, "assignments: {assignments:?}");
}

#[test]
fn test_same_seed_same_result() {
    let data = property_points();
    let mut a = KMeansClusterer::new(3).with_random_state(9);
    let mut b = KMeansClusterer::new(3).with_random_state(9);
    a.fit(&data).expect("fit a");
    b.fit(&data).expect("fit b");
    assert_eq!(a.labels().expect("a"), b.labels().expect("b"));
    assert_eq!(a.centroids().expect("a"), b.centroids().expect("b"));
}

#[test]
fn test_fit_with_injected_rng() {
    let data = sample_data();
    let mut rng = StdRng::seed_from_u64(123);
    let mut km = KMeansClusterer::new(2);
    km.fit_with_rng(&data, &mut rng).expect("fit");
    assert!(km.is_fitted());
    assert!(km.n_iter() >= 1 && km.n_iter() <= 100);
}

#[test]
fn test_inertia_matches_metric() {
    let data = sample_data();
    let mut km = KMeansClusterer::new(2).with_random_state(1);
    km.fit(&data).expect("fit");

    let scaled = crate::preprocessing::normalize(&data).expect("normalize");
    let expected = inertia(
        &scaled,
        km.centroids().expect("centroids"),
        km.labels().expect("labels"),
    )
    .expect("inertia");
    assert!((km.inertia() - expected).abs() < 1e-12);
    assert!(km.inertia() >= 0.0);
}

#[test]
fn test_k_equals_n_gives_zero_inertia() {
    let data = property_points();
    let mut km = KMeansClusterer::new(5).with_random_state(3);
    km.fit(&data).expect("fit");
    assert!(km.inertia() < 1e-12);
    assert_eq!(km.labels().expect("labels"), &[0, 1, 2, 3, 4]);
}

#[test]
fn test_duplicate_points_allowed() {
    let data = Matrix::from_rows(&[vec![1.0, 1.0], vec![1.0, 1.0], vec![1.0, 1.0]]).expect("3x2");
    for seed in 0..5 {
        let mut km = KMeansClusterer::new(2).with_random_state(seed);
        km.fit(&data).expect("fit");

        // Both seeds coincide, so every tie goes to cluster 0 and cluster 1
        // never receives a point.
        assert_eq!(km.labels().expect("labels"), &[0, 0, 0]);

        // A constant column standardizes to zero; the empty cluster keeps
        // the k-means++ seed it started from.
        let centroids = km.centroids().expect("centroids");
        assert_eq!(centroids.row_slice(1), &[0.0, 0.0]);
        assert_eq!(centroids.row_slice(0), &[0.0, 0.0]);
        assert_eq!(km.inertia(), 0.0);
    }
}

#[test]
fn test_assign_labels_ties_go_to_lowest_index() {
    let km = KMeansClusterer::new(2);
    let x = Matrix::from_rows(&[vec![0.0, 0.0], vec![0.0, 5.0]]).expect("2x2");

    // Both points are equidistant from the two centroids.
    assert_eq!(km.assign_labels(&x, &[1.0, 0.0, -1.0, 0.0]), vec![0, 0]);
    assert_eq!(km.assign_labels(&x, &[-1.0, 0.0, 1.0, 0.0]), vec![0, 0]);

    let km = KMeansClusterer::new(3);
    let centroids = [2.0, 0.0, 0.0, 2.0, -2.0, 0.0];
    let origin = Matrix::from_rows(&[vec![0.0, 0.0]]).expect("1x2");
    assert_eq!(km.assign_labels(&origin, &centroids), vec![0]);
}

#[test]
fn test_update_centroids_keeps_empty_cluster() {
    let km = KMeansClusterer::new(2);
    let x = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).expect("2x2");
    let previous = [0.0, 0.0, 7.0, -7.0];

    let updated = km.update_centroids(&x, &[0, 0], &previous);
    assert_eq!(updated, vec![2.0, 3.0, 7.0, -7.0]);
}

#[test]
fn test_predict_is_idempotent() {
    let data = property_points();
    let mut km = KMeansClusterer::new(3).with_random_state(4);
    km.fit(&data).expect("fit");
    assert_eq!(
        km.predict(&data).expect("first"),
        km.predict(&data).expect("second")
    );
}

#[test]
fn test_invalid_cluster_counts() {
    let data = property_points();
    for k in [0, 6] {
        let mut km = KMeansClusterer::new(k);
        assert!(matches!(
            km.fit(&data),
            Err(ValuatorError::InvalidHyperparameter { .. })
        ));
    }
}

#[test]
fn test_invalid_iteration_settings() {
    let data = sample_data();
    assert!(KMeansClusterer::new(2).with_max_iter(0).fit(&data).is_err());
    assert!(KMeansClusterer::new(2).with_tol(-1.0).fit(&data).is_err());
}

#[test]
fn test_empty_data() {
    let data = Matrix::from_vec(0, 2, vec![]).expect("0x2");
    let mut km = KMeansClusterer::new(1);
    assert!(matches!(
        km.fit(&data),
        Err(ValuatorError::EmptyInput { .. })
    ));
}

#[test]
fn test_predict_errors() {
    let km = KMeansClusterer::new(2);
    assert!(matches!(
        km.predict(&sample_data()),
        Err(ValuatorError::NotFitted { .. })
    ));

    let mut km = KMeansClusterer::new(2).with_random_state(0);
    km.fit(&sample_data()).expect("fit");
    let wide = Matrix::from_rows(&[vec![1.0, 2.0, 3.0]]).expect("1x3");
    assert!(matches!(
        km.predict(&wide),
        Err(ValuatorError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_relabel_orders_by_first_appearance() {
    let centroids = vec![0.0, 10.0, 20.0];
    let (labels, reordered) = relabel_by_first_appearance(vec![2, 2, 0, 2], &centroids, 1);
    assert_eq!(labels, vec![0, 0, 1, 0]);
    assert_eq!(reordered, vec![20.0, 0.0, 10.0]);
}
