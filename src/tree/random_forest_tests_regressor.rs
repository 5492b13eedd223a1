use super::*;

fn property_rows() -> (Matrix<f64>, Vector<f64>) {
    let x = Matrix::from_rows(&[
        vec![1200.0, 0.9, 0.8, 0.85, 1.0],
        vec![2200.0, 0.95, 0.9, 0.95, 0.0],
        vec![3000.0, 0.9, 0.7, 0.9, 0.0],
        vec![650.0, 0.85, 0.85, 0.8, 1.0],
        vec![1800.0, 0.8, 0.8, 0.75, 0.0],
    ])
    .expect("5x5");
    let y = Vector::from_slice(&[45.0, 85.0, 120.0, 35.0, 65.0]);
    (x, y)
}

#[test]
fn test_random_forest_regressor_creation() {
    let rf = RandomForestRegressor::default();
    assert_eq!(rf.n_trees(), 10);
    assert_eq!(rf.max_depth, 5);
    assert_eq!(rf.min_samples_split, 2);
    assert!(!rf.is_fitted());
    assert!(rf.feature_importances().is_err());
}

#[test]
fn test_random_forest_regressor_builders() {
    let rf = RandomForestRegressor::new(3)
        .with_max_depth(2)
        .with_min_samples_split(4)
        .with_random_state(8);
    assert_eq!(rf.n_trees(), 3);
    assert_eq!(rf.max_depth, 2);
    assert_eq!(rf.min_samples_split, 4);
    assert_eq!(rf.random_state, Some(8));
}

#[test]
fn test_random_forest_regressor_fit_simple_linear() {
    // y = 2x + 1
    let x = Matrix::from_vec(
        10,
        1,
        vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
    )
    .expect("10x1");
    let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0, 11.0, 13.0, 15.0, 17.0, 19.0, 21.0]);

    let mut rf = RandomForestRegressor::new(10).with_random_state(42);
    rf.fit(&x, &y).expect("fit should succeed");

    assert_eq!(rf.trees().len(), 10);
    let r2 = rf.score(&x, &y).expect("score");
    assert!(r2 > 0.8, "R² should be high on training data: {r2}");
}

#[test]
fn test_property_query_within_target_range() {
    let (x, y) = property_rows();
    let query = Matrix::from_rows(&[vec![1500.0, 0.88, 0.82, 0.83, 1.0]]).expect("1x5");

    for seed in 0..20 {
        let mut rf = RandomForestRegressor::new(10).with_random_state(seed);
        rf.fit(&x, &y).expect("fit");
        let p = rf.predict(&query).expect("predict")[0];
        assert!((35.0..=120.0).contains(&p), "seed {seed}: {p}");
    }
}

#[test]
fn test_feature_importances_sum_to_one() {
    let (x, y) = property_rows();
    for seed in 0..10 {
        let mut rf = RandomForestRegressor::new(10).with_random_state(seed);
        rf.fit(&x, &y).expect("fit");
        let importances = rf.feature_importances().expect("importances");
        assert_eq!(importances.len(), 5);
        let total: f64 = importances.iter().sum();
        assert!((total - 1.0).abs() < 1e-6, "seed {seed}: {importances:?}");
    }
}

#[test]
fn test_single_root_leaf_tree_predicts_within_range() {
    let (x, y) = property_rows();
    let mut rf = RandomForestRegressor::new(1)
        .with_max_depth(0)
        .with_random_state(5);
    rf.fit(&x, &y).expect("fit");

    let p = rf.predict(&x).expect("predict");
    // A lone root leaf predicts the mean of its bootstrap targets everywhere.
    assert!(p.iter().all(|&v| v == p[0]));
    assert!((35.0..=120.0).contains(&p[0]));
}

#[test]
fn test_root_leaf_forest_has_uniform_importances() {
    // Constant predictions never change under permutation.
    let (x, y) = property_rows();
    let mut rf = RandomForestRegressor::new(4)
        .with_max_depth(0)
        .with_random_state(2);
    rf.fit(&x, &y).expect("fit");
    assert_eq!(rf.feature_importances().expect("importances"), &[0.2; 5]);
}

#[test]
fn test_seeded_forest_is_reproducible() {
    let (x, y) = property_rows();
    let mut a = RandomForestRegressor::new(10).with_random_state(77);
    let mut b = RandomForestRegressor::new(10).with_random_state(77);
    a.fit(&x, &y).expect("fit a");
    b.fit(&x, &y).expect("fit b");

    assert_eq!(a.predict(&x).expect("a"), b.predict(&x).expect("b"));
    assert_eq!(
        a.feature_importances().expect("a"),
        b.feature_importances().expect("b")
    );
}

#[test]
fn test_predict_is_idempotent() {
    let (x, y) = property_rows();
    let mut rf = RandomForestRegressor::new(10).with_random_state(3);
    rf.fit(&x, &y).expect("fit");
    assert_eq!(rf.predict(&x).expect("first"), rf.predict(&x).expect("second"));
}

#[test]
fn test_fit_with_injected_rng() {
    let (x, y) = property_rows();
    let mut rng = StdRng::seed_from_u64(21);
    let mut rf = RandomForestRegressor::new(6);
    rf.fit_with_rng(&x, &y, &mut rng).expect("fit");
    assert_eq!(rf.trees().len(), 6);
}

#[test]
fn test_bootstrap_sample_indices_in_range() {
    let mut rng = StdRng::seed_from_u64(0);
    let sample = bootstrap_sample(5, &mut rng);
    assert_eq!(sample.len(), 5);
    assert!(sample.iter().all(|&i| i < 5));
}

#[test]
fn test_random_forest_errors() {
    let (x, y) = property_rows();
    assert!(matches!(
        RandomForestRegressor::new(0).fit(&x, &y),
        Err(ValuatorError::InvalidHyperparameter { .. })
    ));
    assert!(matches!(
        RandomForestRegressor::new(3).predict(&x),
        Err(ValuatorError::NotFitted { .. })
    ));

    let mut rf = RandomForestRegressor::new(3).with_random_state(1);
    rf.fit(&x, &y).expect("fit");
    let narrow = Matrix::from_rows(&[vec![1500.0, 0.88]]).expect("1x2");
    assert!(matches!(
        rf.predict(&narrow),
        Err(ValuatorError::DimensionMismatch { .. })
    ));
}
