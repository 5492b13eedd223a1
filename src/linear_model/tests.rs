use super::*;

fn property_rows() -> (Matrix<f64>, Vector<f64>) {
    let x = Matrix::from_rows(&[
        vec![1200.0, 0.9, 0.8, 0.85],
        vec![2200.0, 0.95, 0.9, 0.95],
        vec![3000.0, 0.9, 0.7, 0.9],
        vec![650.0, 0.85, 0.85, 0.8],
        vec![1800.0, 0.8, 0.8, 0.75],
    ])
    .expect("5x4");
    let y = Vector::from_slice(&[45.0, 85.0, 120.0, 35.0, 65.0]);
    (x, y)
}

#[test]
fn test_new() {
    let model = LinearRegressionModel::new();
    assert!(!model.is_fitted());
    assert_eq!(model.epochs, 1000);
    assert!((model.learning_rate - 0.01).abs() < 1e-12);
    assert!(model.loss_history().is_empty());
}

#[test]
fn test_simple_regression() {
    // y = 2x + 1
    let x = Matrix::from_rows(&[vec![1.0], vec![2.0], vec![3.0], vec![4.0]]).expect("4x1");
    let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);

    let mut model = LinearRegressionModel::new().with_learning_rate(0.1);
    model.fit(&x, &y).expect("fit");

    let predictions = model.predict(&x).expect("predict");
    for (p, t) in predictions.iter().zip(y.iter()) {
        assert!((p - t).abs() < 1e-6, "predicted {p}, expected {t}");
    }
    // Standardized feature: the bias converges to mean(y).
    assert!((model.bias() - 6.0).abs() < 1e-6);
}

#[test]
fn test_loss_history_is_non_increasing() {
    let (x, y) = property_rows();
    let mut model = LinearRegressionModel::new();
    model.fit(&x, &y).expect("fit");

    let history = model.loss_history();
    assert_eq!(history.len(), 1000);
    for pair in history.windows(2) {
        assert!(pair[1] <= pair[0] + 1e-9);
    }
}

#[test]
fn test_property_query_is_finite() {
    let (x, y) = property_rows();
    let mut model = LinearRegressionModel::new();
    model.fit(&x, &y).expect("fit");

    let query = Matrix::from_rows(&[vec![1500.0, 0.88, 0.82, 0.83]]).expect("1x4");
    let prediction = model.predict(&query).expect("predict");
    assert_eq!(prediction.len(), 1);
    assert!(prediction[0].is_finite());
    // Per-call standardization maps a single row to zeros.
    assert_eq!(prediction[0], model.bias());
}

#[test]
fn test_fit_statistics_mode_uses_query_features() {
    let (x, y) = property_rows();
    let mut model =
        LinearRegressionModel::new().with_normalization(NormalizationMode::FitStatistics);
    model.fit(&x, &y).expect("fit");

    let small = Matrix::from_rows(&[vec![700.0, 0.85, 0.85, 0.8]]).expect("1x4");
    let large = Matrix::from_rows(&[vec![2900.0, 0.9, 0.7, 0.9]]).expect("1x4");
    let small_price = model.predict(&small).expect("predict")[0];
    let large_price = model.predict(&large).expect("predict")[0];
    assert!(large_price > small_price);
}

#[test]
fn test_feature_importance_sums_to_one() {
    let (x, y) = property_rows();
    let mut model = LinearRegressionModel::new();
    model.fit(&x, &y).expect("fit");

    let importance = model.feature_importance().expect("importance");
    assert_eq!(importance.len(), 4);
    assert!((importance.iter().sum::<f64>() - 1.0).abs() < 1e-6);
    assert!(importance.iter().all(|&v| v >= 0.0));
}

#[test]
fn test_feature_importance_zero_weights_is_uniform() {
    let (x, y) = property_rows();
    let mut model = LinearRegressionModel::new().with_epochs(0);
    model.fit(&x, &y).expect("fit");
    assert_eq!(model.feature_importance().expect("importance"), vec![0.25; 4]);
}

#[test]
fn test_predict_is_idempotent() {
    let (x, y) = property_rows();
    let mut model = LinearRegressionModel::new();
    model.fit(&x, &y).expect("fit");
    assert_eq!(
        model.predict(&x).expect("first"),
        model.predict(&x).expect("second")
    );
}

#[test]
fn test_dimension_mismatch_error() {
    let (x, _) = property_rows();
    let y = Vector::from_slice(&[1.0, 2.0]);
    let mut model = LinearRegressionModel::new();
    assert!(matches!(
        model.fit(&x, &y),
        Err(ValuatorError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_predict_wrong_width() {
    let (x, y) = property_rows();
    let mut model = LinearRegressionModel::new();
    model.fit(&x, &y).expect("fit");
    let narrow = Matrix::from_rows(&[vec![1500.0, 0.88]]).expect("1x2");
    assert!(matches!(
        model.predict(&narrow),
        Err(ValuatorError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_empty_data_error() {
    let x = Matrix::from_vec(0, 2, vec![]).expect("0x2");
    let y = Vector::from_vec(vec![]);
    let mut model = LinearRegressionModel::new();
    assert!(matches!(
        model.fit(&x, &y),
        Err(ValuatorError::EmptyInput { .. })
    ));
}

#[test]
fn test_non_finite_target_rejected() {
    let (x, _) = property_rows();
    let y = Vector::from_slice(&[45.0, f64::NAN, 120.0, 35.0, 65.0]);
    let mut model = LinearRegressionModel::new();
    assert!(matches!(
        model.fit(&x, &y),
        Err(ValuatorError::NonFinite { .. })
    ));
}

#[test]
fn test_invalid_learning_rate() {
    let (x, y) = property_rows();
    let mut model = LinearRegressionModel::new().with_learning_rate(-0.1);
    assert!(matches!(
        model.fit(&x, &y),
        Err(ValuatorError::InvalidHyperparameter { .. })
    ));
}

#[test]
fn test_not_fitted() {
    let model = LinearRegressionModel::new();
    let (x, _) = property_rows();
    assert!(model.predict(&x).is_err());
    assert!(model.feature_importance().is_err());
}
