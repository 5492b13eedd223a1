use super::*;

#[test]
fn test_r_squared_perfect_fit() {
    let y = Vector::from_slice(&[45.0, 85.0, 120.0, 35.0, 65.0]);
    let r2 = r_squared(&y, &y).expect("same length");
    assert!((r2 - 1.0).abs() < 1e-12);
}

#[test]
fn test_r_squared_constant_target_is_zero() {
    let y_true = Vector::from_slice(&[5.0, 5.0, 5.0]);
    let y_pred = Vector::from_slice(&[4.0, 5.0, 6.0]);
    assert_eq!(r_squared(&y_pred, &y_true).expect("same length"), 0.0);
}

#[test]
fn test_mse_and_mae() {
    let y_true = Vector::from_slice(&[1.0, 2.0, 3.0]);
    let y_pred = Vector::from_slice(&[2.0, 2.0, 1.0]);
    assert!((mse(&y_pred, &y_true).expect("ok") - 5.0 / 3.0).abs() < 1e-12);
    assert!((mae(&y_pred, &y_true).expect("ok") - 1.0).abs() < 1e-12);
}

#[test]
fn test_mse_non_negative() {
    let y_true = Vector::from_slice(&[-3.0, 0.5, 10.0]);
    let y_pred = Vector::from_slice(&[3.0, -0.5, 11.0]);
    assert!(mse(&y_pred, &y_true).expect("ok") >= 0.0);
}

#[test]
fn test_length_mismatch_is_error() {
    let y_true = Vector::from_slice(&[1.0, 2.0, 3.0]);
    let y_pred = Vector::from_slice(&[1.0, 2.0]);
    assert!(matches!(
        mse(&y_pred, &y_true),
        Err(ValuatorError::DimensionMismatch { .. })
    ));
    assert!(r_squared(&y_pred, &y_true).is_err());
}

#[test]
fn test_empty_is_error() {
    let empty = Vector::from_vec(Vec::new());
    assert!(matches!(
        mae(&empty, &empty),
        Err(ValuatorError::EmptyInput { .. })
    ));
}

#[test]
fn test_inertia() {
    let data = Matrix::from_vec(4, 2, vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0])
        .expect("4x2 matrix");
    let centroids = Matrix::from_vec(1, 2, vec![0.5, 0.5]).expect("1x2 matrix");
    let score = inertia(&data, &centroids, &[0, 0, 0, 0]).expect("valid labels");
    assert!((score - 2.0).abs() < 1e-12);
}

#[test]
fn test_inertia_rejects_unknown_label() {
    let data = Matrix::from_vec(1, 2, vec![0.0, 0.0]).expect("1x2 matrix");
    let centroids = Matrix::from_vec(1, 2, vec![0.5, 0.5]).expect("1x2 matrix");
    assert!(inertia(&data, &centroids, &[1]).is_err());
}
