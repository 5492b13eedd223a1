use super::*;

#[test]
fn test_dot_commutative() {
    let u = Vector::from_slice(&[1.0, 2.0, 3.0]);
    let v = Vector::from_slice(&[4.0, 5.0, 6.0]);

    assert!((u.dot(&v) - v.dot(&u)).abs() < 1e-12);
    assert!((u.dot(&v) - 32.0).abs() < 1e-12);
}

#[test]
fn test_dot_orthogonal_is_zero() {
    let u = Vector::from_slice(&[1.0, 0.0, 2.0]);
    let v = Vector::from_slice(&[0.0, 3.0, 0.0]);
    assert_eq!(u.dot(&v), 0.0);
}

#[test]
fn test_mean_equals_sum_over_len() {
    let v = Vector::from_slice(&[2.0, 4.0, 6.0, 8.0, 10.0]);
    assert!((v.mean() - v.sum() / v.len() as f64).abs() < 1e-12);
    assert!((v.mean() - 6.0).abs() < 1e-12);
}

#[test]
fn test_empty_mean_is_zero() {
    let v = Vector::zeros(0);
    assert!(v.is_empty());
    assert_eq!(v.mean(), 0.0);
    assert_eq!(v.min(), None);
}

#[test]
fn test_min_max() {
    let v = Vector::from_slice(&[45.0, 85.0, 120.0, 35.0, 65.0]);
    assert_eq!(v.min(), Some(35.0));
    assert_eq!(v.max(), Some(120.0));
}

#[test]
fn test_index_mut() {
    let mut v = Vector::zeros(3);
    v[1] = 2.5;
    assert_eq!(v.as_slice(), &[0.0, 2.5, 0.0]);
}

#[test]
#[should_panic(expected = "Vectors must have same length")]
fn test_dot_length_mismatch_panics() {
    let u = Vector::from_slice(&[1.0, 2.0]);
    let v = Vector::from_slice(&[1.0]);
    let _ = u.dot(&v);
}
