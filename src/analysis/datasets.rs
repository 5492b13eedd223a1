//! Embedded property datasets.
//!
//! Five listings are encoded four different ways, one per model. Scores
//! are in `[0, 1]`, `area` is in square feet and `price` is in lakhs.

use crate::error::Result;
use crate::primitives::{Matrix, Vector};
use serde::Serialize;

/// The listings every dataset describes, in row order.
pub const LISTINGS: [&str; 5] = [
    "Gachibowli 2BHK",
    "Jubilee Hills 3BHK",
    "Banjara Hills 4BHK",
    "Madhapur 1BHK",
    "Kondapur 3BHK",
];

/// Listing prices in lakhs, the regression target.
pub const PRICES: [f64; 5] = [45.0, 85.0, 120.0, 35.0, 65.0];

/// A training matrix with its targets and one example query.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset<T> {
    /// Short identifier
    pub name: &'static str,
    /// Column names, in column order
    pub feature_names: &'static [&'static str],
    /// Training rows
    pub x: Matrix<f64>,
    /// Training targets
    pub targets: T,
    /// Example input the analysis predicts on
    pub query: Vec<f64>,
}

impl<T> Dataset<T> {
    /// The query as a one-row matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if the query is empty.
    pub fn query_matrix(&self) -> Result<Matrix<f64>> {
        Matrix::from_rows(&[self.query.clone()])
    }

    /// Pairs each feature name with the query value.
    pub fn named_query(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.feature_names.iter().copied().zip(self.query.iter().copied())
    }
}

/// Buy-now (1) / wait (0) labels over five property scores.
///
/// # Errors
///
/// Never fails for the embedded data; the `Result` comes from matrix
/// construction.
pub fn classification() -> Result<Dataset<Vec<usize>>> {
    Ok(Dataset {
        name: "classification",
        feature_names: &[
            "location_score",
            "property_type_score",
            "area",
            "price",
            "infrastructure_score",
        ],
        x: Matrix::from_rows(&[
            vec![0.9, 0.8, 1200.0, 45.0, 0.85],
            vec![0.95, 0.9, 2200.0, 85.0, 0.95],
            vec![0.9, 0.7, 3000.0, 120.0, 0.9],
            vec![0.85, 0.85, 650.0, 35.0, 0.8],
            vec![0.8, 0.8, 1800.0, 65.0, 0.75],
        ])?,
        targets: vec![1, 1, 0, 1, 0],
        query: vec![0.88, 0.82, 1500.0, 52.0, 0.83],
    })
}

/// Prices over area and three quality scores.
///
/// # Errors
///
/// Never fails for the embedded data.
pub fn regression() -> Result<Dataset<Vector<f64>>> {
    Ok(Dataset {
        name: "regression",
        feature_names: &["area", "location", "property_type", "infrastructure"],
        x: Matrix::from_rows(&[
            vec![1200.0, 0.9, 0.8, 0.85],
            vec![2200.0, 0.95, 0.9, 0.95],
            vec![3000.0, 0.9, 0.7, 0.9],
            vec![650.0, 0.85, 0.85, 0.8],
            vec![1800.0, 0.8, 0.8, 0.75],
        ])?,
        targets: Vector::from_slice(&PRICES),
        query: vec![1500.0, 0.88, 0.82, 0.83],
    })
}

/// Unlabelled listings for segmentation.
///
/// # Errors
///
/// Never fails for the embedded data.
pub fn clustering() -> Result<Dataset<()>> {
    Ok(Dataset {
        name: "clustering",
        feature_names: &["price", "area", "location_score", "infrastructure_score"],
        x: Matrix::from_rows(&[
            vec![45.0, 1200.0, 0.9, 0.85],
            vec![85.0, 2200.0, 0.95, 0.95],
            vec![120.0, 3000.0, 0.9, 0.9],
            vec![35.0, 650.0, 0.85, 0.8],
            vec![65.0, 1800.0, 0.8, 0.75],
        ])?,
        targets: (),
        query: vec![52.0, 1500.0, 0.88, 0.83],
    })
}

/// Prices over the regression features plus a binary `age` flag.
///
/// # Errors
///
/// Never fails for the embedded data.
pub fn ensemble() -> Result<Dataset<Vector<f64>>> {
    Ok(Dataset {
        name: "ensemble",
        feature_names: &[
            "area",
            "location",
            "property_type",
            "infrastructure",
            "age",
        ],
        x: Matrix::from_rows(&[
            vec![1200.0, 0.9, 0.8, 0.85, 1.0],
            vec![2200.0, 0.95, 0.9, 0.95, 0.0],
            vec![3000.0, 0.9, 0.7, 0.9, 0.0],
            vec![650.0, 0.85, 0.85, 0.8, 1.0],
            vec![1800.0, 0.8, 0.8, 0.75, 0.0],
        ])?,
        targets: Vector::from_slice(&PRICES),
        query: vec![1500.0, 0.88, 0.82, 0.83, 1.0],
    })
}
