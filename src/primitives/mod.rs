//! Core compute primitives (Vector, Matrix).
//!
//! These types provide the foundation for all models in the crate.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
