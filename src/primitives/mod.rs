//! Core compute primitives (Vector, Matrix).
//!
//! These types provide the dense storage every solver in the crate works on.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
