//! Validated (X, y) pairs.

use crate::error::{LassoError, Result};
use crate::primitives::{Matrix, Vector};

/// A borrowed, validated regression dataset.
///
/// The caller owns `x` and `y`; every component of the crate reads them
/// through this view. Construction rejects empty shapes, mismatched lengths
/// and non-finite values, so downstream code can assume clean numeric input.
///
/// # Examples
///
/// ```
/// use lasso_cv::data::Dataset;
/// use lasso_cv::primitives::{Matrix, Vector};
///
/// let x = Matrix::from_vec(3, 1, vec![1.0, 2.0, 3.0]).unwrap();
/// let y = Vector::from_slice(&[2.0, 4.0, 6.0]);
/// let data = Dataset::new(&x, &y).unwrap();
/// assert_eq!(data.n_samples(), 3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Dataset<'a> {
    x: &'a Matrix<f64>,
    y: &'a Vector<f64>,
}

impl<'a> Dataset<'a> {
    /// Validates and wraps a feature matrix and target vector.
    ///
    /// # Errors
    ///
    /// Returns [`LassoError::InvalidInput`] when n = 0, p = 0, the row count
    /// differs from the target length, or a value is NaN/infinite.
    pub fn new(x: &'a Matrix<f64>, y: &'a Vector<f64>) -> Result<Self> {
        let (n_samples, n_features) = x.shape();

        if n_samples == 0 {
            return Err(LassoError::invalid_input("Cannot fit with zero samples"));
        }
        if n_features == 0 {
            return Err(LassoError::invalid_input("Cannot fit with zero features"));
        }
        if n_samples != y.len() {
            return Err(LassoError::invalid_input(format!(
                "x has {n_samples} rows but y has {} values",
                y.len()
            )));
        }
        if !x.is_finite() {
            return Err(LassoError::invalid_input(
                "feature matrix contains NaN or infinite values",
            ));
        }
        if !y.is_finite() {
            return Err(LassoError::invalid_input(
                "target vector contains NaN or infinite values",
            ));
        }

        Ok(Self { x, y })
    }

    /// Feature matrix.
    #[must_use]
    pub fn x(&self) -> &'a Matrix<f64> {
        self.x
    }

    /// Target vector.
    #[must_use]
    pub fn y(&self) -> &'a Vector<f64> {
        self.y
    }

    /// Number of samples (rows).
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.x.n_rows()
    }

    /// Number of features (columns).
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.x.n_cols()
    }

    /// Materialises the rows at `indices` as an independent pair.
    #[must_use]
    pub fn subset(&self, indices: &[usize]) -> (Matrix<f64>, Vector<f64>) {
        (self.x.select_rows(indices), self.y.select(indices))
    }
}
