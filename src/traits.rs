//! Core traits for estimators and transformers.
//!
//! These traits define the API contracts shared by the Lasso estimator and the
//! feature scaler.

use crate::error::Result;
use crate::primitives::{Matrix, Vector};

/// Primary trait for supervised learning estimators.
///
/// Estimators implement fit/predict/score following sklearn conventions.
///
/// # Examples
///
/// ```
/// use lasso_cv::prelude::*;
///
/// // y = 2x + 1
/// let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
///
/// let mut model = Lasso::new(LassoConfig::default().with_alpha(0.0).with_tol(1e-10));
/// model.fit(&x, &y).unwrap();
/// let score = model.score(&x, &y).unwrap();
/// assert!(score > 0.99);
/// ```
pub trait Estimator {
    /// Fits the model to training data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails (dimension mismatch, invalid parameters, etc.).
    fn fit(&mut self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<()>;

    /// Predicts target values for input data.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or the feature count differs.
    fn predict(&self, x: &Matrix<f64>) -> Result<Vector<f64>>;

    /// Computes the R² score.
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as [`Estimator::predict`].
    fn score(&self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<f64>;
}

/// Trait for data transformers (scalers).
///
/// ```text
/// let mut scaler = StandardScaler::new();
/// let x_scaled = scaler.fit_transform(&x)?;
/// let x_test_scaled = scaler.transform(&x_test)?;
/// ```
pub trait Transformer {
    /// Fits the transformer to data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit(&mut self, x: &Matrix<f64>) -> Result<()>;

    /// Transforms data using fitted parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if transformer is not fitted.
    fn transform(&self, x: &Matrix<f64>) -> Result<Matrix<f64>>;

    /// Fits and transforms in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit_transform(&mut self, x: &Matrix<f64>) -> Result<Matrix<f64>> {
        self.fit(x)?;
        self.transform(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LassoError;

    // Mock transformer to test trait default methods
    struct MockTransformer {
        fitted: bool,
        scale: f64,
    }

    impl Transformer for MockTransformer {
        fn fit(&mut self, x: &Matrix<f64>) -> Result<()> {
            if x.n_rows() == 0 {
                return Err(LassoError::invalid_input("empty matrix"));
            }
            self.scale = x.as_slice().iter().map(|v| v.abs()).fold(0.0, f64::max);
            if self.scale == 0.0 {
                self.scale = 1.0;
            }
            self.fitted = true;
            Ok(())
        }

        fn transform(&self, x: &Matrix<f64>) -> Result<Matrix<f64>> {
            if !self.fitted {
                return Err(LassoError::NotFitted);
            }
            let data = x.as_slice().iter().map(|v| v / self.scale).collect();
            Matrix::from_vec(x.n_rows(), x.n_cols(), data).map_err(LassoError::invalid_input)
        }
    }

    #[test]
    fn test_transformer_fit_transform_default() {
        let mut transformer = MockTransformer {
            fitted: false,
            scale: 1.0,
        };
        let x = Matrix::from_vec(2, 2, vec![2.0, 4.0, 6.0, 8.0]).expect("matrix");

        let transformed = transformer.fit_transform(&x).expect("should succeed");
        assert_eq!(transformed.shape(), (2, 2));
        assert!((transformed.get(1, 1) - 1.0).abs() < 1e-12);
        assert!(transformer.fitted);
    }

    #[test]
    fn test_transform_before_fit_fails() {
        let transformer = MockTransformer {
            fitted: false,
            scale: 1.0,
        };
        let x = Matrix::from_vec(1, 1, vec![1.0]).expect("matrix");
        assert!(matches!(
            transformer.transform(&x),
            Err(LassoError::NotFitted)
        ));
    }
}
