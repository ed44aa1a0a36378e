//! Feature standardization for the coordinate-descent solver.
//!
//! [`StandardScaler`] is the reusable column transformer; [`StandardizedDesign`]
//! packages a centred/scaled copy of a dataset in the feature-major layout the
//! solver sweeps over, together with what is needed to map coefficients back
//! to the raw feature scale.

use crate::error::{LassoError, Result};
use crate::linear_model::LinearModel;
use crate::primitives::{Matrix, Vector};
use crate::traits::Transformer;
use serde::{Deserialize, Serialize};

/// Standardizes features by removing the mean and scaling to unit variance.
///
/// Columns whose values are all identical keep a scale factor of 1 and are
/// centred to exact zeros. A column with small but genuine spread is scaled
/// like any other.
///
/// # Example
///
/// ```
/// use lasso_cv::prelude::*;
/// use lasso_cv::preprocessing::StandardScaler;
///
/// let data = Matrix::from_vec(3, 2, vec![
///     0.0, 5.0,
///     1.0, 5.0,
///     2.0, 5.0,
/// ]).expect("valid matrix dimensions");
///
/// let mut scaler = StandardScaler::new();
/// let scaled = scaler.fit_transform(&data).expect("fit_transform should succeed");
///
/// // The constant second column is centred but not scaled.
/// assert_eq!(scaler.scale()[1], 1.0);
/// assert_eq!(scaled.get(0, 1), 0.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Mean of each feature (computed during fit).
    mean: Option<Vec<f64>>,
    /// Standard deviation of each feature (computed during fit).
    std: Option<Vec<f64>>,
    /// Indices of columns whose values are all identical.
    constant: Option<Vec<usize>>,
    /// Whether to center the data (subtract mean).
    with_mean: bool,
    /// Whether to scale the data (divide by std).
    with_std: bool,
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardScaler {
    /// Creates a new `StandardScaler` that both centres and scales.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mean: None,
            std: None,
            constant: None,
            with_mean: true,
            with_std: true,
        }
    }

    /// Sets whether to center the data by subtracting the mean.
    #[must_use]
    pub fn with_mean(mut self, with_mean: bool) -> Self {
        self.with_mean = with_mean;
        self
    }

    /// Sets whether to scale the data by dividing by standard deviation.
    #[must_use]
    pub fn with_std(mut self, with_std: bool) -> Self {
        self.with_std = with_std;
        self
    }

    /// Returns the mean of each feature, or an empty slice before `fit`.
    #[must_use]
    pub fn mean(&self) -> &[f64] {
        self.mean.as_deref().unwrap_or(&[])
    }

    /// Returns the standard deviation of each feature, or an empty slice before `fit`.
    #[must_use]
    pub fn std(&self) -> &[f64] {
        self.std.as_deref().unwrap_or(&[])
    }

    /// Per-feature offsets actually subtracted by [`Transformer::transform`].
    #[must_use]
    pub fn offset(&self) -> Vec<f64> {
        if self.with_mean {
            self.mean().to_vec()
        } else {
            vec![0.0; self.mean().len()]
        }
    }

    /// Per-feature divisors actually applied by [`Transformer::transform`].
    ///
    /// Constant columns, columns whose std underflows to a subnormal, and
    /// every column when scaling is disabled get 1.
    #[must_use]
    pub fn scale(&self) -> Vec<f64> {
        let constant = self.zero_variance_columns();
        self.std()
            .iter()
            .enumerate()
            .map(|(j, &s)| {
                let is_constant = constant.binary_search(&j).is_ok();
                if self.with_std && s >= f64::MIN_POSITIVE && !is_constant {
                    s
                } else {
                    1.0
                }
            })
            .collect()
    }

    /// Indices (ascending) of columns whose values are all identical.
    #[must_use]
    pub fn zero_variance_columns(&self) -> Vec<usize> {
        self.constant.clone().unwrap_or_default()
    }

    /// Returns true if the scaler has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.mean.is_some()
    }

    /// Maps standardized data back to the original feature scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the scaler is not fitted or the column count differs.
    pub fn inverse_transform(&self, x: &Matrix<f64>) -> Result<Matrix<f64>> {
        if !self.is_fitted() {
            return Err(LassoError::NotFitted);
        }
        let offset = self.offset();
        let scale = self.scale();
        let (n_samples, n_features) = x.shape();
        if n_features != offset.len() {
            return Err(LassoError::dimension_mismatch(
                "n_features",
                offset.len(),
                n_features,
            ));
        }

        let mut data = Vec::with_capacity(n_samples * n_features);
        for i in 0..n_samples {
            for j in 0..n_features {
                data.push(x.get(i, j) * scale[j] + offset[j]);
            }
        }
        Matrix::from_vec(n_samples, n_features, data).map_err(LassoError::invalid_input)
    }
}

impl Transformer for StandardScaler {
    /// Computes the mean and population standard deviation of each feature.
    fn fit(&mut self, x: &Matrix<f64>) -> Result<()> {
        let (n_samples, n_features) = x.shape();

        if n_samples == 0 {
            return Err(LassoError::invalid_input("Cannot fit with zero samples"));
        }

        let mut mean = vec![0.0; n_features];
        for i in 0..n_samples {
            for (j, mean_j) in mean.iter_mut().enumerate() {
                *mean_j += x.get(i, j);
            }
        }
        for mean_j in &mut mean {
            *mean_j /= n_samples as f64;
        }

        let mut std = vec![0.0; n_features];
        for i in 0..n_samples {
            for (j, std_j) in std.iter_mut().enumerate() {
                let diff = x.get(i, j) - mean[j];
                *std_j += diff * diff;
            }
        }
        // Population std (divide by n, not n-1) like sklearn
        for std_j in &mut std {
            *std_j = (*std_j / n_samples as f64).sqrt();
        }

        // Exact comparison; a tiny but real spread is not constant.
        let constant = (0..n_features)
            .filter(|&j| (1..n_samples).all(|i| x.get(i, j) == x.get(0, j)))
            .collect();

        self.mean = Some(mean);
        self.std = Some(std);
        self.constant = Some(constant);

        Ok(())
    }

    /// Standardizes the data using fitted mean and std.
    fn transform(&self, x: &Matrix<f64>) -> Result<Matrix<f64>> {
        if !self.is_fitted() {
            return Err(LassoError::NotFitted);
        }
        let offset = self.offset();
        let scale = self.scale();
        let zero_variance = self.zero_variance_columns();

        let (n_samples, n_features) = x.shape();
        if n_features != offset.len() {
            return Err(LassoError::dimension_mismatch(
                "n_features",
                offset.len(),
                n_features,
            ));
        }

        let mut result = Vec::with_capacity(n_samples * n_features);
        for i in 0..n_samples {
            for j in 0..n_features {
                let centred_constant = self.with_mean && zero_variance.binary_search(&j).is_ok();
                // Rounding in the mean would otherwise leave tiny non-zero entries.
                if centred_constant {
                    result.push(0.0);
                } else {
                    result.push((x.get(i, j) - offset[j]) / scale[j]);
                }
            }
        }

        Matrix::from_vec(n_samples, n_features, result).map_err(LassoError::invalid_input)
    }
}

/// A dataset prepared for coordinate descent.
///
/// Features are stored feature-major (one contiguous slice per column) after
/// optional centring and scaling; the target is centred when an intercept is
/// fitted. When `fit_intercept` is false nothing is centred and `normalize`
/// is ignored.
#[derive(Debug, Clone)]
pub struct StandardizedDesign {
    xt: Matrix<f64>,
    y: Vector<f64>,
    x_offset: Vec<f64>,
    x_scale: Vec<f64>,
    y_offset: f64,
    col_norm_sq: Vec<f64>,
    zero_variance: Vec<usize>,
    constant_target: bool,
    fit_intercept: bool,
}

impl StandardizedDesign {
    /// Centres and optionally scales `x`/`y`.
    ///
    /// # Errors
    ///
    /// Returns [`LassoError::InvalidInput`] if the target length differs from
    /// the row count of `x`.
    pub fn new(
        x: &Matrix<f64>,
        y: &Vector<f64>,
        fit_intercept: bool,
        normalize: bool,
    ) -> Result<Self> {
        let (n_samples, n_features) = x.shape();
        if n_samples != y.len() {
            return Err(LassoError::invalid_input(format!(
                "x has {n_samples} rows but y has {} values",
                y.len()
            )));
        }

        let mut scaler = StandardScaler::new()
            .with_mean(fit_intercept)
            .with_std(fit_intercept && normalize);
        let x_std = scaler.fit_transform(x)?;

        let zero_variance = if fit_intercept {
            scaler.zero_variance_columns()
        } else {
            Vec::new()
        };

        let ys = y.as_slice();
        let constant_target = ys.iter().all(|&v| v == ys[0]);
        let (y_centred, y_offset) = if fit_intercept {
            let y_mean = if constant_target { ys[0] } else { y.mean() };
            let centred = if constant_target {
                Vector::zeros(n_samples)
            } else {
                y.add_scalar(-y_mean)
            };
            (centred, y_mean)
        } else {
            (y.clone(), 0.0)
        };

        let xt = x_std.transpose();
        let col_norm_sq = (0..n_features)
            .map(|j| xt.row_slice(j).iter().map(|v| v * v).sum())
            .collect();

        Ok(Self {
            xt,
            y: y_centred,
            x_offset: scaler.offset(),
            x_scale: scaler.scale(),
            y_offset,
            col_norm_sq,
            zero_variance,
            constant_target: fit_intercept && constant_target,
            fit_intercept,
        })
    }

    /// Number of samples.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.xt.n_cols()
    }

    /// Number of features.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.xt.n_rows()
    }

    /// Standardized column `j`.
    #[must_use]
    pub fn feature(&self, j: usize) -> &[f64] {
        self.xt.row_slice(j)
    }

    /// Centred target.
    #[must_use]
    pub fn target(&self) -> &[f64] {
        self.y.as_slice()
    }

    /// Squared Euclidean norm of standardized column `j`.
    #[must_use]
    pub fn col_norm_sq(&self, j: usize) -> f64 {
        self.col_norm_sq[j]
    }

    /// Columns that had zero variance before standardization.
    #[must_use]
    pub fn zero_variance_columns(&self) -> &[usize] {
        &self.zero_variance
    }

    /// True when an intercept is fitted and every target value is identical.
    #[must_use]
    pub fn is_constant_target(&self) -> bool {
        self.constant_target
    }

    /// Smallest penalty for which every coefficient is zero:
    /// `max_j |X_j · y| / n`.
    #[must_use]
    pub fn alpha_max(&self) -> f64 {
        let n = self.n_samples() as f64;
        let y = self.target();
        (0..self.n_features())
            .map(|j| {
                self.feature(j)
                    .iter()
                    .zip(y)
                    .map(|(a, b)| a * b)
                    .sum::<f64>()
                    .abs()
            })
            .fold(0.0, f64::max)
            / n
    }

    /// Maps standardized coefficients back to the raw feature scale.
    ///
    /// # Errors
    ///
    /// Returns [`LassoError::DimensionMismatch`] if `coefficients.len()`
    /// differs from the feature count.
    pub fn unstandardize(&self, coefficients: &[f64]) -> Result<LinearModel> {
        if coefficients.len() != self.n_features() {
            return Err(LassoError::dimension_mismatch(
                "coefficients.len()",
                self.n_features(),
                coefficients.len(),
            ));
        }
        let raw: Vec<f64> = coefficients
            .iter()
            .zip(&self.x_scale)
            .map(|(b, s)| b / s)
            .collect();
        let intercept = if self.fit_intercept {
            self.y_offset
                - raw
                    .iter()
                    .zip(&self.x_offset)
                    .map(|(b, m)| b * m)
                    .sum::<f64>()
        } else {
            0.0
        };
        Ok(LinearModel::new(Vector::from_vec(raw), intercept))
    }
}
