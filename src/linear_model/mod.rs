//! Lasso regression: fixed-penalty fits, cross-validated penalty selection
//! and the fitted models they produce.
//!
//! [`fit`] is the entry point. With `alpha` set in the [`LassoConfig`] it fits
//! once at that penalty; otherwise it hands over to
//! [`CrossValidator`](crate::model_selection::CrossValidator), which scores a
//! whole regularization path by k-fold cross-validation and refits at the
//! winning penalty.
//!
//! # Example
//!
//! ```
//! use lasso_cv::linear_model::{fit, LassoConfig};
//! use lasso_cv::primitives::{Matrix, Vector};
//!
//! // y = 2 * x0, x1 is noise
//! let x = Matrix::from_vec(6, 2, vec![
//!     1.0, 0.3,
//!     2.0, -0.1,
//!     3.0, 0.4,
//!     4.0, -0.2,
//!     5.0, 0.1,
//!     6.0, 0.0,
//! ]).unwrap();
//! let y = Vector::from_slice(&[2.0, 4.0, 6.0, 8.0, 10.0, 12.0]);
//!
//! let model = fit(&x, &y, &LassoConfig::default().with_alpha(0.05)).unwrap();
//! assert!(model.coefficients()[0] > 1.9);
//! assert_eq!(model.coefficients()[1], 0.0);
//! ```

mod config;
mod path;

pub use config::LassoConfig;
pub use path::{lasso_path, PathPoint, PenaltyPath, RegularizationPathBuilder};

use crate::data::Dataset;
use crate::error::{DegenerateReason, FitWarning, LassoError, Result};
use crate::metrics::r_squared;
use crate::model_selection::{CrossValidator, ValidationScore};
use crate::optim::CoordinateDescentSolver;
use crate::preprocessing::StandardizedDesign;
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Coefficients plus intercept on the raw feature scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    coefficients: Vector<f64>,
    intercept: f64,
}

impl LinearModel {
    /// Creates a model from raw-scale coefficients and an intercept.
    #[must_use]
    pub fn new(coefficients: Vector<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    /// Coefficients, one per feature.
    #[must_use]
    pub fn coefficients(&self) -> &Vector<f64> {
        &self.coefficients
    }

    /// Intercept term.
    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Number of features the model expects.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    /// Computes `X β + b`.
    ///
    /// # Errors
    ///
    /// Returns [`LassoError::DimensionMismatch`] if `x` has the wrong number
    /// of columns.
    pub fn predict(&self, x: &Matrix<f64>) -> Result<Vector<f64>> {
        if x.n_cols() != self.n_features() {
            return Err(LassoError::dimension_mismatch(
                "n_features",
                self.n_features(),
                x.n_cols(),
            ));
        }
        let beta = self.coefficients.as_slice();
        let predictions = (0..x.n_rows())
            .map(|i| {
                x.row_slice(i)
                    .iter()
                    .zip(beta)
                    .map(|(a, b)| a * b)
                    .sum::<f64>()
                    + self.intercept
            })
            .collect();
        Ok(Vector::from_vec(predictions))
    }

    /// Computes `y − (X β + b)`.
    ///
    /// # Errors
    ///
    /// Returns [`LassoError::DimensionMismatch`] if `x` has the wrong number
    /// of columns or `y` the wrong length.
    pub fn residual(&self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<Vector<f64>> {
        if y.len() != x.n_rows() {
            return Err(LassoError::dimension_mismatch("y.len()", x.n_rows(), y.len()));
        }
        Ok(y.sub(&self.predict(x)?))
    }
}

/// Result of [`fit`]: the final linear model and how it was obtained.
///
/// # Examples
///
/// ```
/// use lasso_cv::linear_model::{fit, LassoConfig};
/// use lasso_cv::primitives::{Matrix, Vector};
///
/// let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let y = Vector::from_slice(&[3.0, 6.0, 9.0, 12.0]);
///
/// let config = LassoConfig::default().with_alpha(0.0).with_tol(1e-10);
/// let model = fit(&x, &y, &config).unwrap();
/// assert!((model.coefficients()[0] - 3.0).abs() < 1e-6);
/// assert!(model.intercept().abs() < 1e-6);
/// assert_eq!(model.selected_alpha(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    model: LinearModel,
    alpha: f64,
    selected_alpha: Option<f64>,
    n_iterations: usize,
    dual_gap: f64,
    warnings: Vec<FitWarning>,
    cv: Option<ValidationScore>,
}

impl FittedModel {
    /// Raw-scale coefficients.
    #[must_use]
    pub fn coefficients(&self) -> &Vector<f64> {
        self.model.coefficients()
    }

    /// Intercept term.
    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.model.intercept()
    }

    /// Underlying coefficients and intercept.
    #[must_use]
    pub fn linear_model(&self) -> &LinearModel {
        &self.model
    }

    /// Penalty the returned coefficients were fitted at.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Penalty chosen by cross-validation; `None` for fixed-penalty fits and
    /// degenerate inputs.
    #[must_use]
    pub fn selected_alpha(&self) -> Option<f64> {
        self.selected_alpha
    }

    /// Sweeps performed by the final fit.
    #[must_use]
    pub fn n_iterations(&self) -> usize {
        self.n_iterations
    }

    /// Duality gap of the final fit.
    #[must_use]
    pub fn dual_gap(&self) -> f64 {
        self.dual_gap
    }

    /// Non-fatal conditions met while fitting.
    #[must_use]
    pub fn warnings(&self) -> &[FitWarning] {
        &self.warnings
    }

    /// Cross-validation scores, when the penalty was selected by CV.
    #[must_use]
    pub fn cv(&self) -> Option<&ValidationScore> {
        self.cv.as_ref()
    }

    /// Number of non-zero coefficients.
    #[must_use]
    pub fn n_nonzero(&self) -> usize {
        self.coefficients()
            .as_slice()
            .iter()
            .filter(|&&b| b != 0.0)
            .count()
    }

    /// `(index, value)` pairs of the non-zero coefficients.
    #[must_use]
    pub fn sparse_coefficients(&self) -> Vec<(usize, f64)> {
        self.coefficients()
            .as_slice()
            .iter()
            .enumerate()
            .filter(|(_, b)| **b != 0.0)
            .map(|(j, &b)| (j, b))
            .collect()
    }

    /// Predicts targets for `x`.
    ///
    /// # Errors
    ///
    /// Returns [`LassoError::DimensionMismatch`] on a feature-count mismatch.
    pub fn predict(&self, x: &Matrix<f64>) -> Result<Vector<f64>> {
        self.model.predict(x)
    }

    /// Residuals `y − ŷ`.
    ///
    /// # Errors
    ///
    /// Returns [`LassoError::DimensionMismatch`] on a shape mismatch.
    pub fn residual(&self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<Vector<f64>> {
        self.model.residual(x, y)
    }

    /// R² of the predictions for `x` against `y`.
    ///
    /// # Errors
    ///
    /// Returns [`LassoError::DimensionMismatch`] on a shape mismatch.
    pub fn score(&self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<f64> {
        let predictions = self.predict(x)?;
        if predictions.len() != y.len() {
            return Err(LassoError::dimension_mismatch(
                "y.len()",
                predictions.len(),
                y.len(),
            ));
        }
        Ok(r_squared(&predictions, y))
    }

    /// Saves the model to a binary file using bincode.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = bincode::serialize(self)?;
        fs::write(path, bytes)?;
        Ok(())
    }

    /// Loads a model from a binary file.
    ///
    /// # Errors
    ///
    /// Returns an error if file reading or deserialization fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path)?;
        Ok(bincode::deserialize(&bytes)?)
    }
}

/// Fits a Lasso model.
///
/// With `config.alpha` set, fits once at that penalty. Otherwise selects the
/// penalty by k-fold cross-validation and refits on all of `x`/`y`.
///
/// # Errors
///
/// Returns [`LassoError::InvalidInput`] for an invalid config, empty or
/// non-finite data, a `y.len()` that differs from the row count of `x`, or a
/// fold count outside `2..=n`.
pub fn fit(x: &Matrix<f64>, y: &Vector<f64>, config: &LassoConfig) -> Result<FittedModel> {
    config.validate()?;
    let data = Dataset::new(x, y)?;

    match config.alpha {
        Some(alpha) => fit_fixed(&data, alpha, config),
        None => CrossValidator::new(config).run(&data),
    }
}

/// Predicts targets for `x` with a fitted model.
///
/// # Errors
///
/// Returns [`LassoError::DimensionMismatch`] on a feature-count mismatch.
pub fn predict(model: &FittedModel, x: &Matrix<f64>) -> Result<Vector<f64>> {
    model.predict(x)
}

fn fit_fixed(data: &Dataset<'_>, alpha: f64, config: &LassoConfig) -> Result<FittedModel> {
    let design = StandardizedDesign::new(data.x(), data.y(), config.fit_intercept, config.normalize)?;
    let warnings = degenerate_warnings(&design);
    refit(&design, &config.solver(), alpha, None, warnings, None)
}

/// Fits `design` at `alpha` from a zero start and wraps the result.
pub(crate) fn refit(
    design: &StandardizedDesign,
    solver: &CoordinateDescentSolver,
    alpha: f64,
    selected_alpha: Option<f64>,
    mut warnings: Vec<FitWarning>,
    cv: Option<ValidationScore>,
) -> Result<FittedModel> {
    let out = solver.solve(design, alpha, None)?;
    if !out.status.is_converged() {
        let warning = FitWarning::NonConvergence {
            alpha,
            fold: None,
            iterations: out.n_iter,
            max_change: out.max_change,
        };
        log::warn!("{warning}");
        warnings.push(warning);
    }

    Ok(FittedModel {
        model: design.unstandardize(&out.coefficients)?,
        alpha,
        selected_alpha,
        n_iterations: out.n_iter,
        dual_gap: out.dual_gap,
        warnings,
        cv,
    })
}

/// All-zero model whose intercept is the target mean, for a path with
/// `alpha_max == 0`.
pub(crate) fn intercept_only(
    design: &StandardizedDesign,
    mut warnings: Vec<FitWarning>,
) -> Result<FittedModel> {
    if !design.is_constant_target() {
        let warning = FitWarning::NumericDegenerate {
            reason: DegenerateReason::ZeroAlphaMax,
        };
        log::warn!("{warning}");
        warnings.push(warning);
    }

    Ok(FittedModel {
        model: design.unstandardize(&vec![0.0; design.n_features()])?,
        alpha: 0.0,
        selected_alpha: None,
        n_iterations: 0,
        dual_gap: 0.0,
        warnings,
        cv: None,
    })
}

/// Warnings for a constant target and zero-variance columns of `design`.
pub(crate) fn degenerate_warnings(design: &StandardizedDesign) -> Vec<FitWarning> {
    let mut warnings = Vec::new();
    if design.is_constant_target() {
        warnings.push(FitWarning::NumericDegenerate {
            reason: DegenerateReason::ConstantTarget,
        });
    }
    warnings.extend(
        design
            .zero_variance_columns()
            .iter()
            .map(|&index| FitWarning::NumericDegenerate {
                reason: DegenerateReason::ZeroVarianceFeature { index },
            }),
    );
    for warning in &warnings {
        log::warn!("{warning}");
    }
    warnings
}

/// Lasso regression estimator.
///
/// A thin [`Estimator`] wrapper over [`fit`]: it owns a [`LassoConfig`] and,
/// after `fit`, the resulting [`FittedModel`].
///
/// # Examples
///
/// ```
/// use lasso_cv::prelude::*;
///
/// let x = Matrix::from_vec(8, 1, (1..=8).map(f64::from).collect()).unwrap();
/// let y = Vector::from_vec((1..=8).map(|v| 2.0 * f64::from(v) + 1.0).collect());
///
/// let mut lasso = Lasso::new(LassoConfig::default().with_cv_folds(4));
/// lasso.fit(&x, &y).unwrap();
/// let fitted = lasso.fitted().unwrap();
/// assert!(fitted.selected_alpha().is_some());
/// assert!(lasso.score(&x, &y).unwrap() > 0.99);
/// ```
#[derive(Debug, Clone)]
pub struct Lasso {
    config: LassoConfig,
    fitted: Option<FittedModel>,
}

impl Default for Lasso {
    fn default() -> Self {
        Self::new(LassoConfig::default())
    }
}

impl Lasso {
    /// Creates an unfitted estimator.
    #[must_use]
    pub fn new(config: LassoConfig) -> Self {
        Self {
            config,
            fitted: None,
        }
    }

    /// Configuration used by `fit`.
    #[must_use]
    pub fn config(&self) -> &LassoConfig {
        &self.config
    }

    /// The fitted model, if `fit` has succeeded.
    #[must_use]
    pub fn fitted(&self) -> Option<&FittedModel> {
        self.fitted.as_ref()
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    fn fitted_or_err(&self) -> Result<&FittedModel> {
        self.fitted.as_ref().ok_or(LassoError::NotFitted)
    }
}

impl Estimator for Lasso {
    fn fit(&mut self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<()> {
        self.fitted = Some(fit(x, y, &self.config)?);
        Ok(())
    }

    fn predict(&self, x: &Matrix<f64>) -> Result<Vector<f64>> {
        self.fitted_or_err()?.predict(x)
    }

    fn score(&self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<f64> {
        self.fitted_or_err()?.score(x, y)
    }
}
