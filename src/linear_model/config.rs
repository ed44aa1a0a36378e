//! Configuration for Lasso fitting.

use super::path::RegularizationPathBuilder;
use crate::error::{LassoError, Result};
use crate::model_selection::KFold;
use crate::optim::CoordinateDescentSolver;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Immutable settings passed to [`fit`](super::fit).
///
/// When `alpha` is set the model is fitted once at that penalty; otherwise the
/// penalty is chosen by k-fold cross-validation over a regularization path.
///
/// # Examples
///
/// ```
/// use lasso_cv::linear_model::LassoConfig;
///
/// let config = LassoConfig::default()
///     .with_cv_folds(3)
///     .with_n_alphas(50)
///     .with_random_state(7);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.cv_folds, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LassoConfig {
    /// Fixed penalty strength; skips cross-validation when set.
    pub alpha: Option<f64>,
    /// Explicit penalty path for cross-validation, bypassing the computed one.
    pub alphas: Option<Vec<f64>>,
    /// Number of penalties on the computed path.
    pub n_alphas: usize,
    /// Ratio `alpha_min / alpha_max` of the computed path.
    pub eps: f64,
    /// Number of cross-validation folds.
    pub cv_folds: usize,
    /// Shuffle samples before assigning folds.
    pub shuffle: bool,
    /// Seed for fold shuffling; implies `shuffle`.
    pub random_state: Option<u64>,
    /// Maximum coordinate-descent sweeps per fit.
    pub max_iter: usize,
    /// Convergence tolerance on the largest coefficient change.
    pub tol: f64,
    /// Centre features and target and fit an intercept.
    pub fit_intercept: bool,
    /// Scale features to unit variance before fitting (only with an intercept).
    pub normalize: bool,
    /// Wall-clock budget for cross-validation.
    pub max_duration: Option<Duration>,
}

impl Default for LassoConfig {
    fn default() -> Self {
        Self {
            alpha: None,
            alphas: None,
            n_alphas: 100,
            eps: 1e-3,
            cv_folds: 5,
            shuffle: false,
            random_state: None,
            max_iter: 1000,
            tol: 1e-4,
            fit_intercept: true,
            normalize: false,
            max_duration: None,
        }
    }
}

impl LassoConfig {
    /// Fixes the penalty strength (disables cross-validation).
    #[must_use]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// Supplies an explicit penalty path for cross-validation.
    #[must_use]
    pub fn with_alphas(mut self, alphas: Vec<f64>) -> Self {
        self.alphas = Some(alphas);
        self
    }

    /// Sets the number of penalties on the computed path.
    #[must_use]
    pub fn with_n_alphas(mut self, n_alphas: usize) -> Self {
        self.n_alphas = n_alphas;
        self
    }

    /// Sets the `alpha_min / alpha_max` ratio of the computed path.
    #[must_use]
    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    /// Sets the number of cross-validation folds.
    #[must_use]
    pub fn with_cv_folds(mut self, cv_folds: usize) -> Self {
        self.cv_folds = cv_folds;
        self
    }

    /// Enables shuffling before fold assignment.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Sets the shuffle seed for reproducible folds.
    #[must_use]
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self.shuffle = true;
        self
    }

    /// Sets the maximum number of sweeps per fit.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the convergence tolerance.
    #[must_use]
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Sets whether to fit an intercept term.
    #[must_use]
    pub fn with_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Sets whether to scale features to unit variance.
    #[must_use]
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Sets a wall-clock budget for cross-validation.
    #[must_use]
    pub fn with_max_duration(mut self, max_duration: Duration) -> Self {
        self.max_duration = Some(max_duration);
        self
    }

    /// Checks every field that can be checked without data.
    ///
    /// Custom `alphas` are validated when the path is built, and `cv_folds`
    /// is checked against the sample count when folds are assigned.
    ///
    /// # Errors
    ///
    /// Returns [`LassoError::InvalidInput`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if let Some(alpha) = self.alpha {
            if !alpha.is_finite() || alpha < 0.0 {
                return Err(LassoError::invalid_input(format!(
                    "alpha must be a non-negative finite number, got {alpha}"
                )));
            }
        }
        if self.n_alphas == 0 {
            return Err(LassoError::invalid_input("n_alphas must be at least 1"));
        }
        if !(self.eps > 0.0 && self.eps < 1.0) {
            return Err(LassoError::invalid_input(format!(
                "eps must be in (0, 1), got {}",
                self.eps
            )));
        }
        if self.cv_folds < 2 {
            return Err(LassoError::invalid_input(format!(
                "cv_folds must be at least 2, got {}",
                self.cv_folds
            )));
        }
        if self.max_iter == 0 {
            return Err(LassoError::invalid_input("max_iter must be at least 1"));
        }
        if !(self.tol.is_finite() && self.tol > 0.0) {
            return Err(LassoError::invalid_input(format!(
                "tol must be a positive finite number, got {}",
                self.tol
            )));
        }
        Ok(())
    }

    /// Coordinate-descent solver with this config's limits.
    #[must_use]
    pub fn solver(&self) -> CoordinateDescentSolver {
        CoordinateDescentSolver::new(self.max_iter, self.tol)
    }

    /// Path builder with this config's path settings.
    #[must_use]
    pub fn path_builder(&self) -> RegularizationPathBuilder {
        let builder = RegularizationPathBuilder::new()
            .with_n_alphas(self.n_alphas)
            .with_eps(self.eps);
        match &self.alphas {
            Some(alphas) => builder.with_alphas(alphas.clone()),
            None => builder,
        }
    }

    /// Fold splitter with this config's fold settings.
    #[must_use]
    pub fn kfold(&self) -> KFold {
        let kfold = KFold::new(self.cv_folds).with_shuffle(self.shuffle);
        match self.random_state {
            Some(seed) => kfold.with_random_state(seed),
            None => kfold,
        }
    }
}
