//! K-fold cross-validation over a Lasso regularization path.

use super::{FoldAssignment, KFold};
use crate::data::Dataset;
use crate::error::{FitWarning, Result};
use crate::linear_model::{
    degenerate_warnings, intercept_only, lasso_path, refit, FittedModel, LassoConfig,
    PenaltyPath, RegularizationPathBuilder,
};
use crate::metrics::mse;
use crate::optim::CoordinateDescentSolver;
use crate::preprocessing::StandardizedDesign;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Held-out mean squared error along a regularization path.
///
/// `mse_path[f][i]` is the error of fold `f` at `alphas[i]`; `mean_mse` and
/// `std_mse` aggregate over folds, in fold order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationScore {
    /// Penalties that every fold scored, descending.
    pub alphas: Vec<f64>,
    /// Per-fold errors, one row per fold.
    pub mse_path: Vec<Vec<f64>>,
    /// Mean error across folds for each penalty.
    pub mean_mse: Vec<f64>,
    /// Population standard deviation of the error across folds.
    pub std_mse: Vec<f64>,
}

impl ValidationScore {
    /// Aggregates per-fold errors.
    ///
    /// # Panics
    ///
    /// Panics if a row of `mse_path` is shorter than `alphas`.
    #[must_use]
    pub fn from_mse_path(alphas: Vec<f64>, mse_path: Vec<Vec<f64>>) -> Self {
        let n_folds = mse_path.len() as f64;
        let mut mean_mse = vec![0.0; alphas.len()];
        let mut std_mse = vec![0.0; alphas.len()];

        if !mse_path.is_empty() {
            for row in &mse_path {
                for (acc, v) in mean_mse.iter_mut().zip(&row[..alphas.len()]) {
                    *acc += v;
                }
            }
            for acc in &mut mean_mse {
                *acc /= n_folds;
            }
            for row in &mse_path {
                for ((acc, v), m) in std_mse.iter_mut().zip(&row[..alphas.len()]).zip(&mean_mse) {
                    *acc += (v - m).powi(2);
                }
            }
            for acc in &mut std_mse {
                *acc = (*acc / n_folds).sqrt();
            }
        }

        Self {
            alphas,
            mse_path,
            mean_mse,
            std_mse,
        }
    }

    /// Number of penalties scored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.alphas.len()
    }

    /// True when no penalty was scored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alphas.is_empty()
    }

    /// Index of the lowest mean error.
    ///
    /// Ties go to the earlier index, i.e. the larger penalty.
    #[must_use]
    pub fn best_index(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &m) in self.mean_mse.iter().enumerate() {
            match best {
                Some((_, b)) if m >= b => {}
                _ => best = Some((i, m)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Penalty with the lowest mean error.
    #[must_use]
    pub fn best_alpha(&self) -> Option<f64> {
        self.best_index().map(|i| self.alphas[i])
    }
}

/// Errors and warnings of one fold's path fit.
#[derive(Debug)]
struct FoldScore {
    mse: Vec<f64>,
    warnings: Vec<FitWarning>,
}

/// Selects the Lasso penalty by k-fold cross-validation.
///
/// One [`PenaltyPath`] is computed on the full data and shared by every fold.
/// Each fold standardizes its own training rows, fits the whole path with warm
/// starts and scores held-out MSE on the raw test rows. Folds are independent
/// and run in parallel when the `parallel` feature is enabled. The penalty
/// with the lowest mean error is refitted on the full data.
///
/// # Examples
///
/// ```
/// use lasso_cv::data::Dataset;
/// use lasso_cv::linear_model::LassoConfig;
/// use lasso_cv::model_selection::CrossValidator;
/// use lasso_cv::primitives::{Matrix, Vector};
///
/// let x = Matrix::from_vec(10, 1, (0..10).map(f64::from).collect()).unwrap();
/// let y = Vector::from_vec((0..10).map(|v| 0.5 * f64::from(v)).collect());
/// let data = Dataset::new(&x, &y).unwrap();
///
/// let config = LassoConfig::default().with_cv_folds(5).with_n_alphas(20);
/// let model = CrossValidator::new(&config).run(&data).unwrap();
/// let cv = model.cv().unwrap();
/// assert_eq!(cv.mse_path.len(), 5);
/// assert_eq!(cv.alphas.len(), 20);
/// assert_eq!(model.selected_alpha(), cv.best_alpha());
/// ```
#[derive(Debug, Clone)]
pub struct CrossValidator {
    kfold: KFold,
    path: RegularizationPathBuilder,
    solver: CoordinateDescentSolver,
    fit_intercept: bool,
    normalize: bool,
    max_duration: Option<Duration>,
}

impl CrossValidator {
    /// Creates a validator from the fold, path, solver and budget settings
    /// of `config`.
    #[must_use]
    pub fn new(config: &LassoConfig) -> Self {
        Self {
            kfold: config.kfold(),
            path: config.path_builder(),
            solver: config.solver(),
            fit_intercept: config.fit_intercept,
            normalize: config.normalize,
            max_duration: config.max_duration,
        }
    }

    /// Scores the path, selects the best penalty and refits on all of `data`.
    ///
    /// A degenerate path (`alpha_max == 0`) yields an intercept-only model
    /// with no selected penalty. When the time budget runs out, only
    /// penalties scored by every fold compete; if none were, the largest
    /// penalty is used.
    ///
    /// # Errors
    ///
    /// Returns [`LassoError::InvalidInput`](crate::error::LassoError) if the
    /// fold count is out of range for the sample count or the custom path is
    /// invalid.
    pub fn run(&self, data: &Dataset<'_>) -> Result<FittedModel> {
        let deadline = self
            .max_duration
            .and_then(|budget| Instant::now().checked_add(budget));
        let assignment = self.kfold.assign(data.n_samples())?;

        let design =
            StandardizedDesign::new(data.x(), data.y(), self.fit_intercept, self.normalize)?;
        let mut warnings = degenerate_warnings(&design);
        let path = self.path.build(&design)?;

        if path.is_degenerate() {
            return intercept_only(&design, warnings);
        }

        log::debug!(
            "cross-validating {} alphas over {} folds",
            path.len(),
            assignment.n_folds()
        );
        let folds = self.score_folds(data, &assignment, &path, deadline)?;

        let completed = folds.iter().map(|f| f.mse.len()).min().unwrap_or(0);
        if completed < path.len() {
            let warning = FitWarning::BudgetExhausted {
                completed_alphas: completed,
                total_alphas: path.len(),
            };
            log::warn!("{warning}");
            warnings.push(warning);
        }

        let mut mse_path = Vec::with_capacity(folds.len());
        for fold in folds {
            warnings.extend(fold.warnings);
            let mut row = fold.mse;
            row.truncate(completed);
            mse_path.push(row);
        }
        let score = ValidationScore::from_mse_path(path.alphas()[..completed].to_vec(), mse_path);

        let alpha = score.best_alpha().unwrap_or(path.alphas()[0]);
        log::debug!("selected alpha={alpha:e}");
        refit(&design, &self.solver, alpha, Some(alpha), warnings, Some(score))
    }

    fn score_folds(
        &self,
        data: &Dataset<'_>,
        assignment: &FoldAssignment,
        path: &PenaltyPath,
        deadline: Option<Instant>,
    ) -> Result<Vec<FoldScore>> {
        #[cfg(feature = "parallel")]
        let results: Vec<Result<FoldScore>> = (0..assignment.n_folds())
            .into_par_iter()
            .map(|fold| self.score_fold(data, assignment, fold, path, deadline))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let results: Vec<Result<FoldScore>> = (0..assignment.n_folds())
            .map(|fold| self.score_fold(data, assignment, fold, path, deadline))
            .collect();

        results.into_iter().collect()
    }

    fn score_fold(
        &self,
        data: &Dataset<'_>,
        assignment: &FoldAssignment,
        fold: usize,
        path: &PenaltyPath,
        deadline: Option<Instant>,
    ) -> Result<FoldScore> {
        let (x_train, y_train) = data.subset(&assignment.train_indices(fold));
        let (x_test, y_test) = data.subset(&assignment.test_indices(fold));

        let design =
            StandardizedDesign::new(&x_train, &y_train, self.fit_intercept, self.normalize)?;
        let points = lasso_path(&design, path, &self.solver, deadline)?;

        let mut mse_row = Vec::with_capacity(points.len());
        let mut warnings = Vec::new();
        for point in &points {
            let predictions = design.unstandardize(&point.coefficients)?.predict(&x_test)?;
            mse_row.push(mse(&predictions, &y_test));
            if let Some(warning) = point.non_convergence(Some(fold)) {
                log::warn!("{warning}");
                warnings.push(warning);
            }
        }

        log::debug!("fold {fold}: scored {} of {} alphas", mse_row.len(), path.len());
        Ok(FoldScore {
            mse: mse_row,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DegenerateReason, LassoError};
    use crate::primitives::{Matrix, Vector};

    fn noisy_line(n: usize) -> (Matrix<f64>, Vector<f64>) {
        // y = 2x0 + small deterministic wiggle; x1 is unrelated
        let mut xs = Vec::with_capacity(2 * n);
        let mut ys = Vec::with_capacity(n);
        for i in 0..n {
            let t = i as f64;
            xs.push(t);
            xs.push((t * 1.7).sin());
            ys.push(2.0 * t + 0.1 * (t * 0.9).cos());
        }
        (
            Matrix::from_vec(n, 2, xs).expect("valid"),
            Vector::from_vec(ys),
        )
    }

    #[test]
    fn test_validation_score_aggregates_in_fold_order() {
        let score = ValidationScore::from_mse_path(
            vec![2.0, 1.0],
            vec![vec![1.0, 4.0], vec![3.0, 2.0]],
        );
        assert_eq!(score.mean_mse, vec![2.0, 3.0]);
        assert_eq!(score.std_mse, vec![1.0, 1.0]);
        assert_eq!(score.best_index(), Some(0));
        assert_eq!(score.best_alpha(), Some(2.0));
    }

    #[test]
    fn test_tie_prefers_larger_alpha() {
        let score = ValidationScore::from_mse_path(
            vec![3.0, 2.0, 1.0],
            vec![vec![5.0, 1.0, 1.0], vec![5.0, 1.0, 1.0]],
        );
        assert_eq!(score.best_index(), Some(1));
        assert_eq!(score.best_alpha(), Some(2.0));
    }

    #[test]
    fn test_empty_score_has_no_best() {
        let score = ValidationScore::from_mse_path(Vec::new(), vec![Vec::new(), Vec::new()]);
        assert!(score.is_empty());
        assert_eq!(score.best_index(), None);
    }

    #[test]
    fn test_run_selects_best_and_refits() {
        let (x, y) = noisy_line(30);
        let data = Dataset::new(&x, &y).expect("valid");
        let config = LassoConfig::default().with_cv_folds(3).with_n_alphas(15);
        let model = CrossValidator::new(&config).run(&data).expect("cv");

        let cv = model.cv().expect("cv scores");
        assert_eq!(cv.len(), 15);
        assert_eq!(cv.mse_path.len(), 3);
        assert!(cv.mse_path.iter().all(|row| row.len() == 15));
        assert_eq!(model.selected_alpha(), cv.best_alpha());
        assert_eq!(Some(model.alpha()), model.selected_alpha());
        assert!((model.coefficients()[0] - 2.0).abs() < 0.1);
    }

    #[test]
    fn test_too_many_folds_rejected() {
        let (x, y) = noisy_line(4);
        let data = Dataset::new(&x, &y).expect("valid");
        let config = LassoConfig::default().with_cv_folds(5);
        assert!(matches!(
            CrossValidator::new(&config).run(&data),
            Err(LassoError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_constant_target_gives_intercept_only() {
        let (x, _) = noisy_line(12);
        let y = Vector::from_vec(vec![-1.5; 12]);
        let data = Dataset::new(&x, &y).expect("valid");
        let model = CrossValidator::new(&LassoConfig::default().with_cv_folds(3))
            .run(&data)
            .expect("cv");
        assert_eq!(model.n_nonzero(), 0);
        assert_eq!(model.intercept(), -1.5);
        assert_eq!(model.selected_alpha(), None);
        assert!(model.cv().is_none());
        assert!(model.warnings().contains(&FitWarning::NumericDegenerate {
            reason: DegenerateReason::ConstantTarget
        }));
    }

    #[test]
    fn test_zero_budget_falls_back_to_largest_alpha() {
        let (x, y) = noisy_line(20);
        let data = Dataset::new(&x, &y).expect("valid");
        let config = LassoConfig::default()
            .with_cv_folds(4)
            .with_n_alphas(10)
            .with_max_duration(Duration::ZERO);
        let model = CrossValidator::new(&config).run(&data).expect("cv");

        assert!(model.warnings().contains(&FitWarning::BudgetExhausted {
            completed_alphas: 0,
            total_alphas: 10,
        }));
        assert!(model.cv().expect("scores").is_empty());
        // The largest alpha is alpha_max, where every coefficient is zero.
        assert_eq!(model.n_nonzero(), 0);
        assert!(model.selected_alpha().is_some());
    }

    #[test]
    fn test_custom_alphas_are_scored_in_descending_order() {
        let (x, y) = noisy_line(20);
        let data = Dataset::new(&x, &y).expect("valid");
        let config = LassoConfig::default()
            .with_cv_folds(4)
            .with_alphas(vec![0.01, 1.0, 0.1]);
        let model = CrossValidator::new(&config).run(&data).expect("cv");
        assert_eq!(model.cv().expect("scores").alphas, vec![1.0, 0.1, 0.01]);
    }
}
