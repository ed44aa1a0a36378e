//! Regularization paths: the descending sequence of penalties a Lasso model
//! is fitted along, and the warm-started fit over that sequence.

use crate::error::{FitWarning, LassoError, Result};
use crate::optim::{ConvergenceStatus, CoordinateDescentSolver};
use crate::preprocessing::StandardizedDesign;
use std::time::Instant;

/// Builds a [`PenaltyPath`] for a standardized design.
///
/// By default the path holds `n_alphas` values spaced evenly on a log scale
/// from `alpha_max` (the smallest penalty that zeroes every coefficient) down
/// to `alpha_max * eps`. A caller-supplied list replaces the computed values.
///
/// # Examples
///
/// ```
/// use lasso_cv::linear_model::RegularizationPathBuilder;
/// use lasso_cv::preprocessing::StandardizedDesign;
/// use lasso_cv::primitives::{Matrix, Vector};
///
/// let x = Matrix::from_vec(3, 1, vec![1.0, 2.0, 3.0]).unwrap();
/// let y = Vector::from_slice(&[2.0, 4.0, 6.0]);
/// let design = StandardizedDesign::new(&x, &y, true, false).unwrap();
///
/// let path = RegularizationPathBuilder::new()
///     .with_n_alphas(5)
///     .with_eps(1e-2)
///     .build(&design)
///     .unwrap();
/// assert_eq!(path.len(), 5);
/// assert!(path.alphas().windows(2).all(|w| w[0] > w[1]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RegularizationPathBuilder {
    n_alphas: usize,
    eps: f64,
    alphas: Option<Vec<f64>>,
}

impl Default for RegularizationPathBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegularizationPathBuilder {
    /// Creates a builder with 100 alphas and `eps = 1e-3`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            n_alphas: 100,
            eps: 1e-3,
            alphas: None,
        }
    }

    /// Sets the number of penalties on the computed path.
    #[must_use]
    pub fn with_n_alphas(mut self, n_alphas: usize) -> Self {
        self.n_alphas = n_alphas;
        self
    }

    /// Sets the ratio `alpha_min / alpha_max`.
    #[must_use]
    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    /// Uses an explicit list of penalties instead of the computed path.
    #[must_use]
    pub fn with_alphas(mut self, alphas: Vec<f64>) -> Self {
        self.alphas = Some(alphas);
        self
    }

    /// Computes the path for `design`.
    ///
    /// Custom alphas are sorted descending and de-duplicated. When
    /// `alpha_max` is zero the computed path is empty and
    /// [`PenaltyPath::is_degenerate`] is true.
    ///
    /// # Errors
    ///
    /// Returns [`LassoError::InvalidInput`] for `n_alphas == 0`, `eps`
    /// outside `(0, 1)`, a custom list that is empty or holds a
    /// non-positive or non-finite value, or a computed path whose smallest
    /// penalty underflows or whose steps are too fine to stay strictly
    /// decreasing in `f64`.
    pub fn build(&self, design: &StandardizedDesign) -> Result<PenaltyPath> {
        let alpha_max = design.alpha_max();

        if let Some(custom) = &self.alphas {
            return PenaltyPath::from_alphas(custom.clone(), alpha_max);
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

        if alpha_max <= 0.0 {
            return Ok(PenaltyPath {
                alphas: Vec::new(),
                alpha_max,
            });
        }

        let alpha_min = alpha_max * self.eps;
        if !alpha_min.is_normal() {
            return Err(LassoError::invalid_input(format!(
                "alpha_max * eps underflows ({alpha_max:e} * {:e})",
                self.eps
            )));
        }
        let alphas = log_spaced(alpha_max, alpha_min, self.n_alphas);
        if alphas.windows(2).any(|w| w[0] <= w[1]) {
            return Err(LassoError::invalid_input(format!(
                "{} alphas between {alpha_max:e} and {alpha_min:e} are not strictly decreasing",
                self.n_alphas
            )));
        }
        log::debug!(
            "built path of {} alphas from {alpha_max:e} to {:e}",
            alphas.len(),
            alphas[alphas.len() - 1]
        );
        Ok(PenaltyPath { alphas, alpha_max })
    }
}

/// `n` values from `hi` down to `lo`, evenly spaced in log space.
///
/// The endpoints are exact.
fn log_spaced(hi: f64, lo: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![hi];
    }
    let (log_hi, log_lo) = (hi.ln(), lo.ln());
    let step = (log_lo - log_hi) / (n - 1) as f64;
    (0..n)
        .map(|i| match i {
            0 => hi,
            i if i == n - 1 => lo,
            i => (log_hi + step * i as f64).exp(),
        })
        .collect()
}

/// An ordered, read-only sequence of penalties, largest first.
#[derive(Debug, Clone, PartialEq)]
pub struct PenaltyPath {
    alphas: Vec<f64>,
    alpha_max: f64,
}

impl PenaltyPath {
    /// Validates, sorts (descending) and de-duplicates an explicit list.
    ///
    /// # Errors
    ///
    /// Returns [`LassoError::InvalidInput`] if the list is empty or holds a
    /// value that is not a positive finite number.
    pub fn from_alphas(mut alphas: Vec<f64>, alpha_max: f64) -> Result<Self> {
        if alphas.is_empty() {
            return Err(LassoError::invalid_input("alphas must not be empty"));
        }
        if let Some(bad) = alphas.iter().find(|a| !(a.is_finite() && **a > 0.0)) {
            return Err(LassoError::invalid_input(format!(
                "alphas must be positive finite numbers, got {bad}"
            )));
        }
        alphas.sort_by(|a, b| b.total_cmp(a));
        alphas.dedup();
        Ok(Self { alphas, alpha_max })
    }

    /// Penalties in descending order.
    #[must_use]
    pub fn alphas(&self) -> &[f64] {
        &self.alphas
    }

    /// Number of penalties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.alphas.len()
    }

    /// True when the path holds no penalties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alphas.is_empty()
    }

    /// `max_j |X_j · y| / n` of the design the path was built for.
    #[must_use]
    pub fn alpha_max(&self) -> f64 {
        self.alpha_max
    }

    /// True when every penalty yields the all-zero model (`alpha_max == 0`).
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.alpha_max <= 0.0
    }
}

/// One fitted point on a regularization path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathPoint {
    /// Penalty strength.
    pub alpha: f64,
    /// Coefficients in the standardized feature space.
    pub coefficients: Vec<f64>,
    /// Sweeps performed.
    pub n_iter: usize,
    /// Largest coefficient change in the final sweep.
    pub max_change: f64,
    /// Convergence status.
    pub status: ConvergenceStatus,
    /// Duality gap at the returned coefficients.
    pub dual_gap: f64,
}

impl PathPoint {
    /// Non-convergence warning for this point, if it stopped at `max_iter`.
    ///
    /// `fold` is `None` for a fit on the full data.
    #[must_use]
    pub fn non_convergence(&self, fold: Option<usize>) -> Option<FitWarning> {
        if self.status.is_converged() {
            return None;
        }
        Some(FitWarning::NonConvergence {
            alpha: self.alpha,
            fold,
            iterations: self.n_iter,
            max_change: self.max_change,
        })
    }
}

/// Fits every penalty of `path` in order, warm-starting each fit from the
/// previous solution.
///
/// When `deadline` passes, fitting stops before the next penalty and the
/// points completed so far are returned; callers detect the shortfall by
/// comparing lengths.
///
/// # Errors
///
/// Propagates solver errors (see [`CoordinateDescentSolver::solve`]).
pub fn lasso_path(
    design: &StandardizedDesign,
    path: &PenaltyPath,
    solver: &CoordinateDescentSolver,
    deadline: Option<Instant>,
) -> Result<Vec<PathPoint>> {
    let mut points: Vec<PathPoint> = Vec::with_capacity(path.len());

    for &alpha in path.alphas() {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            log::debug!(
                "deadline reached after {} of {} alphas",
                points.len(),
                path.len()
            );
            break;
        }

        let warm_start = points.last().map(|p| p.coefficients.as_slice());
        let out = solver.solve(design, alpha, warm_start)?;
        points.push(PathPoint {
            alpha,
            coefficients: out.coefficients,
            n_iter: out.n_iter,
            max_change: out.max_change,
            status: out.status,
            dual_gap: out.dual_gap,
        });
    }

    Ok(points)
}
