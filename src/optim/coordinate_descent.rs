//! Cyclic coordinate descent for the Lasso objective.

use super::{soft_threshold, ConvergenceStatus};
use crate::error::{LassoError, Result};
use crate::preprocessing::StandardizedDesign;
use serde::{Deserialize, Serialize};

/// Coordinate descent solver for a fixed penalty strength.
///
/// Minimizes
///
/// ```text
/// (1 / 2n) ‖y − Xβ‖² + α ‖β‖₁
/// ```
///
/// over a [`StandardizedDesign`], updating one coefficient at a time:
///
/// ```text
/// for k = 1, 2, ..., max_iter:
///     for j = 1, 2, ..., p:
///         ρⱼ ← (1/n) Xⱼ · (r + Xⱼ βⱼ)
///         βⱼ ← S(ρⱼ, α) / (‖Xⱼ‖² / n)
///     stop when max |Δβⱼ| < tol
/// ```
///
/// The residual `r = y − Xβ` is kept up to date incrementally, so a sweep
/// costs O(np).
///
/// # Example
///
/// ```
/// use lasso_cv::optim::CoordinateDescentSolver;
/// use lasso_cv::preprocessing::StandardizedDesign;
/// use lasso_cv::primitives::{Matrix, Vector};
///
/// let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let y = Vector::from_slice(&[3.0, 6.0, 9.0, 12.0]);
/// let design = StandardizedDesign::new(&x, &y, true, false).unwrap();
///
/// let solver = CoordinateDescentSolver::new(1000, 1e-8);
/// let out = solver.solve(&design, 0.0, None).unwrap();
/// assert!((out.coefficients[0] - 3.0).abs() < 1e-8);
/// ```
///
/// # References
///
/// - Friedman et al. (2010). "Regularization paths for generalized linear models via coordinate descent."
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateDescentSolver {
    /// Maximum number of sweeps over all coordinates
    max_iter: usize,
    /// Convergence tolerance on the largest coefficient change in a sweep
    tol: f64,
}

/// Result of a single coordinate-descent fit.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOutput {
    /// Coefficients in the standardized feature space.
    pub coefficients: Vec<f64>,
    /// Sweeps performed.
    pub n_iter: usize,
    /// Largest absolute coefficient change in the final sweep.
    pub max_change: f64,
    /// Whether the tolerance was reached.
    pub status: ConvergenceStatus,
    /// Duality gap of the final iterate, on the `(1/2n)` objective scale.
    pub dual_gap: f64,
}

impl Default for CoordinateDescentSolver {
    fn default() -> Self {
        Self::new(1000, 1e-4)
    }
}

impl CoordinateDescentSolver {
    /// Creates a solver with the given sweep limit and tolerance.
    #[must_use]
    pub fn new(max_iter: usize, tol: f64) -> Self {
        Self { max_iter, tol }
    }

    /// Returns the maximum number of sweeps.
    #[must_use]
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Returns the convergence tolerance.
    #[must_use]
    pub fn tol(&self) -> f64 {
        self.tol
    }

    /// Fits coefficients for penalty `alpha`, starting from `warm_start`
    /// (zeros when `None`).
    ///
    /// Hitting `max_iter` is not an error: the best-effort coefficients are
    /// returned with [`ConvergenceStatus::MaxIterations`].
    ///
    /// # Errors
    ///
    /// Returns [`LassoError::InvalidInput`] when `alpha` is negative or not
    /// finite, the design has no samples, `max_iter` is zero, or the warm
    /// start has the wrong length.
    pub fn solve(
        &self,
        design: &StandardizedDesign,
        alpha: f64,
        warm_start: Option<&[f64]>,
    ) -> Result<SolverOutput> {
        if !alpha.is_finite() || alpha < 0.0 {
            return Err(LassoError::invalid_input(format!(
                "alpha must be a non-negative finite number, got {alpha}"
            )));
        }
        if design.n_samples() == 0 {
            return Err(LassoError::invalid_input("Cannot fit with zero samples"));
        }
        if self.max_iter == 0 {
            return Err(LassoError::invalid_input("max_iter must be at least 1"));
        }

        let n_features = design.n_features();
        let mut coef = match warm_start {
            Some(start) if start.len() != n_features => {
                return Err(LassoError::dimension_mismatch(
                    "warm_start.len()",
                    n_features,
                    start.len(),
                ));
            }
            Some(start) => start.to_vec(),
            None => vec![0.0; n_features],
        };

        let mut residual = design.target().to_vec();
        for (j, &beta) in coef.iter().enumerate() {
            if beta != 0.0 {
                axpy(-beta, design.feature(j), &mut residual);
            }
        }

        let mut status = ConvergenceStatus::MaxIterations;
        let mut n_iter = 0;
        let mut max_change = f64::INFINITY;

        while n_iter < self.max_iter {
            max_change = self.sweep(design, alpha, &mut coef, &mut residual);
            n_iter += 1;
            if max_change < self.tol {
                status = ConvergenceStatus::Converged;
                break;
            }
        }

        let dual_gap = duality_gap(design, alpha, &coef, &residual);
        if status.is_converged() {
            log::trace!("alpha={alpha:e} converged after {n_iter} sweeps, gap={dual_gap:e}");
        } else {
            log::debug!(
                "alpha={alpha:e} stopped at max_iter={} with max change {max_change:e}",
                self.max_iter
            );
        }

        Ok(SolverOutput {
            coefficients: coef,
            n_iter,
            max_change,
            status,
            dual_gap,
        })
    }

    /// Runs one full cyclic sweep, updating `coef` and `residual` in place.
    ///
    /// `residual` must equal `y − Xβ` for the incoming `coef`. Returns the
    /// largest absolute coefficient change.
    pub fn sweep(
        &self,
        design: &StandardizedDesign,
        alpha: f64,
        coef: &mut [f64],
        residual: &mut [f64],
    ) -> f64 {
        let n = design.n_samples() as f64;
        let mut max_change = 0.0_f64;

        for (j, beta) in coef.iter_mut().enumerate() {
            let norm_sq = design.col_norm_sq(j);
            let old = *beta;

            // All-zero column: its residual contribution is zero already.
            if norm_sq <= 0.0 {
                *beta = 0.0;
                max_change = max_change.max(old.abs());
                continue;
            }

            let x_j = design.feature(j);
            let rho = (dot(x_j, residual) + old * norm_sq) / n;
            let new = soft_threshold(rho, alpha) / (norm_sq / n);

            if new != old {
                axpy(old - new, x_j, residual);
            }
            *beta = new;
            max_change = max_change.max((new - old).abs());
        }

        max_change
    }
}

/// Duality gap of the Lasso objective at `coef`, divided by `n`.
fn duality_gap(design: &StandardizedDesign, alpha: f64, coef: &[f64], residual: &[f64]) -> f64 {
    let n = design.n_samples() as f64;
    let l1_reg = alpha * n;

    let dual_norm = (0..design.n_features())
        .map(|j| dot(design.feature(j), residual).abs())
        .fold(0.0, f64::max);
    let r_norm_sq = dot(residual, residual);

    let (scale, mut gap) = if dual_norm > l1_reg {
        let scale = l1_reg / dual_norm;
        (scale, 0.5 * r_norm_sq * (1.0 + scale * scale))
    } else {
        (1.0, r_norm_sq)
    };

    let l1_norm: f64 = coef.iter().map(|b| b.abs()).sum();
    gap += l1_reg * l1_norm - scale * dot(residual, design.target());
    gap / n
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// `y += a * x`
fn axpy(a: f64, x: &[f64], y: &mut [f64]) {
    for (yi, xi) in y.iter_mut().zip(x) {
        *yi += a * xi;
    }
}
