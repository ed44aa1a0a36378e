//! Optimization routines for L1-penalized least squares.
//!
//! The only solver in scope is cyclic coordinate descent with
//! soft-thresholding, which is what makes Lasso fits sparse: the closed-form
//! 1-D update snaps a coefficient to exactly zero whenever its correlation with
//! the partial residual does not exceed the penalty.
//!
//! ```
//! use lasso_cv::optim::soft_threshold;
//!
//! assert_eq!(soft_threshold(3.0, 1.0), 2.0);
//! assert_eq!(soft_threshold(-3.0, 1.0), -2.0);
//! assert_eq!(soft_threshold(0.5, 1.0), 0.0);
//! ```

mod coordinate_descent;

pub use coordinate_descent::{CoordinateDescentSolver, SolverOutput};

use serde::{Deserialize, Serialize};

/// Convergence status of an optimization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConvergenceStatus {
    /// Largest coefficient change in a sweep fell below tolerance
    Converged,
    /// Reached maximum iteration limit
    MaxIterations,
}

impl ConvergenceStatus {
    /// True for [`ConvergenceStatus::Converged`].
    #[must_use]
    pub fn is_converged(self) -> bool {
        self == Self::Converged
    }
}

/// Soft-thresholding operator `S(z, λ) = sign(z) · max(|z| − λ, 0)`.
///
/// Returns exactly `0.0` whenever `|z| ≤ λ`.
#[must_use]
pub fn soft_threshold(z: f64, lambda: f64) -> f64 {
    if z > lambda {
        z - lambda
    } else if z < -lambda {
        z + lambda
    } else {
        0.0
    }
}
