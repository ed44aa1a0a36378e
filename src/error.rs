//! Error and warning types for Lasso fitting.
//!
//! Fatal problems (bad shapes, negative penalties, fold counts out of range)
//! are [`LassoError`] values returned through [`Result`]. Conditions the fit
//! can recover from are recorded as [`FitWarning`]s on the fitted model.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main error type for Lasso operations.
///
/// # Examples
///
/// ```
/// use lasso_cv::error::LassoError;
///
/// let err = LassoError::DimensionMismatch {
///     expected: "y.len()=100".to_string(),
///     actual: "99".to_string(),
/// };
/// assert!(err.to_string().contains("dimension mismatch"));
/// ```
#[derive(Debug, Error)]
pub enum LassoError {
    /// Input data or hyperparameters violate a precondition.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// What was wrong
        message: String,
    },

    /// Matrix/vector dimensions don't match for the operation.
    #[error("Matrix dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// A model was used before `fit` produced coefficients.
    #[error("Model not fitted. Call fit() first.")]
    NotFitted,

    /// I/O error while persisting a model.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl LassoError {
    /// Create an invalid input error from a message.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a dimension mismatch error with descriptive context
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }
}

impl From<bincode::Error> for LassoError {
    fn from(err: bincode::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, LassoError>;

/// Why an input was numerically degenerate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DegenerateReason {
    /// The (centred) target has no variation, so `alpha_max` is zero.
    ConstantTarget,
    /// A feature column has zero variance and was left unscaled.
    ZeroVarianceFeature {
        /// Column index
        index: usize,
    },
    /// No feature correlates with the target, so `alpha_max` is zero.
    ZeroAlphaMax,
}

impl fmt::Display for DegenerateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConstantTarget => write!(f, "target is constant"),
            Self::ZeroVarianceFeature { index } => {
                write!(f, "feature {index} has zero variance")
            }
            Self::ZeroAlphaMax => write!(f, "no feature correlates with the target"),
        }
    }
}

/// Non-fatal condition encountered while fitting.
///
/// Warnings never abort a fit; they are attached to the returned model and
/// also emitted through the `log` facade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FitWarning {
    /// Coordinate descent hit `max_iter` before reaching `tol`.
    NonConvergence {
        /// Penalty strength of the offending fit
        alpha: f64,
        /// Fold index, or `None` for a fit on the full data
        fold: Option<usize>,
        /// Sweeps performed
        iterations: usize,
        /// Largest coefficient change in the final sweep
        max_change: f64,
    },
    /// Input triggered a defined fallback instead of a failure.
    NumericDegenerate {
        /// What was degenerate
        reason: DegenerateReason,
    },
    /// The cross-validation time budget ran out before the whole path was scored.
    BudgetExhausted {
        /// Number of alphas scored by every fold
        completed_alphas: usize,
        /// Length of the full path
        total_alphas: usize,
    },
}

impl fmt::Display for FitWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonConvergence {
                alpha,
                fold,
                iterations,
                max_change,
            } => {
                write!(
                    f,
                    "coordinate descent did not converge at alpha={alpha:e} after {iterations} \
                     iterations (max change {max_change:e})"
                )?;
                if let Some(fold) = fold {
                    write!(f, " on fold {fold}")?;
                }
                Ok(())
            }
            Self::NumericDegenerate { reason } => write!(f, "degenerate input: {reason}"),
            Self::BudgetExhausted {
                completed_alphas,
                total_alphas,
            } => write!(
                f,
                "time budget exhausted after {completed_alphas}/{total_alphas} alphas"
            ),
        }
    }
}
