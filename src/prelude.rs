//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use lasso_cv::prelude::*;
//! ```

pub use crate::error::{FitWarning, LassoError};
pub use crate::linear_model::{fit, predict, FittedModel, Lasso, LassoConfig, LinearModel};
pub use crate::metrics::{mse, r_squared};
pub use crate::model_selection::{CrossValidator, KFold, ValidationScore};
pub use crate::primitives::{Matrix, Vector};
pub use crate::traits::{Estimator, Transformer};
