//! lasso-cv: L1-regularized linear regression with cross-validated penalty
//! selection, in pure Rust.
//!
//! Coefficients are fitted by cyclic coordinate descent with
//! soft-thresholding. The penalty is either fixed by the caller or chosen by
//! k-fold cross-validation over a log-spaced regularization path, with each
//! fold warm-starting from the previous penalty's solution.
//!
//! # Quick Start
//!
//! ```
//! use lasso_cv::prelude::*;
//!
//! // Create training data (y = 2*x0 + 1; x1 is irrelevant)
//! let x = Matrix::from_vec(10, 2, vec![
//!     0.0, 0.5,
//!     1.0, -0.3,
//!     2.0, 0.8,
//!     3.0, 0.1,
//!     4.0, -0.6,
//!     5.0, 0.4,
//!     6.0, -0.2,
//!     7.0, 0.7,
//!     8.0, -0.5,
//!     9.0, 0.0,
//! ]).unwrap();
//! let y = Vector::from_vec((0..10).map(|i| 2.0 * f64::from(i) + 1.0).collect());
//!
//! // Choose the penalty by 5-fold cross-validation
//! let model = fit(&x, &y, &LassoConfig::default().with_random_state(42)).unwrap();
//!
//! assert!(model.selected_alpha().is_some());
//! assert!(model.score(&x, &y).unwrap() > 0.99);
//! let predictions = predict(&model, &x).unwrap();
//! assert_eq!(predictions.len(), 10);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`data`]: Validated (X, y) datasets
//! - [`preprocessing`]: Centring and scaling (StandardScaler, StandardizedDesign)
//! - [`optim`]: Coordinate descent and soft-thresholding
//! - [`linear_model`]: Lasso fitting, regularization paths and fitted models
//! - [`model_selection`]: K-Fold splitting and cross-validation
//! - [`metrics`]: Evaluation metrics
//!
//! # Logging
//!
//! Progress is reported through the [`log`](https://docs.rs/log) facade:
//! `debug!` for path and fold progress, `warn!` for non-convergence,
//! degenerate inputs and an exhausted time budget. No logger is installed.

pub mod data;
pub mod error;
pub mod linear_model;
pub mod metrics;
pub mod model_selection;
pub mod optim;
pub mod prelude;
pub mod preprocessing;
pub mod primitives;
pub mod traits;

pub use error::{FitWarning, LassoError, Result};
pub use linear_model::{fit, predict, FittedModel, Lasso, LassoConfig};
pub use primitives::{Matrix, Vector};
pub use traits::{Estimator, Transformer};
