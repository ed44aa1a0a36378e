//! End-to-end Lasso scenarios: closed-form limits, degenerate inputs,
//! sparse recovery under cross-validation, determinism and time budgets.

use lasso_cv::error::{DegenerateReason, FitWarning, LassoError};
use lasso_cv::linear_model::{fit, LassoConfig};
use lasso_cv::optim::CoordinateDescentSolver;
use lasso_cv::preprocessing::StandardizedDesign;
use lasso_cv::primitives::{Matrix, Vector};
use std::time::Duration;

/// Deterministic uniform(-1, 1) stream (64-bit LCG, top 53 bits).
struct Lcg(u64);

impl Lcg {
    fn uniform(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        2.0 * ((self.0 >> 11) as f64 / (1_u64 << 53) as f64) - 1.0
    }
}

/// 200 samples, 20 uniform features, the first 5 informative.
fn sparse_problem() -> (Matrix<f64>, Vector<f64>) {
    const N: usize = 200;
    const P: usize = 20;
    let truth = [3.0, -2.0, 1.5, 2.5, -1.0];

    let mut rng = Lcg(1);
    let mut xs = Vec::with_capacity(N * P);
    let mut ys = Vec::with_capacity(N);
    for _ in 0..N {
        let row: Vec<f64> = (0..P).map(|_| rng.uniform()).collect();
        let signal: f64 = row.iter().zip(&truth).map(|(x, b)| x * b).sum();
        ys.push(signal + 0.5 * rng.uniform());
        xs.extend(row);
    }
    (
        Matrix::from_vec(N, P, xs).expect("valid"),
        Vector::from_vec(ys),
    )
}

fn small_problem() -> (Matrix<f64>, Vector<f64>) {
    let x = Matrix::from_vec(
        8,
        3,
        vec![
            0.5, 1.2, -0.3, //
            1.0, -0.7, 0.8, //
            1.5, 0.4, 0.1, //
            2.0, 1.9, -1.1, //
            2.5, -0.2, 0.6, //
            3.0, 0.9, -0.4, //
            3.5, -1.3, 1.4, //
            4.0, 0.3, 0.2,
        ],
    )
    .expect("valid");
    let y = Vector::from_slice(&[1.1, 2.3, 2.2, 4.9, 3.6, 5.0, 4.1, 6.3]);
    (x, y)
}

#[test]
fn perfectly_correlated_feature_at_zero_alpha() {
    // y = 3x, no noise
    let x = Matrix::from_vec(6, 1, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("valid");
    let y = Vector::from_slice(&[3.0, 6.0, 9.0, 12.0, 15.0, 18.0]);
    let model = fit(&x, &y, &LassoConfig::default().with_alpha(0.0)).expect("fit");

    assert!((model.coefficients()[0] - 3.0).abs() < 1e-6);
    assert!(model.intercept().abs() < 1e-6);
}

#[test]
fn constant_target_gives_intercept_only_for_any_alpha() {
    let (x, _) = small_problem();
    let y = Vector::from_vec(vec![4.25; 8]);
    for alpha in [1e-6, 0.1, 1.0, 100.0] {
        let model = fit(&x, &y, &LassoConfig::default().with_alpha(alpha)).expect("fit");
        assert_eq!(model.n_nonzero(), 0, "alpha={alpha}");
        assert_eq!(model.intercept(), 4.25, "alpha={alpha}");
    }

    let cv = fit(&x, &y, &LassoConfig::default().with_cv_folds(4)).expect("cv fit");
    assert_eq!(cv.n_nonzero(), 0);
    assert_eq!(cv.intercept(), 4.25);
    assert_eq!(cv.selected_alpha(), None);
    assert!(cv.warnings().contains(&FitWarning::NumericDegenerate {
        reason: DegenerateReason::ConstantTarget
    }));
}

#[test]
fn alpha_at_or_above_alpha_max_zeroes_every_coefficient() {
    let (x, y) = small_problem();
    let alpha_max = StandardizedDesign::new(&x, &y, true, false)
        .expect("design")
        .alpha_max();
    for factor in [1.0, 1.5, 10.0] {
        let config = LassoConfig::default().with_alpha(alpha_max * factor);
        let model = fit(&x, &y, &config).expect("fit");
        assert_eq!(model.n_nonzero(), 0, "factor={factor}");
        assert!((model.intercept() - y.mean()).abs() < 1e-12);
    }

    let below = fit(&x, &y, &LassoConfig::default().with_alpha(alpha_max * 0.9)).expect("fit");
    assert!(below.n_nonzero() > 0);
}

#[test]
fn sweep_after_convergence_is_idempotent() {
    let (x, y) = small_problem();
    let design = StandardizedDesign::new(&x, &y, true, false).expect("design");
    let tol = 1e-6;
    let solver = CoordinateDescentSolver::new(10_000, tol);

    for alpha in [0.05, 0.3, 1.0] {
        let out = solver.solve(&design, alpha, None).expect("solve");
        assert!(out.status.is_converged());

        let mut coef = out.coefficients.clone();
        let mut residual: Vec<f64> = (0..design.n_samples())
            .map(|i| {
                design.target()[i]
                    - (0..design.n_features())
                        .map(|j| design.feature(j)[i] * coef[j])
                        .sum::<f64>()
            })
            .collect();
        let change = solver.sweep(&design, alpha, &mut coef, &mut residual);
        assert!(change <= tol, "alpha={alpha}: change {change:e}");
    }
}

#[test]
fn cross_validation_zeroes_most_uninformative_features() {
    let (x, y) = sparse_problem();
    let model = fit(&x, &y, &LassoConfig::default()).expect("cv fit");

    let alpha = model.selected_alpha().expect("selected alpha");
    let cv = model.cv().expect("cv scores");
    assert!(alpha < cv.alphas[0], "selected the all-zero end of the path");

    let coefficients = model.coefficients().as_slice();
    for (j, (&b, truth)) in coefficients
        .iter()
        .zip([3.0_f64, -2.0, 1.5, 2.5, -1.0])
        .enumerate()
    {
        assert_eq!(b.signum(), truth.signum(), "informative feature {j}: {b}");
    }
    let noise_zeros = coefficients[5..].iter().filter(|&&b| b == 0.0).count();
    assert!(
        noise_zeros >= 8,
        "only {noise_zeros} of 15 noise coefficients are zero"
    );
    assert!(model.score(&x, &y).expect("score") > 0.9);
}

#[test]
fn cross_validation_is_deterministic_for_fixed_folds() {
    let (x, y) = sparse_problem();
    let config = LassoConfig::default()
        .with_random_state(7)
        .with_n_alphas(30);

    let first = fit(&x, &y, &config).expect("fit");
    let second = fit(&x, &y, &config).expect("fit");

    assert_eq!(first.selected_alpha(), second.selected_alpha());
    assert_eq!(first.cv(), second.cv());
    assert_eq!(first, second);
}

#[test]
fn exhausted_budget_returns_a_model_with_a_warning() {
    let (x, y) = sparse_problem();
    let config = LassoConfig::default().with_max_duration(Duration::ZERO);
    let model = fit(&x, &y, &config).expect("fit");

    assert!(model
        .warnings()
        .iter()
        .any(|w| matches!(w, FitWarning::BudgetExhausted { total_alphas: 100, .. })));
    assert!(model.selected_alpha().is_some());
    assert_eq!(model.coefficients().len(), 20);
}

#[test]
fn generous_budget_scores_the_whole_path() {
    let (x, y) = small_problem();
    let config = LassoConfig::default()
        .with_cv_folds(4)
        .with_n_alphas(20)
        .with_max_duration(Duration::from_secs(3600));
    let model = fit(&x, &y, &config).expect("fit");

    assert_eq!(model.cv().expect("cv").len(), 20);
    assert!(!model
        .warnings()
        .iter()
        .any(|w| matches!(w, FitWarning::BudgetExhausted { .. })));
}

#[test]
fn fold_count_out_of_range_is_invalid_input() {
    let (x, y) = small_problem();
    assert!(matches!(
        fit(&x, &y, &LassoConfig::default().with_cv_folds(9)),
        Err(LassoError::InvalidInput { .. })
    ));
    assert!(matches!(
        fit(&x, &y, &LassoConfig::default().with_cv_folds(1)),
        Err(LassoError::InvalidInput { .. })
    ));
    assert!(fit(&x, &y, &LassoConfig::default().with_cv_folds(8)).is_ok());
}

#[test]
fn shape_mismatch_is_invalid_input() {
    let (x, y) = small_problem();
    let short = Vector::from_vec(y.as_slice()[1..].to_vec());
    assert!(matches!(
        fit(&x, &short, &LassoConfig::default()),
        Err(LassoError::InvalidInput { .. })
    ));
    assert!(matches!(
        fit(&x, &short, &LassoConfig::default().with_alpha(0.1)),
        Err(LassoError::InvalidInput { .. })
    ));
}

#[test]
fn normalize_still_recovers_sparse_support() {
    let (x, y) = sparse_problem();
    let model = fit(&x, &y, &LassoConfig::default().with_normalize(true)).expect("fit");
    assert!(model.coefficients().as_slice()[..5].iter().all(|&b| b != 0.0));
}
