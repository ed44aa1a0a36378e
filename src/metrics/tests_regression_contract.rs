// =========================================================================
// Regression metrics contract: R² and MSE as used for cross-validation
// scoring.
// =========================================================================

use super::*;

/// R² = 1.0 for perfect predictions
#[test]
fn r2_perfect() {
    let y_true = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let y_pred = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]);

    let r2 = r_squared(&y_pred, &y_true);
    assert!((r2 - 1.0).abs() < 1e-12, "R²={r2} for perfect predictions, expected 1.0");
}

/// R² < 0 when predictions are worse than the mean
#[test]
fn r2_negative_for_bad_predictions() {
    let y_true = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let y_pred = Vector::from_slice(&[10.0, 20.0, 30.0, 40.0, 50.0]);

    let r2 = r_squared(&y_pred, &y_true);
    assert!(r2 < 0.0, "R²={r2} >= 0 for terrible predictions");
}

/// MSE is the mean of squared residuals
#[test]
fn mse_matches_definition() {
    let y_true = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0]);
    let y_pred = Vector::from_slice(&[2.0, 2.0, 1.0, 4.0]);
    // (1 + 0 + 4 + 0) / 4
    assert_eq!(mse(&y_pred, &y_true), 1.25);
}

mod regression_proptest {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(30))]

        /// R² ≤ 1.0 for any predictions
        #[test]
        fn prop_r2_upper_bound(
            n in 3..=20usize,
            seed in 0..500u32,
        ) {
            let y_true: Vec<f64> = (0..n)
                .map(|i| ((i as f64 + f64::from(seed)) * 0.37).sin() * 10.0 + 5.0)
                .collect();
            let y_pred: Vec<f64> = (0..n)
                .map(|i| ((i as f64 + f64::from(seed) + 1.0) * 0.37).sin() * 10.0 + 5.0)
                .collect();
            let r2 = r_squared(&Vector::from_vec(y_pred), &Vector::from_vec(y_true));
            prop_assert!(r2 <= 1.0 + 1e-12, "R²={} > 1.0", r2);
        }

        /// MSE is non-negative and symmetric in its arguments
        #[test]
        fn prop_mse_non_negative_and_symmetric(
            a in proptest::collection::vec(-100.0f64..100.0, 1..20),
            shift in -5.0f64..5.0,
        ) {
            let y_true = Vector::from_vec(a);
            let y_pred = y_true.add_scalar(shift);
            let forward = mse(&y_pred, &y_true);
            let backward = mse(&y_true, &y_pred);
            prop_assert!(forward >= 0.0);
            prop_assert!((forward - backward).abs() < 1e-12);
            prop_assert!((forward - shift * shift).abs() < 1e-9);
        }
    }
}
