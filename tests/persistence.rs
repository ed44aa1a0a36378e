//! Save/load round trips for fitted models and configurations.

use lasso_cv::prelude::*;
use std::time::Duration;
use tempfile::tempdir;

fn data() -> (Matrix<f64>, Vector<f64>) {
    let x = Matrix::from_vec(
        12,
        2,
        (0..24)
            .map(|i| {
                let v = f64::from(i);
                if i % 2 == 0 {
                    v / 2.0
                } else {
                    (v * 0.7).sin()
                }
            })
            .collect(),
    )
    .expect("valid");
    let y = Vector::from_vec((0..12).map(|i| 1.5 * f64::from(i) - 2.0).collect());
    (x, y)
}

#[test]
fn cross_validated_model_survives_save_and_load() {
    let (x, y) = data();
    let model = fit(&x, &y, &LassoConfig::default().with_cv_folds(3).with_n_alphas(25))
        .expect("fit");

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("model.bin");
    model.save(&path).expect("save");
    let loaded = FittedModel::load(&path).expect("load");

    assert_eq!(loaded, model);
    assert_eq!(loaded.selected_alpha(), model.selected_alpha());
    assert_eq!(loaded.cv().map(ValidationScore::len), Some(25));
    assert_eq!(
        predict(&loaded, &x).expect("predict"),
        predict(&model, &x).expect("predict")
    );
}

#[test]
fn warnings_survive_save_and_load() {
    let (x, _) = data();
    let y = Vector::from_vec(vec![3.0; 12]);
    let model = fit(&x, &y, &LassoConfig::default().with_alpha(0.1)).expect("fit");
    assert!(!model.warnings().is_empty());

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("degenerate.bin");
    model.save(&path).expect("save");
    let loaded = FittedModel::load(&path).expect("load");
    assert_eq!(loaded.warnings(), model.warnings());
}

#[test]
fn config_round_trips_through_bincode() {
    let config = LassoConfig::default()
        .with_alphas(vec![1.0, 0.1])
        .with_random_state(3)
        .with_normalize(true)
        .with_max_duration(Duration::from_millis(250));

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.bin");
    std::fs::write(&path, bincode::serialize(&config).expect("serialize")).expect("write");
    let bytes = std::fs::read(&path).expect("read");
    let loaded: LassoConfig = bincode::deserialize(&bytes).expect("deserialize");
    assert_eq!(loaded, config);
}

#[test]
fn load_from_missing_path_fails() {
    let dir = tempdir().expect("tempdir");
    let err = FittedModel::load(dir.path().join("nope.bin")).unwrap_err();
    assert!(matches!(err, LassoError::Io(_)));
}
