// =========================================================================
// KFold contract: fold assignment is a partition of 0..n
//
// References:
//   - Stone (1974) "Cross-Validatory Choice and Assessment of Predictions"
// =========================================================================

use super::*;

/// K-Fold produces exactly K splits
#[test]
fn kfold_produces_k_splits() {
    let splits = KFold::new(5).split(100).expect("valid");
    assert_eq!(splits.len(), 5, "splits={}, expected 5", splits.len());
}

/// Every sample appears in exactly one test fold
#[test]
fn kfold_every_sample_in_one_test_fold() {
    let splits = KFold::new(5).split(20).expect("valid");

    let mut test_counts = vec![0usize; 20];
    for (_train, test) in &splits {
        for &idx in test {
            test_counts[idx] += 1;
        }
    }

    for (i, &count) in test_counts.iter().enumerate() {
        assert_eq!(count, 1, "sample {i} appeared in {count} test folds (expected 1)");
    }
}

/// Train and test indices are disjoint and together cover all samples
#[test]
fn kfold_train_test_disjoint_and_cover_all() {
    let n = 17; // non-divisible by K to test remainder handling
    let assignment = KFold::new(4).assign(n).expect("valid");

    for fold in 0..4 {
        let train = assignment.train_indices(fold);
        let test = assignment.test_indices(fold);
        assert!(test.iter().all(|i| !train.contains(i)), "fold {fold} overlaps");
        let mut all: Vec<usize> = train.iter().chain(test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..n).collect::<Vec<_>>(), "fold {fold} does not cover 0..{n}");
    }
}

#[test]
fn kfold_remainder_goes_to_first_folds() {
    let assignment = KFold::new(4).assign(17).expect("valid");
    assert_eq!(assignment.fold_sizes(), vec![5, 4, 4, 4]);
    assert_eq!(assignment.test_indices(0), vec![0, 1, 2, 3, 4]);
    assert_eq!(assignment.n_samples(), 17);
}

#[test]
fn kfold_rejects_out_of_range_k() {
    assert!(matches!(
        KFold::new(1).assign(10),
        Err(LassoError::InvalidInput { .. })
    ));
    assert!(matches!(
        KFold::new(11).assign(10),
        Err(LassoError::InvalidInput { .. })
    ));
    assert!(KFold::new(10).assign(10).is_ok());
}

#[test]
fn kfold_seeded_shuffle_is_reproducible() {
    let a = KFold::new(3).with_random_state(42).assign(30).expect("valid");
    let b = KFold::new(3).with_random_state(42).assign(30).expect("valid");
    assert_eq!(a, b);

    let unshuffled = KFold::new(3).assign(30).expect("valid");
    assert_ne!(a, unshuffled);
    assert_eq!(a.fold_sizes(), unshuffled.fold_sizes());
}

#[test]
fn kfold_unseeded_shuffle_is_still_a_partition() {
    let assignment = KFold::new(4).with_shuffle(true).assign(22).expect("valid");
    assert_eq!(assignment.fold_sizes(), vec![6, 6, 5, 5]);
    assert!(assignment.fold_of().iter().all(|&f| f < 4));
}

mod kfold_proptest {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        /// Every sample lands in exactly one fold and fold sizes differ by at most one
        #[test]
        fn prop_assignment_is_balanced_partition(
            k in 2..=10usize,
            n in 10..=60usize,
            seed in any::<u64>(),
        ) {
            let k = k.min(n);
            let assignment = KFold::new(k).with_random_state(seed).assign(n).unwrap();

            let mut seen = vec![0usize; n];
            for fold in 0..k {
                for idx in assignment.test_indices(fold) {
                    seen[idx] += 1;
                }
            }
            prop_assert!(seen.iter().all(|&c| c == 1));

            let sizes = assignment.fold_sizes();
            let max = *sizes.iter().max().unwrap();
            let min = *sizes.iter().min().unwrap();
            prop_assert!(max - min <= 1);
            prop_assert_eq!(sizes.iter().sum::<usize>(), n);
        }
    }
}
