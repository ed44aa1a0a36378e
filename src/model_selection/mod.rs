//! Model selection: k-fold splitting and cross-validated choice of the
//! Lasso penalty.

mod cross_validator;

pub use cross_validator::{CrossValidator, ValidationScore};

use crate::error::{LassoError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// K-Fold cross-validator.
///
/// Splits data into K consecutive folds. Each fold is used once as test set
/// while the remaining K-1 folds form the training set. When `n` is not a
/// multiple of K the first `n % K` folds get one extra sample.
///
/// # Example
///
/// ```rust
/// use lasso_cv::model_selection::KFold;
///
/// let kfold = KFold::new(5);
/// let folds = kfold.assign(12).unwrap();
/// assert_eq!(folds.fold_sizes(), vec![3, 3, 2, 2, 2]);
///
/// for (train_idx, test_idx) in kfold.split(12).unwrap() {
///     assert_eq!(train_idx.len() + test_idx.len(), 12);
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KFold {
    n_splits: usize,
    shuffle: bool,
    random_state: Option<u64>,
}

impl KFold {
    /// Create a new K-Fold cross-validator.
    ///
    /// # Arguments
    ///
    /// * `n_splits` - Number of folds. Must be at least 2.
    #[must_use]
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            shuffle: false,
            random_state: None,
        }
    }

    /// Enable shuffling before splitting into batches.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Set random state for reproducible shuffling.
    #[must_use]
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self.shuffle = true; // Shuffle is implied when random_state is set
        self
    }

    /// Number of folds.
    #[must_use]
    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Whether samples are shuffled before assignment.
    #[must_use]
    pub fn is_shuffled(&self) -> bool {
        self.shuffle
    }

    /// Assigns each of `n_samples` samples to exactly one fold.
    ///
    /// # Errors
    ///
    /// Returns [`LassoError::InvalidInput`] if there are fewer than 2 folds or
    /// more folds than samples.
    pub fn assign(&self, n_samples: usize) -> Result<FoldAssignment> {
        if self.n_splits < 2 {
            return Err(LassoError::invalid_input(format!(
                "number of folds must be at least 2, got {}",
                self.n_splits
            )));
        }
        if self.n_splits > n_samples {
            return Err(LassoError::invalid_input(format!(
                "number of folds ({}) exceeds number of samples ({n_samples})",
                self.n_splits
            )));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        if self.shuffle {
            if let Some(seed) = self.random_state {
                let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
                indices.shuffle(&mut rng);
            } else {
                let mut rng = rand::thread_rng();
                indices.shuffle(&mut rng);
            }
        }

        let fold_size = n_samples / self.n_splits;
        let remainder = n_samples % self.n_splits;

        let mut fold_of = vec![0; n_samples];
        let mut start = 0;
        for fold in 0..self.n_splits {
            let end = start + fold_size + usize::from(fold < remainder);
            for &idx in &indices[start..end] {
                fold_of[idx] = fold;
            }
            start = end;
        }

        Ok(FoldAssignment {
            fold_of,
            n_folds: self.n_splits,
        })
    }

    /// Generate train/test indices for each fold.
    ///
    /// # Errors
    ///
    /// Same conditions as [`KFold::assign`].
    pub fn split(&self, n_samples: usize) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        let assignment = self.assign(n_samples)?;
        Ok((0..assignment.n_folds())
            .map(|fold| (assignment.train_indices(fold), assignment.test_indices(fold)))
            .collect())
    }
}

/// A partition of sample indices into folds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldAssignment {
    fold_of: Vec<usize>,
    n_folds: usize,
}

impl FoldAssignment {
    /// Number of folds.
    #[must_use]
    pub fn n_folds(&self) -> usize {
        self.n_folds
    }

    /// Number of samples assigned.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.fold_of.len()
    }

    /// Fold of each sample.
    #[must_use]
    pub fn fold_of(&self) -> &[usize] {
        &self.fold_of
    }

    /// Held-out samples of `fold`, ascending.
    #[must_use]
    pub fn test_indices(&self, fold: usize) -> Vec<usize> {
        self.indices_where(|f| f == fold)
    }

    /// Training samples of `fold` (every sample not held out), ascending.
    #[must_use]
    pub fn train_indices(&self, fold: usize) -> Vec<usize> {
        self.indices_where(|f| f != fold)
    }

    /// Size of each fold.
    #[must_use]
    pub fn fold_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.n_folds];
        for &f in &self.fold_of {
            sizes[f] += 1;
        }
        sizes
    }

    fn indices_where(&self, keep: impl Fn(usize) -> bool) -> Vec<usize> {
        self.fold_of
            .iter()
            .enumerate()
            .filter(|(_, f)| keep(**f))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
#[path = "tests_kfold_contract.rs"]
mod tests_kfold_contract;
