//! Seeded shuffle split into train and test indices.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpamkitError};

/// Row indices of a train/test partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainTestSplit {
    /// Training row indices.
    pub train: Vec<usize>,
    /// Held-out row indices.
    pub test: Vec<usize>,
}

impl TrainTestSplit {
    /// Gather the labels of the given indices.
    pub fn gather<T: Clone>(values: &[T], indices: &[usize]) -> Vec<T> {
        indices.iter().map(|&i| values[i].clone()).collect()
    }
}

/// Split `n_samples` rows into train and test indices.
///
/// The test set holds `ceil(test_size * n_samples)` rows taken from the
/// front of a seeded permutation; the rest form the training set. The same
/// seed always yields the same partition.
pub fn train_test_split(n_samples: usize, test_size: f64, seed: u64) -> Result<TrainTestSplit> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(SpamkitError::invalid_argument(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }

    let n_test = (test_size * n_samples as f64).ceil() as usize;
    let n_train = n_samples.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(SpamkitError::invalid_argument(format!(
            "cannot split {} samples with test_size {}",
            n_samples, test_size
        )));
    }

    let mut permutation: Vec<usize> = (0..n_samples).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    permutation.shuffle(&mut rng);

    let train = permutation.split_off(n_test);
    log::debug!("Split {} rows into {} train / {} test", n_samples, n_train, n_test);

    Ok(TrainTestSplit {
        train,
        test: permutation,
    })
}
