//! Classifiers for dense feature matrices.

pub mod decision_tree;
pub mod naive_bayes;
pub mod random_forest;

pub use decision_tree::DecisionTreeClassifier;
pub use naive_bayes::MultinomialNB;
pub use random_forest::RandomForestClassifier;

use crate::error::Result;
use crate::ml::{FeatureMatrix, MLError};

/// Trait for supervised classifiers over integer class ids.
pub trait Classifier: Send + Sync {
    /// Fit the model on rows of `x` labeled by `y`.
    fn fit(&mut self, x: &FeatureMatrix, y: &[usize]) -> Result<()>;

    /// Predict one class id per row of `x`.
    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<usize>>;

    /// Get the name of this classifier.
    fn name(&self) -> &'static str;
}

/// Check that `x` and `y` describe the same non-empty set of rows.
pub(crate) fn check_training_data(x: &FeatureMatrix, y: &[usize]) -> Result<()> {
    if x.n_rows() != y.len() {
        return Err(MLError::LengthMismatch {
            expected: x.n_rows(),
            actual: y.len(),
        }
        .into());
    }
    if y.is_empty() {
        return Err(MLError::invalid_features("cannot fit on an empty training set").into());
    }
    Ok(())
}

/// Index of the largest count; ties go to the lowest index.
pub(crate) fn argmax_lowest(values: &[usize]) -> usize {
    let mut best = 0;
    for (i, &value) in values.iter().enumerate() {
        if value > values[best] {
            best = i;
        }
    }
    best
}
