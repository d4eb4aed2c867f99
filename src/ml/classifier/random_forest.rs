//! Random forest of CART trees with majority voting.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::decision_tree::DecisionTreeClassifier;
use crate::error::Result;
use crate::ml::classifier::{Classifier, argmax_lowest, check_training_data};
use crate::ml::{FeatureMatrix, MLError};

/// Bagged ensemble of decision trees.
///
/// Tree `i` draws its bootstrap sample and its feature subsets from a
/// generator seeded with `seed + i`, so trees can be grown in parallel and
/// the forest is still reproducible. Each node examines
/// `max(1, floor(sqrt(n_features)))` features. Predictions are the
/// majority vote of the trees; ties go to the lower class id.
#[derive(Debug, Clone)]
pub struct RandomForestClassifier {
    trees: Vec<DecisionTreeClassifier>,
    n_estimators: usize,
    max_depth: Option<usize>,
    seed: u64,
    n_classes: usize,
}

impl RandomForestClassifier {
    /// Creates a new Random Forest classifier with `n_estimators` trees.
    pub fn new(n_estimators: usize) -> Self {
        RandomForestClassifier {
            trees: Vec::new(),
            n_estimators,
            max_depth: None,
            seed: 42,
            n_classes: 0,
        }
    }

    /// Sets the maximum depth for each tree.
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the random state for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Fitted trees.
    pub fn trees(&self) -> &[DecisionTreeClassifier] {
        &self.trees
    }

    fn grow_tree(&self, index: usize, x: &FeatureMatrix, y: &[usize]) -> Result<DecisionTreeClassifier> {
        let n_samples = y.len();
        let max_features = ((x.n_cols() as f64).sqrt().floor() as usize).max(1);
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(index as u64));

        let sample: Vec<usize> = (0..n_samples)
            .map(|_| rng.random_range(0..n_samples))
            .collect();

        let mut tree = DecisionTreeClassifier::new()
            .with_max_depth(self.max_depth)
            .with_max_features(max_features)
            .with_seed(rng.random());
        tree.fit_sample(x, y, &sample)?;
        Ok(tree)
    }
}

impl Default for RandomForestClassifier {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Classifier for RandomForestClassifier {
    fn fit(&mut self, x: &FeatureMatrix, y: &[usize]) -> Result<()> {
        check_training_data(x, y)?;
        if self.n_estimators == 0 {
            return Err(MLError::invalid_features("a forest needs at least one tree").into());
        }

        let trees = (0..self.n_estimators)
            .into_par_iter()
            .map(|i| self.grow_tree(i, x, y))
            .collect::<Result<Vec<_>>>()?;

        self.n_classes = y.iter().copied().max().unwrap_or(0) + 1;
        let mean_depth =
            trees.iter().map(DecisionTreeClassifier::depth).sum::<usize>() as f64 / trees.len() as f64;
        log::debug!(
            "Fitted RandomForest: {} trees on {} rows × {} features, mean depth {:.1}",
            trees.len(),
            x.n_rows(),
            x.n_cols(),
            mean_depth
        );
        self.trees = trees;
        Ok(())
    }

    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<usize>> {
        if self.trees.is_empty() {
            return Err(MLError::not_trained("RandomForestClassifier").into());
        }

        let votes = self
            .trees
            .par_iter()
            .map(|tree| tree.predict(x))
            .collect::<Result<Vec<_>>>()?;

        Ok((0..x.n_rows())
            .map(|row| {
                let mut counts = vec![0usize; self.n_classes];
                for tree_votes in &votes {
                    counts[tree_votes[row]] += 1;
                }
                argmax_lowest(&counts)
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "random_forest"
    }
}
