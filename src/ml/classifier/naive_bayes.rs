//! Multinomial Naive Bayes.

use crate::error::Result;
use crate::ml::classifier::{Classifier, check_training_data};
use crate::ml::{FeatureMatrix, MLError};

/// Smallest smoothing value used when `alpha` is configured as zero.
const ALPHA_MIN: f64 = 1e-10;

/// Multinomial Naive Bayes with additive smoothing and learned priors.
///
/// Features must be non-negative (counts or TF-IDF weights).
#[derive(Debug, Clone)]
pub struct MultinomialNB {
    alpha: f64,
    classes: Vec<usize>,
    class_log_prior: Vec<f64>,
    /// `classes.len() × n_features` log probabilities.
    feature_log_prob: Vec<f64>,
    n_features: usize,
}

impl MultinomialNB {
    /// Create an unfitted model with smoothing `alpha`.
    pub fn new(alpha: f64) -> Self {
        MultinomialNB {
            alpha,
            classes: Vec::new(),
            class_log_prior: Vec::new(),
            feature_log_prob: Vec::new(),
            n_features: 0,
        }
    }

    /// Classes seen during fitting, ascending.
    pub fn classes(&self) -> &[usize] {
        &self.classes
    }

    /// Log prior of each class.
    pub fn class_log_prior(&self) -> &[f64] {
        &self.class_log_prior
    }

    /// Joint log likelihood of every class for one row.
    fn joint_log_likelihood(&self, row: &[f32]) -> Vec<f64> {
        self.class_log_prior
            .iter()
            .enumerate()
            .map(|(c, prior)| {
                let log_prob = &self.feature_log_prob[c * self.n_features..(c + 1) * self.n_features];
                prior
                    + row
                        .iter()
                        .zip(log_prob)
                        .map(|(&x, &lp)| f64::from(x) * lp)
                        .sum::<f64>()
            })
            .collect()
    }
}

impl Default for MultinomialNB {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Classifier for MultinomialNB {
    fn fit(&mut self, x: &FeatureMatrix, y: &[usize]) -> Result<()> {
        check_training_data(x, y)?;
        if self.alpha < 0.0 {
            return Err(MLError::invalid_features(format!(
                "smoothing alpha must not be negative, got {}",
                self.alpha
            ))
            .into());
        }

        for (row, values) in x.rows().enumerate() {
            if let Some(column) = values.iter().position(|&v| v < 0.0) {
                return Err(MLError::NegativeFeature {
                    row,
                    column,
                    value: values[column],
                }
                .into());
            }
        }

        let mut classes = y.to_vec();
        classes.sort_unstable();
        classes.dedup();

        let n_features = x.n_cols();
        let mut class_count = vec![0usize; classes.len()];
        let mut feature_count = vec![0.0f64; classes.len() * n_features];

        for (values, label) in x.rows().zip(y) {
            // classes holds every label of y
            let c = classes.binary_search(label).unwrap_or_default();
            class_count[c] += 1;
            let counts = &mut feature_count[c * n_features..(c + 1) * n_features];
            for (count, &v) in counts.iter_mut().zip(values) {
                *count += f64::from(v);
            }
        }

        let alpha = self.alpha.max(ALPHA_MIN);
        let total = y.len() as f64;
        self.class_log_prior = class_count
            .iter()
            .map(|&count| (count as f64 / total).ln())
            .collect();

        self.feature_log_prob = Vec::with_capacity(feature_count.len());
        for c in 0..classes.len() {
            let counts = &feature_count[c * n_features..(c + 1) * n_features];
            let denominator = (counts.iter().sum::<f64>() + alpha * n_features as f64).ln();
            self.feature_log_prob
                .extend(counts.iter().map(|&fc| (fc + alpha).ln() - denominator));
        }

        log::debug!(
            "Fitted MultinomialNB: {} classes, {} features, alpha {}",
            classes.len(),
            n_features,
            alpha
        );
        self.classes = classes;
        self.n_features = n_features;
        Ok(())
    }

    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<usize>> {
        if self.classes.is_empty() {
            return Err(MLError::not_trained("MultinomialNB").into());
        }
        x.check_width(self.n_features)?;

        Ok(x.rows()
            .map(|row| {
                let jll = self.joint_log_likelihood(row);
                let mut best = 0;
                for (c, &score) in jll.iter().enumerate() {
                    if score > jll[best] {
                        best = c;
                    }
                }
                self.classes[best]
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "naive_bayes"
    }
}
