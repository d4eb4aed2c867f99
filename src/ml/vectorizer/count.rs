//! Bag-of-words count vectorizer.

use rayon::prelude::*;

use super::Vectorizer;
use super::terms::TermExtractor;
use super::vocabulary::Vocabulary;
use crate::error::Result;
use crate::ml::{FeatureMatrix, MLError};

/// Maps each document to raw term counts over a capped vocabulary.
///
/// # Examples
///
/// ```
/// use spamkit::ml::vectorizer::{CountVectorizer, Vectorizer};
///
/// let documents = vec!["hello".to_string(), "win cash click".to_string()];
/// let mut vectorizer = CountVectorizer::new().with_max_features(2500);
/// let matrix = vectorizer.fit_transform(&documents).unwrap();
///
/// assert_eq!(matrix.shape(), (2, 4));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CountVectorizer {
    extractor: TermExtractor,
    max_features: Option<usize>,
    vocabulary: Option<Vocabulary>,
}

impl CountVectorizer {
    /// Create an unfitted unigram count vectorizer with no vocabulary cap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `max_features` terms.
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = Some(max_features);
        self
    }

    /// Use n-grams in `min_n..=max_n`.
    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Self {
        self.extractor = TermExtractor::with_ngram_range(min_n, max_n);
        self
    }

    /// The fitted vocabulary.
    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.vocabulary.as_ref()
    }
}

impl Vectorizer for CountVectorizer {
    fn fit(&mut self, documents: &[String]) -> Result<()> {
        let terms: Vec<Vec<String>> = documents
            .par_iter()
            .map(|doc| self.extractor.terms(doc))
            .collect();

        let vocabulary = Vocabulary::build(&terms, self.max_features);
        if vocabulary.is_empty() {
            log::warn!("Count vocabulary is empty; every row will have zero width");
        }
        log::debug!(
            "Count vocabulary: {} terms from {} documents",
            vocabulary.len(),
            documents.len()
        );

        self.vocabulary = Some(vocabulary);
        Ok(())
    }

    fn transform(&self, documents: &[String]) -> Result<FeatureMatrix> {
        let vocabulary = self
            .vocabulary
            .as_ref()
            .ok_or_else(|| MLError::not_trained("CountVectorizer"))?;

        let rows: Vec<Vec<f32>> = documents
            .par_iter()
            .map(|doc| vocabulary.count_terms(&self.extractor.terms(doc)))
            .collect();

        let mut matrix = FeatureMatrix::with_width(vocabulary.len());
        for row in &rows {
            matrix.push_row(row)?;
        }
        Ok(matrix)
    }

    fn n_features(&self) -> usize {
        self.vocabulary.as_ref().map_or(0, Vocabulary::len)
    }

    fn name(&self) -> &'static str {
        "count"
    }
}
