//! TF-IDF vectorizer for text feature extraction.

use std::collections::HashSet;

use rayon::prelude::*;

use super::Vectorizer;
use super::terms::TermExtractor;
use super::vocabulary::Vocabulary;
use crate::error::Result;
use crate::ml::{FeatureMatrix, MLError};

/// TF-IDF vectorizer with smooth IDF and L2-normalized rows.
///
/// The weight of term `t` in document `d` is `count(t, d) * idf(t)` with
/// `idf(t) = ln((1 + n) / (1 + df(t))) + 1`, and each row is then scaled to
/// unit Euclidean length. Rows without any known term stay all zero.
#[derive(Clone, Default)]
pub struct TfIdfVectorizer {
    extractor: TermExtractor,
    max_features: Option<usize>,
    /// Vocabulary: term -> column mapping.
    vocabulary: Option<Vocabulary>,
    /// Inverse document frequency for each column.
    idf: Vec<f64>,
    /// Total number of documents seen during fitting.
    n_documents: usize,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("ngram_range", &self.extractor.ngram_range())
            .field("max_features", &self.max_features)
            .field("vocabulary_size", &self.vocabulary_size())
            .field("n_documents", &self.n_documents)
            .finish()
    }
}

impl TfIdfVectorizer {
    /// Create an unfitted unigram TF-IDF vectorizer.
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

    /// Get the size of the vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.as_ref().map_or(0, Vocabulary::len)
    }

    /// The fitted vocabulary.
    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.vocabulary.as_ref()
    }

    /// IDF weights in column order.
    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    fn weigh(&self, vocabulary: &Vocabulary, document: &str) -> Vec<f32> {
        let counts = vocabulary.count_terms(&self.extractor.terms(document));
        let mut weights: Vec<f64> = counts
            .iter()
            .zip(&self.idf)
            .map(|(&count, &idf)| count as f64 * idf)
            .collect();

        let norm = weights.iter().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for weight in &mut weights {
                *weight /= norm;
            }
        }

        weights.into_iter().map(|w| w as f32).collect()
    }
}

impl Vectorizer for TfIdfVectorizer {
    fn fit(&mut self, documents: &[String]) -> Result<()> {
        self.n_documents = documents.len();
        let terms: Vec<Vec<String>> = documents
            .par_iter()
            .map(|doc| self.extractor.terms(doc))
            .collect();

        let vocabulary = Vocabulary::build(&terms, self.max_features);

        // Count document frequencies
        let mut document_frequency = vec![0usize; vocabulary.len()];
        for doc_terms in &terms {
            let unique: HashSet<usize> = doc_terms.iter().filter_map(|t| vocabulary.get(t)).collect();
            for column in unique {
                document_frequency[column] += 1;
            }
        }

        let n = self.n_documents as f64;
        self.idf = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        if vocabulary.is_empty() {
            log::warn!("TF-IDF vocabulary is empty; every row will have zero width");
        }
        log::debug!(
            "TF-IDF vocabulary: {} terms (ngram range {:?}) from {} documents",
            vocabulary.len(),
            self.extractor.ngram_range(),
            self.n_documents
        );

        self.vocabulary = Some(vocabulary);
        Ok(())
    }

    fn transform(&self, documents: &[String]) -> Result<FeatureMatrix> {
        let vocabulary = self
            .vocabulary
            .as_ref()
            .ok_or_else(|| MLError::not_trained("TfIdfVectorizer"))?;

        let rows: Vec<Vec<f32>> = documents
            .par_iter()
            .map(|doc| self.weigh(vocabulary, doc))
            .collect();

        let mut matrix = FeatureMatrix::with_width(vocabulary.len());
        for row in &rows {
            matrix.push_row(row)?;
        }
        Ok(matrix)
    }

    fn n_features(&self) -> usize {
        self.vocabulary_size()
    }

    fn name(&self) -> &'static str {
        if self.extractor.ngram_range().1 > 1 {
            "tfidf_ngram"
        } else {
            "tfidf"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<String> {
        vec![
            "free cash prize".to_string(),
            "call me later".to_string(),
            "free call".to_string(),
        ]
    }

    #[test]
    fn test_tfidf_vectorizer() {
        let mut vectorizer = TfIdfVectorizer::new();
        let matrix = vectorizer.fit_transform(&corpus()).unwrap();

        assert_eq!(vectorizer.vocabulary_size(), 6);
        assert_eq!(matrix.shape(), (3, 6));
        assert_eq!(vectorizer.name(), "tfidf");
    }

    #[test]
    fn test_smooth_idf() {
        let mut vectorizer = TfIdfVectorizer::new();
        vectorizer.fit(&corpus()).unwrap();

        let vocabulary = vectorizer.vocabulary().unwrap();
        let free = vectorizer.idf()[vocabulary.get("free").unwrap()];
        let prize = vectorizer.idf()[vocabulary.get("prize").unwrap()];

        assert!((free - ((4.0f64 / 3.0).ln() + 1.0)).abs() < 1e-12);
        assert!((prize - (2.0f64.ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_rows_are_unit_length() {
        let mut vectorizer = TfIdfVectorizer::new();
        let matrix = vectorizer.fit_transform(&corpus()).unwrap();

        for row in matrix.rows() {
            let norm: f32 = row.iter().map(|v| v * v).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_unknown_document_is_zero_row() {
        let mut vectorizer = TfIdfVectorizer::new();
        vectorizer.fit(&corpus()).unwrap();

        let matrix = vectorizer.transform(&["nothing known".to_string()]).unwrap();
        assert!(matrix.row(0).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_bigram_vocabulary() {
        let mut vectorizer = TfIdfVectorizer::new().with_ngram_range(1, 2);
        vectorizer.fit(&corpus()).unwrap();

        let vocabulary = vectorizer.vocabulary().unwrap();
        assert!(vocabulary.contains("free cash"));
        assert!(vocabulary.contains("call me"));
        assert_eq!(vocabulary.len(), 6 + 5);
        assert_eq!(vectorizer.name(), "tfidf_ngram");
    }

    #[test]
    fn test_empty_corpus_gives_zero_width() {
        let documents = vec!["".to_string(), "a".to_string(), "".to_string()];

        let mut unigrams = TfIdfVectorizer::new();
        let matrix = unigrams.fit_transform(&documents).unwrap();
        assert_eq!(matrix.shape(), (3, 0));
        assert!(unigrams.idf().is_empty());

        let mut bigrams = TfIdfVectorizer::new().with_ngram_range(1, 2);
        let matrix = bigrams.fit_transform(&documents).unwrap();
        assert_eq!(matrix.shape(), (3, 0));
        assert!(bigrams.idf().is_empty());
        assert_eq!(bigrams.n_features(), 0);
    }

    #[test]
    fn test_transform_before_fit() {
        assert!(TfIdfVectorizer::new().transform(&corpus()).is_err());
    }
}
