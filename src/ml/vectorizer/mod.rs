//! Feature extractors that turn cleaned documents into feature matrices.
//!
//! Every extractor follows the same two-phase protocol: [`Vectorizer::fit`]
//! learns corpus statistics (a vocabulary, document frequencies or word
//! embeddings) and [`Vectorizer::transform`] maps documents to one row each.
//! After fitting, the output width is fixed.

pub mod count;
pub mod terms;
pub mod tfidf;
pub mod vocabulary;
pub mod word2vec;

pub use count::CountVectorizer;
pub use terms::TermExtractor;
pub use tfidf::TfIdfVectorizer;
pub use vocabulary::Vocabulary;
pub use word2vec::{Word2Vec, Word2VecParams, Word2VecVectorizer};

use crate::error::Result;
use crate::ml::FeatureMatrix;

/// Trait for document feature extractors.
pub trait Vectorizer: Send + Sync {
    /// Learn corpus statistics from the given documents.
    fn fit(&mut self, documents: &[String]) -> Result<()>;

    /// Map documents to feature rows, one per document, in input order.
    fn transform(&self, documents: &[String]) -> Result<FeatureMatrix>;

    /// Fit on the documents and transform them.
    fn fit_transform(&mut self, documents: &[String]) -> Result<FeatureMatrix> {
        self.fit(documents)?;
        self.transform(documents)
    }

    /// Output width after fitting.
    fn n_features(&self) -> usize;

    /// Get the name of this vectorizer.
    fn name(&self) -> &'static str;
}
