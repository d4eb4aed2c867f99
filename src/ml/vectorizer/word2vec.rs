//! Word2Vec embeddings (CBOW with negative sampling) and mean pooling.
//!
//! Training is single-threaded and fully seeded, so the same corpus and
//! parameters always give the same vectors.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::Vectorizer;
use crate::error::{Result, SpamkitError};
use crate::ml::{FeatureMatrix, MLError};

/// Dot products outside `(-MAX_EXP, MAX_EXP)` are skipped during updates.
const MAX_EXP: f32 = 6.0;

/// Exponent applied to word counts in the negative-sampling distribution.
const NS_EXPONENT: f64 = 0.75;

/// Word2Vec training parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Word2VecParams {
    /// Embedding dimension.
    pub dimension: usize,
    /// Maximum distance between the center word and a context word.
    pub window: usize,
    /// Words seen fewer times are dropped from the vocabulary.
    pub min_count: usize,
    /// Noise words drawn per positive example.
    pub negative: usize,
    /// Passes over the corpus.
    pub epochs: usize,
    /// Initial learning rate.
    pub alpha: f32,
    /// Final learning rate; the rate decays linearly towards it.
    pub min_alpha: f32,
    /// Down-sampling threshold for frequent words; 0 disables it.
    pub sample: f64,
    /// Seed for initialization, window shrinking, sub-sampling and noise draws.
    pub seed: u64,
}

impl Default for Word2VecParams {
    fn default() -> Self {
        Word2VecParams {
            dimension: 100,
            window: 5,
            min_count: 5,
            negative: 5,
            epochs: 5,
            alpha: 0.025,
            min_alpha: 0.0001,
            sample: 1e-3,
            seed: 1,
        }
    }
}

impl Word2VecParams {
    /// Check that the parameters describe a trainable model.
    pub fn validate(&self) -> Result<()> {
        if self.dimension == 0 {
            return Err(SpamkitError::config("embedding dimension must be positive"));
        }
        if self.window == 0 {
            return Err(SpamkitError::config("embedding window must be positive"));
        }
        if self.negative == 0 {
            return Err(SpamkitError::config("at least one negative sample is required"));
        }
        if !(self.alpha > 0.0) || self.min_alpha < 0.0 || self.min_alpha > self.alpha {
            return Err(SpamkitError::config(format!(
                "learning rate must decay from a positive alpha ({}) to min_alpha ({})",
                self.alpha, self.min_alpha
            )));
        }
        if self.sample < 0.0 {
            return Err(SpamkitError::config("sample threshold must not be negative"));
        }
        Ok(())
    }
}

/// A CBOW Word2Vec model trained with negative sampling.
#[derive(Debug, Clone)]
pub struct Word2Vec {
    params: Word2VecParams,
    index: HashMap<String, usize>,
    words: Vec<String>,
    counts: Vec<usize>,
    /// Input (word) vectors, `words.len() × dimension`.
    syn0: Vec<f32>,
    /// Output vectors for negative sampling.
    syn1neg: Vec<f32>,
    trained: bool,
}

impl Word2Vec {
    /// Create an untrained model.
    pub fn new(params: Word2VecParams) -> Self {
        Word2Vec {
            params,
            index: HashMap::new(),
            words: Vec::new(),
            counts: Vec::new(),
            syn0: Vec::new(),
            syn1neg: Vec::new(),
            trained: false,
        }
    }

    /// Training parameters.
    pub fn params(&self) -> &Word2VecParams {
        &self.params
    }

    /// Embedding dimension.
    pub fn dimension(&self) -> usize {
        self.params.dimension
    }

    /// Number of words with a vector.
    pub fn vocabulary_size(&self) -> usize {
        self.words.len()
    }

    /// Whether `word` has a vector.
    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// Whether [`train`](Self::train) has completed.
    pub fn is_trained(&self) -> bool {
        self.trained
    }

    /// The vector of `word`, if it is in the vocabulary.
    pub fn vector(&self, word: &str) -> Option<&[f32]> {
        let dim = self.params.dimension;
        self.index
            .get(word)
            .map(|&i| &self.syn0[i * dim..(i + 1) * dim])
    }

    /// Mean of the vectors of the in-vocabulary words, or `None` when no
    /// word has a vector.
    pub fn mean_vector<S: AsRef<str>>(&self, words: &[S]) -> Option<Vec<f32>> {
        let mut sum = vec![0.0f32; self.params.dimension];
        let mut found = 0usize;
        for word in words {
            if let Some(vector) = self.vector(word.as_ref()) {
                for (acc, v) in sum.iter_mut().zip(vector) {
                    *acc += v;
                }
                found += 1;
            }
        }
        if found == 0 {
            return None;
        }
        let scale = 1.0 / found as f32;
        sum.iter_mut().for_each(|v| *v *= scale);
        Some(sum)
    }

    /// Build the vocabulary from `sentences` and train the vectors.
    ///
    /// Any previous state is discarded.
    pub fn train(&mut self, sentences: &[Vec<String>]) -> Result<()> {
        self.params.validate()?;
        self.build_vocabulary(sentences);

        let dim = self.params.dimension;
        let mut rng = StdRng::seed_from_u64(self.params.seed);

        self.syn0 = (0..self.words.len() * dim)
            .map(|_| (rng.random::<f32>() - 0.5) / dim as f32)
            .collect();
        self.syn1neg = vec![0.0; self.words.len() * dim];
        self.trained = true;

        if self.words.is_empty() {
            log::warn!(
                "No word reaches min_count {}; the embedding vocabulary is empty",
                self.params.min_count
            );
            return Ok(());
        }

        let keep_probability = self.keep_probabilities();
        let noise_table = self.noise_table();
        let raw_words: usize = sentences.iter().map(Vec::len).sum();
        let total_words = (raw_words * self.params.epochs).max(1);

        let mut processed = 0usize;
        let mut neu1 = vec![0.0f32; dim];
        let mut neu1e = vec![0.0f32; dim];

        for epoch in 0..self.params.epochs {
            for sentence in sentences {
                let progress = processed as f32 / total_words as f32;
                let alpha = (self.params.alpha
                    - (self.params.alpha - self.params.min_alpha) * progress)
                    .max(self.params.min_alpha);
                processed += sentence.len();

                let indices: Vec<usize> = sentence
                    .iter()
                    .filter_map(|word| self.index.get(word).copied())
                    .filter(|&i| keep_probability[i] >= rng.random::<f64>())
                    .collect();

                for pos in 0..indices.len() {
                    let reduced = rng.random_range(0..self.params.window);
                    let reach = self.params.window - reduced;
                    let start = pos.saturating_sub(reach);
                    let end = (pos + reach + 1).min(indices.len());

                    let context: Vec<usize> = (start..end)
                        .filter(|&p| p != pos)
                        .map(|p| indices[p])
                        .collect();
                    if context.is_empty() {
                        continue;
                    }

                    self.train_pair(
                        indices[pos],
                        &context,
                        alpha,
                        &noise_table,
                        &mut rng,
                        &mut neu1,
                        &mut neu1e,
                    );
                }
            }
            log::debug!("Word2Vec epoch {} done", epoch + 1);
        }

        log::info!(
            "Trained Word2Vec: {} words, dimension {}, {} epochs",
            self.words.len(),
            dim,
            self.params.epochs
        );
        Ok(())
    }

    /// One CBOW update: predict `center` from the mean of `context`.
    #[allow(clippy::too_many_arguments)]
    fn train_pair(
        &mut self,
        center: usize,
        context: &[usize],
        alpha: f32,
        noise_table: &[f64],
        rng: &mut StdRng,
        neu1: &mut [f32],
        neu1e: &mut [f32],
    ) {
        let dim = self.params.dimension;

        neu1.fill(0.0);
        for &c in context {
            for (acc, v) in neu1.iter_mut().zip(&self.syn0[c * dim..(c + 1) * dim]) {
                *acc += v;
            }
        }
        let inv = 1.0 / context.len() as f32;
        neu1.iter_mut().for_each(|v| *v *= inv);
        neu1e.fill(0.0);

        for d in 0..=self.params.negative {
            let (target, label) = if d == 0 {
                (center, 1.0f32)
            } else {
                let noise = sample_noise(noise_table, rng);
                if noise == center {
                    continue;
                }
                (noise, 0.0)
            };

            let out = &mut self.syn1neg[target * dim..(target + 1) * dim];
            let f: f32 = neu1.iter().zip(out.iter()).map(|(a, b)| a * b).sum();
            if f <= -MAX_EXP || f >= MAX_EXP {
                continue;
            }
            let g = (label - sigmoid(f)) * alpha;

            for ((err, o), h) in neu1e.iter_mut().zip(out.iter_mut()).zip(neu1.iter()) {
                *err += g * *o;
                *o += g * h;
            }
        }

        for &c in context {
            for (v, err) in self.syn0[c * dim..(c + 1) * dim].iter_mut().zip(neu1e.iter()) {
                *v += err;
            }
        }
    }

    fn build_vocabulary(&mut self, sentences: &[Vec<String>]) {
        let mut first_seen: HashMap<&str, usize> = HashMap::new();
        let mut raw: Vec<(&str, usize)> = Vec::new();
        for sentence in sentences {
            for word in sentence {
                match first_seen.get(word.as_str()) {
                    Some(&i) => raw[i].1 += 1,
                    None => {
                        first_seen.insert(word.as_str(), raw.len());
                        raw.push((word.as_str(), 1));
                    }
                }
            }
        }

        raw.retain(|&(_, count)| count >= self.params.min_count);
        // Stable: equal counts keep first-seen order.
        raw.sort_by(|a, b| b.1.cmp(&a.1));

        self.words = raw.iter().map(|(word, _)| word.to_string()).collect();
        self.counts = raw.iter().map(|&(_, count)| count).collect();
        self.index = self
            .words
            .iter()
            .enumerate()
            .map(|(i, word)| (word.clone(), i))
            .collect();

        log::debug!(
            "Word2Vec vocabulary: {} of {} distinct words kept (min_count {})",
            self.words.len(),
            first_seen.len(),
            self.params.min_count
        );
    }

    /// Probability of keeping each word occurrence under sub-sampling.
    fn keep_probabilities(&self) -> Vec<f64> {
        let total: usize = self.counts.iter().sum();
        if self.params.sample <= 0.0 || total == 0 {
            return vec![1.0; self.counts.len()];
        }
        let threshold = self.params.sample * total as f64;
        self.counts
            .iter()
            .map(|&count| {
                let count = count as f64;
                (((count / threshold).sqrt() + 1.0) * (threshold / count)).min(1.0)
            })
            .collect()
    }

    /// Cumulative unigram^0.75 distribution.
    fn noise_table(&self) -> Vec<f64> {
        let mut cumulative = 0.0;
        self.counts
            .iter()
            .map(|&count| {
                cumulative += (count as f64).powf(NS_EXPONENT);
                cumulative
            })
            .collect()
    }
}

fn sample_noise(table: &[f64], rng: &mut StdRng) -> usize {
    let total = table.last().copied().unwrap_or(0.0);
    let target = rng.random::<f64>() * total;
    table
        .partition_point(|&c| c <= target)
        .min(table.len().saturating_sub(1))
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Trains Word2Vec on the whitespace tokens of each document and maps a
/// document to the mean of its word vectors.
///
/// Documents with no in-vocabulary word map to the zero vector.
#[derive(Debug, Clone)]
pub struct Word2VecVectorizer {
    model: Word2Vec,
}

impl Word2VecVectorizer {
    /// Create an unfitted vectorizer.
    pub fn new(params: Word2VecParams) -> Self {
        Word2VecVectorizer {
            model: Word2Vec::new(params),
        }
    }

    /// The underlying model.
    pub fn model(&self) -> &Word2Vec {
        &self.model
    }

    fn tokenize(document: &str) -> Vec<String> {
        document.split_whitespace().map(String::from).collect()
    }
}

impl Default for Word2VecVectorizer {
    fn default() -> Self {
        Self::new(Word2VecParams::default())
    }
}

impl Vectorizer for Word2VecVectorizer {
    fn fit(&mut self, documents: &[String]) -> Result<()> {
        let sentences: Vec<Vec<String>> = documents.iter().map(|d| Self::tokenize(d)).collect();
        self.model.train(&sentences)
    }

    fn transform(&self, documents: &[String]) -> Result<FeatureMatrix> {
        if !self.model.is_trained() {
            return Err(MLError::not_trained("Word2VecVectorizer").into());
        }

        let dim = self.model.dimension();
        let mut matrix = FeatureMatrix::with_width(dim);
        let mut without_embedding = 0usize;

        for document in documents {
            match self.model.mean_vector(&Self::tokenize(document)) {
                Some(vector) => matrix.push_row(&vector)?,
                None => {
                    without_embedding += 1;
                    matrix.push_row(&vec![0.0; dim])?;
                }
            }
        }

        if without_embedding > 0 {
            log::warn!(
                "{} of {} documents have no in-vocabulary word; using zero vectors",
                without_embedding,
                documents.len()
            );
        }
        Ok(matrix)
    }

    fn n_features(&self) -> usize {
        self.model.dimension()
    }

    fn name(&self) -> &'static str {
        "word2vec_mean"
    }
}
