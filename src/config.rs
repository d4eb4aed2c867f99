//! Experiment configuration.
//!
//! Every field has a default, so a configuration file only needs to name
//! the values it changes:
//!
//! ```json
//! { "max_features": 1000, "smote": { "k_neighbors": 3 } }
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpamkitError};
use crate::ml::vectorizer::Word2VecParams;

/// Which documents the vectorizer or embedding model is fitted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitScope {
    /// Fit on every cleaned document before splitting. Test rows influence
    /// the vocabulary, IDF weights and embeddings.
    #[default]
    Corpus,
    /// Fit on the training split only.
    TrainSplit,
}

impl fmt::Display for FitScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitScope::Corpus => write!(f, "corpus"),
            FitScope::TrainSplit => write!(f, "train_split"),
        }
    }
}

/// Feature representation of a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Count,
    Tfidf,
    TfidfBigram,
    Word2vecMean,
}

impl FeatureKind {
    /// Report header for this representation at the given SMOTE ratio.
    pub fn header(&self, sampling_ratio: f64) -> String {
        match self {
            FeatureKind::Count => format!("CountVectorizer with SMOTE ({}):", sampling_ratio),
            FeatureKind::Tfidf => format!("TfidfVectorizer with SMOTE ({}):", sampling_ratio),
            FeatureKind::TfidfBigram => {
                format!("TF-IDF with N-grams and SMOTE ({}):", sampling_ratio)
            }
            FeatureKind::Word2vecMean => format!("Word2Vec with SMOTE ({}):", sampling_ratio),
        }
    }
}

/// Classifier of a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    NaiveBayes,
    RandomForest,
}

/// One row of the pipeline table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub features: FeatureKind,
    pub sampling_ratio: f64,
    pub classifier: ClassifierKind,
}

impl PipelineConfig {
    pub fn new<S: Into<String>>(
        name: S,
        features: FeatureKind,
        sampling_ratio: f64,
        classifier: ClassifierKind,
    ) -> Self {
        PipelineConfig {
            name: name.into(),
            features,
            sampling_ratio,
            classifier,
        }
    }

    /// Report header, e.g. `Word2Vec with SMOTE (0.3):`.
    pub fn header(&self) -> String {
        self.features.header(self.sampling_ratio)
    }
}

/// SMOTE settings shared by every pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoteConfig {
    pub k_neighbors: usize,
    pub seed: u64,
}

impl Default for SmoteConfig {
    fn default() -> Self {
        SmoteConfig {
            k_neighbors: 5,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NaiveBayesConfig {
    pub alpha: f64,
}

impl Default for NaiveBayesConfig {
    fn default() -> Self {
        NaiveBayesConfig { alpha: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomForestConfig {
    pub n_estimators: usize,
    pub seed: u64,
    pub max_depth: Option<usize>,
}

impl Default for RandomForestConfig {
    fn default() -> Self {
        RandomForestConfig {
            n_estimators: 100,
            seed: 42,
            max_depth: None,
        }
    }
}

/// Full experiment configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Held-out fraction, in (0, 1).
    pub test_size: f64,
    /// Seed of the train/test permutation.
    pub split_seed: u64,
    /// Vocabulary cap of the bag-of-words vectorizers.
    pub max_features: usize,
    pub fit_scope: FitScope,
    /// Newline-separated stopword list replacing the bundled English list.
    pub stopwords_path: Option<PathBuf>,
    pub smote: SmoteConfig,
    pub naive_bayes: NaiveBayesConfig,
    pub random_forest: RandomForestConfig,
    pub embedding: Word2VecParams,
    pub pipelines: Vec<PipelineConfig>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            test_size: 0.2,
            split_seed: 10,
            max_features: 2500,
            fit_scope: FitScope::default(),
            stopwords_path: None,
            smote: SmoteConfig::default(),
            naive_bayes: NaiveBayesConfig::default(),
            random_forest: RandomForestConfig::default(),
            embedding: Word2VecParams::default(),
            pipelines: default_pipelines(),
        }
    }
}

/// The four standard pipelines, in run order.
pub fn default_pipelines() -> Vec<PipelineConfig> {
    vec![
        PipelineConfig::new("count", FeatureKind::Count, 0.2, ClassifierKind::NaiveBayes),
        PipelineConfig::new("tfidf", FeatureKind::Tfidf, 0.25, ClassifierKind::NaiveBayes),
        PipelineConfig::new(
            "tfidf_ngram",
            FeatureKind::TfidfBigram,
            0.25,
            ClassifierKind::NaiveBayes,
        ),
        PipelineConfig::new(
            "word2vec",
            FeatureKind::Word2vecMean,
            0.3,
            ClassifierKind::RandomForest,
        ),
    ]
}

impl ExperimentConfig {
    /// Read a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SpamkitError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: ExperimentConfig = serde_json::from_str(&content)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Check value ranges and pipeline names.
    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(SpamkitError::config(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        if self.max_features == 0 {
            return Err(SpamkitError::config("max_features must be positive"));
        }
        if self.pipelines.is_empty() {
            return Err(SpamkitError::config("no pipelines configured"));
        }

        let mut names = HashSet::new();
        for pipeline in &self.pipelines {
            if !names.insert(pipeline.name.as_str()) {
                return Err(SpamkitError::config(format!(
                    "duplicate pipeline name '{}'",
                    pipeline.name
                )));
            }
            if !(pipeline.sampling_ratio > 0.0 && pipeline.sampling_ratio <= 1.0) {
                return Err(SpamkitError::config(format!(
                    "pipeline '{}': sampling_ratio must be in (0, 1], got {}",
                    pipeline.name, pipeline.sampling_ratio
                )));
            }
        }

        if self.smote.k_neighbors == 0 {
            return Err(SpamkitError::config("smote.k_neighbors must be positive"));
        }
        if self.random_forest.n_estimators == 0 {
            return Err(SpamkitError::config("random_forest.n_estimators must be positive"));
        }
        if self.naive_bayes.alpha < 0.0 {
            return Err(SpamkitError::config("naive_bayes.alpha must not be negative"));
        }
        self.embedding.validate()
    }

    /// Keep only the named pipelines, in table order.
    ///
    /// An unknown name is an error.
    pub fn select_pipelines(&mut self, names: &[String]) -> Result<()> {
        if names.is_empty() {
            return Ok(());
        }
        for name in names {
            if !self.pipelines.iter().any(|p| &p.name == name) {
                let known: Vec<&str> = self.pipelines.iter().map(|p| p.name.as_str()).collect();
                return Err(SpamkitError::config(format!(
                    "unknown pipeline '{}' (known: {})",
                    name,
                    known.join(", ")
                )));
            }
        }
        self.pipelines.retain(|p| names.contains(&p.name));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExperimentConfig::default();

        assert_eq!(config.test_size, 0.2);
        assert_eq!(config.split_seed, 10);
        assert_eq!(config.max_features, 2500);
        assert_eq!(config.fit_scope, FitScope::Corpus);
        assert_eq!(config.smote.k_neighbors, 5);
        assert_eq!(config.random_forest.n_estimators, 100);
        assert_eq!(config.embedding.dimension, 100);
        assert!(config.validate().is_ok());

        let ratios: Vec<f64> = config.pipelines.iter().map(|p| p.sampling_ratio).collect();
        assert_eq!(ratios, vec![0.2, 0.25, 0.25, 0.3]);
    }

    #[test]
    fn test_headers() {
        let headers: Vec<String> = default_pipelines().iter().map(PipelineConfig::header).collect();
        assert_eq!(
            headers,
            vec![
                "CountVectorizer with SMOTE (0.2):",
                "TfidfVectorizer with SMOTE (0.25):",
                "TF-IDF with N-grams and SMOTE (0.25):",
                "Word2Vec with SMOTE (0.3):",
            ]
        );
    }

    #[test]
    fn test_partial_json() {
        let config: ExperimentConfig = serde_json::from_str(
            r#"{ "max_features": 100, "fit_scope": "train_split", "smote": { "k_neighbors": 3 } }"#,
        )
        .unwrap();

        assert_eq!(config.max_features, 100);
        assert_eq!(config.fit_scope, FitScope::TrainSplit);
        assert_eq!(config.smote.k_neighbors, 3);
        assert_eq!(config.smote.seed, 42);
        assert_eq!(config.pipelines.len(), 4);
    }

    #[test]
    fn test_json_round_trip_of_defaults() {
        let json = serde_json::to_string(&ExperimentConfig::default()).unwrap();
        assert!(json.contains("\"word2vec_mean\""));
        assert!(json.contains("\"random_forest\""));

        let parsed: ExperimentConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ExperimentConfig::default());
    }

    #[test]
    fn test_validate_rejects() {
        let mut config = ExperimentConfig {
            test_size: 1.0,
            ..ExperimentConfig::default()
        };
        assert!(config.validate().is_err());

        config = ExperimentConfig {
            max_features: 0,
            ..ExperimentConfig::default()
        };
        assert!(config.validate().is_err());

        config = ExperimentConfig {
            pipelines: Vec::new(),
            ..ExperimentConfig::default()
        };
        assert!(config.validate().is_err());

        config = ExperimentConfig::default();
        config.pipelines.push(config.pipelines[0].clone());
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("duplicate pipeline name 'count'"));
    }

    #[test]
    fn test_select_pipelines() {
        let mut config = ExperimentConfig::default();
        config
            .select_pipelines(&["word2vec".to_string(), "count".to_string()])
            .unwrap();
        let names: Vec<&str> = config.pipelines.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["count", "word2vec"]);

        assert!(config.select_pipelines(&["bogus".to_string()]).is_err());
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "split_seed": 7 }}"#).unwrap();

        let config = ExperimentConfig::load(file.path()).unwrap();
        assert_eq!(config.split_seed, 7);
        assert!(ExperimentConfig::load("/nonexistent/config.json").is_err());
    }
}
