//! Experiment runner.
//!
//! Each [`PipelineConfig`] drives one pass of
//! `vectorize → split → resample → fit → predict → evaluate` over a shared,
//! already-cleaned corpus. Pipelines run one after another and share
//! nothing but the corpus, the labels and the split seed, so every pipeline
//! holds out the same rows.

mod report;

pub use report::{ExperimentReport, PipelineReport};

use std::time::Instant;

use crate::analysis::TextNormalizer;
use crate::config::{ClassifierKind, ExperimentConfig, FeatureKind, FitScope, PipelineConfig};
use crate::dataset::{Dataset, Label};
use crate::error::Result;
use crate::ml::classifier::{Classifier, MultinomialNB, RandomForestClassifier};
use crate::ml::metrics::{ClassificationReport, accuracy};
use crate::ml::sampling::Smote;
use crate::ml::split::{TrainTestSplit, train_test_split};
use crate::ml::vectorizer::{CountVectorizer, TfIdfVectorizer, Vectorizer, Word2VecVectorizer};
use crate::ml::FeatureMatrix;

/// Build the feature extractor of a pipeline.
pub fn build_vectorizer(kind: FeatureKind, config: &ExperimentConfig) -> Box<dyn Vectorizer> {
    match kind {
        FeatureKind::Count => {
            Box::new(CountVectorizer::new().with_max_features(config.max_features))
        }
        FeatureKind::Tfidf => {
            Box::new(TfIdfVectorizer::new().with_max_features(config.max_features))
        }
        FeatureKind::TfidfBigram => Box::new(
            TfIdfVectorizer::new()
                .with_ngram_range(1, 2)
                .with_max_features(config.max_features),
        ),
        FeatureKind::Word2vecMean => Box::new(Word2VecVectorizer::new(config.embedding.clone())),
    }
}

/// Build the classifier of a pipeline.
pub fn build_classifier(kind: ClassifierKind, config: &ExperimentConfig) -> Box<dyn Classifier> {
    match kind {
        ClassifierKind::NaiveBayes => Box::new(MultinomialNB::new(config.naive_bayes.alpha)),
        ClassifierKind::RandomForest => Box::new(
            RandomForestClassifier::new(config.random_forest.n_estimators)
                .with_max_depth(config.random_forest.max_depth)
                .with_seed(config.random_forest.seed),
        ),
    }
}

/// Train and test features of one pipeline.
fn featurize(
    vectorizer: &mut dyn Vectorizer,
    corpus: &[String],
    split: &TrainTestSplit,
    scope: FitScope,
) -> Result<(FeatureMatrix, FeatureMatrix)> {
    match scope {
        FitScope::Corpus => {
            let features = vectorizer.fit_transform(corpus)?;
            Ok((
                features.select_rows(&split.train)?,
                features.select_rows(&split.test)?,
            ))
        }
        FitScope::TrainSplit => {
            let train_docs = TrainTestSplit::gather(corpus, &split.train);
            let test_docs = TrainTestSplit::gather(corpus, &split.test);
            let x_train = vectorizer.fit_transform(&train_docs)?;
            let x_test = vectorizer.transform(&test_docs)?;
            Ok((x_train, x_test))
        }
    }
}

/// Run one pipeline over a cleaned corpus and its labels.
pub fn run_pipeline(
    pipeline: &PipelineConfig,
    config: &ExperimentConfig,
    corpus: &[String],
    labels: &[usize],
) -> Result<PipelineReport> {
    let started = Instant::now();
    log::info!("Running pipeline '{}'", pipeline.name);

    let split = train_test_split(corpus.len(), config.test_size, config.split_seed)?;
    let mut vectorizer = build_vectorizer(pipeline.features, config);
    let (x_train, x_test) = featurize(vectorizer.as_mut(), corpus, &split, config.fit_scope)?;
    log::debug!(
        "[{}] {} features: train {:?}, test {:?}",
        pipeline.name,
        vectorizer.name(),
        x_train.shape(),
        x_test.shape()
    );

    let y_train = TrainTestSplit::gather(labels, &split.train);
    let y_test = TrainTestSplit::gather(labels, &split.test);

    let smote = Smote::new(pipeline.sampling_ratio)
        .with_k_neighbors(config.smote.k_neighbors)
        .with_seed(config.smote.seed);
    let (x_balanced, y_balanced) = smote.fit_resample(&x_train, &y_train)?;

    let mut classifier = build_classifier(pipeline.classifier, config);
    classifier.fit(&x_balanced, &y_balanced)?;
    let predictions = classifier.predict(&x_test)?;

    let accuracy = accuracy(&y_test, &predictions)?;
    let report = ClassificationReport::new(&y_test, &predictions, &Label::NAMES)?;
    log::info!(
        "Pipeline '{}' finished: accuracy {:.4} ({} ms)",
        pipeline.name,
        accuracy,
        started.elapsed().as_millis()
    );

    Ok(PipelineReport {
        name: pipeline.name.clone(),
        header: pipeline.header(),
        features: pipeline.features,
        classifier: pipeline.classifier,
        sampling_ratio: pipeline.sampling_ratio,
        accuracy,
        report,
        n_features: x_train.n_cols(),
        train_rows: x_train.n_rows(),
        test_rows: x_test.n_rows(),
        balanced_rows: x_balanced.n_rows(),
        predictions,
        elapsed_ms: started.elapsed().as_millis() as u64,
    })
}

/// Clean the dataset once and run every configured pipeline in order.
pub fn run_experiment(config: &ExperimentConfig, dataset: &Dataset) -> Result<ExperimentReport> {
    config.validate()?;
    let started_at = chrono::Utc::now();

    let normalizer = TextNormalizer::from_optional_stopwords(config.stopwords_path.as_ref())?;
    let corpus = normalizer.normalize_corpus(&dataset.texts())?;
    let labels = dataset.labels();
    let empty_documents = corpus.iter().filter(|doc| doc.is_empty()).count();
    log::info!(
        "Cleaned {} messages ({} empty); fit scope: {}",
        corpus.len(),
        empty_documents,
        config.fit_scope
    );

    let pipelines = config
        .pipelines
        .iter()
        .map(|pipeline| run_pipeline(pipeline, config, &corpus, &labels))
        .collect::<Result<Vec<_>>>()?;

    Ok(ExperimentReport {
        started_at,
        n_documents: corpus.len(),
        empty_documents,
        fit_scope: config.fit_scope,
        pipelines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_pipelines;
    use crate::dataset::LabeledMessage;

    fn synthetic_corpus() -> (Vec<String>, Vec<usize>) {
        let spam = ["win cash prize now", "claim free prize", "free cash offer", "urgent prize claim"];
        let ham = [
            "see you at lunch",
            "call me later tonight",
            "running late for dinner",
            "meet at the office",
            "thanks for the lunch",
        ];
        let mut corpus = Vec::new();
        let mut labels = Vec::new();
        for i in 0..200 {
            if i % 10 == 0 {
                corpus.push(spam[(i / 10) % spam.len()].to_string());
                labels.push(1);
            } else {
                corpus.push(ham[i % ham.len()].to_string());
                labels.push(0);
            }
        }
        (corpus, labels)
    }

    fn small_config() -> ExperimentConfig {
        let mut config = ExperimentConfig::default();
        config.random_forest.n_estimators = 10;
        config.embedding.min_count = 1;
        config.embedding.dimension = 16;
        config
    }

    #[test]
    fn test_every_default_pipeline_runs() {
        let (corpus, labels) = synthetic_corpus();
        let config = small_config();

        for pipeline in default_pipelines() {
            let report = run_pipeline(&pipeline, &config, &corpus, &labels).unwrap();
            assert_eq!(report.predictions.len(), report.test_rows);
            assert_eq!(report.test_rows, 40);
            assert_eq!(report.train_rows, 160);
            assert!(report.balanced_rows >= report.train_rows);
            assert!(report.accuracy >= 0.0 && report.accuracy <= 1.0);
        }
    }

    #[test]
    fn test_naive_bayes_separates_clean_classes() {
        let (corpus, labels) = synthetic_corpus();
        let config = small_config();
        let pipeline = &default_pipelines()[0];

        let report = run_pipeline(pipeline, &config, &corpus, &labels).unwrap();
        assert_eq!(report.accuracy, 1.0);
    }

    #[test]
    fn test_train_split_scope() {
        let (corpus, labels) = synthetic_corpus();
        let config = ExperimentConfig {
            fit_scope: FitScope::TrainSplit,
            ..small_config()
        };

        let report = run_pipeline(&default_pipelines()[1], &config, &corpus, &labels).unwrap();
        assert_eq!(report.predictions.len(), 40);
    }

    #[test]
    fn test_run_experiment() {
        let (corpus, labels) = synthetic_corpus();
        let messages = corpus
            .iter()
            .zip(&labels)
            .map(|(text, &label)| {
                let label = if label == 1 { Label::Spam } else { Label::Ham };
                LabeledMessage::new(label, text.clone())
            })
            .collect();
        let dataset = Dataset::from_messages(messages);

        let report = run_experiment(&small_config(), &dataset).unwrap();
        assert_eq!(report.pipelines.len(), 4);
        assert_eq!(report.n_documents, 200);
    }

    #[test]
    fn test_run_experiment_rejects_invalid_config() {
        let dataset = Dataset::from_messages(Vec::new());
        let config = ExperimentConfig {
            max_features: 0,
            ..ExperimentConfig::default()
        };
        assert!(run_experiment(&config, &dataset).is_err());
    }
}
