use std::fs;
use std::path::Path;

use tempfile::{Builder, TempDir};

use spamkit::analysis::TextNormalizer;
use spamkit::config::{ExperimentConfig, FitScope};
use spamkit::dataset::Dataset;
use spamkit::ml::sampling::Smote;
use spamkit::ml::vectorizer::{TfIdfVectorizer, Vectorizer};
use spamkit::pipeline::{ExperimentReport, run_experiment};

const SPAM: &[&str] = &[
    "WINNER!! You have been selected to receive a \u{a3}900 prize reward! Call now",
    "FREE entry in 2 a wkly comp to win FA Cup final tkts. Text FA to 87121",
    "URGENT! Your mobile number has been awarded a \u{a3}2000 bonus prize. Claim now",
    "Congratulations, you won a free cash prize! Text CLAIM to 80082",
];

const HAM: &[&str] = &[
    "Ok lar... Joking wif u oni...",
    "I'm gonna be home soon and i don't want to talk about this stuff anymore tonight",
    "Even my brother is not like to speak with me. They treat me like aids patent.",
    "As per your request 'Melle Melle' has been set as your callertune",
    "I've been searching for the right words to thank you for this breather",
    "Is that seriously how you spell his name?",
    "Going for dinner now, see you at the office later",
];

fn write_dataset(dir: &Path, rows: usize) -> std::path::PathBuf {
    let mut content = String::from("v1,v2,,,\n");
    for i in 0..rows {
        let (label, text) = if i % 10 == 0 {
            ("spam", SPAM[(i / 10) % SPAM.len()])
        } else {
            ("ham", HAM[i % HAM.len()])
        };
        content.push_str(&format!("{label},\"{text}\",,,\n"));
    }

    let path = dir.join("spam.csv");
    fs::write(&path, content).unwrap();
    path
}

fn small_config() -> ExperimentConfig {
    let mut config = ExperimentConfig::default();
    config.random_forest.n_estimators = 10;
    config.embedding.dimension = 16;
    config.embedding.min_count = 1;
    config
}

fn run(dir: &TempDir, config: &ExperimentConfig) -> ExperimentReport {
    let dataset = Dataset::load(write_dataset(dir.path(), 150)).unwrap();
    run_experiment(config, &dataset).unwrap()
}

#[test]
fn test_every_pipeline_reports() {
    let dir = Builder::new().prefix("test_experiment").tempdir().unwrap();
    let report = run(&dir, &small_config());

    assert_eq!(report.n_documents, 150);
    assert_eq!(report.fit_scope, FitScope::Corpus);
    assert_eq!(report.pipelines.len(), 4);

    let names: Vec<&str> = report.pipelines.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["count", "tfidf", "tfidf_ngram", "word2vec"]);

    for pipeline in &report.pipelines {
        assert_eq!(pipeline.test_rows, 30);
        assert_eq!(pipeline.train_rows, 120);
        assert_eq!(pipeline.predictions.len(), pipeline.test_rows);
        assert!(pipeline.balanced_rows > pipeline.train_rows);
        assert!((0.0..=1.0).contains(&pipeline.accuracy));
        assert_eq!(pipeline.report.classes.len(), 2);
    }
    assert_eq!(report.pipeline("word2vec").unwrap().n_features, 16);
}

#[test]
fn test_console_layout() {
    let dir = Builder::new().prefix("test_layout").tempdir().unwrap();
    let text = run(&dir, &small_config()).to_string();

    for header in [
        "CountVectorizer with SMOTE (0.2):",
        "TfidfVectorizer with SMOTE (0.25):",
        "TF-IDF with N-grams and SMOTE (0.25):",
        "Word2Vec with SMOTE (0.3):",
    ] {
        assert!(text.contains(header), "missing header {header}");
    }
    assert_eq!(text.matches(&"=".repeat(50)).count(), 3);
    assert_eq!(text.matches("Accuracy: ").count(), 4);
    assert_eq!(text.matches("weighted avg").count(), 4);
}

#[test]
fn test_same_seeds_same_results() {
    let dir = Builder::new().prefix("test_determinism").tempdir().unwrap();
    let config = small_config();

    let first = run(&dir, &config);
    let second = run(&dir, &config);

    for (a, b) in first.pipelines.iter().zip(&second.pipelines) {
        assert_eq!(a.accuracy, b.accuracy, "pipeline {}", a.name);
        assert_eq!(a.predictions, b.predictions, "pipeline {}", a.name);
        assert_eq!(a.balanced_rows, b.balanced_rows);
    }
}

#[test]
fn test_train_split_fit_scope() {
    let dir = Builder::new().prefix("test_fit_scope").tempdir().unwrap();
    let config = ExperimentConfig {
        fit_scope: FitScope::TrainSplit,
        ..small_config()
    };

    let report = run(&dir, &config);
    assert_eq!(report.fit_scope, FitScope::TrainSplit);
    for pipeline in &report.pipelines {
        assert_eq!(pipeline.predictions.len(), 30);
    }
}

#[test]
fn test_smote_on_real_features() {
    let dir = Builder::new().prefix("test_smote").tempdir().unwrap();
    let dataset = Dataset::load(write_dataset(dir.path(), 150)).unwrap();
    let corpus = TextNormalizer::new()
        .unwrap()
        .normalize_corpus(&dataset.texts())
        .unwrap();
    let labels = dataset.labels();

    let mut vectorizer = TfIdfVectorizer::new();
    let features = vectorizer.fit_transform(&corpus).unwrap();

    let (x, y) = Smote::new(0.25).fit_resample(&features, &labels).unwrap();
    let majority = y.iter().filter(|&&c| c == 0).count();
    let minority = y.iter().filter(|&&c| c == 1).count();

    assert_eq!(majority, 135);
    assert!(minority >= 15);
    assert_eq!(minority, (0.25 * 135.0_f64) as usize);
    assert_eq!(x.n_rows(), y.len());
    assert_eq!(x.n_cols(), features.n_cols());
    assert_eq!(&y[..labels.len()], labels.as_slice());
}

#[test]
fn test_invalid_config_is_rejected() {
    let dir = Builder::new().prefix("test_invalid").tempdir().unwrap();
    let dataset = Dataset::load(write_dataset(dir.path(), 20)).unwrap();
    let config = ExperimentConfig {
        test_size: 1.5,
        ..small_config()
    };

    let err = run_experiment(&config, &dataset).unwrap_err();
    assert!(err.to_string().contains("test_size"));
}
