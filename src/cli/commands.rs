//! Command implementations for the spamkit CLI.

use crate::analysis::TextNormalizer;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::ExperimentConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::pipeline::run_experiment;

/// Execute a CLI command.
pub fn execute_command(args: SpamkitArgs) -> Result<()> {
    match &args.command {
        Command::Run(run_args) => run(run_args, &args),
        Command::Inspect(inspect_args) => inspect(inspect_args, &args),
        Command::Clean(clean_args) => clean(clean_args, &args),
        Command::Config => show_config(&args),
    }
}

/// Build the experiment configuration from an optional file and CLI overrides.
pub fn resolve_config(run_args: &RunArgs) -> Result<ExperimentConfig> {
    let mut config = match &run_args.config {
        Some(path) => ExperimentConfig::load(path)?,
        None => ExperimentConfig::default(),
    };

    if let Some(stopwords) = &run_args.stopwords {
        config.stopwords_path = Some(stopwords.clone());
    }
    if let Some(scope) = run_args.fit_scope {
        config.fit_scope = scope.into();
    }
    config.select_pipelines(&run_args.pipelines)?;
    config.validate()?;
    Ok(config)
}

/// Run the experiment and print every pipeline report.
fn run(run_args: &RunArgs, cli_args: &SpamkitArgs) -> Result<()> {
    let config = resolve_config(run_args)?;
    log::info!("Loading dataset from {}", run_args.dataset.display());
    let dataset = Dataset::load(&run_args.dataset)?;

    let report = run_experiment(&config, &dataset)?;
    output_result(&report, cli_args)
}

/// Print the dataset summary.
fn inspect(inspect_args: &InspectArgs, cli_args: &SpamkitArgs) -> Result<()> {
    let dataset = Dataset::load(&inspect_args.dataset)?;
    output_result(&dataset.summary(), cli_args)
}

/// Clean each message given on the command line.
fn clean(clean_args: &CleanArgs, cli_args: &SpamkitArgs) -> Result<()> {
    let normalizer = TextNormalizer::from_optional_stopwords(clean_args.stopwords.as_ref())?;
    let cleaned = normalizer.normalize_corpus(&clean_args.texts)?;

    let result = CleanResult {
        documents: clean_args
            .texts
            .iter()
            .cloned()
            .zip(cleaned)
            .map(|(input, cleaned)| CleanedText { input, cleaned })
            .collect(),
    };
    output_result(&result, cli_args)
}

/// Print the default configuration; the output is always JSON.
fn show_config(cli_args: &SpamkitArgs) -> Result<()> {
    let pretty = cli_args.pretty || cli_args.output_format == OutputFormat::Human;
    println!("{}", render_json(&ExperimentConfig::default(), pretty)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::config::FitScope;
    use clap::Parser;

    fn run_args(argv: &[&str]) -> RunArgs {
        let mut full = vec!["spamkit", "run", "spam.csv"];
        full.extend_from_slice(argv);
        match SpamkitArgs::try_parse_from(full).unwrap().command {
            Command::Run(args) => args,
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_resolve_default_config() {
        let config = resolve_config(&run_args(&[])).unwrap();
        assert_eq!(config, ExperimentConfig::default());
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"split_seed": 3, "fit_scope": "corpus"}}"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = resolve_config(&run_args(&[
            "--config",
            &path,
            "--fit-scope",
            "train-split",
            "--pipeline",
            "tfidf",
            "--stopwords",
            "words.txt",
        ]))
        .unwrap();

        assert_eq!(config.split_seed, 3);
        assert_eq!(config.fit_scope, FitScope::TrainSplit);
        assert_eq!(config.pipelines.len(), 1);
        assert_eq!(config.pipelines[0].name, "tfidf");
        assert_eq!(
            config.stopwords_path.as_deref(),
            Some(std::path::Path::new("words.txt"))
        );
    }

    #[test]
    fn test_unknown_pipeline_is_rejected() {
        let err = resolve_config(&run_args(&["--pipeline", "svm"])).unwrap_err();
        assert!(err.to_string().contains("unknown pipeline 'svm'"));
    }

    #[test]
    fn test_missing_dataset_fails() {
        let args = SpamkitArgs::try_parse_from(["spamkit", "-q", "inspect", "/nonexistent/spam.csv"])
            .unwrap();
        assert!(execute_command(args).is_err());
    }
}
