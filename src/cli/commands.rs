//! Command implementations for the spamsift CLI.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use log::{info, warn};

use crate::batch::classify_csv;
use crate::classifier::{ClassifierService, SpamClassifier};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::SpamSiftConfig;
use crate::corpus::Corpus;
use crate::error::{Result, SpamSiftError};
use crate::model::{Label, ModelTrainer};
use crate::storage::save_artifact;

/// Execute a CLI command.
pub fn execute_command(args: SpamSiftArgs) -> Result<()> {
    let config = load_config(&args)?;
    match &args.command {
        Command::Train(train_args) => train_model(train_args.clone(), config, &args),
        Command::Predict(predict_args) => predict_texts(predict_args.clone(), &config, &args),
        Command::Explain(explain_args) => explain_model(explain_args.clone(), &config, &args),
        Command::ClassifyCsv(csv_args) => classify_file(csv_args.clone(), config, &args),
        Command::Info => show_info(&config, &args),
    }
}

/// Configuration from `--config` (or defaults), with `--model` applied on top.
fn load_config(args: &SpamSiftArgs) -> Result<SpamSiftConfig> {
    let mut config = match &args.config {
        Some(path) => SpamSiftConfig::from_file(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => SpamSiftConfig::default(),
    };
    if let Some(model) = &args.model {
        config.model_path = model.clone();
    }
    Ok(config)
}

/// Load the configured model into a fresh service.
fn load_service(config: &SpamSiftConfig) -> Result<ClassifierService> {
    let service = ClassifierService::new();
    service.load(&config.model_path)?;
    Ok(service)
}

/// Train a model and save it.
fn train_model(args: TrainArgs, mut config: SpamSiftConfig, cli_args: &SpamSiftArgs) -> Result<()> {
    if let Some(alpha) = args.alpha {
        config.trainer.alpha = alpha;
        config.validate()?;
    }

    let corpus = match &args.corpus {
        Some(path) => {
            if cli_args.verbosity() > 1 {
                println!("Loading corpus from: {}", path.display());
            }
            Corpus::load(path)
                .with_context(|| format!("failed to load corpus {}", path.display()))?
        }
        None => {
            info!("No corpus given, training on the built-in demo corpus");
            Corpus::demo()
        }
    };

    let artifact = ModelTrainer::new(config.trainer.clone()).train(&corpus)?;
    save_artifact(&artifact, &config.model_path)
        .with_context(|| format!("failed to save model to {}", config.model_path.display()))?;
    info!("Model saved to {}", config.model_path.display());

    let vocabulary_size = artifact.vocabulary().len();
    let classifier = SpamClassifier::new(Arc::new(artifact))?;
    let training_accuracy = training_accuracy(&classifier, &corpus)?;

    output_result(
        "Model trained successfully",
        &TrainingSummary {
            model_path: config.model_path.to_string_lossy().to_string(),
            documents: corpus.len(),
            vocabulary_size,
            class_counts: corpus.class_counts(),
            training_accuracy,
        },
        cli_args,
    )
}

/// Classify messages given as arguments, or one per line on stdin.
fn predict_texts(args: PredictArgs, config: &SpamSiftConfig, cli_args: &SpamSiftArgs) -> Result<()> {
    let texts = if args.texts.is_empty() {
        read_texts(io::stdin().lock())?
    } else {
        check_texts(args.texts)?
    };

    let service = load_service(config)?;
    let results = service.predict_batch(&texts)?;
    let predictions = texts
        .iter()
        .zip(results)
        .map(|(text, result)| PredictionOutput::new(text, result))
        .collect();

    output_result(
        "Prediction complete",
        &PredictionResults { predictions },
        cli_args,
    )
}

/// Show the most spam-indicative tokens, or the top tokens of one class.
fn explain_model(args: ExplainArgs, config: &SpamSiftConfig, cli_args: &SpamSiftArgs) -> Result<()> {
    let top_n = args.top.unwrap_or(config.explain_top_n);
    let service = load_service(config)?;
    let classifier = service.current()?;
    let results = explain_with_fallback(&classifier, args.class.map(Label::from), top_n)?;

    output_result("Explanation complete", &results, cli_args)
}

/// Classify every row of a CSV file.
fn classify_file(
    args: ClassifyCsvArgs,
    mut config: SpamSiftConfig,
    cli_args: &SpamSiftArgs,
) -> Result<()> {
    if args.text_column.is_some() {
        config.batch.text_column = args.text_column;
    }
    let service = load_service(&config)?;
    let classifier = service.current()?;

    let output: Option<PathBuf> = args.output;
    let report = classify_csv(&classifier, &args.input, output.as_deref(), &config.batch)
        .with_context(|| format!("failed to classify {}", args.input.display()))?;

    output_result("Batch classification complete", &report, cli_args)
}

/// Show a summary of the configured model.
fn show_info(config: &SpamSiftConfig, cli_args: &SpamSiftArgs) -> Result<()> {
    let service = load_service(config)?;
    let classifier = service.current()?;
    let info = ModelInfo::from_artifact(
        &config.model_path.to_string_lossy(),
        classifier.artifact(),
    );
    output_result("Model information", &info, cli_args)
}

/// Reject arguments that are empty after trimming.
fn check_texts(texts: Vec<String>) -> Result<Vec<String>> {
    if texts.is_empty() || texts.iter().any(|text| text.trim().is_empty()) {
        return Err(SpamSiftError::malformed_input(
            "please enter some text to classify",
        ));
    }
    Ok(texts)
}

/// One message per non-blank line; at least one is required.
fn read_texts<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut texts = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            texts.push(line);
        }
    }
    check_texts(texts)
}

/// Fraction of `corpus` that `classifier` labels correctly.
fn training_accuracy(classifier: &SpamClassifier, corpus: &Corpus) -> Result<f64> {
    if corpus.is_empty() {
        return Ok(0.0);
    }
    let texts: Vec<&str> = corpus.texts().collect();
    let correct = classifier
        .predict_batch(&texts)?
        .iter()
        .zip(corpus.examples())
        .filter(|(prediction, example)| prediction.label == example.label)
        .count();
    Ok(correct as f64 / corpus.len() as f64)
}

/// Spam-vs-ham explanation, or the top terms of one class.
///
/// Models that cannot be explained as spam versus ham fall back to the top
/// terms of their first class.
fn explain_with_fallback(
    classifier: &SpamClassifier,
    class: Option<Label>,
    top_n: usize,
) -> Result<ExplanationResults> {
    if let Some(label) = class {
        return Ok(ExplanationResults {
            mode: label.to_string(),
            entries: classifier.explain_class(label, top_n)?,
        });
    }

    match classifier.explain(top_n) {
        Ok(entries) => Ok(ExplanationResults {
            mode: "spam-vs-ham".to_string(),
            entries,
        }),
        Err(SpamSiftError::ExplanationUnsupported { classes }) => {
            let Some(&label) = classifier.classes().first() else {
                return Err(SpamSiftError::ExplanationUnsupported { classes });
            };
            warn!(
                "Model classes [{}] are not spam and ham; listing top tokens of '{label}'",
                classes.join(", ")
            );
            Ok(ExplanationResults {
                mode: label.to_string(),
                entries: classifier.explain_class(label, top_n)?,
            })
        }
        Err(e) => Err(e),
    }
}
