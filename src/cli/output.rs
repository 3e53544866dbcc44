//! Output formatting for CLI commands.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::batch::BatchReport;
use crate::classifier::{ExplanationEntry, PredictionResult};
use crate::cli::args::{OutputFormat, SpamSiftArgs};
use crate::error::Result;
use crate::model::{Label, ModelArtifact};

/// Longest text excerpt shown next to a prediction.
pub const PREVIEW_CHARS: usize = 120;

/// Rendering for the human-readable output format.
pub trait HumanOutput {
    /// Render the result as plain text lines.
    fn render_human(&self) -> String;
}

/// Result structure for training.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub model_path: String,
    pub documents: usize,
    pub vocabulary_size: usize,
    pub class_counts: BTreeMap<Label, usize>,
    /// Fraction of training documents the new model classifies correctly.
    pub training_accuracy: f64,
}

/// One classified message.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionOutput {
    pub text: String,
    pub label: Label,
    pub spam_probability: f64,
}

impl PredictionOutput {
    /// Pair a prediction with a preview of its text.
    pub fn new(text: &str, result: PredictionResult) -> Self {
        Self {
            text: preview(text, PREVIEW_CHARS),
            label: result.label,
            spam_probability: result.spam_probability,
        }
    }
}

/// Result structure for predictions.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResults {
    pub predictions: Vec<PredictionOutput>,
}

/// Result structure for explanations.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExplanationResults {
    /// `spam-vs-ham`, or the class listed in single-class mode.
    pub mode: String,
    pub entries: Vec<ExplanationEntry>,
}

/// Model summary.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_path: String,
    pub vocabulary_size: usize,
    pub classes: Vec<ClassInfo>,
    pub alpha: f64,
    pub token_pattern: String,
    pub lowercase: bool,
    pub trained_at: String,
}

/// Per-class model summary.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClassInfo {
    pub label: Label,
    pub prior: f64,
    pub documents: usize,
}

impl ModelInfo {
    /// Summarize `artifact` stored at `model_path`.
    pub fn from_artifact(model_path: &str, artifact: &ModelArtifact) -> Self {
        let metadata = artifact.metadata();
        Self {
            model_path: model_path.to_string(),
            vocabulary_size: artifact.vocabulary().len(),
            classes: artifact
                .classes()
                .iter()
                .zip(artifact.class_log_prior())
                .zip(&metadata.class_document_counts)
                .map(|((&label, log_prior), &documents)| ClassInfo {
                    label,
                    prior: log_prior.exp(),
                    documents,
                })
                .collect(),
            alpha: metadata.alpha,
            token_pattern: metadata.analyzer.pattern.clone(),
            lowercase: metadata.analyzer.lowercase,
            trained_at: metadata.trained_at.to_rfc3339(),
        }
    }
}

impl HumanOutput for TrainingSummary {
    fn render_human(&self) -> String {
        let mut lines = vec![
            format!("Model saved to: {}", self.model_path),
            format!("Documents:      {}", self.documents),
            format!("Vocabulary:     {} terms", self.vocabulary_size),
        ];
        for (label, count) in &self.class_counts {
            lines.push(format!("  {label:<5} {count}"));
        }
        lines.push(format!(
            "Training accuracy: {:.1}%",
            self.training_accuracy * 100.0
        ));
        lines.join("\n")
    }
}

impl HumanOutput for PredictionResults {
    fn render_human(&self) -> String {
        self.predictions
            .iter()
            .map(|p| {
                format!(
                    "Prediction: {}\nSpam probability: {:.3}\nText: {}",
                    p.label.as_str().to_uppercase(),
                    p.spam_probability,
                    p.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl HumanOutput for ExplanationResults {
    fn render_human(&self) -> String {
        let header = if self.mode == "spam-vs-ham" {
            "Word\tScore (higher => more indicative of spam)".to_string()
        } else {
            format!("Word\tLog-probability under '{}'", self.mode)
        };
        let mut lines = vec![header, String::new()];
        lines.extend(
            self.entries
                .iter()
                .map(|entry| format!("{}\t{:.4}", entry.token, entry.score)),
        );
        lines.join("\n")
    }
}

impl HumanOutput for BatchReport {
    fn render_human(&self) -> String {
        let mut lines = vec![format!(
            "Classified {} rows ({} spam). Saved to {}",
            self.rows,
            self.spam_rows,
            self.output.display()
        )];
        if self.text_column.fallback {
            lines.push(format!(
                "Warning: no known text column; used first column '{}'",
                self.text_column.name
            ));
        } else {
            lines.push(format!("Text column: {}", self.text_column.name));
        }
        if self.coerced_cells > 0 {
            lines.push(format!(
                "{} cell(s) were missing, not valid UTF-8, or outside the header",
                self.coerced_cells
            ));
        }
        lines.join("\n")
    }
}

impl HumanOutput for ModelInfo {
    fn render_human(&self) -> String {
        let mut lines = vec![
            format!("Model:       {}", self.model_path),
            format!("Trained at:  {}", self.trained_at),
            format!("Vocabulary:  {} terms", self.vocabulary_size),
            format!(
                "Tokens:      {} (lowercase: {})",
                self.token_pattern, self.lowercase
            ),
            format!("Alpha:       {}", self.alpha),
            "Classes:".to_string(),
        ];
        for class in &self.classes {
            lines.push(format!(
                "  {:<5} prior {:.3} ({} documents)",
                class.label, class.prior, class.documents
            ));
        }
        lines.join("\n")
    }
}

/// Output a result in the specified format.
pub fn output_result<T>(message: &str, result: &T, args: &SpamSiftArgs) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                println!("{message}");
                println!();
            }
            println!("{}", result.render_human());
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
    }
    Ok(())
}

/// First `max_chars` characters of `text` on one line, with `...` if cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let flat = flat.trim();
    if flat.chars().count() > max_chars {
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{cut}...")
    } else {
        flat.to_string()
    }
}
