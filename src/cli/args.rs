//! Command line argument parsing for the spamsift CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::model::Label;

/// spamsift - classify messages as spam or ham
#[derive(Parser, Debug, Clone)]
#[command(name = "spamsift")]
#[command(about = "Classify messages as spam or ham with a bag-of-words Naive Bayes model")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SpamSiftArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Model file (overrides the configured path)
    #[arg(short, long, value_name = "MODEL_PATH", env = "SPAMSIFT_MODEL", global = true)]
    pub model: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SpamSiftArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a model and save it
    Train(TrainArgs),

    /// Classify messages
    Predict(PredictArgs),

    /// Show the tokens that most indicate spam
    Explain(ExplainArgs),

    /// Classify every row of a CSV file
    #[command(name = "classify-csv")]
    ClassifyCsv(ClassifyCsvArgs),

    /// Show model information
    Info,
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Labeled corpus (CSV or JSON); the built-in demo corpus when omitted
    #[arg(long, value_name = "CORPUS_FILE")]
    pub corpus: Option<PathBuf>,

    /// Smoothing constant (overrides the configured value)
    #[arg(long)]
    pub alpha: Option<f64>,
}

/// Arguments for classifying messages
#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    /// Messages to classify; read from stdin when none are given
    #[arg(value_name = "TEXT")]
    pub texts: Vec<String>,
}

/// Arguments for explanations
#[derive(Parser, Debug, Clone)]
pub struct ExplainArgs {
    /// Number of tokens to show (defaults to the configured value)
    #[arg(short = 'n', long)]
    pub top: Option<usize>,

    /// List the most probable tokens of a single class instead
    #[arg(long, value_name = "CLASS")]
    pub class: Option<ClassArg>,
}

/// Arguments for CSV batch classification
#[derive(Parser, Debug, Clone)]
pub struct ClassifyCsvArgs {
    /// Input CSV file with a header row
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file (defaults to <INPUT stem>_classified.csv)
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Column holding the text (skips column guessing)
    #[arg(long, value_name = "COLUMN")]
    pub text_column: Option<String>,
}

/// Class names accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassArg {
    Spam,
    Ham,
}

impl From<ClassArg> for Label {
    fn from(class: ClassArg) -> Self {
        match class {
            ClassArg::Spam => Label::Spam,
            ClassArg::Ham => Label::Ham,
        }
    }
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_train_command() {
        let args = SpamSiftArgs::try_parse_from([
            "spamsift",
            "train",
            "--corpus",
            "sms.csv",
            "--alpha",
            "0.5",
            "--model",
            "out.bin",
        ])
        .unwrap();

        assert_eq!(args.model, Some(PathBuf::from("out.bin")));
        if let Command::Train(train_args) = args.command {
            assert_eq!(train_args.corpus, Some(PathBuf::from("sms.csv")));
            assert_eq!(train_args.alpha, Some(0.5));
        } else {
            panic!("Expected Train command");
        }
    }

    #[test]
    fn test_predict_command() {
        let args =
            SpamSiftArgs::try_parse_from(["spamsift", "-f", "json", "predict", "win cash", "hi"])
                .unwrap();

        assert_eq!(args.output_format, OutputFormat::Json);
        if let Command::Predict(predict_args) = args.command {
            assert_eq!(predict_args.texts, vec!["win cash", "hi"]);
        } else {
            panic!("Expected Predict command");
        }
    }

    #[test]
    fn test_explain_command() {
        let args =
            SpamSiftArgs::try_parse_from(["spamsift", "explain", "-n", "5", "--class", "ham"])
                .unwrap();

        if let Command::Explain(explain_args) = args.command {
            assert_eq!(explain_args.top, Some(5));
            assert_eq!(explain_args.class.map(Label::from), Some(Label::Ham));
        } else {
            panic!("Expected Explain command");
        }
    }

    #[test]
    fn test_classify_csv_command() {
        let args = SpamSiftArgs::try_parse_from([
            "spamsift",
            "classify-csv",
            "inbox.csv",
            "--text-column",
            "subject",
            "-vv",
        ])
        .unwrap();

        assert_eq!(args.verbosity(), 2);
        if let Command::ClassifyCsv(csv_args) = args.command {
            assert_eq!(csv_args.input, PathBuf::from("inbox.csv"));
            assert_eq!(csv_args.output, None);
            assert_eq!(csv_args.text_column.as_deref(), Some("subject"));
        } else {
            panic!("Expected ClassifyCsv command");
        }
    }

    #[test]
    fn test_verbosity() {
        let args = SpamSiftArgs::try_parse_from(["spamsift", "info"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        let args = SpamSiftArgs::try_parse_from(["spamsift", "-q", "-vvv", "info"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }
}
