//! Labeled training corpora.
//!
//! A corpus is an ordered list of `(text, label)` examples. It can be built
//! in code, taken from the built-in demo set, or loaded from disk:
//!
//! - `*.json`: an array of `{"text": ..., "label": "spam" | "ham"}` objects
//! - anything else: CSV with a header row; the text column is found the same
//!   way batch classification finds it, the label column is the first of
//!   `label`, `class`, `category`
//!
//! ```csv
//! text,label
//! Win money now click this link,spam
//! Let's go for lunch,ham
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::ReaderBuilder;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::batch::{DEFAULT_TEXT_COLUMNS, resolve_text_column};
use crate::error::{Result, SpamSiftError};
use crate::model::Label;

/// Header names accepted for the label column, in priority order.
pub const LABEL_COLUMNS: [&str; 3] = ["label", "class", "category"];

/// A single labeled message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    /// Message text; any string is accepted for training.
    pub text: String,
    /// Class of the message.
    pub label: Label,
}

impl Example {
    /// Create a new example.
    pub fn new<S: Into<String>>(text: S, label: Label) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

/// Ordered collection of labeled messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Corpus {
    examples: Vec<Example>,
}

impl Corpus {
    /// Create an empty corpus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a corpus from examples.
    pub fn from_examples(examples: Vec<Example>) -> Self {
        Self { examples }
    }

    /// Small demonstration corpus: four spam and three ham messages.
    pub fn demo() -> Self {
        [
            ("Congratulations you won a prize", Label::Spam),
            ("Win money now click this link", Label::Spam),
            ("Get a free coupon today", Label::Spam),
            ("Hey, are we meeting tomorrow?", Label::Ham),
            ("Please send me the project file", Label::Ham),
            ("Let's go for lunch", Label::Ham),
            ("You have been selected to win cash", Label::Spam),
        ]
        .into_iter()
        .collect()
    }

    /// Load a corpus from a JSON or CSV file, chosen by extension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let corpus = if is_json {
            Self::from_json_reader(reader)?
        } else {
            Self::from_csv_reader(reader)?
        };

        info!(
            "Loaded {} training example(s) from {}",
            corpus.len(),
            path.display()
        );
        Ok(corpus)
    }

    /// Parse a JSON array of examples.
    ///
    /// Labels are matched case-insensitively, like CSV labels.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let rows: Vec<RawExample> = serde_json::from_reader(reader)?;
        let examples = rows
            .into_iter()
            .enumerate()
            .map(|(row, raw)| {
                let label = parse_label(&raw.label, row + 1)?;
                Ok(Example::new(raw.text, label))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { examples })
    }

    /// Parse CSV with a header row.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let label_idx = LABEL_COLUMNS
            .iter()
            .find_map(|name| headers.iter().position(|h| h == name))
            .ok_or_else(|| {
                SpamSiftError::malformed_input(format!(
                    "training CSV needs a label column (one of: {})",
                    LABEL_COLUMNS.join(", ")
                ))
            })?;

        let mut text_column = resolve_text_column(&headers, &DEFAULT_TEXT_COLUMNS)?;
        if text_column.index == label_idx {
            let other = (0..headers.len()).find(|&idx| idx != label_idx).ok_or_else(|| {
                SpamSiftError::malformed_input("training CSV has no text column besides the label")
            })?;
            warn!(
                "Using column '{}' as training text instead of the label column",
                headers[other]
            );
            text_column.index = other;
            text_column.name = headers[other].clone();
        }

        let mut examples = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let record_no = row + 1;
            let text = record.get(text_column.index).ok_or_else(|| {
                SpamSiftError::malformed_input(format!("record {record_no}: missing text"))
            })?;
            let label = record
                .get(label_idx)
                .ok_or_else(|| {
                    SpamSiftError::malformed_input(format!("record {record_no}: missing label"))
                })
                .and_then(|label| parse_label(label, record_no))?;
            examples.push(Example::new(text, label));
        }

        Ok(Self { examples })
    }

    /// Append an example.
    pub fn push<S: Into<String>>(&mut self, text: S, label: Label) {
        self.examples.push(Example::new(text, label));
    }

    /// All examples in order.
    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    /// Texts of all examples, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.examples.iter().map(|example| example.text.as_str())
    }

    /// Number of examples.
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// Whether the corpus is empty.
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Examples per class; classes without examples are absent.
    pub fn class_counts(&self) -> BTreeMap<Label, usize> {
        let mut counts = BTreeMap::new();
        for example in &self.examples {
            *counts.entry(example.label).or_insert(0) += 1;
        }
        counts
    }
}

/// Example as written in a JSON corpus, before the label is checked.
#[derive(Deserialize)]
struct RawExample {
    text: String,
    label: String,
}

fn parse_label(label: &str, record_no: usize) -> Result<Label> {
    label.parse::<Label>().map_err(|e| match e {
        SpamSiftError::MalformedInput(msg) => {
            SpamSiftError::malformed_input(format!("record {record_no}: {msg}"))
        }
        other => other,
    })
}

impl<S: Into<String>> FromIterator<(S, Label)> for Corpus {
    fn from_iter<I: IntoIterator<Item = (S, Label)>>(iter: I) -> Self {
        Self {
            examples: iter
                .into_iter()
                .map(|(text, label)| Example::new(text, label))
                .collect(),
        }
    }
}
