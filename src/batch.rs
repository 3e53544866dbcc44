//! Batch classification of CSV files.
//!
//! The text to classify lives in one column of a CSV file with a header row.
//! That column is chosen in this order:
//!
//! 1. an explicitly configured column name (an error if it does not exist)
//! 2. the first header matching [`DEFAULT_TEXT_COLUMNS`] (or the configured
//!    candidate list), in priority order
//! 3. the first column, with a warning: numeric or date columns picked this
//!    way will be classified as if they were text
//!
//! The output copies every input record unchanged and appends the predicted
//! label and the spam probability. It is written next to the input as
//! `<stem>_classified.csv` unless another path is given.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use csv::{ByteRecord, ReaderBuilder, WriterBuilder};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::classifier::SpamClassifier;
use crate::error::{Result, SpamSiftError};
use crate::model::Label;
use crate::storage::write_atomically;

/// Header names tried for the text column, in priority order.
pub const DEFAULT_TEXT_COLUMNS: [&str; 5] = ["text", "message", "body", "content", "email"];

/// Batch classification settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Candidate text column names, in priority order.
    pub text_columns: Vec<String>,
    /// Explicit text column; disables the candidate search and the fallback.
    pub text_column: Option<String>,
    /// Name of the appended predicted-label column.
    pub label_column: String,
    /// Name of the appended spam-probability column.
    pub probability_column: String,
    /// Rows classified per `predict_batch` call.
    pub chunk_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            text_columns: DEFAULT_TEXT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            text_column: None,
            label_column: "pred_label".to_string(),
            probability_column: "spam_prob".to_string(),
            chunk_size: 1000,
        }
    }
}

/// The column holding the text to classify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextColumn {
    /// Zero-based column index.
    pub index: usize,
    /// Header name of the column.
    pub name: String,
    /// True when no candidate matched and the first column was assumed.
    pub fallback: bool,
}

/// Summary of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub text_column: TextColumn,
    pub rows: usize,
    pub spam_rows: usize,
    /// Cells that were missing, not valid UTF-8, or beyond the header width.
    pub coerced_cells: usize,
}

/// Pick the text column from `headers`.
pub fn resolve_text_column<H, C>(headers: &[H], candidates: &[C]) -> Result<TextColumn>
where
    H: AsRef<str>,
    C: AsRef<str>,
{
    if headers.is_empty() {
        return Err(SpamSiftError::malformed_input("input has no columns"));
    }

    for candidate in candidates {
        if let Some(index) = headers
            .iter()
            .position(|header| header.as_ref() == candidate.as_ref())
        {
            return Ok(TextColumn {
                index,
                name: candidate.as_ref().to_string(),
                fallback: false,
            });
        }
    }

    let name = headers[0].as_ref().to_string();
    warn!(
        "No text column found (tried: {}); assuming the first column '{}' holds the text",
        candidates
            .iter()
            .map(|c| c.as_ref())
            .collect::<Vec<_>>()
            .join(", "),
        name
    );
    Ok(TextColumn {
        index: 0,
        name,
        fallback: true,
    })
}

/// Default output location for `input`: `<dir>/<stem>_classified.csv`.
pub fn classified_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{stem}_classified.csv"))
}

/// Coerce one cell to text. Returns the text and whether coercion was needed.
///
/// Missing cells become empty text and invalid UTF-8 is decoded lossily, so a
/// single malformed row never aborts the batch.
pub fn coerce_cell(record: &ByteRecord, index: usize) -> (String, bool) {
    match record.get(index) {
        None => (String::new(), true),
        Some(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => (text.to_string(), false),
            Err(_) => (String::from_utf8_lossy(bytes).into_owned(), true),
        },
    }
}

/// Classify every record of the CSV file at `input`.
///
/// Records are streamed in chunks of `config.chunk_size`. The output is
/// written atomically to `output`, or to [`classified_output_path`] when
/// `output` is `None`.
pub fn classify_csv(
    classifier: &SpamClassifier,
    input: &Path,
    output: Option<&Path>,
    config: &BatchConfig,
) -> Result<BatchReport> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| classified_output_path(input));
    if output == input {
        return Err(SpamSiftError::invalid_operation(
            "output path must differ from the input path",
        ));
    }

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(BufReader::new(File::open(input)?));
    let header_record = reader.byte_headers()?.clone();
    let headers: Vec<String> = header_record
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();

    let text_column = match &config.text_column {
        Some(name) => {
            let index = headers.iter().position(|h| h == name).ok_or_else(|| {
                SpamSiftError::malformed_input(format!("input has no column named '{name}'"))
            })?;
            TextColumn {
                index,
                name: name.clone(),
                fallback: false,
            }
        }
        None => resolve_text_column(&headers, &config.text_columns)?,
    };
    debug!(
        "Classifying column '{}' (index {}) of {}",
        text_column.name,
        text_column.index,
        input.display()
    );

    let width = headers.len();
    let chunk_size = config.chunk_size.max(1);
    let mut rows = 0;
    let mut spam_rows = 0;
    let mut coerced_cells = 0;

    write_atomically(&output, |file| {
        let mut writer = WriterBuilder::new().flexible(true).from_writer(file);

        let mut out_header = header_record.clone();
        out_header.push_field(config.label_column.as_bytes());
        out_header.push_field(config.probability_column.as_bytes());
        writer.write_byte_record(&out_header)?;

        let mut records = reader.byte_records();
        loop {
            let mut chunk: Vec<ByteRecord> = Vec::with_capacity(chunk_size);
            for record in records.by_ref().take(chunk_size) {
                chunk.push(record?);
            }
            if chunk.is_empty() {
                break;
            }

            let texts: Vec<String> = chunk
                .iter()
                .enumerate()
                .map(|(offset, record)| {
                    let (text, coerced) = coerce_cell(record, text_column.index);
                    if coerced {
                        coerced_cells += 1;
                        warn!(
                            "Row {}: text cell missing or not valid UTF-8, classified as '{}'",
                            rows + offset + 1,
                            text
                        );
                    }
                    text
                })
                .collect();

            let results = classifier.predict_batch(&texts)?;
            for (mut record, result) in chunk.into_iter().zip(results) {
                if record.len() > width {
                    let extra = record.len() - width;
                    warn!(
                        "Row {}: dropped {} field(s) beyond the {} header column(s)",
                        rows + 1,
                        extra,
                        width
                    );
                    coerced_cells += extra;
                    record.truncate(width);
                }
                while record.len() < width {
                    record.push_field(b"");
                }
                record.push_field(result.label.as_str().as_bytes());
                record.push_field(result.spam_probability.to_string().as_bytes());
                writer.write_byte_record(&record)?;

                if result.label == Label::Spam {
                    spam_rows += 1;
                }
                rows += 1;
            }
        }

        writer.flush()?;
        Ok(())
    })?;

    if text_column.fallback {
        warn!(
            "Classified {} row(s) using fallback column '{}'; check that it holds message text",
            rows, text_column.name
        );
    }
    info!(
        "Classified {} row(s) from {} ({} spam). Saved to {}",
        rows,
        input.display(),
        spam_rows,
        output.display()
    );

    Ok(BatchReport {
        input: input.to_path_buf(),
        output,
        text_column,
        rows,
        spam_rows,
        coerced_cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_text_column_priority() {
        let headers = ["id", "email", "message"];
        let column = resolve_text_column(&headers, &DEFAULT_TEXT_COLUMNS).unwrap();
        assert_eq!(column.index, 2);
        assert_eq!(column.name, "message");
        assert!(!column.fallback);
    }

    #[test]
    fn test_resolve_text_column_is_case_sensitive() {
        let headers = ["Text", "date"];
        let column = resolve_text_column(&headers, &DEFAULT_TEXT_COLUMNS).unwrap();
        assert_eq!(column.index, 0);
        assert_eq!(column.name, "Text");
        assert!(column.fallback);
    }

    #[test]
    fn test_resolve_text_column_fallback() {
        let headers = ["sms", "received"];
        let column = resolve_text_column(&headers, &DEFAULT_TEXT_COLUMNS).unwrap();
        assert_eq!(
            column,
            TextColumn {
                index: 0,
                name: "sms".to_string(),
                fallback: true
            }
        );
    }

    #[test]
    fn test_resolve_text_column_no_headers() {
        let headers: [&str; 0] = [];
        assert!(matches!(
            resolve_text_column(&headers, &DEFAULT_TEXT_COLUMNS),
            Err(SpamSiftError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_classified_output_path() {
        assert_eq!(
            classified_output_path(Path::new("/data/inbox.csv")),
            PathBuf::from("/data/inbox_classified.csv")
        );
        assert_eq!(
            classified_output_path(Path::new("messages")),
            PathBuf::from("messages_classified.csv")
        );
    }

    #[test]
    fn test_coerce_cell() {
        let mut record = ByteRecord::new();
        record.push_field(b"hello");
        record.push_field(b"caf\xff");

        assert_eq!(coerce_cell(&record, 0), ("hello".to_string(), false));
        assert_eq!(coerce_cell(&record, 1), ("caf\u{fffd}".to_string(), true));
        assert_eq!(coerce_cell(&record, 2), (String::new(), true));
    }

    #[test]
    fn test_batch_config_default() {
        let config = BatchConfig::default();
        assert_eq!(config.text_columns, DEFAULT_TEXT_COLUMNS);
        assert_eq!(config.label_column, "pred_label");
        assert_eq!(config.probability_column, "spam_prob");
        assert!(config.text_column.is_none());
    }
}
