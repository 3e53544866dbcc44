//! Error types for spamsift.
//!
//! Every fallible operation in the crate returns [`Result`], whose error side is
//! the [`SpamSiftError`] enum. All variants are recoverable from the caller's
//! point of view: none of them leaves a [`ClassifierService`] in an inconsistent
//! state.
//!
//! # Examples
//!
//! ```
//! use spamsift::error::{Result, SpamSiftError};
//!
//! fn needs_model() -> Result<()> {
//!     Err(SpamSiftError::ModelUnavailable)
//! }
//!
//! match needs_model() {
//!     Ok(_) => println!("ok"),
//!     Err(e) => eprintln!("Error: {e}"),
//! }
//! ```
//!
//! [`ClassifierService`]: crate::classifier::ClassifierService

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The main error type for spamsift operations.
#[derive(Error, Debug)]
pub enum SpamSiftError {
    /// The training corpus lacks class diversity.
    #[error("Insufficient training data: {0}")]
    InsufficientData(String),

    /// No artifact exists at the requested location.
    #[error("Model not found: {}", path.display())]
    ModelNotFound { path: PathBuf },

    /// A query was issued before a model was successfully loaded.
    #[error("Model unavailable: no model has been loaded")]
    ModelUnavailable,

    /// The loaded class set cannot be explained as spam versus ham.
    #[error("Explanation unsupported for classes [{}]", classes.join(", "))]
    ExplanationUnsupported { classes: Vec<String> },

    /// Input that could not be interpreted as expected.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Analysis errors (bad tokenizer pattern and the like).
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Artifact encoding/decoding errors.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid operation or argument.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON errors (config and corpus files).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV errors (corpus and batch files).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Errors with added context, shown with their whole cause chain.
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with SpamSiftError.
pub type Result<T> = std::result::Result<T, SpamSiftError>;

impl SpamSiftError {
    /// Create a new insufficient-data error.
    pub fn insufficient_data<S: Into<String>>(msg: S) -> Self {
        SpamSiftError::InsufficientData(msg.into())
    }

    /// Create a new model-not-found error.
    pub fn model_not_found<P: Into<PathBuf>>(path: P) -> Self {
        SpamSiftError::ModelNotFound { path: path.into() }
    }

    /// Create a new malformed-input error.
    pub fn malformed_input<S: Into<String>>(msg: S) -> Self {
        SpamSiftError::MalformedInput(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        SpamSiftError::Analysis(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        SpamSiftError::Serialization(msg.into())
    }

    /// Create a new invalid operation error.
    pub fn invalid_operation<S: Into<String>>(msg: S) -> Self {
        SpamSiftError::InvalidOperation(msg.into())
    }

    /// Whether this error means "no prediction capability available".
    pub fn is_model_missing(&self) -> bool {
        matches!(
            self,
            SpamSiftError::ModelNotFound { .. } | SpamSiftError::ModelUnavailable
        )
    }
}
