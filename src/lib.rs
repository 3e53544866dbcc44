//! # spamsift
//!
//! A small bag-of-words Naive Bayes spam/ham classifier.
//!
//! ## Features
//!
//! - Regex tokenization compatible with the usual `\b\w\w+\b` word pattern
//! - Multinomial Naive Bayes with additive smoothing
//! - Checksummed, atomically written model artifacts
//! - Token explanations ranked by spam log-probability ratio
//! - Streaming CSV batch classification

pub mod analysis;
pub mod batch;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod model;
pub mod storage;

pub mod prelude {
    pub use crate::classifier::{
        ClassifierService, ExplanationEntry, PredictionResult, SpamClassifier,
    };
    pub use crate::corpus::Corpus;
    pub use crate::error::{Result, SpamSiftError};
    pub use crate::model::{Label, ModelArtifact, ModelTrainer, TrainerConfig};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
