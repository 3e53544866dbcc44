//! Query result types.

use serde::{Deserialize, Serialize};

use crate::model::Label;

/// Outcome of classifying one message.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Most likely class.
    pub label: Label,
    /// Posterior probability of the spam class, in `[0, 1]`.
    pub spam_probability: f64,
}

impl PredictionResult {
    /// Whether the message was classified as spam.
    pub fn is_spam(&self) -> bool {
        self.label == Label::Spam
    }
}

/// A vocabulary term and how strongly it indicates a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationEntry {
    /// Vocabulary term.
    pub token: String,
    /// Log-probability difference (spam minus ham), or a class log-probability
    /// in single-class mode.
    pub score: f64,
}
