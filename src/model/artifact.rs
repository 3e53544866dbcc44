//! Trained model artifact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::AnalyzerConfig;
use crate::error::{Result, SpamSiftError};
use crate::model::label::Label;
use crate::model::vocabulary::Vocabulary;

/// Provenance recorded alongside the learned parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Analyzer used for training; inference must tokenize the same way.
    pub analyzer: AnalyzerConfig,
    /// Additive smoothing constant.
    pub alpha: f64,
    /// Number of training documents.
    pub document_count: usize,
    /// Training documents per class, aligned with the artifact's classes.
    pub class_document_counts: Vec<usize>,
    /// When the model was trained.
    pub trained_at: DateTime<Utc>,
}

/// Vocabulary plus multinomial Naive Bayes parameters.
///
/// Immutable once constructed: retraining produces a new artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    vocabulary: Vocabulary,
    /// Sorted, unique.
    classes: Vec<Label>,
    /// `ln P(class)`, aligned with `classes`.
    class_log_prior: Vec<f64>,
    /// `ln P(term | class)`, one row per class, one column per vocabulary term.
    feature_log_prob: Vec<Vec<f64>>,
    metadata: ModelMetadata,
}

impl ModelArtifact {
    /// Assemble an artifact from its parts, checking that all shapes agree.
    pub fn from_parts(
        vocabulary: Vocabulary,
        classes: Vec<Label>,
        class_log_prior: Vec<f64>,
        feature_log_prob: Vec<Vec<f64>>,
        metadata: ModelMetadata,
    ) -> Result<Self> {
        let artifact = Self {
            vocabulary,
            classes,
            class_log_prior,
            feature_log_prob,
            metadata,
        };
        artifact.validate()?;
        Ok(artifact)
    }

    /// Check internal consistency. Called on every decoded artifact.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.classes.is_empty() {
            return Err(SpamSiftError::serialization("model has no classes"));
        }
        if self.classes.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(SpamSiftError::serialization(
                "model classes must be sorted and unique",
            ));
        }

        let n_classes = self.classes.len();
        if self.class_log_prior.len() != n_classes
            || self.feature_log_prob.len() != n_classes
            || self.metadata.class_document_counts.len() != n_classes
        {
            return Err(SpamSiftError::serialization(format!(
                "parameter shape mismatch: {} classes, {} priors, {} probability rows, {} class counts",
                n_classes,
                self.class_log_prior.len(),
                self.feature_log_prob.len(),
                self.metadata.class_document_counts.len()
            )));
        }

        let n_features = self.vocabulary.len();
        if let Some(row) = self
            .feature_log_prob
            .iter()
            .find(|row| row.len() != n_features)
        {
            return Err(SpamSiftError::serialization(format!(
                "probability row has {} columns, vocabulary has {} terms",
                row.len(),
                n_features
            )));
        }

        Ok(())
    }

    /// The frozen vocabulary.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Known classes in lexicographic order.
    pub fn classes(&self) -> &[Label] {
        &self.classes
    }

    /// Position of `label` in [`classes`](Self::classes).
    pub fn class_index(&self, label: Label) -> Option<usize> {
        self.classes.binary_search(&label).ok()
    }

    /// Log prior of every class.
    pub fn class_log_prior(&self) -> &[f64] {
        &self.class_log_prior
    }

    /// Prior probability of `label`, if the model knows it.
    pub fn prior(&self, label: Label) -> Option<f64> {
        self.class_index(label)
            .map(|idx| self.class_log_prior[idx].exp())
    }

    /// Per-term log-probabilities of the class at `class_idx`.
    pub fn feature_log_prob(&self, class_idx: usize) -> &[f64] {
        &self.feature_log_prob[class_idx]
    }

    /// Training provenance.
    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}
