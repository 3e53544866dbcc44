//! Model training.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{AnalyzerConfig, StandardAnalyzer};
use crate::corpus::Corpus;
use crate::error::{Result, SpamSiftError};
use crate::model::artifact::{ModelArtifact, ModelMetadata};
use crate::model::label::Label;
use crate::model::vectorizer::CountVectorizer;

/// Training configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Additive (Laplace/Lidstone) smoothing constant. Must be positive.
    pub alpha: f64,
    /// Analysis pipeline applied to training and query text.
    pub analyzer: AnalyzerConfig,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            analyzer: AnalyzerConfig::default(),
        }
    }
}

/// Trains multinomial Naive Bayes artifacts from labeled corpora.
#[derive(Debug, Clone, Default)]
pub struct ModelTrainer {
    config: TrainerConfig,
}

impl ModelTrainer {
    /// Create a trainer with the given configuration.
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    /// The trainer configuration.
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Train a fresh artifact on `corpus`.
    ///
    /// Fails with [`SpamSiftError::InsufficientData`] unless the corpus holds
    /// examples of at least two distinct classes.
    pub fn train(&self, corpus: &Corpus) -> Result<ModelArtifact> {
        let alpha = self.config.alpha;
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(SpamSiftError::invalid_operation(format!(
                "smoothing alpha must be a positive number, got {alpha}"
            )));
        }

        let class_counts = corpus.class_counts();
        if class_counts.len() < 2 {
            let present: Vec<&str> = class_counts.keys().map(Label::as_str).collect();
            return Err(SpamSiftError::insufficient_data(format!(
                "need examples of at least two classes, found {} example(s) of [{}]",
                corpus.len(),
                present.join(", ")
            )));
        }

        let analyzer = Arc::new(StandardAnalyzer::from_config(&self.config.analyzer)?);
        let mut vectorizer = CountVectorizer::new(analyzer);
        let texts: Vec<&str> = corpus.texts().collect();
        let doc_counts = vectorizer.fit_transform(&texts)?;
        let vocabulary = vectorizer.into_vocabulary();
        let n_features = vocabulary.len();

        let classes: Vec<Label> = class_counts.keys().copied().collect();
        let mut feature_counts: BTreeMap<Label, Vec<f64>> = classes
            .iter()
            .map(|&label| (label, vec![0.0; n_features]))
            .collect();

        for (example, counts) in corpus.examples().iter().zip(&doc_counts) {
            if let Some(row) = feature_counts.get_mut(&example.label) {
                for &(idx, count) in counts {
                    row[idx] += f64::from(count);
                }
            }
        }

        let total = corpus.len() as f64;
        let class_log_prior: Vec<f64> = classes
            .iter()
            .map(|label| (class_counts[label] as f64 / total).ln())
            .collect();

        let feature_log_prob: Vec<Vec<f64>> = classes
            .iter()
            .map(|label| {
                let row = &feature_counts[label];
                let denominator = (row.iter().sum::<f64>() + alpha * n_features as f64).ln();
                row.iter()
                    .map(|count| (count + alpha).ln() - denominator)
                    .collect()
            })
            .collect();

        for (label, count) in &class_counts {
            debug!("class '{label}': {count} document(s)");
        }
        info!(
            "Trained model on {} document(s), {} class(es), {} term(s)",
            corpus.len(),
            classes.len(),
            n_features
        );

        let metadata = ModelMetadata {
            analyzer: self.config.analyzer.clone(),
            alpha,
            document_count: corpus.len(),
            class_document_counts: classes.iter().map(|label| class_counts[label]).collect(),
            trained_at: Utc::now(),
        };

        ModelArtifact::from_parts(
            vocabulary,
            classes,
            class_log_prior,
            feature_log_prob,
            metadata,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(examples: &[(&str, Label)]) -> Corpus {
        examples.iter().map(|&(text, label)| (text, label)).collect()
    }

    #[test]
    fn test_train_parameters() {
        let corpus = corpus(&[
            ("free money now", Label::Spam),
            ("let's meet for lunch", Label::Ham),
        ]);
        let artifact = ModelTrainer::default().train(&corpus).unwrap();

        // "let" "meet" "for" "lunch" + "free" "money" "now"; the "s" of "let's" is too short
        assert_eq!(artifact.vocabulary().len(), 7);
        assert_eq!(artifact.classes(), &[Label::Ham, Label::Spam]);
        assert!((artifact.prior(Label::Spam).unwrap() - 0.5).abs() < 1e-12);

        // spam has 3 term occurrences: P(free | spam) = (1 + 1) / (3 + 7)
        let free = artifact.vocabulary().get("free").unwrap();
        let spam = artifact.class_index(Label::Spam).unwrap();
        let ham = artifact.class_index(Label::Ham).unwrap();
        assert!((artifact.feature_log_prob(spam)[free] - (2.0f64 / 10.0).ln()).abs() < 1e-12);
        // ham has 4 term occurrences: P(free | ham) = (0 + 1) / (4 + 7)
        assert!((artifact.feature_log_prob(ham)[free] - (1.0f64 / 11.0).ln()).abs() < 1e-12);
    }

    #[test]
    fn test_rows_are_probability_distributions() {
        let artifact = ModelTrainer::default().train(&Corpus::demo()).unwrap();
        for idx in 0..artifact.classes().len() {
            let total: f64 = artifact.feature_log_prob(idx).iter().map(|lp| lp.exp()).sum();
            assert!((total - 1.0).abs() < 1e-9);
        }
        assert_eq!(artifact.metadata().document_count, 7);
        assert_eq!(artifact.metadata().class_document_counts, vec![3, 4]);
    }

    #[test]
    fn test_single_class_is_insufficient() {
        let corpus = corpus(&[("win cash", Label::Spam), ("free prize", Label::Spam)]);
        let err = ModelTrainer::default().train(&corpus).unwrap_err();
        assert!(matches!(err, SpamSiftError::InsufficientData(_)));
    }

    #[test]
    fn test_empty_corpus_is_insufficient() {
        let err = ModelTrainer::default().train(&Corpus::new()).unwrap_err();
        assert!(matches!(err, SpamSiftError::InsufficientData(_)));
    }

    #[test]
    fn test_invalid_alpha() {
        let trainer = ModelTrainer::new(TrainerConfig {
            alpha: 0.0,
            ..TrainerConfig::default()
        });
        let err = trainer.train(&Corpus::demo()).unwrap_err();
        assert!(matches!(err, SpamSiftError::InvalidOperation(_)));
    }

    #[test]
    fn test_training_does_not_mutate_previous_artifact() {
        let trainer = ModelTrainer::default();
        let first = trainer.train(&Corpus::demo()).unwrap();
        let snapshot = first.clone();

        let second = trainer
            .train(&corpus(&[("cheap pills", Label::Spam), ("see you", Label::Ham)]))
            .unwrap();

        assert_eq!(first, snapshot);
        assert_ne!(first.vocabulary(), second.vocabulary());
    }

    #[test]
    fn test_texts_without_terms() {
        let corpus = corpus(&[("!!!", Label::Spam), ("a", Label::Ham)]);
        let artifact = ModelTrainer::default().train(&corpus).unwrap();
        assert!(artifact.vocabulary().is_empty());
        assert!(artifact.feature_log_prob(0).is_empty());
    }
}
