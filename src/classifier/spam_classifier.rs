//! Naive Bayes decision rule over a loaded artifact.

use std::sync::Arc;

use log::debug;

use crate::analysis::analyzer::{Analyzer, StandardAnalyzer};
use crate::classifier::types::{ExplanationEntry, PredictionResult};
use crate::error::{Result, SpamSiftError};
use crate::model::{Label, ModelArtifact};

/// A loaded model ready to answer queries.
///
/// Never mutated after construction, so it can be shared freely between
/// threads behind an [`Arc`].
pub struct SpamClassifier {
    artifact: Arc<ModelArtifact>,
    analyzer: Arc<dyn Analyzer>,
}

impl std::fmt::Debug for SpamClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpamClassifier")
            .field("classes", &self.artifact.classes())
            .field("vocabulary_size", &self.artifact.vocabulary().len())
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

impl SpamClassifier {
    /// Wrap an artifact, rebuilding the analyzer it was trained with.
    pub fn new(artifact: Arc<ModelArtifact>) -> Result<Self> {
        let analyzer = Arc::new(StandardAnalyzer::from_config(&artifact.metadata().analyzer)?);
        Ok(Self { artifact, analyzer })
    }

    /// The underlying artifact.
    pub fn artifact(&self) -> &Arc<ModelArtifact> {
        &self.artifact
    }

    /// Known classes in lexicographic order.
    pub fn classes(&self) -> &[Label] {
        self.artifact.classes()
    }

    /// Unnormalized log posterior of every class for `text`.
    pub fn joint_log_likelihood(&self, text: &str) -> Result<Vec<f64>> {
        let terms = self.analyzer.terms(text)?;
        let counts = self.artifact.vocabulary().count(&terms);

        Ok(self
            .artifact
            .class_log_prior()
            .iter()
            .enumerate()
            .map(|(class_idx, prior)| {
                let log_prob = self.artifact.feature_log_prob(class_idx);
                prior
                    + counts
                        .iter()
                        .map(|&(idx, count)| f64::from(count) * log_prob[idx])
                        .sum::<f64>()
            })
            .collect())
    }

    /// Classify a single message.
    ///
    /// Unknown terms are ignored; text without any known term is classified
    /// by the class priors alone. Exact score ties go to the class that sorts
    /// first by name.
    pub fn predict(&self, text: &str) -> Result<PredictionResult> {
        let scores = self.joint_log_likelihood(text)?;

        let mut best = 0;
        for (idx, score) in scores.iter().enumerate().skip(1) {
            if *score > scores[best] {
                best = idx;
            }
        }

        let max = scores[best];
        let log_norm = max + scores.iter().map(|s| (s - max).exp()).sum::<f64>().ln();
        let spam_probability = self
            .artifact
            .class_index(Label::Spam)
            .map(|idx| (scores[idx] - log_norm).exp().clamp(0.0, 1.0))
            .unwrap_or(0.0);

        let result = PredictionResult {
            label: self.artifact.classes()[best],
            spam_probability,
        };
        debug!(
            "predicted {} (spam probability {:.3}) for {} byte(s) of text",
            result.label,
            result.spam_probability,
            text.len()
        );
        Ok(result)
    }

    /// Classify every message independently, preserving order.
    pub fn predict_batch<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<PredictionResult>> {
        texts.iter().map(|text| self.predict(text.as_ref())).collect()
    }

    /// The `top_n` terms most indicative of spam relative to ham.
    ///
    /// Scores are `ln P(term | spam) - ln P(term | ham)`, sorted descending;
    /// equal scores keep vocabulary order. Requires a model whose classes are
    /// exactly spam and ham.
    pub fn explain(&self, top_n: usize) -> Result<Vec<ExplanationEntry>> {
        let (spam, ham) = match (
            self.artifact.class_index(Label::Spam),
            self.artifact.class_index(Label::Ham),
        ) {
            (Some(spam), Some(ham)) if self.artifact.classes().len() == 2 => (spam, ham),
            _ => return Err(self.unsupported()),
        };

        let spam_log_prob = self.artifact.feature_log_prob(spam);
        let ham_log_prob = self.artifact.feature_log_prob(ham);
        let diff: Vec<f64> = spam_log_prob
            .iter()
            .zip(ham_log_prob)
            .map(|(s, h)| s - h)
            .collect();

        Ok(self.top_entries(&diff, top_n))
    }

    /// The `top_n` terms with the highest log-probability under `label`.
    ///
    /// Degraded mode for models that cannot be explained as spam versus ham.
    pub fn explain_class(&self, label: Label, top_n: usize) -> Result<Vec<ExplanationEntry>> {
        let class_idx = self
            .artifact
            .class_index(label)
            .ok_or_else(|| self.unsupported())?;
        Ok(self.top_entries(self.artifact.feature_log_prob(class_idx), top_n))
    }

    fn top_entries(&self, scores: &[f64], top_n: usize) -> Vec<ExplanationEntry> {
        let mut order: Vec<usize> = (0..scores.len()).collect();
        // Stable sort: ties keep ascending vocabulary index.
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

        let vocabulary = self.artifact.vocabulary();
        order
            .into_iter()
            .take(top_n)
            .filter_map(|idx| {
                vocabulary.term(idx).map(|token| ExplanationEntry {
                    token: token.to_string(),
                    score: scores[idx],
                })
            })
            .collect()
    }

    fn unsupported(&self) -> SpamSiftError {
        SpamSiftError::ExplanationUnsupported {
            classes: self
                .artifact
                .classes()
                .iter()
                .map(|label| label.to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::AnalyzerConfig;
    use crate::corpus::Corpus;
    use crate::model::{ModelMetadata, ModelTrainer, Vocabulary};
    use chrono::Utc;

    fn classifier(corpus: &Corpus) -> SpamClassifier {
        let artifact = ModelTrainer::default().train(corpus).unwrap();
        SpamClassifier::new(Arc::new(artifact)).unwrap()
    }

    fn two_message_classifier() -> SpamClassifier {
        classifier(
            &[
                ("free money now", Label::Spam),
                ("let's meet for lunch", Label::Ham),
            ]
            .into_iter()
            .collect(),
        )
    }

    fn spam_only_artifact() -> ModelArtifact {
        ModelArtifact::from_parts(
            Vocabulary::from_terms(["cash", "win"]),
            vec![Label::Spam],
            vec![0.0],
            vec![vec![(0.25f64).ln(), (0.75f64).ln()]],
            ModelMetadata {
                analyzer: AnalyzerConfig::default(),
                alpha: 1.0,
                document_count: 2,
                class_document_counts: vec![2],
                trained_at: Utc::now(),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_predict_two_message_example() {
        let classifier = two_message_classifier();

        let result = classifier.predict("free money").unwrap();
        assert_eq!(result.label, Label::Spam);
        assert!(result.spam_probability > 0.5);
        assert!(result.is_spam());

        let result = classifier.predict("lunch plans").unwrap();
        assert_eq!(result.label, Label::Ham);
        assert!(result.spam_probability < 0.5);
    }

    #[test]
    fn test_predict_matches_closed_form() {
        let classifier = two_message_classifier();
        // P(free|spam) = P(money|spam) = 2/10, P(free|ham) = P(money|ham) = 1/11
        let spam = 0.5 * 0.2 * 0.2;
        let ham = 0.5 * (1.0 / 11.0) * (1.0 / 11.0);
        let expected = spam / (spam + ham);

        let result = classifier.predict("Free, MONEY!").unwrap();
        assert!((result.spam_probability - expected).abs() < 1e-12);
    }

    #[test]
    fn test_predict_training_examples() {
        let corpus = Corpus::demo();
        let classifier = classifier(&corpus);
        for example in corpus.examples() {
            let result = classifier.predict(&example.text).unwrap();
            assert_eq!(result.label, example.label, "text: {}", example.text);
            assert_eq!(result.spam_probability > 0.5, example.label == Label::Spam);
        }
    }

    #[test]
    fn test_predict_unknown_text_uses_priors() {
        let classifier = classifier(&Corpus::demo());
        for text in ["", "   ", "zzz qqq", "!!"] {
            let result = classifier.predict(text).unwrap();
            assert!((result.spam_probability - 4.0 / 7.0).abs() < 1e-12);
            assert_eq!(result.label, Label::Spam);
        }
    }

    #[test]
    fn test_exact_tie_goes_to_first_class_by_name() {
        let classifier = two_message_classifier();
        let result = classifier.predict("").unwrap();
        assert!((result.spam_probability - 0.5).abs() < 1e-12);
        assert_eq!(result.label, Label::Ham);
    }

    #[test]
    fn test_predict_is_deterministic() {
        let classifier = classifier(&Corpus::demo());
        let first = classifier.predict("win a free coupon for lunch").unwrap();
        for _ in 0..10 {
            assert_eq!(classifier.predict("win a free coupon for lunch").unwrap(), first);
        }
    }

    #[test]
    fn test_predict_long_text_stays_in_range() {
        let classifier = two_message_classifier();
        let text = "free money ".repeat(5_000);
        let result = classifier.predict(&text).unwrap();
        assert_eq!(result.label, Label::Spam);
        assert!(result.spam_probability.is_finite());
        assert!((0.0..=1.0).contains(&result.spam_probability));
    }

    #[test]
    fn test_predict_batch_matches_predict() {
        let classifier = classifier(&Corpus::demo());
        let texts = ["win cash now", "", "see you at lunch", "win cash now"];
        let results = classifier.predict_batch(&texts).unwrap();

        assert_eq!(results.len(), texts.len());
        for (text, result) in texts.iter().zip(&results) {
            assert_eq!(*result, classifier.predict(text).unwrap());
        }
        assert!(classifier.predict_batch::<&str>(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_explain() {
        let classifier = two_message_classifier();
        let entries = classifier.explain(5).unwrap();
        assert_eq!(entries.len(), 5);

        let tokens: Vec<&str> = entries.iter().map(|e| e.token.as_str()).collect();
        assert!(tokens.contains(&"free"));
        assert!(tokens.contains(&"money"));
        assert!(entries.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_explain_ties_keep_vocabulary_order() {
        let classifier = two_message_classifier();
        let entries = classifier.explain(100).unwrap();

        // Vocabulary size caps the result.
        assert_eq!(entries.len(), 7);
        let tokens: Vec<&str> = entries.iter().map(|e| e.token.as_str()).collect();
        assert_eq!(tokens, vec!["free", "money", "now", "for", "let", "lunch", "meet"]);

        let mut unique = tokens.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), tokens.len());
    }

    #[test]
    fn test_explain_zero() {
        assert!(two_message_classifier().explain(0).unwrap().is_empty());
    }

    #[test]
    fn test_explain_requires_both_classes() {
        let classifier = SpamClassifier::new(Arc::new(spam_only_artifact())).unwrap();
        match classifier.explain(5) {
            Err(SpamSiftError::ExplanationUnsupported { classes }) => {
                assert_eq!(classes, vec!["spam".to_string()]);
            }
            other => panic!("expected ExplanationUnsupported, got {other:?}"),
        }

        let entries = classifier.explain_class(Label::Spam, 5).unwrap();
        assert_eq!(entries[0].token, "win");
        assert_eq!(entries[1].token, "cash");
        assert!(classifier.explain_class(Label::Ham, 5).is_err());
    }

    #[test]
    fn test_single_class_model_predictions() {
        let classifier = SpamClassifier::new(Arc::new(spam_only_artifact())).unwrap();
        let result = classifier.predict("win").unwrap();
        assert_eq!(result.label, Label::Spam);
        assert!((result.spam_probability - 1.0).abs() < 1e-12);
    }
}
