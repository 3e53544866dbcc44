//! Term-count vectorizer for text feature extraction.

use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::error::Result;
use crate::model::vocabulary::{TermCounts, Vocabulary};

/// Bag-of-words vectorizer producing raw term counts.
pub struct CountVectorizer {
    /// Vocabulary learned by [`fit`](Self::fit).
    vocabulary: Vocabulary,
    /// Analyzer for tokenization.
    analyzer: Arc<dyn Analyzer>,
}

impl std::fmt::Debug for CountVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountVectorizer")
            .field("vocabulary_size", &self.vocabulary.len())
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

impl CountVectorizer {
    /// Create an unfitted vectorizer with the specified analyzer.
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            vocabulary: Vocabulary::default(),
            analyzer,
        }
    }

    /// Create a vectorizer over an existing vocabulary.
    pub fn with_vocabulary(analyzer: Arc<dyn Analyzer>, vocabulary: Vocabulary) -> Self {
        Self {
            vocabulary,
            analyzer,
        }
    }

    /// Learn the vocabulary of `documents`.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<()> {
        self.fit_transform(documents).map(|_| ())
    }

    /// Learn the vocabulary of `documents` and return their term counts.
    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<Vec<TermCounts>> {
        let analyzed = documents
            .iter()
            .map(|doc| self.analyzer.terms(doc.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        self.vocabulary = Vocabulary::from_terms(analyzed.iter().flatten().cloned());

        Ok(analyzed
            .iter()
            .map(|terms| self.vocabulary.count(terms))
            .collect())
    }

    /// Transform a document into term counts over the learned vocabulary.
    pub fn transform(&self, document: &str) -> Result<TermCounts> {
        let terms = self.analyzer.terms(document)?;
        Ok(self.vocabulary.count(&terms))
    }

    /// The learned vocabulary.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Consume the vectorizer and return its vocabulary.
    pub fn into_vocabulary(self) -> Vocabulary {
        self.vocabulary
    }

    /// Get the size of the vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }
}
