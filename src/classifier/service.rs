//! Owner of the currently loaded classifier.

use std::path::Path;
use std::sync::Arc;

use log::{info, warn};
use parking_lot::RwLock;

use crate::classifier::spam_classifier::SpamClassifier;
use crate::classifier::types::{ExplanationEntry, PredictionResult};
use crate::error::{Result, SpamSiftError};
use crate::model::{Label, ModelArtifact};
use crate::storage::load_artifact;

/// Holds the current [`SpamClassifier`] and answers queries against it.
///
/// Queries take a snapshot of the current classifier and run without holding
/// the lock, so installing a new model never disturbs queries already in
/// flight against the old one. Before the first successful
/// [`load`](Self::load) or [`install`](Self::install) every query fails with
/// [`SpamSiftError::ModelUnavailable`].
#[derive(Default)]
pub struct ClassifierService {
    current: RwLock<Option<Arc<SpamClassifier>>>,
}

impl std::fmt::Debug for ClassifierService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierService")
            .field("current", &*self.current.read())
            .finish()
    }
}

impl ClassifierService {
    /// Create a service with no model loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a service that starts with `classifier`.
    pub fn with_classifier(classifier: SpamClassifier) -> Self {
        Self {
            current: RwLock::new(Some(Arc::new(classifier))),
        }
    }

    /// Load the artifact at `path` and make it current.
    ///
    /// On failure the previously loaded model (if any) stays in place and the
    /// call may simply be retried later.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Arc<SpamClassifier>> {
        let path = path.as_ref();
        match load_artifact(path) {
            Ok(artifact) => self.install(artifact),
            Err(e) => {
                warn!("Could not load model from {}: {e}", path.display());
                Err(e)
            }
        }
    }

    /// Make a freshly trained or loaded artifact current.
    pub fn install(&self, artifact: ModelArtifact) -> Result<Arc<SpamClassifier>> {
        let classifier = Arc::new(SpamClassifier::new(Arc::new(artifact))?);
        let previous = self.current.write().replace(Arc::clone(&classifier));
        if previous.is_some() {
            info!("Replaced the loaded model");
        }
        Ok(classifier)
    }

    /// Snapshot of the current classifier.
    pub fn current(&self) -> Result<Arc<SpamClassifier>> {
        self.current
            .read()
            .as_ref()
            .map(Arc::clone)
            .ok_or(SpamSiftError::ModelUnavailable)
    }

    /// Whether a model is loaded.
    pub fn is_loaded(&self) -> bool {
        self.current.read().is_some()
    }

    /// Classify one message with the current model.
    pub fn predict(&self, text: &str) -> Result<PredictionResult> {
        self.current()?.predict(text)
    }

    /// Classify messages independently with the current model.
    pub fn predict_batch<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<PredictionResult>> {
        self.current()?.predict_batch(texts)
    }

    /// Top spam-indicative terms of the current model.
    pub fn explain(&self, top_n: usize) -> Result<Vec<ExplanationEntry>> {
        self.current()?.explain(top_n)
    }

    /// Top terms of one class of the current model.
    pub fn explain_class(&self, label: Label, top_n: usize) -> Result<Vec<ExplanationEntry>> {
        self.current()?.explain_class(label, top_n)
    }
}
