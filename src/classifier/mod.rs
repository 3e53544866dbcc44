//! Classification queries against a trained model.
//!
//! - [`SpamClassifier`]: an immutable, loaded model answering `predict`,
//!   `predict_batch`, `explain` and `explain_class`
//! - [`ClassifierService`]: owns the current classifier, loads it from disk and
//!   swaps it atomically when a new model is installed
//!
//! # Example
//!
//! ```rust
//! use spamsift::classifier::ClassifierService;
//! use spamsift::corpus::Corpus;
//! use spamsift::model::{Label, ModelTrainer};
//!
//! # fn main() -> spamsift::error::Result<()> {
//! let service = ClassifierService::new();
//! service.install(ModelTrainer::default().train(&Corpus::demo())?)?;
//!
//! let result = service.predict("Win a free prize now")?;
//! assert_eq!(result.label, Label::Spam);
//! # Ok(())
//! # }
//! ```

mod service;
mod spam_classifier;
mod types;

// Public exports
pub use service::ClassifierService;
pub use spam_classifier::SpamClassifier;
pub use types::{ExplanationEntry, PredictionResult};
