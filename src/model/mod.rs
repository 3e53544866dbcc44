//! Multinomial Naive Bayes over bag-of-words term counts.
//!
//! # Architecture
//!
//! - [`Label`]: the two message classes, `ham` and `spam`
//! - [`Vocabulary`]: sorted term → feature index mapping, frozen after training
//! - [`CountVectorizer`]: turns text into sparse term counts over a vocabulary
//! - [`ModelArtifact`]: vocabulary + class priors + per-class feature log-probabilities
//! - [`ModelTrainer`]: builds a [`ModelArtifact`] from a [`Corpus`](crate::corpus::Corpus)
//!
//! # Example
//!
//! ```rust
//! use spamsift::corpus::Corpus;
//! use spamsift::model::{Label, ModelTrainer, TrainerConfig};
//!
//! # fn main() -> spamsift::error::Result<()> {
//! let corpus: Corpus = vec![
//!     ("free money now", Label::Spam),
//!     ("let's meet for lunch", Label::Ham),
//! ]
//! .into_iter()
//! .collect();
//!
//! let artifact = ModelTrainer::new(TrainerConfig::default()).train(&corpus)?;
//! assert_eq!(artifact.classes(), &[Label::Ham, Label::Spam]);
//! # Ok(())
//! # }
//! ```

mod artifact;
mod label;
mod trainer;
mod vectorizer;
mod vocabulary;

// Public exports
pub use artifact::{ModelArtifact, ModelMetadata};
pub use label::Label;
pub use trainer::{ModelTrainer, TrainerConfig};
pub use vectorizer::CountVectorizer;
pub use vocabulary::{TermCounts, Vocabulary};
