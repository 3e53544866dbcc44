//! Runtime configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! {
//!   "model_path": "models/spam.bin",
//!   "trainer": { "alpha": 0.5 },
//!   "batch": { "text_columns": ["body", "text"] },
//!   "explain_top_n": 10
//! }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::batch::BatchConfig;
use crate::error::{Result, SpamSiftError};
use crate::model::TrainerConfig;

/// Default location of the model artifact.
pub const DEFAULT_MODEL_PATH: &str = "spam_detector.bin";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpamSiftConfig {
    /// Where the trained model is stored.
    pub model_path: PathBuf,
    /// Training settings.
    pub trainer: TrainerConfig,
    /// Batch classification settings.
    pub batch: BatchConfig,
    /// Default number of explanation entries.
    pub explain_top_n: usize,
}

impl Default for SpamSiftConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            trainer: TrainerConfig::default(),
            batch: BatchConfig::default(),
            explain_top_n: 20,
        }
    }
}

impl SpamSiftConfig {
    /// Load and validate a JSON config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config: Self = serde_json::from_reader(BufReader::new(File::open(path)?))?;
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Reject values no component can work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.trainer.alpha.is_finite() && self.trainer.alpha > 0.0) {
            return Err(SpamSiftError::invalid_operation(format!(
                "trainer.alpha must be a positive number, got {}",
                self.trainer.alpha
            )));
        }
        if self.batch.chunk_size == 0 {
            return Err(SpamSiftError::invalid_operation(
                "batch.chunk_size must be at least 1",
            ));
        }
        if self.batch.text_columns.is_empty() && self.batch.text_column.is_none() {
            return Err(SpamSiftError::invalid_operation(
                "batch.text_columns must name at least one column",
            ));
        }
        Ok(())
    }
}
