//! Standard analyzer used for both training and inference.
//!
//! # Pipeline
//!
//! 1. RegexTokenizer (words of two or more word characters by default)
//! 2. LowercaseFilter (unless disabled in the config)
//!
//! No stop words are removed: short function words are legitimate features
//! for spam detection.

use std::sync::Arc;

use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::analyzer::{Analyzer, AnalyzerConfig};
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::tokenizer::regex::RegexTokenizer;
use crate::error::Result;

/// The analyzer described by an [`AnalyzerConfig`].
pub struct StandardAnalyzer {
    inner: PipelineAnalyzer,
    config: AnalyzerConfig,
}

impl StandardAnalyzer {
    /// Create a new standard analyzer with default settings.
    pub fn new() -> Result<Self> {
        Self::from_config(&AnalyzerConfig::default())
    }

    /// Build the analyzer described by `config`.
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self> {
        let tokenizer = Arc::new(RegexTokenizer::with_pattern(&config.pattern)?);
        let mut analyzer = PipelineAnalyzer::new(tokenizer);
        if config.lowercase {
            analyzer = analyzer.add_filter(Arc::new(LowercaseFilter::new()));
        }

        Ok(StandardAnalyzer {
            inner: analyzer,
            config: config.clone(),
        })
    }

    /// The configuration this analyzer was built from.
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }
}

impl Analyzer for StandardAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "standard"
    }
}

impl std::fmt::Debug for StandardAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StandardAnalyzer")
            .field("inner", &self.inner)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpamSiftError;

    #[test]
    fn test_standard_analyzer() {
        let analyzer = StandardAnalyzer::new().unwrap();
        let terms = analyzer.terms("Hey, are we meeting TOMORROW?").unwrap();
        assert_eq!(terms, vec!["hey", "are", "we", "meeting", "tomorrow"]);
    }

    #[test]
    fn test_standard_analyzer_case_sensitive() {
        let config = AnalyzerConfig {
            lowercase: false,
            ..AnalyzerConfig::default()
        };
        let analyzer = StandardAnalyzer::from_config(&config).unwrap();
        assert_eq!(analyzer.terms("Win CASH").unwrap(), vec!["Win", "CASH"]);
        assert_eq!(analyzer.config(), &config);
    }

    #[test]
    fn test_standard_analyzer_bad_pattern() {
        let config = AnalyzerConfig {
            pattern: "[".to_string(),
            lowercase: true,
        };
        assert!(matches!(
            StandardAnalyzer::from_config(&config),
            Err(SpamSiftError::Analysis(_))
        ));
    }
}
