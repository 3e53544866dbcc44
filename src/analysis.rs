//! Text analysis for spamsift.
//!
//! Turns raw message text into the normalized terms that make up the
//! bag-of-words features. The pipeline is a tokenizer followed by a chain of
//! token filters, wrapped by an [`Analyzer`](analyzer::Analyzer).

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

// Re-export commonly used types
pub use analyzer::{Analyzer, AnalyzerConfig, PipelineAnalyzer, StandardAnalyzer};
pub use token::{Token, TokenStream};
pub use token_filter::{Filter, LowercaseFilter};
pub use tokenizer::{RegexTokenizer, Tokenizer};
