//! Tokenizers split raw text into tokens.
//!
//! The only tokenizer spamsift needs is [`RegexTokenizer`], whose default
//! pattern keeps runs of two or more word characters and drops everything
//! else (whitespace, punctuation, single-character words).

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod regex;

pub use self::regex::RegexTokenizer;
