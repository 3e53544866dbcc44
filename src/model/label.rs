//! Message class labels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SpamSiftError;

/// Message class.
///
/// The derived ordering is lexicographic on the label name (`ham` < `spam`);
/// models store their classes in this order and break score ties by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// Legitimate message.
    Ham,
    /// Unsolicited message.
    Spam,
}

impl Label {
    /// Both labels, in lexicographic order.
    pub const ALL: [Label; 2] = [Label::Ham, Label::Spam];

    /// Lowercase name of the label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Ham => "ham",
            Label::Spam => "spam",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = SpamSiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("spam") {
            Ok(Label::Spam)
        } else if trimmed.eq_ignore_ascii_case("ham") {
            Ok(Label::Ham)
        } else {
            Err(SpamSiftError::malformed_input(format!(
                "unknown label '{trimmed}' (expected 'spam' or 'ham')"
            )))
        }
    }
}
