//! Phrase detection for query-string values
//!
//! Reaction strings (`P P --> Z0 Z0`) and DOI-like identifiers
//! (`10.17182/hepdata.1234`) contain characters the index query parser would
//! otherwise split on, so they are wrapped in double quotes to force an exact
//! phrase match.

use regex::Regex;
use std::borrow::Cow;

use crate::Result;

/// Whole-string pattern: anything containing `-->`, or two runs of word
/// characters and dots joined by a single `/`.
const PHRASE_PATTERN: &str = r"^(?:.*-->.*|[\w.]+/[\w.]+)$";

/// Decides whether a query token must be quoted
#[derive(Clone, Debug)]
pub struct PhraseQuoter {
    pattern: Regex,
}

impl PhraseQuoter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(PHRASE_PATTERN)?,
        })
    }

    /// Check if `text` is an unquoted phrase
    pub fn needs_quotes(&self, text: &str) -> bool {
        !text.contains('"') && self.pattern.is_match(text)
    }

    /// Wrap `text` in double quotes if it is an unquoted phrase
    ///
    /// Text that already contains a double quote, or does not match as a
    /// whole, is returned borrowed and unchanged.
    pub fn quote_phrase<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.needs_quotes(text) {
            Cow::Owned(format!("\"{}\"", text))
        } else {
            Cow::Borrowed(text)
        }
    }
}
