//! Range query syntax: `publication_recid:[5 TO 10]`
//!
//! Detection and parsing are deliberately separate. The detector only answers
//! whether a string starts with `<term>:[<digits> TO <digits>]` for one of the
//! configured terms; the parser extracts the integer bounds and the canonical
//! term name. Neither raises: failures become `false` / `None`, and the caller
//! falls back to treating the input as an ordinary query string.

use regex::Regex;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

use super::clause::Clause;
use super::types::{RangeBounds, RangeValue};
use crate::config::QueryConfig;
use crate::Result;

/// Recognises range syntax for a fixed set of terms
#[derive(Clone, Debug)]
pub struct RangeQueryDetector {
    /// `None` when no terms are configured
    pattern: Option<Regex>,
}

impl RangeQueryDetector {
    pub fn new<I, S>(terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let alternatives: Vec<String> = terms
            .into_iter()
            .map(|term| regex::escape(term.as_ref()))
            .collect();

        if alternatives.is_empty() {
            return Ok(Self { pattern: None });
        }

        let pattern = format!(
            r"^(?:{}):\[[0-9]+ TO [0-9]+\]",
            alternatives.join("|")
        );
        Ok(Self {
            pattern: Some(Regex::new(&pattern)?),
        })
    }

    pub fn from_config(config: &QueryConfig) -> Result<Self> {
        Self::new(&config.range_terms)
    }

    /// Check if `query` starts with range syntax for a configured term
    ///
    /// Accepts `Option<&str>` as well as `&str`; a missing query is simply not
    /// a range query.
    pub fn is_range_query<'a>(&self, query: impl Into<Option<&'a str>>) -> bool {
        match (&self.pattern, query.into()) {
            (Some(pattern), Some(query)) => pattern.is_match(query),
            _ => false,
        }
    }
}

/// Bounds and canonical term extracted from a range query
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedRange {
    pub lower: i64,
    pub upper: i64,
    pub term: String,
}

impl ParsedRange {
    /// Inclusive range clause on the canonical term
    ///
    /// No ordering is enforced between the bounds.
    pub fn to_clause(&self) -> Clause {
        let bounds = RangeBounds::between(
            RangeValue::Long(self.lower),
            RangeValue::Long(self.upper),
        );
        Clause::range(self.term.clone(), &bounds)
    }
}

/// Reason a range query could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeParseError {
    #[error("missing '[' ... ']' range brackets")]
    MissingBrackets,

    #[error("expected exactly two bounds separated by ' TO ', got {0}")]
    BoundCount(usize),

    #[error("bound '{0}' is not an integer")]
    InvalidBound(String),

    #[error("missing ':[' term separator")]
    MissingTerm,

    #[error("term '{0}' has no range mapping")]
    UnknownTerm(String),
}

/// Extracts bounds and canonical term from range syntax
#[derive(Clone, Debug, Default)]
pub struct RangeQueryParser {
    term_mapping: BTreeMap<String, String>,
}

impl RangeQueryParser {
    pub fn new(term_mapping: BTreeMap<String, String>) -> Self {
        Self { term_mapping }
    }

    pub fn from_config(config: &QueryConfig) -> Self {
        Self::new(config.range_term_mapping.clone())
    }

    /// Parse `term:[lower TO upper]`, or `None` if anything is off
    ///
    /// Either both bounds and the term are returned, or nothing is.
    pub fn parse_range_query(&self, query: &str) -> Option<ParsedRange> {
        match self.try_parse(query) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                debug!(query, error = %e, "not a usable range query");
                None
            }
        }
    }

    /// Parse with the failure reason preserved
    pub fn try_parse(&self, query: &str) -> std::result::Result<ParsedRange, RangeParseError> {
        let (_, after_open) = query
            .split_once('[')
            .ok_or(RangeParseError::MissingBrackets)?;
        let (ranges, _) = after_open
            .split_once(']')
            .ok_or(RangeParseError::MissingBrackets)?;

        let bounds: Vec<&str> = ranges.split(" TO ").collect();
        let (lower, upper) = match bounds.as_slice() {
            [lower, upper] => (parse_bound(lower)?, parse_bound(upper)?),
            other => return Err(RangeParseError::BoundCount(other.len())),
        };

        let (raw_term, _) = query
            .split_once(":[")
            .ok_or(RangeParseError::MissingTerm)?;
        let term = self
            .term_mapping
            .get(raw_term)
            .ok_or_else(|| RangeParseError::UnknownTerm(raw_term.to_string()))?;

        Ok(ParsedRange {
            lower,
            upper,
            term: term.clone(),
        })
    }
}

/// Text after the closing `]` of a range query, if any
///
/// The detector only anchors at the start, so `term:[1 TO 5] AND x:y` is
/// accepted and everything after the bracket is ignored.
pub fn trailing_text(query: &str) -> Option<&str> {
    let (_, rest) = query.split_once(']')?;
    let rest = rest.trim();
    (!rest.is_empty()).then_some(rest)
}

fn parse_bound(raw: &str) -> std::result::Result<i64, RangeParseError> {
    raw.trim()
        .parse()
        .map_err(|_| RangeParseError::InvalidBound(raw.to_string()))
}
