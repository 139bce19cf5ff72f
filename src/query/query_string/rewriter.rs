//! Rewriting of user-entered boolean query strings
//!
//! `observables:ASYM AND reactions:P P --> Z0 Z0` becomes
//! `data_keywords.observables:ASYM AND data_keywords.reactions:"P P --> Z0 Z0"`.
//!
//! The input is split on whole-word `AND` / `OR`. Operators and the whitespace
//! around each operand are copied through verbatim; only the trimmed operand
//! text is rewritten. Output is rebuilt from byte offsets, so an operand whose
//! text appears more than once is still rewritten exactly where it occurs.

use regex::Regex;
use std::collections::BTreeMap;
use tracing::trace;

use super::phrase::PhraseQuoter;
use crate::config::QueryConfig;
use crate::Result;

const OPERATOR_PATTERN: &str = r"\b(?:AND|OR)\b";

/// Rewrites field shorthands and quotes phrases in a query string
#[derive(Clone, Debug)]
pub struct QueryRewriter {
    field_mapping: BTreeMap<String, String>,
    operators: Regex,
    quoter: PhraseQuoter,
}

impl QueryRewriter {
    /// Create a rewriter for the given shorthand -> canonical field mapping
    pub fn new(field_mapping: BTreeMap<String, String>) -> Result<Self> {
        Ok(Self {
            field_mapping,
            operators: Regex::new(OPERATOR_PATTERN)?,
            quoter: PhraseQuoter::new()?,
        })
    }

    pub fn from_config(config: &QueryConfig) -> Result<Self> {
        Self::new(config.field_mapping.clone())
    }

    /// Canonical field for a shorthand key, or the key itself when unmapped
    pub fn canonical_field<'a>(&'a self, key: &'a str) -> &'a str {
        self.field_mapping
            .get(key)
            .map(String::as_str)
            .unwrap_or(key)
    }

    /// Rewrite a full query string. Never fails.
    pub fn parse_query(&self, query: &str) -> String {
        let mut rewritten = String::with_capacity(query.len() + 16);
        let mut cursor = 0;

        for operator in self.operators.find_iter(query) {
            self.rewrite_segment(&query[cursor..operator.start()], &mut rewritten);
            rewritten.push_str(operator.as_str());
            cursor = operator.end();
        }
        self.rewrite_segment(&query[cursor..], &mut rewritten);

        trace!(query, rewritten = %rewritten, "rewrote query string");
        rewritten
    }

    /// Rewrite a single operand such as `cmenergies:13000`
    ///
    /// The operand is split on its first colon; the key is mapped to its
    /// canonical field and the value is quoted if it is a phrase. Without a
    /// colon the whole operand is treated as a value.
    pub fn rewrite_operand(&self, operand: &str) -> String {
        match operand.split_once(':') {
            Some((key, value)) => format!(
                "{}:{}",
                self.canonical_field(key),
                self.quoter.quote_phrase(value)
            ),
            None => self.quoter.quote_phrase(operand).into_owned(),
        }
    }

    pub fn quoter(&self) -> &PhraseQuoter {
        &self.quoter
    }

    fn rewrite_segment(&self, segment: &str, out: &mut String) {
        let operand = segment.trim();
        if operand.is_empty() {
            out.push_str(segment);
            return;
        }

        let leading = segment.len() - segment.trim_start().len();
        let trailing = leading + operand.len();

        out.push_str(&segment[..leading]);
        out.push_str(&self.rewrite_operand(operand));
        out.push_str(&segment[trailing..]);
    }
}
