//! Query clauses in the index's JSON wire shape
//!
//! Only the subset the translator emits is modelled. Each variant serialises
//! to a single-key object, e.g. `{"range": {"recid": {"gte": 5, "lte": 10}}}`.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::types::{FilterType, MatchOperator, RangeBounds};

/// `field -> value` body shared by the single-field clause kinds
pub type FieldMap = BTreeMap<String, Value>;

/// A query clause understood by the document index
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Clause {
    /// Matches every document
    MatchAll {},
    /// Full-text match against one field
    Match(FieldMap),
    /// Exact match against one field
    Term(FieldMap),
    /// Exact match against any of several values
    Terms(FieldMap),
    /// Inclusive bounds on one field
    Range(FieldMap),
    /// Query evaluated against nested sub-documents
    Nested(NestedClause),
    /// Lucene-style query string handed to the index parser
    QueryString(QueryStringClause),
    /// Conjunction of scoring and non-scoring clauses
    Bool(BoolClause),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NestedClause {
    pub path: String,
    pub query: Box<Clause>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QueryStringClause {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_operator: Option<MatchOperator>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BoolClause {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub must: Vec<Clause>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<Clause>,
}

fn single(field: impl Into<String>, value: Value) -> FieldMap {
    let mut map = FieldMap::new();
    map.insert(field.into(), value);
    map
}

impl Clause {
    pub fn match_all() -> Self {
        Clause::MatchAll {}
    }

    pub fn match_field(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Clause::Match(single(field, value.into()))
    }

    pub fn term(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Clause::Term(single(field, value.into()))
    }

    pub fn range(field: impl Into<String>, bounds: &RangeBounds) -> Self {
        Clause::Range(single(field, bounds.to_json()))
    }

    pub fn nested(path: impl Into<String>, query: Clause) -> Self {
        Clause::Nested(NestedClause {
            path: path.into(),
            query: Box::new(query),
        })
    }

    pub fn query_string(query: impl Into<String>, default_operator: Option<MatchOperator>) -> Self {
        Clause::QueryString(QueryStringClause {
            query: query.into(),
            default_operator,
        })
    }

    /// Build the non-scoring clause for a resolved filter
    ///
    /// The value is used as the clause body for `field` unchanged, so range
    /// filters are expected to carry their `gte`/`lte` object already.
    pub fn for_filter(filter_type: FilterType, field: impl Into<String>, value: Value) -> Self {
        let body = single(field, value);
        match filter_type {
            FilterType::Term => Clause::Term(body),
            FilterType::Terms => Clause::Terms(body),
            FilterType::Range => Clause::Range(body),
        }
    }

    /// Get the clause kind name for debugging and logging
    pub fn clause_type(&self) -> &'static str {
        match self {
            Clause::MatchAll {} => "match_all",
            Clause::Match(_) => "match",
            Clause::Term(_) => "term",
            Clause::Terms(_) => "terms",
            Clause::Range(_) => "range",
            Clause::Nested(_) => "nested",
            Clause::QueryString(_) => "query_string",
            Clause::Bool(_) => "bool",
        }
    }
}
