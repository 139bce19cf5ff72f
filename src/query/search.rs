//! Search request builder
//!
//! `SearchBuilder` is the capability the translator needs from an index query
//! object. `SearchRequest` is the in-crate implementation that renders the
//! request body sent to the index.

use serde::ser::{Serialize, Serializer};
use serde_json::Value;

use super::clause::{BoolClause, Clause};
use super::types::FilterType;
use crate::Result;

/// Capability of an index query object
///
/// Builders are consumed and returned so a chain of calls reads the same way
/// for owned requests and for wrappers around foreign clients.
pub trait SearchBuilder: Sized {
    /// Add a scoring clause. Clauses added this way are combined with AND.
    fn query(self, clause: Clause) -> Self;

    /// Add a non-scoring exact-match clause of the given type
    fn filter(self, filter_type: FilterType, field: &str, value: Value) -> Self;
}

/// A request against the document index
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchRequest {
    must: Vec<Clause>,
    filter: Vec<Clause>,
    from: Option<usize>,
    size: Option<usize>,
}

impl SearchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the offset of the first hit
    pub fn with_from(mut self, from: usize) -> Self {
        self.from = Some(from);
        self
    }

    /// Set the maximum number of hits
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    /// Scoring clauses, in the order they were added
    pub fn queries(&self) -> &[Clause] {
        &self.must
    }

    /// Filter clauses, in the order they were added
    pub fn filters(&self) -> &[Clause] {
        &self.filter
    }

    /// Collapse the request into one clause
    ///
    /// An empty request matches everything, a single scoring clause is emitted
    /// as-is, anything else becomes a `bool` clause.
    pub fn to_clause(&self) -> Clause {
        match (self.must.as_slice(), self.filter.is_empty()) {
            ([], true) => Clause::match_all(),
            ([only], true) => only.clone(),
            _ => Clause::Bool(BoolClause {
                must: self.must.clone(),
                filter: self.filter.clone(),
            }),
        }
    }

    /// Render the request body as JSON
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl SearchBuilder for SearchRequest {
    fn query(mut self, clause: Clause) -> Self {
        self.must.push(clause);
        self
    }

    fn filter(mut self, filter_type: FilterType, field: &str, value: Value) -> Self {
        self.filter.push(Clause::for_filter(filter_type, field, value));
        self
    }
}

#[derive(serde::Serialize)]
struct RequestBody {
    query: Clause,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<usize>,
}

impl Serialize for SearchRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        RequestBody {
            query: self.to_clause(),
            from: self.from,
            size: self.size,
        }
        .serialize(serializer)
    }
}
