//! Query translation
//!
//! This module turns user input into requests against the record index:
//! - Query-string rewriting (field shorthands, phrase quoting)
//! - Range syntax detection and parsing (`publication_recid:[1 TO 100]`)
//! - Structured filters (nested author match, term/range filters)
//! - A typed clause model rendered as the index's JSON query DSL
//!
//! # Example
//!
//! ```json
//! {
//!   "query": {
//!     "bool": {
//!       "must": [
//!         { "query_string": { "query": "data_keywords.observables:ASYM", "default_operator": "AND" } }
//!       ],
//!       "filter": [
//!         { "range": { "year": { "gte": 2010, "lte": 2020 } } }
//!       ]
//!     }
//!   }
//! }
//! ```

pub mod clause;
pub mod filters;
pub mod query_string;
pub mod range;
pub mod search;
pub mod types;

pub use clause::Clause;
pub use filters::{FieldResolver, FilterApplicator, FilterFieldTable, ResolvedFilter};
pub use query_string::{PhraseQuoter, QueryRewriter};
pub use range::{ParsedRange, RangeParseError, RangeQueryDetector, RangeQueryParser};
pub use search::{SearchBuilder, SearchRequest};
pub use types::*;
