//! Entry point tying the query components together
//!
//! ```rust
//! use hepquery::{QueryConfig, QueryTranslator, SearchFilter};
//!
//! let translator = QueryTranslator::new(QueryConfig::default().freeze().unwrap()).unwrap();
//! let request = translator
//!     .build_search("reactions:P P --> X", &[SearchFilter::new("collaboration", "CMS")])
//!     .unwrap();
//! assert_eq!(request.filters().len(), 1);
//! ```

use std::sync::Arc;
use tracing::debug;

use crate::config::QueryConfig;
use crate::models::SearchFilter;
use crate::query::range::trailing_text;
use crate::query::{
    Clause, FilterApplicator, FilterFieldTable, ParsedRange, QueryRewriter, RangeQueryDetector,
    RangeQueryParser, SearchBuilder, SearchRequest,
};
use crate::Result;

/// What a raw query string turned into
#[derive(Clone, Debug, PartialEq)]
pub enum TranslatedQuery {
    /// Blank input
    MatchAll,
    /// `term:[lower TO upper]` on a configured range term
    Range(ParsedRange),
    /// Rewritten query string for the index query parser
    QueryString(String),
}

impl TranslatedQuery {
    pub fn kind(&self) -> &'static str {
        match self {
            TranslatedQuery::MatchAll => "match_all",
            TranslatedQuery::Range(_) => "range",
            TranslatedQuery::QueryString(_) => "query_string",
        }
    }
}

/// Translates user queries and filters into search requests
///
/// Holds only data derived from a frozen [`QueryConfig`]; a translator can be
/// shared across threads and used concurrently.
#[derive(Clone, Debug)]
pub struct QueryTranslator {
    config: Arc<QueryConfig>,
    rewriter: QueryRewriter,
    detector: RangeQueryDetector,
    range_parser: RangeQueryParser,
    applicator: FilterApplicator<FilterFieldTable>,
}

impl QueryTranslator {
    pub fn new(config: Arc<QueryConfig>) -> Result<Self> {
        Ok(Self {
            rewriter: QueryRewriter::from_config(&config)?,
            detector: RangeQueryDetector::from_config(&config)?,
            range_parser: RangeQueryParser::from_config(&config),
            applicator: FilterApplicator::from_config(&config),
            config,
        })
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn rewriter(&self) -> &QueryRewriter {
        &self.rewriter
    }

    pub fn detector(&self) -> &RangeQueryDetector {
        &self.detector
    }

    pub fn range_parser(&self) -> &RangeQueryParser {
        &self.range_parser
    }

    pub fn applicator(&self) -> &FilterApplicator<FilterFieldTable> {
        &self.applicator
    }

    /// Classify and rewrite a raw query string
    ///
    /// Range detection runs on the raw input, before shorthand keys are
    /// rewritten. A string that looks like a range query but fails to parse
    /// falls back to the rewritten query string.
    pub fn translate(&self, raw: &str) -> TranslatedQuery {
        if raw.trim().is_empty() {
            return TranslatedQuery::MatchAll;
        }

        if self.detector.is_range_query(raw) {
            if let Some(parsed) = self.range_parser.parse_range_query(raw) {
                if let Some(ignored) = trailing_text(raw) {
                    debug!(query = raw, ignored, "ignoring text after range query");
                }
                return TranslatedQuery::Range(parsed);
            }
            debug!(query = raw, "range syntax did not parse, treating as query string");
        }

        TranslatedQuery::QueryString(self.rewriter.parse_query(raw))
    }

    /// Clause for a translated query
    pub fn to_clause(&self, translated: &TranslatedQuery) -> Clause {
        match translated {
            TranslatedQuery::MatchAll => Clause::match_all(),
            TranslatedQuery::Range(parsed) => parsed.to_clause(),
            TranslatedQuery::QueryString(query) => {
                Clause::query_string(query.clone(), Some(self.config.default_operator))
            }
        }
    }

    /// Translate `raw` and attach `filters` onto any search builder
    pub fn apply<B: SearchBuilder>(&self, search: B, raw: &str, filters: &[SearchFilter]) -> Result<B> {
        let translated = self.translate(raw);
        debug!(kind = translated.kind(), filters = filters.len(), "translated query");

        // Filters alone already restrict the match set
        let search = if translated == TranslatedQuery::MatchAll && !filters.is_empty() {
            search
        } else {
            search.query(self.to_clause(&translated))
        };
        self.applicator.add_filters(search, filters)
    }

    /// Build a complete search request
    pub fn build_search(&self, raw: &str, filters: &[SearchFilter]) -> Result<SearchRequest> {
        self.apply(SearchRequest::new(), raw, filters)
    }
}
