//! Query-string rewriting
//!
//! Turns what users type into the search box into something the index query
//! parser accepts:
//! - `observables:ASYM` -> `data_keywords.observables:ASYM`
//! - `reactions:P P --> Z0 Z0` -> `data_keywords.reactions:"P P --> Z0 Z0"`
//! - `10.17182/hepdata.1234` -> `"10.17182/hepdata.1234"`
//!
//! # Example
//!
//! ```rust
//! use hepquery::config::QueryConfig;
//! use hepquery::query::query_string::QueryRewriter;
//!
//! let rewriter = QueryRewriter::from_config(&QueryConfig::default()).unwrap();
//! assert_eq!(rewriter.parse_query("observable:ASYM"), "data_keywords.observables:ASYM");
//! ```

pub mod phrase;
pub mod rewriter;

pub use phrase::PhraseQuoter;
pub use rewriter::QueryRewriter;
