//! Structured filters attached to a search request
//!
//! The author filter is special-cased as a nested match on the author
//! sub-documents. Every other filter name is resolved to a clause type and
//! canonical field by a [`FieldResolver`].

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use super::clause::Clause;
use super::search::SearchBuilder;
use super::types::{FilterType, RangeBounds, RangeValue};
use crate::config::{AuthorFilterConfig, FilterFieldConfig, QueryConfig};
use crate::error::HepQueryError;
use crate::models::SearchFilter;
use crate::Result;

/// A filter resolved against the index layout
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedFilter {
    pub filter_type: FilterType,
    pub field: String,
    pub value: Value,
}

/// Maps a filter name and raw value onto an index field
pub trait FieldResolver {
    fn resolve(&self, name: &str, value: &Value) -> Result<ResolvedFilter>;
}

/// Table-driven [`FieldResolver`] built from [`QueryConfig`]
#[derive(Clone, Debug, Default)]
pub struct FilterFieldTable {
    fields: BTreeMap<String, FilterFieldConfig>,
    fallback_suffix: Option<String>,
}

impl FilterFieldTable {
    pub fn new(fields: BTreeMap<String, FilterFieldConfig>, fallback_suffix: Option<String>) -> Self {
        Self {
            fields,
            fallback_suffix,
        }
    }

    pub fn from_config(config: &QueryConfig) -> Self {
        Self::new(
            config.filter_fields.clone(),
            config.fallback_filter_suffix.clone(),
        )
    }

    fn lookup(&self, name: &str) -> Result<FilterFieldConfig> {
        if let Some(field) = self.fields.get(name) {
            return Ok(field.clone());
        }
        match &self.fallback_suffix {
            Some(suffix) => Ok(FilterFieldConfig::new(
                FilterType::Term,
                format!("{}{}", name, suffix),
            )),
            None => Err(HepQueryError::UnknownFilter(name.to_string())),
        }
    }
}

impl FieldResolver for FilterFieldTable {
    fn resolve(&self, name: &str, value: &Value) -> Result<ResolvedFilter> {
        let field = self.lookup(name)?;
        let value = match field.filter_type {
            FilterType::Term => value.clone(),
            FilterType::Terms => match value {
                Value::Array(_) => value.clone(),
                scalar => Value::Array(vec![scalar.clone()]),
            },
            FilterType::Range => range_bounds(name, value)?.to_json(),
        };

        Ok(ResolvedFilter {
            filter_type: field.filter_type,
            field: field.field,
            value,
        })
    }
}

const RANGE_FORMS: &str =
    "expected [lower, upper], \"lower,upper\", {\"gte\": lower, \"lte\": upper} or a single value";

/// Read range bounds from `[lo, hi]`, `"lo,hi"` or `{"gte": lo, "lte": hi}`.
/// A single number or string is a point range with `gte == lte`.
fn range_bounds(name: &str, value: &Value) -> Result<RangeBounds> {
    let invalid = || HepQueryError::InvalidFilterValue {
        name: name.to_string(),
        reason: RANGE_FORMS.to_string(),
    };

    let bounds = match value {
        Value::Array(items) => match items.as_slice() {
            [lower, upper] => RangeBounds {
                gte: RangeValue::from_json(lower),
                lte: RangeValue::from_json(upper),
            },
            _ => return Err(invalid()),
        },
        Value::String(s) => match s.split_once(',') {
            Some((lower, upper)) => RangeBounds {
                gte: RangeValue::from_json(&Value::String(lower.to_string())),
                lte: RangeValue::from_json(&Value::String(upper.to_string())),
            },
            None => RangeValue::from_json(value)
                .map(RangeBounds::point)
                .unwrap_or_default(),
        },
        Value::Number(_) => RangeValue::from_json(value)
            .map(RangeBounds::point)
            .unwrap_or_default(),
        Value::Object(map) => RangeBounds {
            gte: map.get("gte").and_then(RangeValue::from_json),
            lte: map.get("lte").and_then(RangeValue::from_json),
        },
        _ => return Err(invalid()),
    };

    if bounds.is_unbounded() {
        return Err(invalid());
    }
    Ok(bounds)
}

/// Attaches caller filters to a search request
#[derive(Clone, Debug)]
pub struct FilterApplicator<R> {
    resolver: R,
    author: AuthorFilterConfig,
}

impl FilterApplicator<FilterFieldTable> {
    pub fn from_config(config: &QueryConfig) -> Self {
        Self::new(FilterFieldTable::from_config(config), config.author_filter.clone())
    }
}

impl<R: FieldResolver> FilterApplicator<R> {
    pub fn new(resolver: R, author: AuthorFilterConfig) -> Self {
        Self { resolver, author }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Apply `filters` in order
    ///
    /// Stops at the first filter the resolver rejects.
    pub fn add_filters<B: SearchBuilder>(&self, mut search: B, filters: &[SearchFilter]) -> Result<B> {
        for filter in filters {
            search = self.add_filter(search, filter)?;
        }
        Ok(search)
    }

    pub fn add_filter<B: SearchBuilder>(&self, search: B, filter: &SearchFilter) -> Result<B> {
        if filter.name == self.author.name {
            debug!(value = %filter.value, "adding nested author filter");
            let clause = Clause::nested(
                self.author.path.clone(),
                Clause::match_field(self.author.qualified_field(), filter.value.clone()),
            );
            return Ok(search.query(clause));
        }

        let resolved = self.resolver.resolve(&filter.name, &filter.value)?;
        debug!(
            name = %filter.name,
            field = %resolved.field,
            filter_type = resolved.filter_type.as_str(),
            "adding filter"
        );
        Ok(search.filter(resolved.filter_type, &resolved.field, resolved.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::search::SearchRequest;
    use serde_json::json;

    fn applicator() -> FilterApplicator<FilterFieldTable> {
        FilterApplicator::from_config(&QueryConfig::default())
    }

    /// Records builder calls instead of building clauses
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl SearchBuilder for Recorder {
        fn query(mut self, clause: Clause) -> Self {
            self.calls.push(format!("query:{}", clause.clause_type()));
            self
        }

        fn filter(mut self, filter_type: FilterType, field: &str, value: Value) -> Self {
            self.calls
                .push(format!("filter:{}:{}={}", filter_type.as_str(), field, value));
            self
        }
    }

    #[test]
    fn test_author_is_nested_match() {
        let request = applicator()
            .add_filters(
                SearchRequest::new(),
                &[SearchFilter::new("author", "Ellis, John")],
            )
            .unwrap();

        assert_eq!(
            request.to_json().unwrap(),
            json!({
                "query": {
                    "nested": {
                        "path": "authors",
                        "query": { "match": { "authors.full_name": "Ellis, John" } }
                    }
                }
            })
        );
    }

    #[test]
    fn test_filters_applied_in_order() {
        let recorder = applicator()
            .add_filters(
                Recorder::default(),
                &[
                    SearchFilter::new("collaboration", "CMS"),
                    SearchFilter::new("author", "Smith"),
                    SearchFilter::new("collaboration", "ATLAS"),
                ],
            )
            .unwrap();

        assert_eq!(
            recorder.calls,
            vec![
                "filter:term:collaborations.raw=\"CMS\"",
                "query:nested",
                "filter:term:collaborations.raw=\"ATLAS\"",
            ]
        );
    }

    #[test]
    fn test_range_filter_shapes() {
        let table = FilterFieldTable::from_config(&QueryConfig::default());
        let expected = json!({ "gte": 2010, "lte": 2020 });

        for value in [
            json!([2010, 2020]),
            json!("2010,2020"),
            json!({ "gte": 2010, "lte": 2020 }),
        ] {
            let resolved = table.resolve("date", &value).unwrap();
            assert_eq!(resolved.filter_type, FilterType::Range);
            assert_eq!(resolved.field, "year");
            assert_eq!(resolved.value, expected);
        }
    }

    #[test]
    fn test_range_filter_rejects_bad_values() {
        let table = FilterFieldTable::from_config(&QueryConfig::default());
        for value in [json!([2010]), json!(" "), json!(true), json!({}), json!(null)] {
            let err = table.resolve("date", &value).unwrap_err();
            assert!(err.is_client_error(), "{:?} should be rejected", value);
            assert!(err.to_string().contains("[lower, upper]"));
        }
    }

    #[test]
    fn test_single_value_is_point_range() {
        let table = FilterFieldTable::from_config(&QueryConfig::default());

        let resolved = table.resolve("date", &json!(2010)).unwrap();
        assert_eq!(resolved.value, json!({ "gte": 2010, "lte": 2010 }));

        let resolved = table.resolve("date", &json!("2010")).unwrap();
        assert_eq!(resolved.value, json!({ "gte": 2010, "lte": 2010 }));

        let filter: SearchFilter = "cmenergies=7000".parse().unwrap();
        let resolved = table.resolve(&filter.name, &filter.value).unwrap();
        assert_eq!(resolved.field, "data_keywords.cmenergies");
        assert_eq!(resolved.value, json!({ "gte": 7000, "lte": 7000 }));
    }

    #[test]
    fn test_terms_wraps_scalar() {
        let mut config = QueryConfig::default();
        config.filter_fields.insert(
            "journal".to_string(),
            FilterFieldConfig::new(FilterType::Terms, "journal.raw"),
        );
        let table = FilterFieldTable::from_config(&config);

        assert_eq!(
            table.resolve("journal", &json!("PRL")).unwrap().value,
            json!(["PRL"])
        );
        assert_eq!(
            table.resolve("journal", &json!(["PRL", "PLB"])).unwrap().value,
            json!(["PRL", "PLB"])
        );
    }

    #[test]
    fn test_fallback_field() {
        let table = FilterFieldTable::from_config(&QueryConfig::default());
        let resolved = table.resolve("keywords", &json!("jets")).unwrap();
        assert_eq!(resolved.field, "keywords.raw");
        assert_eq!(resolved.filter_type, FilterType::Term);
    }

    #[test]
    fn test_unknown_filter_without_fallback() {
        let mut config = QueryConfig::default();
        config.fallback_filter_suffix = None;
        let applicator = FilterApplicator::from_config(&config);

        let err = applicator
            .add_filters(SearchRequest::new(), &[SearchFilter::new("keywords", "jets")])
            .unwrap_err();
        assert!(matches!(err, HepQueryError::UnknownFilter(name) if name == "keywords"));
    }

    #[test]
    fn test_custom_resolver() {
        struct Fixed;

        impl FieldResolver for Fixed {
            fn resolve(&self, _name: &str, value: &Value) -> Result<ResolvedFilter> {
                Ok(ResolvedFilter {
                    filter_type: FilterType::Term,
                    field: "fixed".to_string(),
                    value: value.clone(),
                })
            }
        }

        let applicator = FilterApplicator::new(Fixed, AuthorFilterConfig::default());
        let request = applicator
            .add_filters(SearchRequest::new(), &[SearchFilter::new("anything", 1)])
            .unwrap();
        assert_eq!(request.filters(), &[Clause::term("fixed", 1)]);
    }
}
