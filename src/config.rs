use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use crate::error::HepQueryError;
use crate::query::types::{FilterType, MatchOperator};
use crate::Result;

/// Filter name used for the nested author match
pub const DEFAULT_AUTHOR_FILTER: &str = "author";

/// Query translation configuration
///
/// Loaded once at startup, validated, and frozen behind an `Arc` with
/// [`QueryConfig::freeze`]. Components copy what they need at construction
/// and never observe later changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Query shorthand key -> canonical field path
    pub field_mapping: BTreeMap<String, String>,
    /// Shorthands eligible for `term:[a TO b]` syntax
    pub range_terms: BTreeSet<String>,
    /// Range shorthand -> canonical term name
    pub range_term_mapping: BTreeMap<String, String>,
    pub author_filter: AuthorFilterConfig,
    /// Filter name -> clause type and canonical field
    pub filter_fields: BTreeMap<String, FilterFieldConfig>,
    /// Suffix appended to unknown filter names to form a `term` field.
    /// `None` rejects unknown filter names.
    pub fallback_filter_suffix: Option<String>,
    /// Operator for unqualified terms in generated query strings
    pub default_operator: MatchOperator,
}

/// Nested-document author full-name filter
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorFilterConfig {
    pub name: String,
    pub path: String,
    pub field: String,
}

impl AuthorFilterConfig {
    /// Fully qualified sub-field, e.g. `authors.full_name`
    pub fn qualified_field(&self) -> String {
        format!("{}.{}", self.path, self.field)
    }
}

impl Default for AuthorFilterConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_AUTHOR_FILTER.to_string(),
            path: "authors".to_string(),
            field: "full_name".to_string(),
        }
    }
}

/// How one filter name maps onto the index
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterFieldConfig {
    #[serde(rename = "type")]
    pub filter_type: FilterType,
    pub field: String,
}

impl FilterFieldConfig {
    pub fn new(filter_type: FilterType, field: impl Into<String>) -> Self {
        Self {
            filter_type,
            field: field.into(),
        }
    }
}

fn string_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Default for QueryConfig {
    fn default() -> Self {
        let field_mapping = string_map(&[
            ("observables", "data_keywords.observables"),
            ("observable", "data_keywords.observables"),
            ("cmenergies", "data_keywords.cmenergies"),
            ("phrases", "data_keywords.phrases"),
            ("reactions", "data_keywords.reactions"),
            ("analysis", "analyses.type"),
            ("resources", "resources.description"),
            ("publication_recid", "recid"),
        ]);

        let filter_fields = [
            ("date", FilterFieldConfig::new(FilterType::Range, "year")),
            (
                "cmenergies",
                FilterFieldConfig::new(FilterType::Range, "data_keywords.cmenergies"),
            ),
            (
                "collaboration",
                FilterFieldConfig::new(FilterType::Term, "collaborations.raw"),
            ),
            (
                "subject_areas",
                FilterFieldConfig::new(FilterType::Term, "subject_area.raw"),
            ),
            (
                "phrases",
                FilterFieldConfig::new(FilterType::Term, "data_keywords.phrases.raw"),
            ),
            (
                "reactions",
                FilterFieldConfig::new(FilterType::Term, "data_keywords.reactions.raw"),
            ),
            (
                "observables",
                FilterFieldConfig::new(FilterType::Term, "data_keywords.observables.raw"),
            ),
            ("analysis", FilterFieldConfig::new(FilterType::Term, "analyses.type")),
        ]
        .into_iter()
        .map(|(name, field)| (name.to_string(), field))
        .collect();

        Self {
            field_mapping,
            range_terms: ["publication_recid".to_string()].into_iter().collect(),
            range_term_mapping: string_map(&[("publication_recid", "recid")]),
            author_filter: AuthorFilterConfig::default(),
            filter_fields,
            fallback_filter_suffix: Some(".raw".to_string()),
            default_operator: MatchOperator::And,
        }
    }
}

impl QueryConfig {
    /// Parse a JSON document. Missing sections keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        for (key, field) in &self.field_mapping {
            check_name("field mapping key", key)?;
            check_name("field mapping target", field)?;
        }

        for term in &self.range_terms {
            check_name("range term", term)?;
            if term.contains(|c: char| c.is_whitespace() || c == ':' || c == '[') {
                return Err(HepQueryError::InvalidConfig(format!(
                    "range term '{}' may not contain whitespace, ':' or '['",
                    term
                )));
            }
        }

        for (key, term) in &self.range_term_mapping {
            check_name("range term mapping key", key)?;
            check_name("range term mapping target", term)?;
        }

        check_name("author filter name", &self.author_filter.name)?;
        check_name("author filter path", &self.author_filter.path)?;
        check_name("author filter field", &self.author_filter.field)?;

        for (name, field) in &self.filter_fields {
            check_name("filter name", name)?;
            check_name("filter field", &field.field)?;
        }

        Ok(())
    }

    /// Validate and share. The returned configuration is read-only.
    pub fn freeze(self) -> Result<Arc<Self>> {
        self.validate()?;
        Ok(Arc::new(self))
    }
}

fn check_name(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(HepQueryError::InvalidConfig(format!("{} may not be empty", what)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = QueryConfig::default();
        assert_eq!(
            config.field_mapping.get("observable").map(String::as_str),
            Some("data_keywords.observables")
        );
        assert!(config.range_terms.contains("publication_recid"));
        assert_eq!(
            config.range_term_mapping.get("publication_recid").map(String::as_str),
            Some("recid")
        );
        assert_eq!(config.author_filter.qualified_field(), "authors.full_name");
        assert_eq!(config.default_operator, MatchOperator::And);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = QueryConfig::from_json_str(
            r#"{
                "range_terms": ["publication_recid", "year"],
                "range_term_mapping": { "publication_recid": "recid", "year": "year" },
                "default_operator": "or"
            }"#,
        )
        .unwrap();

        assert_eq!(config.range_terms.len(), 2);
        assert_eq!(config.default_operator, MatchOperator::Or);
        assert_eq!(config.field_mapping, QueryConfig::default().field_mapping);
    }

    #[test]
    fn test_filter_fields_from_json() {
        let config = QueryConfig::from_json_str(
            r#"{ "filter_fields": { "journal": { "type": "terms", "field": "journal.raw" } } }"#,
        )
        .unwrap();

        assert_eq!(
            config.filter_fields.get("journal"),
            Some(&FilterFieldConfig::new(FilterType::Terms, "journal.raw"))
        );
        assert!(!config.filter_fields.contains_key("date"));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "fallback_filter_suffix": null }}"#).unwrap();

        let config = QueryConfig::from_path(file.path()).unwrap();
        assert_eq!(config.fallback_filter_suffix, None);
    }

    #[test]
    fn test_from_missing_path() {
        let err = QueryConfig::from_path("/nonexistent/hepquery.json").unwrap_err();
        assert!(matches!(err, HepQueryError::Io(_)));
    }

    #[test]
    fn test_invalid_json() {
        let err = QueryConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, HepQueryError::Json(_)));
    }

    #[test]
    fn test_validate_rejects_bad_range_term() {
        let mut config = QueryConfig::default();
        config.range_terms.insert("bad term".to_string());
        assert!(matches!(
            config.freeze(),
            Err(HepQueryError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_mapping() {
        let mut config = QueryConfig::default();
        config.field_mapping.insert("keywords".to_string(), " ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_freeze() {
        let frozen = QueryConfig::default().freeze().unwrap();
        let shared = Arc::clone(&frozen);
        assert_eq!(*shared, QueryConfig::default());
    }
}
