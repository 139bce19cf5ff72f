use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::error::HepQueryError;

/// A caller-supplied `(name, value)` filter
///
/// Filters are applied in the order given; the same name may appear more than
/// once and each occurrence becomes its own clause.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchFilter {
    pub name: String,
    pub value: Value,
}

impl SearchFilter {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl<S: Into<String>> From<(S, Value)> for SearchFilter {
    fn from((name, value): (S, Value)) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Parse `name=value`. The value is read as JSON when it is valid JSON
/// (`date=[2010,2020]`), otherwise it is kept as a plain string.
impl FromStr for SearchFilter {
    type Err = HepQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, raw) = s.split_once('=').ok_or_else(|| HepQueryError::InvalidFilterValue {
            name: s.to_string(),
            reason: "expected name=value".to_string(),
        })?;

        let name = name.trim();
        if name.is_empty() {
            return Err(HepQueryError::InvalidFilterValue {
                name: s.to_string(),
                reason: "filter name is empty".to_string(),
            });
        }

        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        Ok(Self::new(name, value))
    }
}
