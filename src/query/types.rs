//! Core types for the query system

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Operator used between unqualified terms of a query string
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchOperator {
    /// All terms must match (AND)
    #[default]
    #[serde(alias = "and")]
    And,
    /// At least one term must match (OR)
    #[serde(alias = "or")]
    Or,
}

impl MatchOperator {
    /// Operator name in the form the index expects
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchOperator::And => "AND",
            MatchOperator::Or => "OR",
        }
    }
}

/// Kind of non-scoring clause a filter turns into
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Exact match on a single value
    Term,
    /// Exact match on any of several values
    Terms,
    /// Inclusive bounds
    Range,
}

impl FilterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterType::Term => "term",
            FilterType::Terms => "terms",
            FilterType::Range => "range",
        }
    }
}

/// Value type for range bounds
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RangeValue {
    /// 64-bit integer
    Long(i64),
    /// 64-bit floating point
    Double(f64),
    /// String (for dates, keywords)
    String(String),
}

impl RangeValue {
    /// Convert a JSON scalar into a bound. Strings holding integers become `Long`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .map(RangeValue::Long)
                .or_else(|| n.as_f64().map(RangeValue::Double)),
            Value::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return None;
                }
                Some(
                    s.parse::<i64>()
                        .map(RangeValue::Long)
                        .unwrap_or_else(|_| RangeValue::String(s.to_string())),
                )
            }
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            RangeValue::Long(v) => Value::from(*v),
            RangeValue::Double(v) => Value::from(*v),
            RangeValue::String(s) => Value::String(s.clone()),
        }
    }
}

/// Inclusive range bounds
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RangeBounds {
    /// Greater than or equal to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<RangeValue>,
    /// Less than or equal to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<RangeValue>,
}

impl RangeBounds {
    pub fn between(lower: RangeValue, upper: RangeValue) -> Self {
        Self {
            gte: Some(lower),
            lte: Some(upper),
        }
    }

    /// Single-value range, `gte == lte`
    pub fn point(value: RangeValue) -> Self {
        Self {
            gte: Some(value.clone()),
            lte: Some(value),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.gte.is_none() && self.lte.is_none()
    }

    /// Render as the `{"gte": .., "lte": ..}` object used inside range clauses
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        if let Some(gte) = &self.gte {
            map.insert("gte".to_string(), gte.to_json());
        }
        if let Some(lte) = &self.lte {
            map.insert("lte".to_string(), lte.to_json());
        }
        Value::Object(map)
    }
}
