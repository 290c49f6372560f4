//! Visibility predicates attached to blocks.

use std::fmt;

use serde::{Deserialize, Deserializer};

use crate::Value;

/// A predicate gating whether a block and its subtree render.
///
/// Written as `{"field": "cart_count", "op": "gt", "value": 0}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Condition {
    /// Binding path of the value under test.
    pub field: String,
    /// Comparison operator.
    pub op: Operator,
    /// Comparison operand. `None` when the key is absent; `Some(Null)` for an explicit null.
    #[serde(default, deserialize_with = "present")]
    pub value: Option<Value>,
}

/// Keep explicit `null` distinct from a missing key.
fn present<'de, D>(de: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(de).map(Some)
}

/// Condition operators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum Operator {
    /// Strict equality.
    Equals,
    /// Strict inequality.
    NotEquals,
    /// Missing, null, blank string or empty list.
    Empty,
    /// Anything `Empty` rejects.
    NotEmpty,
    /// Numeric `>`.
    Gt,
    /// Numeric `<`.
    Lt,
    /// Numeric `>=`.
    Gte,
    /// Numeric `<=`.
    Lte,
    /// Substring or list membership.
    Contains,
    /// An operator name the engine does not know.
    Unknown(String),
}

impl From<String> for Operator {
    fn from(name: String) -> Self {
        match name.as_str() {
            "equals" => Self::Equals,
            "not_equals" => Self::NotEquals,
            "empty" => Self::Empty,
            "not_empty" => Self::NotEmpty,
            "gt" => Self::Gt,
            "lt" => Self::Lt,
            "gte" => Self::Gte,
            "lte" => Self::Lte,
            "contains" => Self::Contains,
            _ => Self::Unknown(name),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::Empty => "empty",
            Self::NotEmpty => "not_empty",
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::Gte => "gte",
            Self::Lte => "lte",
            Self::Contains => "contains",
            Self::Unknown(name) => name,
        };
        f.write_str(name)
    }
}
