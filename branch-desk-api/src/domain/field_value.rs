use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single tracked field value as recorded in audit entries.
///
/// Serialized as `{"type": "...", "value": ...}` so stored audit values parse
/// back into the exact variant they were written from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Null,
    Text(String),
    Integer(i64),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Integer(n) => write!(f, "{n}"),
            FieldValue::Boolean(b) => write!(f, "{b}"),
            FieldValue::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// Field values keyed by field name
pub type FieldValues = BTreeMap<String, FieldValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_encoding() {
        let json = serde_json::to_value(FieldValue::text("closed")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "text", "value": "closed"}));

        let json = serde_json::to_value(FieldValue::Null).unwrap();
        assert_eq!(json, serde_json::json!({"type": "null"}));
    }

    #[test]
    fn test_integer_and_text_never_compare_equal() {
        assert_ne!(FieldValue::Integer(7), FieldValue::text("7"));
        assert_ne!(FieldValue::Null, FieldValue::text(""));
    }

    #[test]
    fn test_map_parses_back_to_same_variants() {
        let mut values = FieldValues::new();
        values.insert("branch_id".to_string(), FieldValue::Integer(3));
        values.insert("deleted_by".to_string(), FieldValue::Null);
        let json = serde_json::to_string(&values).unwrap();
        let parsed: FieldValues = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, values);
    }
}
