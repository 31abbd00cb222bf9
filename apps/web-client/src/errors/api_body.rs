//! Defensive decoding of API error bodies.
//!
//! The API answers failures with one of several shapes: a field-keyed map of
//! message lists (`{"check_in": ["..."]}`), a single `{"detail": "..."}`, a bare
//! string or list, or something else entirely. Everything is funnelled into one
//! tagged union at the boundary so callers never inspect raw JSON.
//!
//! Field errors keep the order the API sent them in; `serde_json` is built with
//! `preserve_order` so object keys are not re-sorted on parse.

use serde_json::Value;

/// Key used when the API returns a bare list of messages.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorBody {
    /// Field name to messages, in the API's key order.
    FieldErrors(Vec<(String, Vec<String>)>),
    /// A single human-readable message.
    Detail(String),
    /// Empty, non-JSON or unrecognised body.
    Unknown,
}

impl ApiErrorBody {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(value) => Self::from_value(&value),
            Err(_) => Self::Unknown,
        }
    }

    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) if !s.trim().is_empty() => Self::Detail(s.clone()),
            Value::Array(items) => {
                let messages = messages_of(value);
                if messages.is_empty() || items.is_empty() {
                    Self::Unknown
                } else {
                    Self::FieldErrors(vec![(NON_FIELD_ERRORS.to_string(), messages)])
                }
            }
            Value::Object(map) => {
                if let Some(Value::String(detail)) = map.get("detail") {
                    return Self::Detail(detail.clone());
                }
                let fields: Vec<(String, Vec<String>)> = map
                    .iter()
                    .filter_map(|(key, v)| {
                        let messages = messages_of(v);
                        (!messages.is_empty()).then(|| (key.clone(), messages))
                    })
                    .collect();
                if fields.is_empty() {
                    Self::Unknown
                } else {
                    Self::FieldErrors(fields)
                }
            }
            _ => Self::Unknown,
        }
    }

    /// The `detail` text, if that is what the API sent.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Detail(d) => Some(d),
            _ => None,
        }
    }

    /// Messages for one field, empty when absent.
    pub fn field(&self, name: &str) -> &[String] {
        match self {
            Self::FieldErrors(fields) => fields
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, messages)| messages.as_slice())
                .unwrap_or(&[]),
            _ => &[],
        }
    }

    /// One readable line: `"field: a, b field2: c"`, the detail text, or `fallback`.
    pub fn flatten(&self, fallback: &str) -> String {
        self.flatten_with(" ", fallback)
    }

    /// Like [`flatten`](Self::flatten) with a custom separator between fields.
    pub fn flatten_with(&self, separator: &str, fallback: &str) -> String {
        match self {
            Self::FieldErrors(fields) => fields
                .iter()
                .map(|(key, messages)| format!("{key}: {}", messages.join(", ")))
                .collect::<Vec<_>>()
                .join(separator),
            Self::Detail(detail) => detail.clone(),
            Self::Unknown => fallback.to_string(),
        }
    }
}

/// Strings found directly in a value: a string itself, or the string and
/// scalar members of an array. Nested objects are skipped.
fn messages_of(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}
