//! Sensitive-field redaction.
//!
//! Walks a `serde_json::Value` tree and drops every object key whose name is
//! in the sensitive set. Matching is exact and case-sensitive. Arrays keep
//! their order and length; scalars pass through unchanged.
//!
//! `Value` is an owned tree, so cycles cannot occur and are not handled.

use std::collections::HashSet;

use serde_json::{Map, Value};

/// Field names removed by default.
pub const DEFAULT_SENSITIVE_FIELDS: [&str; 3] = ["password", "creditCard", "ssn"];

/// Recursive remover of sensitive keys.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    fields: HashSet<String>,
}

impl Sanitizer {
    /// Create a sanitizer for the given field names.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if `key` is redacted.
    pub fn is_sensitive(&self, key: &str) -> bool {
        self.fields.contains(key)
    }

    /// Configured field names, sorted.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = self.fields.iter().map(String::as_str).collect();
        fields.sort_unstable();
        fields
    }

    /// Return a sanitized copy of `value`.
    pub fn sanitize(&self, value: &Value) -> Value {
        let mut out = value.clone();
        self.sanitize_in_place(&mut out);
        out
    }

    /// Return a sanitized copy of an object's fields.
    pub fn sanitize_map(&self, map: &Map<String, Value>) -> Map<String, Value> {
        map.iter()
            .filter(|(key, _)| !self.fields.contains(key.as_str()))
            .map(|(key, value)| (key.clone(), self.sanitize(value)))
            .collect()
    }

    /// Sanitize `value` without copying.
    pub fn sanitize_in_place(&self, value: &mut Value) {
        match value {
            Value::Object(map) => {
                map.retain(|key, _| !self.fields.contains(key));
                for child in map.values_mut() {
                    self.sanitize_in_place(child);
                }
            }
            Value::Array(items) => {
                for item in items.iter_mut() {
                    self.sanitize_in_place(item);
                }
            }
            _ => {}
        }
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(DEFAULT_SENSITIVE_FIELDS)
    }
}
