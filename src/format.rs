//! Log record rendering.
//!
//! # Output Shape
//! ```text
//! {timestamp, level, message, service, requestId, userId, ipAddress, responseTime, metadata?}
//! ```
//!
//! # Design Decisions
//! - Named fields resolve: custom format override → record metadata → "N/A"
//! - `metadata` holds the residual fields and is omitted when empty
//! - Timestamps are UTC RFC 3339 with millisecond precision

use chrono::{DateTime, SecondsFormat, Utc};
use colored::Colorize;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::levels::Level;

/// Fallback for named fields that are absent.
pub const SENTINEL: &str = "N/A";

/// Metadata fields promoted to the top level of a formatted line.
pub const NAMED_FIELDS: [&str; 5] = ["service", "requestId", "userId", "ipAddress", "responseTime"];

/// A single log call, built fresh and discarded after the write.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub message: String,
    /// Caller metadata, merged with the active custom format.
    pub meta: Option<Value>,
    /// Context for `log_with_context`, kept as a sibling of `meta`.
    pub context: Option<Value>,
}

impl LogRecord {
    pub fn new(level: Level, message: impl Into<String>, meta: Option<Value>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            meta,
            context: None,
        }
    }

    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }

    /// Structured value handed to the backend next to the message.
    pub fn attachment(&self) -> Value {
        let mut map = Map::new();
        map.insert("meta".into(), self.meta.clone().unwrap_or(Value::Null));
        if let Some(context) = &self.context {
            map.insert("context".into(), context.clone());
        }
        Value::Object(map)
    }

    pub fn timestamp_string(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FormattedLine<'a> {
    timestamp: String,
    level: &'static str,
    message: &'a str,
    service: Value,
    request_id: Value,
    user_id: Value,
    ip_address: Value,
    response_time: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<Map<String, Value>>,
}

/// Renders records into single JSON lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct Formatter;

impl Formatter {
    pub fn new() -> Self {
        Self
    }

    /// Render `record` as one JSON line.
    pub fn format(
        &self,
        record: &LogRecord,
        overrides: Option<&Map<String, Value>>,
    ) -> Result<String, serde_json::Error> {
        let meta = record.meta.as_ref().and_then(Value::as_object);
        let resolve = |field: &str| -> Value {
            overrides
                .and_then(|o| o.get(field))
                .or_else(|| meta.and_then(|m| m.get(field)))
                .cloned()
                .unwrap_or_else(|| Value::String(SENTINEL.to_string()))
        };

        let mut residual = Map::new();
        match &record.meta {
            Some(Value::Object(map)) => {
                for (key, value) in map {
                    if !NAMED_FIELDS.contains(&key.as_str()) {
                        residual.insert(key.clone(), value.clone());
                    }
                }
            }
            Some(Value::Null) | None => {}
            Some(other) => {
                residual.insert("value".into(), other.clone());
            }
        }
        if let Some(context) = &record.context {
            residual.insert("context".into(), context.clone());
        }

        let line = FormattedLine {
            timestamp: record.timestamp_string(),
            level: record.level.name(),
            message: &record.message,
            service: resolve("service"),
            request_id: resolve("requestId"),
            user_id: resolve("userId"),
            ip_address: resolve("ipAddress"),
            response_time: resolve("responseTime"),
            metadata: (!residual.is_empty()).then_some(residual),
        };
        serde_json::to_string(&line)
    }

    /// Human-readable console line: `timestamp [level]: message`.
    pub fn console_line(&self, record: &LogRecord, colorize: bool) -> String {
        let level = if colorize {
            record.level.name().color(record.level.color()).to_string()
        } else {
            record.level.name().to_string()
        };
        format!("{} [{}]: {}", record.timestamp_string(), level, record.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(line: &str) -> Value {
        serde_json::from_str(line).unwrap()
    }

    #[test]
    fn test_sentinels_without_metadata() {
        let record = LogRecord::new(Level::Info, "hello", None);
        let out = parse(&Formatter::new().format(&record, None).unwrap());

        assert_eq!(out["level"], "info");
        assert_eq!(out["message"], "hello");
        for field in NAMED_FIELDS {
            assert_eq!(out[field], SENTINEL, "{field}");
        }
        assert!(out.get("metadata").is_none());
    }

    #[test]
    fn test_precedence_override_then_meta() {
        let record = LogRecord::new(
            Level::Warn,
            "slow",
            Some(json!({ "service": "from-meta", "userId": 123, "route": "/a" })),
        );
        let overrides = json!({ "service": "from-format" });
        let out = parse(
            &Formatter::new()
                .format(&record, overrides.as_object())
                .unwrap(),
        );

        assert_eq!(out["service"], "from-format");
        assert_eq!(out["userId"], 123);
        assert_eq!(out["requestId"], SENTINEL);
        assert_eq!(out["metadata"], json!({ "route": "/a" }));
    }

    #[test]
    fn test_empty_override_falls_back() {
        let record = LogRecord::new(Level::Info, "m", Some(json!({ "ipAddress": "10.0.0.1" })));
        let empty = Map::new();
        let out = parse(&Formatter::new().format(&record, Some(&empty)).unwrap());

        assert_eq!(out["ipAddress"], "10.0.0.1");
        assert_eq!(out["service"], SENTINEL);
        assert!(out.get("metadata").is_none());
    }

    #[test]
    fn test_context_lands_in_metadata() {
        let record = LogRecord::new(Level::Debug, "ctx", None).with_context(json!({ "job": 7 }));
        let out = parse(&Formatter::new().format(&record, None).unwrap());
        assert_eq!(out["metadata"], json!({ "context": { "job": 7 } }));
    }

    #[test]
    fn test_field_order() {
        let record = LogRecord::new(Level::Error, "boom", Some(json!({ "extra": 1 })));
        let line = Formatter::new().format(&record, None).unwrap();
        let keys = [
            "\"timestamp\"", "\"level\"", "\"message\"", "\"service\"", "\"requestId\"",
            "\"userId\"", "\"ipAddress\"", "\"responseTime\"", "\"metadata\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| line.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{line}");
    }

    #[test]
    fn test_attachment_shape() {
        let record = LogRecord::new(Level::Info, "m", None);
        assert_eq!(record.attachment(), json!({ "meta": null }));

        let record = LogRecord::new(Level::Info, "m", Some(json!({ "a": 1 })))
            .with_context(json!({ "b": 2 }));
        assert_eq!(record.attachment(), json!({ "meta": { "a": 1 }, "context": { "b": 2 } }));
    }

    #[test]
    fn test_console_line() {
        let record = LogRecord::new(Level::Info, "plain", None);
        let line = Formatter::new().console_line(&record, false);
        assert!(line.ends_with(" [info]: plain"));
        assert!(line.starts_with(&record.timestamp_string()));
    }
}
