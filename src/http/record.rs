//! HTTP access record capture.

use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// Request data captured when the middleware is invoked.
#[derive(Debug, Clone)]
pub struct RequestSnapshot {
    pub method: String,
    pub url: String,
    pub headers: Map<String, Value>,
    pub query: Map<String, Value>,
    pub body: Value,
}

/// Completed request/response pair, ready to be logged.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRecord {
    pub method: String,
    pub url: String,
    pub status: u16,
    /// Elapsed milliseconds between invocation and response completion.
    pub response_time: u64,
    pub headers: Map<String, Value>,
    pub query: Map<String, Value>,
    pub body: Value,
}

impl RequestSnapshot {
    pub fn new(parts: &Parts, body: Value) -> Self {
        let url = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());
        Self {
            method: parts.method.to_string(),
            url,
            headers: header_map(&parts.headers),
            query: parse_query(parts.uri.query()),
            body,
        }
    }

    pub fn complete(self, status: u16, elapsed: Duration) -> AccessRecord {
        AccessRecord {
            method: self.method,
            url: self.url,
            status,
            response_time: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            headers: self.headers,
            query: self.query,
            body: self.body,
        }
    }
}

impl AccessRecord {
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Header names are lowercase; repeated headers are joined with ", ".
fn header_map(headers: &HeaderMap) -> Map<String, Value> {
    let mut map = Map::new();
    for name in headers.keys() {
        let joined = headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join(", ");
        map.insert(name.as_str().to_string(), Value::String(joined));
    }
    map
}

/// Repeated keys collect into an array.
fn parse_query(query: Option<&str>) -> Map<String, Value> {
    let mut map = Map::new();
    let Some(query) = query else {
        return map;
    };
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        let value = Value::String(value.into_owned());
        match map.get_mut(&*key) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(key.into_owned(), value);
            }
        }
    }
    map
}

/// Buffer a request body of declared length up to `limit` bytes.
///
/// Returns the captured value and a body to forward. Bodies without a
/// `Content-Length`, or larger than `limit`, are forwarded untouched and
/// captured as null. JSON bodies are parsed; anything else is kept as text.
/// If reading fails, the forwarded body yields the same error.
pub async fn capture_body(headers: &HeaderMap, body: Body, limit: usize) -> (Value, Body) {
    let declared = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    match declared {
        Some(0) | None => return (Value::Null, body),
        Some(len) if len > limit => return (Value::Null, body),
        Some(_) => {}
    }

    let bytes = match axum::body::to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read request body for access log");
            return (Value::Null, failed_body(e));
        }
    };

    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("json"));
    let value = if is_json {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    } else {
        Value::String(String::from_utf8_lossy(&bytes).into_owned())
    };
    (value, Body::from(bytes))
}

/// A body whose only frame is `error`.
fn failed_body(error: axum::Error) -> Body {
    Body::from_stream(futures_util::stream::iter([Err::<Bytes, _>(error)]))
}
