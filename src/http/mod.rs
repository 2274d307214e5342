//! HTTP access-log middleware.
//!
//! # Data Flow
//! ```text
//! Request
//!     → RequestLogger::call (start timer, capture method/url/headers/query/body)
//!     → inner service (called right away)
//!     → Response body wrapped in CompletionBody
//!     → body fully sent
//!     → AccessRecord (status, responseTime)
//!     → sanitize → Logger::log(error if status >= 400 else info, "HTTP request")
//! ```
//!
//! # Design Decisions
//! - Logging waits for the response body to finish so status and timing are final
//! - A response that never finishes is never logged; nothing blocks on it
//! - HEAD requests and 1xx/204/304 responses finish when their body is dropped
//! - Only bodies with a declared, bounded length are captured

mod body;
pub mod record;

use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use futures_util::future::BoxFuture;
use tower::{Layer, Service};

use crate::levels::Level;
use crate::logger::Logger;

use self::body::CompletionBody;
use self::record::{capture_body, RequestSnapshot};

pub use self::record::AccessRecord;

/// Message used for every access-log record.
pub const ACCESS_LOG_MESSAGE: &str = "HTTP request";

/// Default request-body capture limit (64 KiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// Severity for a response status: `error` from 400 upwards, else `info`.
pub fn level_for_status(status: u16) -> Level {
    if status >= 400 {
        Level::Error
    } else {
        Level::Info
    }
}

/// Statuses whose responses never carry a body on the wire.
fn is_bodiless_status(status: StatusCode) -> bool {
    status.is_informational() || status == StatusCode::NO_CONTENT || status == StatusCode::NOT_MODIFIED
}

/// Tower layer producing [`RequestLogger`] services.
#[derive(Debug, Clone)]
pub struct RequestLoggerLayer {
    logger: Arc<Logger>,
    max_body_bytes: usize,
}

impl RequestLoggerLayer {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self {
            logger,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Largest request body captured into the record.
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

impl<S> Layer<S> for RequestLoggerLayer {
    type Service = RequestLogger<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLogger {
            inner,
            logger: self.logger.clone(),
            max_body_bytes: self.max_body_bytes,
        }
    }
}

/// Per-request observer emitting one access record per completed response.
#[derive(Debug, Clone)]
pub struct RequestLogger<S> {
    inner: S,
    logger: Arc<Logger>,
    max_body_bytes: usize,
}

impl<S> Service<Request<Body>> for RequestLogger<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let start = Instant::now();
        let logger = self.logger.clone();
        let max_body_bytes = self.max_body_bytes;

        // Keep the service that was driven to readiness.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let (parts, body) = req.into_parts();
            let is_head = parts.method == Method::HEAD;
            let (captured, body) = capture_body(&parts.headers, body, max_body_bytes).await;
            let snapshot = RequestSnapshot::new(&parts, captured);

            let response = inner.call(Request::from_parts(parts, body)).await?;

            let status = response.status();
            let bodiless = is_head || is_bodiless_status(status);
            let status = status.as_u16();
            let (parts, body) = response.into_parts();
            let body = CompletionBody::new(body, move || {
                let record = snapshot.complete(status, start.elapsed());
                let record = logger.sanitize(&record.to_value());
                logger.log(level_for_status(status), ACCESS_LOG_MESSAGE, Some(record));
            })
            .bodiless(bodiless);
            Ok(Response::from_parts(parts, Body::new(body)))
        })
    }
}
