//! End-to-end behavior of the logger core against an in-memory backend.

use serde_json::{json, Value};
use service_logger::{Level, LoggerError, SENTINEL};

mod common;

#[test]
fn test_logs_every_level_when_silly() {
    let (logger, backend) = common::memory_logger(Level::Silly);

    for level in Level::ALL {
        let message = format!("This is a {} message", level);
        logger.log(level, message.clone(), None);

        let last = backend.entries().pop().unwrap();
        assert_eq!(last.level(), level);
        assert_eq!(last.message(), message);
        assert_eq!(last.attachment(), json!({ "meta": null }));
    }

    logger.log(Level::Info, "This is an info message", Some(json!({ "userId": 123 })));
    let last = backend.entries().pop().unwrap();
    assert_eq!(last.attachment(), json!({ "meta": { "userId": 123 } }));
}

#[test]
fn test_level_management() {
    let (logger, _backend) = common::memory_logger(Level::Silly);
    assert_eq!(logger.level(), Level::Silly);

    logger.set_level("debug").unwrap();
    assert_eq!(logger.level().to_string(), "debug");

    let err = logger.set_level("invalid").unwrap_err();
    assert_eq!(err.to_string(), "Invalid log level: invalid. Log level not changed.");
    assert_eq!(logger.level(), Level::Debug);
}

#[test]
fn test_warn_threshold_restrictions() {
    let (logger, backend) = common::memory_logger(Level::Silly);
    logger.set_level("warn").unwrap();

    for (level, should_log) in [(Level::Info, false), (Level::Warn, true), (Level::Error, true)] {
        backend.clear();
        logger.log(level, format!("This is an {} message", level), None);
        assert_eq!(backend.len(), usize::from(should_log), "{level}");
    }
}

#[tokio::test]
async fn test_async_logging() {
    let (logger, backend) = common::memory_logger(Level::Silly);

    logger.log_async(Level::Info, "This is an async info message.", None).await.unwrap();
    assert_eq!(backend.messages(), vec!["This is an async info message."]);

    logger.set_level("warn").unwrap();
    backend.clear();
    logger.log_async(Level::Info, "gated", None).await.unwrap();
    assert!(backend.is_empty());

    logger.log_async(Level::Warn, "at threshold", None).await.unwrap();
    logger.log_async(Level::Error, "below threshold", None).await.unwrap();
    assert_eq!(backend.messages(), vec!["at threshold", "below threshold"]);
}

#[tokio::test]
async fn test_async_rejects_but_sync_swallows() {
    let (logger, backend) = common::memory_logger(Level::Silly);
    backend.fail_with("Logging error");

    // Sync path returns normally
    logger.log(Level::Error, "This is an error message", None);

    let err = logger
        .log_async(Level::Error, "This is an async error message.", None)
        .await
        .unwrap_err();
    assert!(matches!(err, LoggerError::BackendWriteFailure(_)));
    assert!(err.to_string().contains("Logging error"));

    // Gated-out async calls never touch the failing backend
    logger.set_level("warn").unwrap();
    logger.log_async(Level::Info, "gated", None).await.unwrap();
}

#[test]
fn test_multiple_log_calls() {
    let (logger, backend) = common::memory_logger(Level::Silly);
    for i in 0..10 {
        logger.log(Level::Info, format!("Log message {}", i), Some(json!({ "i": i })));
    }

    let entries = backend.entries();
    assert_eq!(entries.len(), 10);
    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry.message(), format!("Log message {}", i));
        assert_eq!(entry.attachment(), json!({ "meta": { "i": i } }));
    }
}

#[test]
fn test_custom_format_management() {
    let (logger, backend) = common::memory_logger(Level::Silly);
    let format = json!({
        "service": "test-service",
        "userId": "test-user",
        "requestId": "test-request-id",
        "ipAddress": "192.168.1.1",
        "responseTime": "100ms",
    });

    logger.set_custom_format(format.clone()).unwrap();
    logger.log(Level::Info, "Test log message", Some(format.clone()));
    logger.log(Level::Info, "Test log message", Some(format.clone()));

    let entry = &backend.entries()[0];
    assert_eq!(entry.message(), "Test log message");
    assert_eq!(entry.attachment(), json!({ "meta": format }));

    let line: Value = serde_json::from_str(&entry.line).unwrap();
    assert_eq!(line["responseTime"], "100ms");
    assert!(line.get("metadata").is_none());
}

#[test]
fn test_empty_and_partial_custom_format() {
    let (logger, backend) = common::memory_logger(Level::Silly);

    assert!(matches!(logger.set_custom_format(Value::Null), Err(LoggerError::InvalidFormat(_))));

    logger.set_custom_format(json!({})).unwrap();
    logger.log(Level::Info, "Test log message with empty format", Some(json!({ "userId": "u1" })));
    let line: Value = serde_json::from_str(&backend.entries()[0].line).unwrap();
    assert_eq!(line["userId"], "u1");
    assert_eq!(line["service"], SENTINEL);

    logger.set_custom_format(json!({ "service": "another-service" })).unwrap();
    logger.log(
        Level::Info,
        "Test log message with another format",
        Some(json!({ "service": "ignored" })),
    );
    let last = backend.entries().pop().unwrap();
    assert_eq!(last.attachment()["meta"]["service"], "another-service");
}

#[test]
fn test_context_logging() {
    let (logger, backend) = common::memory_logger(Level::Info);
    logger.log_with_context(
        Level::Warn,
        "retrying",
        json!({ "attempt": 2, "credentials": { "password": "x" } }),
        Some(json!({ "requestId": "r-1" })),
    );

    let entry = &backend.entries()[0];
    assert_eq!(
        entry.attachment(),
        json!({ "meta": { "requestId": "r-1" }, "context": { "attempt": 2, "credentials": {} } })
    );
    let line: Value = serde_json::from_str(&entry.line).unwrap();
    assert_eq!(line["requestId"], "r-1");
    assert_eq!(line["metadata"]["context"]["attempt"], 2);
}

#[test]
fn test_independent_loggers() {
    let (quiet, quiet_backend) = common::memory_logger(Level::Error);
    let (chatty, chatty_backend) = common::memory_logger(Level::Silly);
    chatty.set_custom_format(json!({ "service": "chatty" })).unwrap();

    quiet.log(Level::Debug, "hidden", None);
    chatty.log(Level::Debug, "shown", None);

    assert!(quiet_backend.is_empty());
    assert!(quiet.custom_format().is_none());
    assert_eq!(chatty_backend.messages(), vec!["shown"]);
}
