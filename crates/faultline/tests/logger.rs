//! End-to-end behaviour of the logger facade against real adapters

use std::sync::Arc;

use async_trait::async_trait;
use faultline::{
    AdapterError, AuthUser, DeleteFilter, Environment, ErrorDetails, ErrorLogger, LogAdapter,
    LogContext, LogEntry, LogLevel, LogOutcome, LogPage, LoggerConfig, NewLogEntry, QueryOptions,
};
use faultline_auth::{BoxError, Session, SessionAuthAdapter, SessionUser};
use faultline_storage::InMemoryLogAdapter;
use http::Request;

/// Adapter whose every call fails
struct BrokenAdapter;

#[async_trait]
impl LogAdapter for BrokenAdapter {
    async fn create(&self, _entry: NewLogEntry) -> Result<LogEntry, AdapterError> {
        Err(AdapterError::database("connection refused"))
    }

    async fn find_many(&self, _options: &QueryOptions) -> Result<LogPage, AdapterError> {
        Err(AdapterError::database("connection refused"))
    }

    async fn find_by_id(&self, _id: &str) -> Result<Option<LogEntry>, AdapterError> {
        Err(AdapterError::database("connection refused"))
    }

    async fn delete(&self, _id: &str) -> Result<(), AdapterError> {
        Err(AdapterError::database("connection refused"))
    }

    async fn delete_many(&self, _filter: &DeleteFilter) -> Result<u64, AdapterError> {
        Err(AdapterError::database("connection refused"))
    }
}

fn logger_with(store: Arc<InMemoryLogAdapter>) -> (ErrorLogger, Arc<InMemoryLogAdapter>) {
    let config = LoggerConfig::new(store.clone()).with_environment(Environment::Test);
    (ErrorLogger::with_config(config), store)
}

fn signed_in_session() -> Arc<SessionAuthAdapter> {
    Arc::new(SessionAuthAdapter::new(|| async {
        Ok(Some(Session::for_user(SessionUser {
            id: Some("u1".to_string()),
            email: Some("ada@example.com".to_string()),
            name: Some("Ada".to_string()),
        })))
    }))
}

#[tokio::test]
async fn test_levels_outside_allow_list_are_skipped() {
    let store = Arc::new(InMemoryLogAdapter::new());
    let logger = ErrorLogger::with_config(
        LoggerConfig::new(store.clone()).with_levels([LogLevel::Error, LogLevel::Warn]),
    );

    let info = logger.info("noise", LogContext::new()).await.unwrap();
    let debug = logger.debug("noise", LogContext::new()).await.unwrap();
    assert_eq!(info, LogOutcome::Skipped);
    assert!(debug.is_success());
    assert!(store.is_empty());

    let outcome = logger.warn("disk 90%", None, LogContext::new()).await.unwrap();
    assert!(outcome.entry().is_some());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_failing_auth_adapter_still_records_anonymously() {
    let (logger, store) = logger_with(Arc::new(InMemoryLogAdapter::new()));
    let auth = SessionAuthAdapter::new(|| async {
        Err::<Option<Session>, BoxError>("session backend timed out".into())
    });
    logger.init(
        LoggerConfig::new(store.clone())
            .with_environment(Environment::Test)
            .with_auth_adapter(Arc::new(auth)),
    );

    let outcome = logger
        .error("checkout failed", None, LogContext::new())
        .await
        .unwrap();

    let entry = outcome.entry().unwrap();
    assert!(entry.user_id.is_none());
    assert!(entry.user_email.is_none());
    assert!(entry.user_name.is_none());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_auth_adapter_user_is_attached() {
    let store = Arc::new(InMemoryLogAdapter::new());
    let logger = ErrorLogger::with_config(
        LoggerConfig::new(store).with_auth_adapter(signed_in_session()),
    );

    let outcome = logger.info("signed in", LogContext::new()).await.unwrap();
    let entry = outcome.entry().unwrap();
    assert_eq!(entry.user_id.as_deref(), Some("u1"));
    assert_eq!(entry.user_email.as_deref(), Some("ada@example.com"));
    assert_eq!(entry.user_name.as_deref(), Some("Ada"));
}

#[tokio::test]
async fn test_explicit_user_bypasses_auth_adapter() {
    let store = Arc::new(InMemoryLogAdapter::new());
    let logger = ErrorLogger::with_config(
        LoggerConfig::new(store).with_auth_adapter(signed_in_session()),
    );

    let outcome = logger
        .log_with_user(
            LogLevel::Warn,
            "job retried",
            None,
            AuthUser::new("worker-7"),
            LogContext::new(),
        )
        .await
        .unwrap();
    let entry = outcome.entry().unwrap();
    assert_eq!(entry.user_id.as_deref(), Some("worker-7"));
    assert!(entry.user_email.is_none());
}

#[tokio::test]
async fn test_storage_failure_is_reported_not_raised() {
    let logger = ErrorLogger::with_config(LoggerConfig::new(Arc::new(BrokenAdapter)));

    let outcome = logger
        .error("boom", None, LogContext::new())
        .await
        .unwrap();
    match outcome {
        LogOutcome::Failed { error } => assert!(error.contains("connection refused")),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_request_context_is_extracted() {
    let (logger, _store) = logger_with(Arc::new(InMemoryLogAdapter::new()));
    let request = Request::builder()
        .method("DELETE")
        .uri("/api/carts/42")
        .header("user-agent", "Mozilla/5.0")
        .header("x-forwarded-for", "1.2.3.4, 5.6.7.8")
        .body(())
        .unwrap();

    let outcome = logger
        .log_request(LogLevel::Error, "cart delete failed", None, &request)
        .await
        .unwrap();
    let entry = outcome.entry().unwrap();
    assert_eq!(entry.ip.as_deref(), Some("1.2.3.4"));
    assert_eq!(entry.path.as_deref(), Some("/api/carts/42"));
    assert_eq!(entry.method.as_deref(), Some("DELETE"));
    assert_eq!(entry.user_agent.as_deref(), Some("Mozilla/5.0"));
}

#[tokio::test]
async fn test_stack_comes_from_error_details() {
    let (logger, store) = logger_with(Arc::new(InMemoryLogAdapter::new()));

    let io_error = std::io::Error::other("socket closed");
    let outcome = logger
        .error(
            "upstream call failed",
            Some(ErrorDetails::from(&io_error)),
            LogContext::new(),
        )
        .await
        .unwrap();
    let entry = outcome.entry().unwrap();
    assert_eq!(entry.message, "upstream call failed");
    assert!(entry.stack.as_deref().unwrap().starts_with("socket closed"));

    let plain = logger.info("no error", LogContext::new()).await.unwrap();
    assert!(plain.entry().unwrap().stack.is_none());
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_capture_uses_error_text() {
    let (logger, _store) = logger_with(Arc::new(InMemoryLogAdapter::new()));
    let err = std::io::Error::other("quota exceeded");

    let outcome = logger.capture(&err, LogContext::new()).await.unwrap();
    let entry = outcome.entry().unwrap();
    assert_eq!(entry.level, LogLevel::Error);
    assert_eq!(entry.message, "quota exceeded");
}
