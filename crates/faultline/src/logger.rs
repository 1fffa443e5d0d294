//! The logger facade
//!
//! An [`ErrorLogger`] is constructed by the application and shared (usually
//! as `Arc<ErrorLogger>`) with handlers and background tasks. Until a
//! configuration is installed every call fails with
//! [`LoggerError::NotInitialized`]; afterwards calls never fail; storage
//! errors are reported as [`LogOutcome::Failed`].

use std::future::Future;
use std::sync::Arc;

use faultline_core::{AuthUser, LogEntry, LogLevel, NewLogEntry};
use http::Request;
use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, error};

use crate::config::LoggerConfig;
use crate::context::{LogContext, RequestContext};
use crate::details::ErrorDetails;

/// Target of the development console mirror
pub const CONSOLE_TARGET: &str = "faultline::console";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoggerError {
    #[error("ErrorLogger is not initialized; call init() with a LoggerConfig first")]
    NotInitialized,
}

/// Result of a log call on an initialized logger
#[derive(Debug, Clone, PartialEq)]
pub enum LogOutcome {
    /// The entry was stored
    Recorded(LogEntry),
    /// The level is not in the allow-list; nothing was written
    Skipped,
    /// Storage failed; the entry was not written
    Failed { error: String },
}

impl LogOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, LogOutcome::Failed { .. })
    }

    pub fn entry(&self) -> Option<&LogEntry> {
        match self {
            LogOutcome::Recorded(entry) => Some(entry),
            _ => None,
        }
    }
}

/// Error logging facade
#[derive(Debug, Default)]
pub struct ErrorLogger {
    config: RwLock<Option<Arc<LoggerConfig>>>,
}

impl ErrorLogger {
    /// An uninitialized logger
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LoggerConfig) -> Self {
        Self {
            config: RwLock::new(Some(Arc::new(config))),
        }
    }

    /// Install `config`, replacing any previous one
    pub fn init(&self, config: LoggerConfig) {
        let replaced = self.config.write().replace(Arc::new(config)).is_some();
        debug!(replaced, "ErrorLogger configured");
    }

    pub fn is_initialized(&self) -> bool {
        self.config.read().is_some()
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> Result<Arc<LoggerConfig>, LoggerError> {
        self.config.read().clone().ok_or(LoggerError::NotInitialized)
    }

    /// Record one entry
    ///
    /// `error` supplies the stack; the message is always the caller's.
    pub async fn log(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        error: Option<ErrorDetails>,
        context: LogContext,
    ) -> Result<LogOutcome, LoggerError> {
        let config = self.config()?;
        let message = message.into();

        if !config.allows(level) {
            return Ok(LogOutcome::Skipped);
        }

        if config.mirrors_to_console() {
            mirror_to_console(level, &message, error.as_ref(), &context);
        }

        let user = if context.has_user() {
            None
        } else {
            match &config.auth_adapter {
                Some(auth) => auth.get_user().await,
                None => None,
            }
        };

        let entry = build_entry(level, message, error, context, user);
        match config.adapter.create(entry).await {
            Ok(entry) => Ok(LogOutcome::Recorded(entry)),
            Err(e) => {
                error!(error = %e, level = %level, "Failed to store log entry");
                Ok(LogOutcome::Failed {
                    error: e.to_string(),
                })
            }
        }
    }

    pub async fn error(
        &self,
        message: impl Into<String>,
        error: Option<ErrorDetails>,
        context: LogContext,
    ) -> Result<LogOutcome, LoggerError> {
        self.log(LogLevel::Error, message, error, context).await
    }

    pub async fn warn(
        &self,
        message: impl Into<String>,
        error: Option<ErrorDetails>,
        context: LogContext,
    ) -> Result<LogOutcome, LoggerError> {
        self.log(LogLevel::Warn, message, error, context).await
    }

    pub async fn info(
        &self,
        message: impl Into<String>,
        context: LogContext,
    ) -> Result<LogOutcome, LoggerError> {
        self.log(LogLevel::Info, message, None, context).await
    }

    pub async fn debug(
        &self,
        message: impl Into<String>,
        context: LogContext,
    ) -> Result<LogOutcome, LoggerError> {
        self.log(LogLevel::Debug, message, None, context).await
    }

    /// Record an error value at error level, its display text as message
    pub async fn capture(
        &self,
        error: &(dyn std::error::Error + 'static),
        context: LogContext,
    ) -> Result<LogOutcome, LoggerError> {
        let details = ErrorDetails::from_error(error);
        let message = details.message.clone();
        self.log(LogLevel::Error, message, Some(details), context)
            .await
    }

    /// Record an entry with path, method, user agent and client ip taken
    /// from `request`
    ///
    /// Only the request head is read, before the returned future is created,
    /// so the body type needs no bounds.
    pub fn log_request<B>(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        error: Option<ErrorDetails>,
        request: &Request<B>,
    ) -> impl Future<Output = Result<LogOutcome, LoggerError>> + Send {
        let context = LogContext::from(RequestContext::from_request(request));
        self.log(level, message.into(), error, context)
    }

    /// Record an entry for an explicit user; the auth adapter is bypassed
    pub async fn log_with_user(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        error: Option<ErrorDetails>,
        user: AuthUser,
        context: LogContext,
    ) -> Result<LogOutcome, LoggerError> {
        self.log(level, message, error, context.with_user(user))
            .await
    }
}

fn build_entry(
    level: LogLevel,
    message: String,
    error: Option<ErrorDetails>,
    context: LogContext,
    auth_user: Option<AuthUser>,
) -> NewLogEntry {
    let (user_id, user_email, user_name) = match auth_user {
        Some(user) => (Some(user.id), user.email, user.name),
        None => (context.user_id, context.user_email, context.user_name),
    };

    NewLogEntry {
        level,
        message,
        stack: error.and_then(|details| details.stack),
        user_id,
        user_email,
        user_name,
        path: context.path,
        method: context.method,
        user_agent: context.user_agent,
        ip: context.ip,
        metadata: context.metadata,
    }
}

fn mirror_to_console(
    level: LogLevel,
    message: &str,
    error: Option<&ErrorDetails>,
    context: &LogContext,
) {
    let stack = error.and_then(|details| details.stack.as_deref());
    let path = context.path.as_deref();
    let user_id = context.user_id.as_deref();
    match level {
        LogLevel::Error => {
            tracing::error!(target: CONSOLE_TARGET, path, user_id, stack, "{message}")
        }
        LogLevel::Warn => {
            tracing::warn!(target: CONSOLE_TARGET, path, user_id, stack, "{message}")
        }
        LogLevel::Info => {
            tracing::info!(target: CONSOLE_TARGET, path, user_id, stack, "{message}")
        }
        LogLevel::Debug => {
            tracing::debug!(target: CONSOLE_TARGET, path, user_id, stack, "{message}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faultline_storage::InMemoryLogAdapter;

    #[tokio::test]
    async fn test_uninitialized_rejects_calls() {
        let logger = ErrorLogger::new();
        assert!(!logger.is_initialized());

        let result = logger.info("hello", LogContext::new()).await;
        assert_eq!(result, Err(LoggerError::NotInitialized));
    }

    #[tokio::test]
    async fn test_reinit_replaces_config() {
        let first = Arc::new(InMemoryLogAdapter::new());
        let second = Arc::new(InMemoryLogAdapter::new());

        let logger = ErrorLogger::with_config(LoggerConfig::new(first.clone()));
        logger.info("one", LogContext::new()).await.unwrap();

        logger.init(LoggerConfig::new(second.clone()));
        logger.info("two", LogContext::new()).await.unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_context_user_wins_over_auth_user() {
        let context = LogContext::new().with_user(AuthUser::new("explicit"));
        let entry = build_entry(LogLevel::Info, "m".into(), None, context, None);
        assert_eq!(entry.user_id.as_deref(), Some("explicit"));

        let entry = build_entry(
            LogLevel::Info,
            "m".into(),
            None,
            LogContext::new(),
            Some(AuthUser::new("session").with_email("s@example.com")),
        );
        assert_eq!(entry.user_id.as_deref(), Some("session"));
        assert_eq!(entry.user_email.as_deref(), Some("s@example.com"));
    }

    #[test]
    fn test_outcome_success() {
        assert!(LogOutcome::Skipped.is_success());
        assert!(
            !LogOutcome::Failed {
                error: "x".to_string()
            }
            .is_success()
        );
    }
}
