//! # Faultline
//!
//! Error logging for web applications: capture error/warn/info/debug events,
//! enrich them with request and user context, and persist them through a
//! pluggable storage backend.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use faultline::{ErrorLogger, LogContext, LoggerConfig, ErrorDetails};
//! use faultline_storage::InMemoryLogAdapter;
//!
//! let logger = Arc::new(ErrorLogger::with_config(LoggerConfig::new(Arc::new(
//!     InMemoryLogAdapter::new(),
//! ))));
//!
//! if let Err(e) = charge_card().await {
//!     logger
//!         .error("Payment failed", Some(ErrorDetails::from(&e)), LogContext::new())
//!         .await?;
//! }
//! ```
//!
//! Logging never fails the caller once the logger is initialized: storage
//! errors come back as [`LogOutcome::Failed`] and auth errors leave the
//! entry anonymous.

pub mod config;
pub mod context;
pub mod details;
pub mod logger;

pub use config::{DEFAULT_RETENTION_DAYS, ENVIRONMENT_VAR, Environment, LoggerConfig, LoggerOptions};
pub use context::{LogContext, RequestContext, client_ip};
pub use details::ErrorDetails;
pub use logger::{CONSOLE_TARGET, ErrorLogger, LogOutcome, LoggerError};

// Re-export the core model so applications need a single dependency
pub use faultline_core::{
    AdapterError, AuthAdapter, AuthUser, DeleteFilter, LogAdapter, LogEntry, LogLevel, LogPage,
    LogStats, NewLogEntry, QueryOptions,
};
