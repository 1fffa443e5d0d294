//! Errors raised while installing the subscriber

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggingError {
    /// A global subscriber was already installed
    #[error("Global subscriber already set: {0}")]
    AlreadyInitialized(String),

    /// Neither `RUST_LOG` nor the configured directives parsed
    #[error("Invalid filter directives {directives:?}: {reason}")]
    InvalidFilter { directives: String, reason: String },

    /// The rolling file appender could not be created
    #[error("Failed to create log file appender: {0}")]
    FileAppender(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
