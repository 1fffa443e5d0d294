//! Error details captured alongside an entry

use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;

/// Message and rendered stack of an error
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorDetails {
    pub message: String,
    pub stack: Option<String>,
}

impl ErrorDetails {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: None,
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Render `error` and its source chain
    ///
    /// A backtrace is appended when `RUST_BACKTRACE` enables capture.
    pub fn from_error(error: &(dyn Error + 'static)) -> Self {
        let mut stack = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            stack.push_str("\nCaused by: ");
            stack.push_str(&cause.to_string());
            source = cause.source();
        }

        let backtrace = Backtrace::capture();
        if backtrace.status() == BacktraceStatus::Captured {
            stack.push_str("\n\nStack backtrace:\n");
            stack.push_str(&backtrace.to_string());
        }

        Self {
            message: error.to_string(),
            stack: Some(stack),
        }
    }
}

impl<E: Error + 'static> From<&E> for ErrorDetails {
    fn from(error: &E) -> Self {
        Self::from_error(error)
    }
}
