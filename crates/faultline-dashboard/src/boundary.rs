//! Error boundary that reports render errors to Faultline
//!
//! [`LogErrorBoundary`] wraps dioxus' `ErrorBoundary`: when a child
//! component returns an error, the fallback is shown with a reset button and
//! the error is handed to `on_error` once.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dioxus::prelude::*;
use faultline::{ErrorDetails, ErrorLogger, LogContext, LogOutcome, LoggerError};
use serde_json::json;

/// A captured render error
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryError {
    pub message: String,
    /// Debug rendering of the error, kept as the stack
    pub detail: Option<String>,
    /// Name of the boundary that caught it
    pub boundary: Option<String>,
    pub captured_at: DateTime<Utc>,
}

impl BoundaryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: None,
            boundary: None,
            captured_at: Utc::now(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        if detail != self.message {
            self.detail = Some(detail);
        }
        self
    }

    pub fn with_boundary(mut self, boundary: Option<String>) -> Self {
        self.boundary = boundary;
        self
    }

    fn same_error(&self, other: &BoundaryError) -> bool {
        self.message == other.message && self.boundary == other.boundary
    }
}

/// Two-state boundary: rendering normally, or showing the fallback
#[derive(Debug, Clone, Default, PartialEq)]
pub enum BoundaryState {
    #[default]
    Ok,
    Errored(BoundaryError),
}

impl BoundaryState {
    /// Record `error`; returns `true` if it differs from the error already held
    pub fn capture(&mut self, error: BoundaryError) -> bool {
        let is_new = match self {
            BoundaryState::Ok => true,
            BoundaryState::Errored(current) => !current.same_error(&error),
        };
        if is_new {
            *self = BoundaryState::Errored(error);
        }
        is_new
    }

    pub fn reset(&mut self) {
        *self = BoundaryState::Ok;
    }

    pub fn is_errored(&self) -> bool {
        matches!(self, BoundaryState::Errored(_))
    }

    pub fn error(&self) -> Option<&BoundaryError> {
        match self {
            BoundaryState::Ok => None,
            BoundaryState::Errored(error) => Some(error),
        }
    }
}

/// Wrap `children` so render errors show a fallback instead of blanking the window
///
/// `name` is shown in the fallback and recorded with the error.
#[component]
pub fn LogErrorBoundary(
    children: Element,
    name: Option<String>,
    on_error: Option<EventHandler<BoundaryError>>,
) -> Element {
    let state = use_signal(BoundaryState::default);

    rsx! {
        ErrorBoundary {
            handle_error: move |errors: ErrorContext| {
                let captured = errors
                    .error()
                    .map(|e| BoundaryError::new(e.to_string()).with_detail(format!("{e:?}")))
                    .unwrap_or_else(|| BoundaryError::new("Unknown error"))
                    .with_boundary(name.clone());
                let reset_errors = errors.clone();
                let mut reset_state = state;
                rsx! {
                    BoundaryFallback {
                        error: captured,
                        state,
                        on_error,
                        on_reset: move |_| {
                            reset_state.write().reset();
                            reset_errors.clear_errors();
                        },
                    }
                }
            },
            {children}
        }
    }
}

#[component]
fn BoundaryFallback(
    error: BoundaryError,
    state: Signal<BoundaryState>,
    on_error: Option<EventHandler<BoundaryError>>,
    on_reset: EventHandler<()>,
) -> Element {
    // Reruns whenever the error prop changes; capture drops repeats
    use_effect(use_reactive!(|(error,)| {
        let mut state = state;
        if state.write().capture(error.clone()) {
            tracing::warn!(
                error = %error.message,
                boundary = ?error.boundary,
                "Render error caught by boundary"
            );
            if let Some(handler) = on_error {
                handler.call(error);
            }
        }
    }));

    rsx! {
        div { class: "error-boundary",
            div { class: "error-boundary-title",
                match &error.boundary {
                    Some(name) => rsx! { "Something went wrong in {name}" },
                    None => rsx! { "Something went wrong" },
                }
            }
            pre { class: "error-boundary-message", "{error.message}" }
            button {
                class: "btn btn-primary",
                onclick: move |_| on_reset.call(()),
                "Try again"
            }
        }
    }
}

/// Build an `on_error` handler that records boundary errors through `logger`
///
/// ```rust,ignore
/// rsx! {
///     LogErrorBoundary { on_error: forward_to_logger(logger.clone()),
///         Checkout {}
///     }
/// }
/// ```
pub fn forward_to_logger(logger: Arc<ErrorLogger>) -> impl FnMut(BoundaryError) + 'static {
    move |error: BoundaryError| {
        let logger = logger.clone();
        spawn(async move {
            if let Err(e) = report_boundary_error(&logger, &error).await {
                tracing::warn!(error = %e, "Could not record boundary error");
            }
        });
    }
}

/// Record one boundary error at error level
pub async fn report_boundary_error(
    logger: &ErrorLogger,
    error: &BoundaryError,
) -> Result<LogOutcome, LoggerError> {
    let mut details = ErrorDetails::new(error.message.clone());
    if let Some(detail) = &error.detail {
        details = details.with_stack(detail.clone());
    }
    let context = LogContext::new().with_metadata(json!({
        "source": "error-boundary",
        "boundary": error.boundary,
        "capturedAt": error.captured_at.to_rfc3339(),
    }));
    logger.error(error.message.clone(), Some(details), context).await
}
