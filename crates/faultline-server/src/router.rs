//! Route table for the logs API

use axum::Router;
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;

use crate::error::ApiError;
use crate::handlers::{
    ApiState, delete_log, delete_logs, get_log, ingest_log, list_logs, log_stats,
};

/// Build the logs routes, relative to wherever the caller nests them
///
/// ```text
/// GET    /        list entries
/// POST   /        ingest one entry
/// DELETE /        delete by filter
/// GET    /stats   aggregate counts
/// GET    /{id}    single entry
/// DELETE /{id}    delete single entry
/// ```
pub fn logs_router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(list_logs).post(ingest_log).delete(delete_logs))
        .route("/stats", get(log_stats))
        .route("/{id}", get(get_log).delete(delete_log))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_authorized))
        .with_state(state)
}

/// Mount [`logs_router`] under `base_path` (e.g. `/api/logs`)
pub fn api_router(state: ApiState, base_path: &str) -> Router {
    let base = normalize_base_path(base_path);
    if base == "/" {
        logs_router(state)
    } else {
        Router::new().nest(&base, logs_router(state))
    }
}

/// Ensure a leading slash and no trailing slash
pub fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}")
    }
}

async fn require_authorized(
    State(state): State<ApiState>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();
    if !state.authorize.is_authorized(&parts) {
        tracing::debug!(
            method = %parts.method,
            path = %parts.uri.path(),
            "Rejected unauthorized request"
        );
        return ApiError::Unauthorized.into_response();
    }
    next.run(Request::from_parts(parts, body)).await
}
