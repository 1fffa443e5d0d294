//! HTTP route handlers for the logs API
//!
//! Authorization is enforced by the router's middleware before any of these
//! run, so handlers only deal with input parsing and storage calls.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use faultline_core::{
    AdapterError, LevelCounts, LogAdapter, LogEntry, LogLevel, LogPage, LogStats, NewLogEntry,
    QueryOptions,
};
use serde::Serialize;

use crate::auth::Authorize;
use crate::error::ApiError;
use crate::params::{DeleteBody, ListParams};

/// Shared application state
#[derive(Clone)]
pub struct ApiState {
    pub adapter: Arc<dyn LogAdapter>,
    pub authorize: Arc<dyn Authorize>,
}

impl ApiState {
    pub fn new(adapter: Arc<dyn LogAdapter>, authorize: impl Authorize) -> Self {
        Self {
            adapter,
            authorize: Arc::new(authorize),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: u64,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Handle GET {base}
pub async fn list_logs(
    State(state): State<ApiState>,
    Query(params): Query<ListParams>,
) -> Result<Json<LogPage>, ApiError> {
    let options = params.into_options();
    let page = state.adapter.find_many(&options).await?;
    Ok(Json(page))
}

/// Handle DELETE {base}
///
/// A missing or malformed body deletes nothing.
pub async fn delete_logs(
    State(state): State<ApiState>,
    body: Bytes,
) -> Result<Json<DeletedResponse>, ApiError> {
    let filter = DeleteBody::from_bytes(&body).into_filter();
    let deleted = state.adapter.delete_many(&filter).await?;
    if deleted > 0 {
        tracing::info!(
            deleted,
            before = ?filter.before,
            level = ?filter.level,
            "Deleted log entries"
        );
    }
    Ok(Json(DeletedResponse { deleted }))
}

/// Handle POST {base}
pub async fn ingest_log(
    State(state): State<ApiState>,
    body: Bytes,
) -> Result<(StatusCode, Json<LogEntry>), ApiError> {
    let entry: NewLogEntry = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid log entry: {e}")))?;
    if entry.message.trim().is_empty() {
        return Err(ApiError::BadRequest("Log entry message is empty".to_string()));
    }
    let created = state.adapter.create(entry).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Handle GET {base}/{id}
pub async fn get_log(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<LogEntry>, ApiError> {
    match state.adapter.find_by_id(&id).await? {
        Some(entry) => Ok(Json(entry)),
        None => Err(ApiError::NotFound("Log not found".to_string())),
    }
}

/// Handle DELETE {base}/{id}
pub async fn delete_log(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if state.adapter.find_by_id(&id).await?.is_none() {
        return Err(ApiError::NotFound("Log not found".to_string()));
    }
    state.adapter.delete(&id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// Handle GET {base}/stats
pub async fn log_stats(State(state): State<ApiState>) -> Result<Json<LogStats>, ApiError> {
    let adapter = state.adapter.as_ref();
    let since = Utc::now() - Duration::hours(24);

    let (total, error, warn, info, debug, last_24_hours) = tokio::try_join!(
        count(adapter, QueryOptions::new()),
        count(adapter, QueryOptions::new().with_level(LogLevel::Error)),
        count(adapter, QueryOptions::new().with_level(LogLevel::Warn)),
        count(adapter, QueryOptions::new().with_level(LogLevel::Info)),
        count(adapter, QueryOptions::new().with_level(LogLevel::Debug)),
        count(adapter, QueryOptions::new().with_date_range(Some(since), None)),
    )?;

    Ok(Json(LogStats {
        total,
        by_level: LevelCounts {
            error,
            warn,
            info,
            debug,
        },
        last_24_hours,
    }))
}

async fn count(adapter: &dyn LogAdapter, options: QueryOptions) -> Result<u64, AdapterError> {
    let page = adapter.find_many(&options.count_of()).await?;
    Ok(page.total)
}
