//! HTTP client for the Faultline logs API

use std::time::Duration;

use faultline_core::{DeleteFilter, LogEntry, LogPage, LogStats, OrderBy, QueryOptions, SortOrder};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

/// Errors talking to the logs API
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("not authorized to read logs")]
    Unauthorized,

    #[error("log not found")]
    NotFound,

    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct DeletedBody {
    deleted: u64,
}

/// Client for one logs API mount point, e.g. `http://localhost:8080/api/logs`
#[derive(Debug, Clone)]
pub struct LogsClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl PartialEq for LogsClient {
    fn eq(&self, other: &Self) -> bool {
        self.base_url == other.base_url && self.token == other.token
    }
}

impl LogsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Send `Authorization: Bearer <token>` with every request
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list(&self, options: &QueryOptions) -> Result<LogPage, ClientError> {
        let request = self.http.get(&self.base_url).query(&query_pairs(options));
        self.send_json(request).await
    }

    pub async fn get(&self, id: &str) -> Result<LogEntry, ClientError> {
        let request = self.http.get(self.entry_url(id));
        self.send_json(request).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let request = self.http.delete(self.entry_url(id));
        self.send(request).await?;
        Ok(())
    }

    /// Delete every entry matching `filter`; returns the number removed
    pub async fn delete_many(&self, filter: &DeleteFilter) -> Result<u64, ClientError> {
        let mut body = serde_json::Map::new();
        if let Some(before) = filter.before {
            body.insert("before".to_string(), json!(before.to_rfc3339()));
        }
        if let Some(level) = filter.level {
            body.insert("level".to_string(), json!(level.as_str()));
        }
        let request = self.http.delete(&self.base_url).json(&body);
        let deleted: DeletedBody = self.send_json(request).await?;
        Ok(deleted.deleted)
    }

    pub async fn stats(&self) -> Result<LogStats, ClientError> {
        let request = self.http.get(format!("{}/stats", self.base_url));
        self.send_json(request).await
    }

    fn entry_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(id))
    }

    async fn send(&self, mut request: RequestBuilder) -> Result<Response, ClientError> {
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "Logs API response");

        match status {
            s if s.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound),
            s => {
                let message = match response.json::<ErrorBody>().await {
                    Ok(body) => body.error,
                    Err(_) => s.canonical_reason().unwrap_or("unknown error").to_string(),
                };
                Err(ClientError::Status {
                    status: s.as_u16(),
                    message,
                })
            }
        }
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }
}

/// Query string for a list request; only non-default values are sent
pub fn query_pairs(options: &QueryOptions) -> Vec<(&'static str, String)> {
    let mut pairs = vec![
        ("page", options.page.to_string()),
        ("limit", options.limit.to_string()),
    ];
    if let Some(level) = options.level {
        pairs.push(("level", level.as_str().to_string()));
    }
    if let Some(user_id) = &options.user_id {
        pairs.push(("userId", user_id.clone()));
    }
    if let Some(search) = &options.search {
        pairs.push(("search", search.clone()));
    }
    if let Some(start) = options.start_date {
        pairs.push(("startDate", start.to_rfc3339()));
    }
    if let Some(end) = options.end_date {
        pairs.push(("endDate", end.to_rfc3339()));
    }
    if options.order_by == OrderBy::Level {
        pairs.push(("orderBy", "level".to_string()));
    }
    if options.order == SortOrder::Asc {
        pairs.push(("order", "asc".to_string()));
    }
    pairs
}
