//! # Faultline Server
//!
//! JSON HTTP API over any [`LogAdapter`](faultline_core::LogAdapter):
//!
//! - `GET {base}` list with filters and pagination
//! - `POST {base}` ingest one entry
//! - `DELETE {base}` delete by `{before?, level?}`
//! - `GET {base}/stats` per-level counts
//! - `GET|DELETE {base}/{id}` single entry
//!
//! Every route first runs an [`Authorize`] check; a rejected request gets
//! `401` before any input is read. Storage failures become a generic `500`
//! with the detail logged server-side.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use faultline_server::{ApiState, BearerToken, api_router};
//! use faultline_storage::InMemoryLogAdapter;
//!
//! let state = ApiState::new(Arc::new(InMemoryLogAdapter::new()), BearerToken::new("s3cret"));
//! let app = api_router(state, "/api/logs");
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod params;
pub mod router;
pub mod server;
pub mod storage;

pub use auth::{AllowAll, Authorize, BearerToken};
pub use config::{
    CliArgs, ConfigError, HttpSettings, ServerSettings, StorageBackend, StorageSettings,
};
pub use error::ApiError;
pub use handlers::ApiState;
pub use params::{DeleteBody, ListParams, parse_date};
pub use router::{api_router, logs_router, normalize_base_path};
pub use server::LogServer;
pub use storage::open_adapter;
