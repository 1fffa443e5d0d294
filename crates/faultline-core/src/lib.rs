//! # Faultline Core
//!
//! Core types, traits, and errors shared by every Faultline crate.
//!
//! Faultline captures error/warn/info/debug events from an application,
//! enriches them with request and user context, and persists them through a
//! pluggable storage backend. This crate holds the pieces every other crate
//! agrees on.
//!
//! ## Key Traits
//!
//! - [`LogAdapter`]: Storage contract (`create`, `find_many`, `find_by_id`,
//!   `delete`, `delete_many`) implemented once per backend
//! - [`AuthAdapter`]: Resolves the current user, never fails
//!
//! ## Key Types
//!
//! - [`LogEntry`] / [`NewLogEntry`]: A persisted record and its insert shape
//! - [`QueryOptions`]: Filter, sort and pagination options for `find_many`
//! - [`DeleteFilter`]: Conjunctive filter for `delete_many`
//! - [`LogStats`]: Aggregate counts served to the dashboard

pub mod adapter;
pub mod auth;
pub mod entry;
pub mod error;
pub mod level;
pub mod query;
pub mod stats;

pub use adapter::LogAdapter;
pub use auth::{AuthAdapter, AuthUser};
pub use entry::{LogEntry, NewLogEntry, generate_entry_id, timestamp_now};
pub use error::AdapterError;
pub use level::{LogLevel, ParseLevelError};
pub use query::{
    DEFAULT_PAGE_LIMIT, DeleteFilter, LogPage, MAX_PAGE_LIMIT, OrderBy, QueryOptions, SortOrder,
};
pub use stats::{LevelCounts, LogStats};
