//! Structured storage using redb
//!
//! A single-file embedded database for deployments without a SQL server.
//! Unlike the in-memory adapter, entries survive restarts.

mod log_store;
mod tables;

pub use log_store::{RedbLogAdapter, StoredRecord};
pub use tables::{ERROR_LOGS, RedbStorage, RedbStorageConfig};
