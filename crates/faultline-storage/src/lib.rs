//! # Faultline Storage
//!
//! Storage backends implementing [`LogAdapter`].
//!
//! ## Backends
//!
//! - **InMemoryLogAdapter**: Concurrent in-memory map, for tests and
//!   short-lived processes
//! - **RedbLogAdapter**: Embedded redb database file, typed records encoded
//!   with postcard
//! - **SqlLogAdapter**: Raw SQL over any [`SqlExecutor`], generating
//!   dialect-correct placeholders for Postgres, MySQL and SQLite
//! - **SqliteExecutor**: sqlx-backed executor (feature `sqlite`, on by default)
//!
//! ## Example
//!
//! ```rust,ignore
//! use faultline_core::{LogAdapter, LogLevel, NewLogEntry, QueryOptions};
//! use faultline_storage::InMemoryLogAdapter;
//!
//! #[tokio::main]
//! async fn main() {
//!     let adapter = InMemoryLogAdapter::new();
//!
//!     let entry = adapter
//!         .create(NewLogEntry::new(LogLevel::Error, "payment failed"))
//!         .await
//!         .unwrap();
//!
//!     let page = adapter.find_many(&QueryOptions::new()).await.unwrap();
//!     assert_eq!(page.total, 1);
//!     assert_eq!(page.logs[0].id, entry.id);
//! }
//! ```

pub mod memory;
pub mod sql;
pub mod structured;

// Re-exports
pub use memory::InMemoryLogAdapter;
pub use sql::{
    DEFAULT_TABLE, Placeholders, SqlDialect, SqlExecutor, SqlLogAdapter, SqlRow, SqlValue,
    UnknownDialect,
};
#[cfg(feature = "sqlite")]
pub use sql::sqlite::SqliteExecutor;
pub use structured::{RedbLogAdapter, RedbStorage, RedbStorageConfig};

// Re-export the contract for convenience
pub use faultline_core::{AdapterError, LogAdapter};
