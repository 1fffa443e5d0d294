//! The storage contract every backend implements

use std::sync::Arc;

use async_trait::async_trait;

use crate::entry::{LogEntry, NewLogEntry};
use crate::error::AdapterError;
use crate::query::{DeleteFilter, LogPage, QueryOptions};

/// Storage backend for log entries
///
/// Implementations translate the generic options into backend-specific
/// queries. The trait is object-safe; the facade and HTTP layer hold an
/// `Arc<dyn LogAdapter>` chosen at composition time.
#[async_trait]
pub trait LogAdapter: Send + Sync {
    /// Insert one entry
    ///
    /// Assigns `id` and `created_at` and returns the row exactly as
    /// persisted.
    async fn create(&self, entry: NewLogEntry) -> Result<LogEntry, AdapterError>;

    /// Find entries matching `options`
    ///
    /// `total` counts every matching row regardless of `page`/`limit`.
    /// With `limit == 0` no rows are returned.
    async fn find_many(&self, options: &QueryOptions) -> Result<LogPage, AdapterError>;

    /// Look up a single entry; unknown ids yield `Ok(None)`
    async fn find_by_id(&self, id: &str) -> Result<Option<LogEntry>, AdapterError>;

    /// Hard-delete one entry; unknown ids are not an error
    async fn delete(&self, id: &str) -> Result<(), AdapterError>;

    /// Delete every entry matching `filter`, returning the number removed
    ///
    /// An empty filter must delete nothing and return `0`.
    async fn delete_many(&self, filter: &DeleteFilter) -> Result<u64, AdapterError>;
}

#[async_trait]
impl<T: LogAdapter + ?Sized> LogAdapter for Arc<T> {
    async fn create(&self, entry: NewLogEntry) -> Result<LogEntry, AdapterError> {
        (**self).create(entry).await
    }

    async fn find_many(&self, options: &QueryOptions) -> Result<LogPage, AdapterError> {
        (**self).find_many(options).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<LogEntry>, AdapterError> {
        (**self).find_by_id(id).await
    }

    async fn delete(&self, id: &str) -> Result<(), AdapterError> {
        (**self).delete(id).await
    }

    async fn delete_many(&self, filter: &DeleteFilter) -> Result<u64, AdapterError> {
        (**self).delete_many(filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test that the LogAdapter trait is object-safe
    fn _assert_object_safe(_: &dyn LogAdapter) {}
}
