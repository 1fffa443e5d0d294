//! In-memory storage implementation
//!
//! Suitable for tests, demos, and processes that do not need entries to
//! survive a restart.

use async_trait::async_trait;
use dashmap::DashMap;
use faultline_core::{
    AdapterError, DeleteFilter, LogAdapter, LogEntry, LogPage, NewLogEntry, QueryOptions,
    generate_entry_id, timestamp_now,
};
use tracing::{debug, trace};

/// In-memory implementation of [`LogAdapter`]
///
/// Uses `DashMap` keyed by entry id for concurrent access. Queries scan every
/// entry and apply the shared filter and ordering rules from
/// [`QueryOptions`].
#[derive(Debug, Default)]
pub struct InMemoryLogAdapter {
    entries: DashMap<String, LogEntry>,
}

impl InMemoryLogAdapter {
    /// Create an empty adapter
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a fully formed entry, keeping its id and timestamp
    ///
    /// Useful for seeding fixtures with controlled timestamps.
    pub fn insert(&self, entry: LogEntry) {
        self.entries.insert(entry.id.clone(), entry);
    }

    fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.iter().map(|e| e.value().clone()).collect()
    }
}

#[async_trait]
impl LogAdapter for InMemoryLogAdapter {
    async fn create(&self, entry: NewLogEntry) -> Result<LogEntry, AdapterError> {
        let entry = entry.into_entry(generate_entry_id(), timestamp_now());
        trace!(id = %entry.id, level = %entry.level, "Storing log entry in memory");
        self.entries.insert(entry.id.clone(), entry.clone());
        Ok(entry)
    }

    async fn find_many(&self, options: &QueryOptions) -> Result<LogPage, AdapterError> {
        Ok(options.apply(self.snapshot()))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<LogEntry>, AdapterError> {
        Ok(self.entries.get(id).map(|e| e.value().clone()))
    }

    async fn delete(&self, id: &str) -> Result<(), AdapterError> {
        self.entries.remove(id);
        Ok(())
    }

    async fn delete_many(&self, filter: &DeleteFilter) -> Result<u64, AdapterError> {
        if filter.is_empty() {
            return Ok(0);
        }

        let before = self.entries.len();
        self.entries.retain(|_, entry| !filter.matches(entry));
        let removed = (before - self.entries.len()) as u64;
        debug!(removed, "Deleted log entries from memory");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use faultline_core::LogLevel;

    #[tokio::test]
    async fn test_create_assigns_identity() {
        let adapter = InMemoryLogAdapter::new();
        let entry = adapter
            .create(NewLogEntry::new(LogLevel::Error, "boom"))
            .await
            .unwrap();

        assert!(!entry.id.is_empty());
        let found = adapter.find_by_id(&entry.id).await.unwrap().unwrap();
        assert_eq!(found, entry);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_ok() {
        let adapter = InMemoryLogAdapter::new();
        adapter.delete("missing").await.unwrap();
        assert!(adapter.find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_many_requires_a_filter() {
        let adapter = InMemoryLogAdapter::new();
        for _ in 0..3 {
            adapter
                .create(NewLogEntry::new(LogLevel::Info, "x"))
                .await
                .unwrap();
        }

        assert_eq!(adapter.delete_many(&DeleteFilter::default()).await.unwrap(), 0);
        assert_eq!(adapter.len(), 3);
    }

    #[tokio::test]
    async fn test_delete_many_is_conjunctive() {
        let adapter = InMemoryLogAdapter::new();
        let now = timestamp_now();
        let old = now - Duration::days(10);

        adapter.insert(NewLogEntry::new(LogLevel::Debug, "old debug").into_entry("a".into(), old));
        adapter.insert(NewLogEntry::new(LogLevel::Error, "old error").into_entry("b".into(), old));
        adapter.insert(NewLogEntry::new(LogLevel::Debug, "new debug").into_entry("c".into(), now));

        let filter = DeleteFilter::before(now - Duration::days(1)).with_level(LogLevel::Debug);
        assert_eq!(adapter.delete_many(&filter).await.unwrap(), 1);
        assert!(adapter.find_by_id("a").await.unwrap().is_none());
        assert!(adapter.find_by_id("b").await.unwrap().is_some());
        assert!(adapter.find_by_id("c").await.unwrap().is_some());
    }
}
