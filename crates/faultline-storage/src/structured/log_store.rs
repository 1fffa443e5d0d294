//! Log entry storage on redb
//!
//! Each entry is one row keyed by id. redb has no secondary indexes, so
//! queries scan the table and apply the shared [`QueryOptions`] semantics in
//! memory.

use async_trait::async_trait;
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use faultline_core::{
    AdapterError, DeleteFilter, LogAdapter, LogEntry, LogLevel, LogPage, NewLogEntry,
    QueryOptions, generate_entry_id, timestamp_now,
};

use super::tables::{RedbStorage, RedbStorageConfig};

/// On-disk form of a [`LogEntry`]
///
/// postcard is not self-describing, so metadata is kept as JSON text and the
/// timestamp as Unix microseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: String,
    pub level: LogLevel,
    pub message: String,
    pub stack: Option<String>,
    pub user_id: Option<String>,
    pub user_email: Option<String>,
    pub user_name: Option<String>,
    pub path: Option<String>,
    pub method: Option<String>,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
    pub metadata_json: Option<String>,
    pub created_at_micros: i64,
}

impl StoredRecord {
    pub fn from_entry(entry: &LogEntry) -> Result<Self, AdapterError> {
        let metadata_json = entry
            .metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| AdapterError::Serialization(e.to_string()))?;

        Ok(Self {
            id: entry.id.clone(),
            level: entry.level,
            message: entry.message.clone(),
            stack: entry.stack.clone(),
            user_id: entry.user_id.clone(),
            user_email: entry.user_email.clone(),
            user_name: entry.user_name.clone(),
            path: entry.path.clone(),
            method: entry.method.clone(),
            user_agent: entry.user_agent.clone(),
            ip: entry.ip.clone(),
            metadata_json,
            created_at_micros: entry.created_at.timestamp_micros(),
        })
    }

    pub fn into_entry(self) -> Result<LogEntry, AdapterError> {
        let created_at = DateTime::from_timestamp_micros(self.created_at_micros).ok_or_else(|| {
            AdapterError::invalid_row(format!(
                "timestamp {} out of range for entry {}",
                self.created_at_micros, self.id
            ))
        })?;
        let metadata = self
            .metadata_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;

        Ok(LogEntry {
            id: self.id,
            level: self.level,
            message: self.message,
            stack: self.stack,
            user_id: self.user_id,
            user_email: self.user_email,
            user_name: self.user_name,
            path: self.path,
            method: self.method,
            user_agent: self.user_agent,
            ip: self.ip,
            metadata,
            created_at,
        })
    }

    pub(super) fn encode(&self) -> Result<Vec<u8>, AdapterError> {
        postcard::to_allocvec(self).map_err(|e| AdapterError::Serialization(e.to_string()))
    }

    pub(super) fn decode(bytes: &[u8]) -> Result<Self, AdapterError> {
        postcard::from_bytes(bytes).map_err(|e| AdapterError::Deserialization(e.to_string()))
    }
}

/// [`LogAdapter`] backed by an embedded redb file
#[derive(Debug, Clone)]
pub struct RedbLogAdapter {
    storage: RedbStorage,
}

impl RedbLogAdapter {
    pub fn new(storage: RedbStorage) -> Self {
        Self { storage }
    }

    /// Open (or create) the database described by `config`
    pub fn open(config: RedbStorageConfig) -> Result<Self, AdapterError> {
        Ok(Self::new(RedbStorage::open(config)?))
    }

    pub fn storage(&self) -> &RedbStorage {
        &self.storage
    }

    /// Run a blocking redb operation off the async runtime
    async fn blocking<T, F>(&self, op: F) -> Result<T, AdapterError>
    where
        T: Send + 'static,
        F: FnOnce(RedbStorage) -> Result<T, AdapterError> + Send + 'static,
    {
        let storage = self.storage.clone();
        tokio::task::spawn_blocking(move || op(storage))
            .await
            .map_err(|e| AdapterError::Io(format!("redb task failed: {e}")))?
    }

    fn load_all(storage: &RedbStorage) -> Result<Vec<LogEntry>, AdapterError> {
        storage
            .records()?
            .into_iter()
            .map(StoredRecord::into_entry)
            .collect()
    }
}

#[async_trait]
impl LogAdapter for RedbLogAdapter {
    #[instrument(skip(self, entry), fields(level = %entry.level))]
    async fn create(&self, entry: NewLogEntry) -> Result<LogEntry, AdapterError> {
        let entry = entry.into_entry(generate_entry_id(), timestamp_now());
        let record = StoredRecord::from_entry(&entry)?;

        self.blocking(move |storage| storage.insert(&record)).await?;
        debug!(id = %entry.id, "Stored log entry");
        Ok(entry)
    }

    async fn find_many(&self, options: &QueryOptions) -> Result<LogPage, AdapterError> {
        let options = options.clone();
        self.blocking(move |storage| Ok(options.apply(Self::load_all(&storage)?)))
            .await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<LogEntry>, AdapterError> {
        let key = id.to_string();
        self.blocking(move |storage| storage.get(&key))
            .await?
            .map(StoredRecord::into_entry)
            .transpose()
    }

    async fn delete(&self, id: &str) -> Result<(), AdapterError> {
        let key = id.to_string();
        self.blocking(move |storage| storage.remove(&key)).await?;
        Ok(())
    }

    async fn delete_many(&self, filter: &DeleteFilter) -> Result<u64, AdapterError> {
        if filter.is_empty() {
            return Ok(0);
        }

        let filter = *filter;
        let removed = self
            .blocking(move |storage| {
                storage.remove_where(|record| {
                    // Out-of-range timestamps never match
                    DateTime::from_timestamp_micros(record.created_at_micros)
                        .is_some_and(|created_at| filter.covers(record.level, created_at))
                })
            })
            .await?;
        debug!(removed, "Deleted log entries");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_adapter() -> (RedbLogAdapter, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let adapter =
            RedbLogAdapter::open(RedbStorageConfig::at(temp_dir.path().join("logs.redb"))).unwrap();
        (adapter, temp_dir)
    }

    #[test]
    fn test_record_preserves_metadata_and_timestamp() {
        let entry = NewLogEntry::new(LogLevel::Warn, "slow query")
            .with_metadata(json!({"ms": 1200, "tags": ["db"]}))
            .into_entry("id-1".to_string(), timestamp_now());

        let bytes = StoredRecord::from_entry(&entry).unwrap().encode().unwrap();
        let back = StoredRecord::decode(&bytes).unwrap().into_entry().unwrap();
        assert_eq!(back, entry);
    }

    #[tokio::test]
    async fn test_entries_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logs.redb");

        let id = {
            let adapter = RedbLogAdapter::open(RedbStorageConfig::at(&path)).unwrap();
            adapter
                .create(NewLogEntry::new(LogLevel::Error, "persisted"))
                .await
                .unwrap()
                .id
        };

        let adapter = RedbLogAdapter::open(RedbStorageConfig::at(&path)).unwrap();
        let found = adapter.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(found.message, "persisted");
    }

    #[tokio::test]
    async fn test_find_many_filters_by_level() {
        let (adapter, _temp) = create_adapter();
        adapter
            .create(NewLogEntry::new(LogLevel::Error, "a"))
            .await
            .unwrap();
        adapter
            .create(NewLogEntry::new(LogLevel::Info, "b"))
            .await
            .unwrap();

        let page = adapter
            .find_many(&QueryOptions::new().with_level(LogLevel::Error))
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.logs[0].message, "a");
    }

    #[tokio::test]
    async fn test_delete_many_by_level() {
        let (adapter, _temp) = create_adapter();
        for level in [LogLevel::Debug, LogLevel::Debug, LogLevel::Error] {
            adapter.create(NewLogEntry::new(level, "x")).await.unwrap();
        }

        let removed = adapter
            .delete_many(&DeleteFilter::default().with_level(LogLevel::Debug))
            .await
            .unwrap();
        assert_eq!(removed, 2);
        let page = adapter.find_many(&QueryOptions::new()).await.unwrap();
        assert_eq!(page.total, 1);
    }
}
