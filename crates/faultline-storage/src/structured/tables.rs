//! redb file layout and record-level access

use std::path::PathBuf;
use std::sync::Arc;

use faultline_core::AdapterError;
use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};
use tracing::{debug, info, instrument};

use super::log_store::StoredRecord;

// Key: entry id, Value: postcard-encoded StoredRecord
pub const ERROR_LOGS: TableDefinition<&str, &[u8]> = TableDefinition::new("error_logs");

/// Location and cache size of the database file
#[derive(Debug, Clone)]
pub struct RedbStorageConfig {
    pub db_path: PathBuf,
    /// Page cache in bytes
    pub cache_size: usize,
}

impl Default for RedbStorageConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("faultline.redb"),
            cache_size: 16 * 1024 * 1024,
        }
    }
}

impl RedbStorageConfig {
    pub fn at(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            ..Default::default()
        }
    }
}

fn io_err(e: impl std::fmt::Display) -> AdapterError {
    AdapterError::Io(e.to_string())
}

/// Handle to the open database; clones share it
///
/// Every call runs its own transaction and blocks, so async callers go
/// through `spawn_blocking`.
#[derive(Clone)]
pub struct RedbStorage {
    db: Arc<Database>,
    config: RedbStorageConfig,
}

impl std::fmt::Debug for RedbStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStorage")
            .field("db_path", &self.config.db_path)
            .finish_non_exhaustive()
    }
}

impl RedbStorage {
    #[instrument(skip(config), fields(path = %config.db_path.display()))]
    pub fn open(config: RedbStorageConfig) -> Result<Self, AdapterError> {
        if let Some(parent) = config.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::builder()
            .set_cache_size(config.cache_size)
            .create(&config.db_path)
            .map_err(io_err)?;

        // Create the table up front so read transactions never miss it
        let txn = db.begin_write().map_err(io_err)?;
        txn.open_table(ERROR_LOGS).map_err(io_err)?;
        txn.commit().map_err(io_err)?;

        info!("Opened error log database");
        Ok(Self {
            db: Arc::new(db),
            config,
        })
    }

    pub fn config(&self) -> &RedbStorageConfig {
        &self.config
    }

    pub fn insert(&self, record: &StoredRecord) -> Result<(), AdapterError> {
        let value = record.encode()?;
        let txn = self.db.begin_write().map_err(io_err)?;
        {
            let mut table = txn.open_table(ERROR_LOGS).map_err(io_err)?;
            table.insert(record.id.as_str(), value.as_slice()).map_err(io_err)?;
        }
        txn.commit().map_err(io_err)?;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Option<StoredRecord>, AdapterError> {
        let txn = self.db.begin_read().map_err(io_err)?;
        let table = txn.open_table(ERROR_LOGS).map_err(io_err)?;
        let Some(value) = table.get(id).map_err(io_err)? else {
            return Ok(None);
        };
        StoredRecord::decode(value.value()).map(Some)
    }

    /// Returns whether a record was removed
    pub fn remove(&self, id: &str) -> Result<bool, AdapterError> {
        let txn = self.db.begin_write().map_err(io_err)?;
        let removed = {
            let mut table = txn.open_table(ERROR_LOGS).map_err(io_err)?;
            table.remove(id).map_err(io_err)?.is_some()
        };
        txn.commit().map_err(io_err)?;
        Ok(removed)
    }

    /// Remove every record matching `doomed` in a single write transaction
    pub fn remove_where<F>(&self, mut doomed: F) -> Result<u64, AdapterError>
    where
        F: FnMut(&StoredRecord) -> bool,
    {
        let txn = self.db.begin_write().map_err(io_err)?;
        let removed = {
            let mut table = txn.open_table(ERROR_LOGS).map_err(io_err)?;
            let mut ids = Vec::new();
            for row in table.iter().map_err(io_err)? {
                let (key, value) = row.map_err(io_err)?;
                if doomed(&StoredRecord::decode(value.value())?) {
                    ids.push(key.value().to_string());
                }
            }
            for id in &ids {
                table.remove(id.as_str()).map_err(io_err)?;
            }
            ids.len() as u64
        };
        txn.commit().map_err(io_err)?;

        debug!(removed, "Removed error log records");
        Ok(removed)
    }

    /// Every stored record, in id order
    pub fn records(&self) -> Result<Vec<StoredRecord>, AdapterError> {
        let txn = self.db.begin_read().map_err(io_err)?;
        let table = txn.open_table(ERROR_LOGS).map_err(io_err)?;
        table
            .iter()
            .map_err(io_err)?
            .map(|row| {
                let (_, value) = row.map_err(io_err)?;
                StoredRecord::decode(value.value())
            })
            .collect()
    }

    pub fn len(&self) -> Result<u64, AdapterError> {
        let txn = self.db.begin_read().map_err(io_err)?;
        let table = txn.open_table(ERROR_LOGS).map_err(io_err)?;
        table.len().map_err(io_err)
    }

    pub fn is_empty(&self) -> Result<bool, AdapterError> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faultline_core::{LogLevel, NewLogEntry, timestamp_now};
    use tempfile::TempDir;

    fn create_test_storage() -> (RedbStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            RedbStorage::open(RedbStorageConfig::at(temp_dir.path().join("data/test.redb")))
                .unwrap();
        (storage, temp_dir)
    }

    fn record(id: &str, level: LogLevel) -> StoredRecord {
        let entry = NewLogEntry::new(level, format!("message {id}"))
            .into_entry(id.to_string(), timestamp_now());
        StoredRecord::from_entry(&entry).unwrap()
    }

    #[test]
    fn test_insert_get_remove() {
        let (storage, _temp) = create_test_storage();
        assert!(storage.is_empty().unwrap());

        storage.insert(&record("a", LogLevel::Error)).unwrap();
        let found = storage.get("a").unwrap().unwrap();
        assert_eq!(found.message, "message a");
        assert!(storage.get("missing").unwrap().is_none());

        assert!(storage.remove("a").unwrap());
        assert!(!storage.remove("a").unwrap());
        assert!(storage.is_empty().unwrap());
    }

    #[test]
    fn test_remove_where_counts_matches() {
        let (storage, _temp) = create_test_storage();
        storage.insert(&record("a", LogLevel::Debug)).unwrap();
        storage.insert(&record("b", LogLevel::Error)).unwrap();
        storage.insert(&record("c", LogLevel::Debug)).unwrap();

        let removed = storage
            .remove_where(|r| r.level == LogLevel::Debug)
            .unwrap();
        assert_eq!(removed, 2);

        let left: Vec<String> = storage.records().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(left, vec!["b".to_string()]);
    }
}
