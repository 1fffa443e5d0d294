//! Storage backend selection

use std::sync::Arc;

use faultline_core::{AdapterError, LogAdapter};
use faultline_storage::{
    InMemoryLogAdapter, RedbLogAdapter, RedbStorageConfig, SqlDialect, SqlLogAdapter,
    SqliteExecutor,
};
use tracing::info;

use crate::config::{StorageBackend, StorageSettings};

/// Open the configured backend, creating its schema where needed
pub async fn open_adapter(settings: &StorageSettings) -> Result<Arc<dyn LogAdapter>, AdapterError> {
    match settings.backend {
        StorageBackend::Memory => {
            info!("Using in-memory log storage; entries are lost on exit");
            Ok(Arc::new(InMemoryLogAdapter::new()))
        }
        StorageBackend::Redb => {
            let adapter = RedbLogAdapter::open(RedbStorageConfig::at(&settings.path))?;
            info!(path = %settings.path.display(), "Opened redb log storage");
            Ok(Arc::new(adapter))
        }
        StorageBackend::Sqlite => {
            let executor = if settings.url.contains(":memory:") {
                SqliteExecutor::in_memory().await?
            } else {
                SqliteExecutor::connect(&settings.url).await?
            };
            let adapter =
                SqlLogAdapter::new(executor, SqlDialect::Sqlite).with_table(&settings.table)?;
            adapter.migrate().await?;
            Ok(Arc::new(adapter))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faultline_core::{LogLevel, NewLogEntry, QueryOptions};

    #[tokio::test]
    async fn test_open_redb_backend() {
        let dir = tempfile::tempdir().unwrap();
        let settings = StorageSettings {
            backend: StorageBackend::Redb,
            path: dir.path().join("logs.redb"),
            ..Default::default()
        };

        let adapter = open_adapter(&settings).await.unwrap();
        adapter
            .create(NewLogEntry::new(LogLevel::Warn, "cache miss storm"))
            .await
            .unwrap();
        assert_eq!(adapter.find_many(&QueryOptions::new()).await.unwrap().total, 1);
    }

    #[tokio::test]
    async fn test_open_sqlite_backend_migrates() {
        let settings = StorageSettings {
            backend: StorageBackend::Sqlite,
            url: "sqlite::memory:".to_string(),
            ..Default::default()
        };

        let adapter = open_adapter(&settings).await.unwrap();
        let entry = adapter
            .create(NewLogEntry::new(LogLevel::Error, "db timeout"))
            .await
            .unwrap();
        assert!(adapter.find_by_id(&entry.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_rejects_bad_table_name() {
        let settings = StorageSettings {
            backend: StorageBackend::Sqlite,
            url: "sqlite::memory:".to_string(),
            table: "logs; DROP TABLE users".to_string(),
            ..Default::default()
        };
        assert!(open_adapter(&settings).await.is_err());
    }
}
