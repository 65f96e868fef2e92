use crate::config::StorageConfig;
use crate::error::StorageError;
use crate::models;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::info;
use traysync_core::{CombinedRecord, StoredRecord, TrayId};

mod json_file;
mod memory;
mod postgres;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use postgres::PgRecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Memory,
    JsonFile,
    Postgres,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Memory => write!(f, "memory"),
            StorageBackend::JsonFile => write!(f, "json_file"),
            StorageBackend::Postgres => write!(f, "postgres"),
        }
    }
}

/// Append-only persistence for combined records.
///
/// Every backend assigns `id` and `created_at` on save, lists newest first
/// (timestamp, then id) and answers a missing tray with `None`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    fn backend(&self) -> StorageBackend;

    async fn save(&self, records: Vec<CombinedRecord>) -> Result<Vec<StoredRecord>, StorageError>;

    async fn list_all(&self) -> Result<Vec<StoredRecord>, StorageError>;

    async fn get_by_key(&self, tray_id: &TrayId) -> Result<Option<StoredRecord>, StorageError>;
}

/// Builds the configured backend, running migrations for postgres
pub async fn connect(config: &StorageConfig) -> Result<Arc<dyn RecordStore>, StorageError> {
    let store: Arc<dyn RecordStore> = match config {
        StorageConfig::Memory => Arc::new(MemoryStore::new()),
        StorageConfig::JsonFile(path) => Arc::new(JsonFileStore::new(path)),
        StorageConfig::Postgres {
            database_url,
            max_connections,
        } => {
            let pool = models::establish_db_connection(database_url, *max_connections).await?;
            models::run_migrations(&pool).await?;
            let count = models::check_schema(&pool).await?;
            info!(records = count, "Schema ready");
            Arc::new(PgRecordStore::new(pool))
        }
    };
    info!(backend = %store.backend(), "Storage ready");
    Ok(store)
}
