use super::{RecordStore, StorageBackend};
use crate::error::StorageError;
use async_trait::async_trait;
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;
use traysync_core::{newest_first, CombinedRecord, StoredRecord, TrayId};

/// Keeps every record in one JSON array on disk.
///
/// Each operation loads the whole file under the same lock, writes replace
/// the file through a rename. A missing or blank file reads as empty.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: &Path) -> Self {
        JsonFileStore {
            path: path.to_owned(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<StoredRecord>, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn persist(&self, records: &[StoredRecord]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let bytes = serde_json::to_vec_pretty(records)?;
        let tmp_path = self.tmp_path();
        let mut file = File::create(&tmp_path).await?;
        file.write_all(&bytes).await?;
        // contents must be on disk before the rename publishes them
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::JsonFile
    }

    async fn save(&self, records: Vec<CombinedRecord>) -> Result<Vec<StoredRecord>, StorageError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let _guard = self.lock.lock().await;
        let mut all = self.load().await?;
        let first_id = all.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let now = Utc::now();

        let saved: Vec<StoredRecord> = records
            .into_iter()
            .zip(first_id..)
            .map(|(record, id)| StoredRecord::new(id, now, record))
            .collect();
        all.extend(saved.iter().cloned());
        self.persist(&all).await?;

        debug!(path = ?self.path, count = saved.len(), total = all.len(), "Saved records");
        Ok(saved)
    }

    async fn list_all(&self) -> Result<Vec<StoredRecord>, StorageError> {
        let _guard = self.lock.lock().await;
        let mut all = self.load().await?;
        all.sort_by(newest_first);
        Ok(all)
    }

    async fn get_by_key(&self, tray_id: &TrayId) -> Result<Option<StoredRecord>, StorageError> {
        let _guard = self.lock.lock().await;
        Ok(self
            .load()
            .await?
            .into_iter()
            .filter(|r| r.tray_id() == tray_id)
            .min_by(newest_first))
    }
}
