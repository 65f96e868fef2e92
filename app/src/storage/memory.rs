use super::{RecordStore, StorageBackend};
use crate::error::StorageError;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use traysync_core::{newest_first, CombinedRecord, StoredRecord, TrayId};

/// Process local store, lost on restart.
///
/// A whole batch is numbered and appended under one write lock, so ids stay
/// unique even with concurrent savers.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<StoredRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Memory
    }

    async fn save(&self, records: Vec<CombinedRecord>) -> Result<Vec<StoredRecord>, StorageError> {
        let now = Utc::now();
        let mut stored_records = self.records.write();
        let first_id = stored_records.len() as i64 + 1;

        let saved: Vec<StoredRecord> = records
            .into_iter()
            .zip(first_id..)
            .map(|(record, id)| StoredRecord::new(id, now, record))
            .collect();
        stored_records.extend(saved.iter().cloned());
        Ok(saved)
    }

    async fn list_all(&self) -> Result<Vec<StoredRecord>, StorageError> {
        let mut all = self.records.read().clone();
        all.sort_by(newest_first);
        Ok(all)
    }

    async fn get_by_key(&self, tray_id: &TrayId) -> Result<Option<StoredRecord>, StorageError> {
        let records = self.records.read();
        Ok(records
            .iter()
            .filter(|r| r.tray_id() == tray_id)
            .min_by(|a, b| newest_first(a, b))
            .cloned())
    }
}
