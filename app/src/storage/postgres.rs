use super::{RecordStore, StorageBackend};
use crate::error::StorageError;
use crate::models::combined_record;
use async_trait::async_trait;
use sqlx::PgPool;
use traysync_core::{CombinedRecord, StoredRecord, TrayId};

/// Records as rows of `combined_records`, ordering and atomicity come from postgres
pub struct PgRecordStore {
    db_conn: PgPool,
}

impl PgRecordStore {
    pub fn new(db_conn: PgPool) -> Self {
        PgRecordStore { db_conn }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Postgres
    }

    async fn save(&self, records: Vec<CombinedRecord>) -> Result<Vec<StoredRecord>, StorageError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }
        let daos = combined_record::insert_batch(&self.db_conn, &records).await?;
        Ok(daos.into_iter().map(StoredRecord::from).collect())
    }

    async fn list_all(&self) -> Result<Vec<StoredRecord>, StorageError> {
        let daos = combined_record::read(&self.db_conn).await?;
        Ok(daos.into_iter().map(StoredRecord::from).collect())
    }

    async fn get_by_key(&self, tray_id: &TrayId) -> Result<Option<StoredRecord>, StorageError> {
        let dao = combined_record::get_latest(&self.db_conn, tray_id.as_str()).await?;
        Ok(dao.map(StoredRecord::from))
    }
}
