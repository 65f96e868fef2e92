use crate::error::ObserverError;
use crate::feed::Feed;
use crate::storage::{RecordStore, StorageBackend};

use chrono::Utc;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, info};
use traysync_core::{
    parse_plant_configurations, parse_sensor_readings, reconcile, StoredRecord, TrayId,
};

#[cfg(test)]
mod test;

/// Runs reconciliation passes and answers queries against the active store.
///
/// Built once at startup and shared as `Arc`, it only knows the `Feed` and
/// `RecordStore` capabilities, never a concrete backend.
pub struct ReconcileObserver {
    sensor_feed: Arc<dyn Feed>,
    config_feed: Arc<dyn Feed>,
    store: Arc<dyn RecordStore>,
}

impl Debug for ReconcileObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconcileObserver")
            .field("sensor_feed", &self.sensor_feed.name())
            .field("config_feed", &self.config_feed.name())
            .field("store", &self.store.backend())
            .finish()
    }
}

impl ReconcileObserver {
    pub fn new(
        sensor_feed: Arc<dyn Feed>,
        config_feed: Arc<dyn Feed>,
        store: Arc<dyn RecordStore>,
    ) -> Arc<Self> {
        Arc::new(ReconcileObserver {
            sensor_feed,
            config_feed,
            store,
        })
    }

    /// One synchronous pass over the current upstream snapshots.
    ///
    /// Both feeds are fetched concurrently, any fetch, parse or storage
    /// failure aborts the pass without persisting anything.
    #[tracing::instrument(skip(self))]
    pub async fn reconcile(&self) -> Result<Vec<StoredRecord>, ObserverError> {
        let start = Utc::now();
        let (sensor_body, config_body) =
            tokio::try_join!(self.sensor_feed.fetch(), self.config_feed.fetch())?;

        let readings = parse_sensor_readings(&sensor_body)?;
        let configs = parse_plant_configurations(&config_body)?;
        debug!(
            readings = readings.len(),
            configurations = configs.len(),
            "Parsed feeds"
        );

        let reconciliation = reconcile(&readings, &configs);
        let unmatched = reconciliation.unmatched.len();
        let stored = self.store.save(reconciliation.records).await?;

        let duration = Utc::now() - start;
        info!(
            matched = stored.len(),
            unmatched,
            backend = %self.store.backend(),
            "Reconciled trays in {} ms",
            duration.num_milliseconds()
        );
        Ok(stored)
    }

    pub async fn records(&self) -> Result<Vec<StoredRecord>, ObserverError> {
        Ok(self.store.list_all().await?)
    }

    /// Latest record of a tray, `None` if it was never stored
    pub async fn record(&self, tray_id: &TrayId) -> Result<Option<StoredRecord>, ObserverError> {
        Ok(self.store.get_by_key(tray_id).await?)
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.store.backend()
    }
}
