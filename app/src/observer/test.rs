use super::*;
use crate::error::{ErrorKind, StorageError};
use crate::feed::mock::MockFeed;
use crate::storage::MemoryStore;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Barrier;
use traysync_core::CombinedRecord;

const SENSORS: &str = r#"[
    {"tray_id": "TRAY001", "timestamp": "2024-05-01T10:00:00Z", "temperature": 26.4,
     "humidity": 60.0, "light_intensity": 800, "ph_level": 6.0},
    {"tray_id": "TRAY009", "temperature": 21.0},
    {"tray_id": 2, "timestamp": "2024-05-01T10:05:00Z", "temperature": "24.5",
     "humidity": 61, "light_intensity": 790, "ph_level": 6.1}
]"#;

const CONFIGS: &str = r#"[
    {"tray_id": 1, "plant_type": "Basil", "target_temperature": 24.0, "target_humidity": 60.0,
     "target_light_intensity": 800, "target_ph_level": 6.0, "tolerance_percentage": 5.0},
    {"tray_id": "TRAY002", "plant_type": "Mint", "target_temperature": 24.0, "target_humidity": 60.0,
     "target_light_intensity": 800, "target_ph_level": 6.0, "tolerance_percentage": 5.0}
]"#;

struct BrokenStore;

#[async_trait]
impl RecordStore for BrokenStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::JsonFile
    }

    async fn save(&self, _: Vec<CombinedRecord>) -> Result<Vec<StoredRecord>, StorageError> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
    }

    async fn list_all(&self) -> Result<Vec<StoredRecord>, StorageError> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "disk gone").into())
    }

    async fn get_by_key(&self, _: &TrayId) -> Result<Option<StoredRecord>, StorageError> {
        Ok(None)
    }
}

fn build_mocked_observer(
    sensor_feed: MockFeed,
    config_feed: MockFeed,
) -> (Arc<ReconcileObserver>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let observer = ReconcileObserver::new(
        Arc::new(sensor_feed),
        Arc::new(config_feed),
        store.clone(),
    );
    (observer, store)
}

#[tokio::test]
async fn test_reconcile_persists_matches() {
    // prepare
    let (observer, store) = build_mocked_observer(
        MockFeed::body("sensor", SENSORS),
        MockFeed::body("configuration", CONFIGS),
    );

    // execute
    let stored = observer.reconcile().await.unwrap();

    // validate
    let trays: Vec<&str> = stored.iter().map(|r| r.tray_id().as_str()).collect();
    assert_eq!(vec!["1", "2"], trays);

    let first = &stored[0].record;
    assert_eq!("Basil", first.plant_type);
    assert_eq!(10.0, first.temperature_deviation);
    assert!(!first.is_temperature_in_range);
    assert!(!first.all_in_range);

    let second = &stored[1].record;
    assert_eq!("Mint", second.plant_type);
    assert!(second.all_in_range);

    assert_eq!(2, store.list_all().await.unwrap().len());
    assert_eq!(StorageBackend::Memory, observer.storage_backend());
}

#[tokio::test]
async fn test_fetches_run_concurrently() {
    // both feeds wait for each other, a sequential pass would never finish
    let barrier = Arc::new(Barrier::new(2));
    let (observer, _) = build_mocked_observer(
        MockFeed::body("sensor", SENSORS).with_barrier(barrier.clone()),
        MockFeed::body("configuration", CONFIGS).with_barrier(barrier),
    );

    let res = tokio::time::timeout(Duration::from_secs(5), observer.reconcile()).await;

    assert_eq!(2, res.expect("feeds were fetched sequentially").unwrap().len());
}

#[tokio::test]
async fn test_fetch_failure_aborts_pass() {
    let (observer, store) = build_mocked_observer(
        MockFeed::body("sensor", SENSORS),
        MockFeed::status("configuration", 500),
    );

    let err = observer.reconcile().await.unwrap_err();

    assert_eq!(ErrorKind::Fetch, err.kind());
    assert!(err.to_string().contains("configuration"));
    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_parse_failure_aborts_pass() {
    let (observer, store) = build_mocked_observer(
        MockFeed::body("sensor", r#"{"tray_id": 1}"#),
        MockFeed::body("configuration", CONFIGS),
    );

    let err = observer.reconcile().await.unwrap_err();

    assert_eq!(ErrorKind::Parse, err.kind());
    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_storage_failure_is_returned() {
    let observer = ReconcileObserver::new(
        Arc::new(MockFeed::body("sensor", SENSORS)),
        Arc::new(MockFeed::body("configuration", CONFIGS)),
        Arc::new(BrokenStore),
    );

    let err = observer.reconcile().await.unwrap_err();
    assert_eq!(ErrorKind::Storage, err.kind());
    assert!(err.is_internal());

    let err = observer.records().await.unwrap_err();
    assert_eq!(ErrorKind::Storage, err.kind());
}

#[tokio::test]
async fn test_no_matches_is_empty_pass() {
    let (observer, store) = build_mocked_observer(
        MockFeed::body("sensor", r#"[{"tray_id": "TRAY777"}]"#),
        MockFeed::body("configuration", CONFIGS),
    );

    let stored = observer.reconcile().await.unwrap();

    assert!(stored.is_empty());
    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_record_lookup() {
    let (observer, _) = build_mocked_observer(
        MockFeed::body("sensor", SENSORS),
        MockFeed::body("configuration", CONFIGS),
    );
    observer.reconcile().await.unwrap();
    observer.reconcile().await.unwrap();

    let latest = observer.record(&TrayId::parse("TRAY001")).await.unwrap().unwrap();
    assert_eq!(3, latest.id);
    assert!(observer.record(&TrayId::parse("TRAY009")).await.unwrap().is_none());
    assert_eq!(4, observer.records().await.unwrap().len());
}

#[tokio::test]
async fn test_each_pass_fetches_both_feeds_once() {
    let sensor_feed = Arc::new(MockFeed::body("sensor", SENSORS));
    let config_feed = Arc::new(MockFeed::body("configuration", CONFIGS));
    let observer = ReconcileObserver::new(
        sensor_feed.clone(),
        config_feed.clone(),
        Arc::new(MemoryStore::new()),
    );

    observer.reconcile().await.unwrap();
    observer.reconcile().await.unwrap();

    assert_eq!(2, sensor_feed.calls());
    assert_eq!(2, config_feed.calls());
}
