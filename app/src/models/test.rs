use chrono::{Duration, Utc};
use traysync_core::{CombinedRecord, PlantConfiguration, SensorReading, StoredRecord, TrayId};

use super::combined_record;
use super::*;

async fn establish_test_connection() -> sqlx::PgPool {
    dotenv::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").unwrap();
    let conn = establish_db_connection(&database_url, 2).await.unwrap();
    run_migrations(&conn).await.unwrap();
    conn
}

fn unique_tray() -> TrayId {
    TrayId::from_canonical(format!("9{}", Utc::now().timestamp_micros()))
}

fn record(tray_id: &TrayId, minutes_ago: i64) -> CombinedRecord {
    let reading = SensorReading {
        tray_id: tray_id.clone(),
        timestamp: Utc::now() - Duration::minutes(minutes_ago),
        temperature: 26.4,
        humidity: 60.0,
        light_intensity: 800.0,
        ph_level: 6.0,
    };
    let config = PlantConfiguration {
        tray_id: tray_id.clone(),
        plant_type: "Basil".to_owned(),
        target_temperature: 24.0,
        target_humidity: 60.0,
        target_light_intensity: 800.0,
        target_ph_level: 6.0,
        tolerance_percentage: 5.0,
    };
    CombinedRecord::evaluate(&reading, &config)
}

#[tokio::test]
#[ignore = "requires a postgres DATABASE_URL"]
async fn test_db_connection() {
    let conn = establish_test_connection().await;
    check_schema(&conn).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a postgres DATABASE_URL"]
async fn crud_combined_records() {
    let conn = establish_test_connection().await;
    let tray_id = unique_tray();

    // create
    let daos = combined_record::insert_batch(&conn, &[record(&tray_id, 10), record(&tray_id, 1)])
        .await
        .unwrap();
    assert_eq!(2, daos.len());
    assert!(daos[0].id < daos[1].id);
    assert!(!daos[0].all_in_range);

    // read
    let all = combined_record::read(&conn).await.unwrap();
    assert!(all.len() >= 2);
    for pair in all.windows(2) {
        assert!(pair[0].timestamp >= pair[1].timestamp);
    }

    // latest
    let latest: StoredRecord = combined_record::get_latest(&conn, tray_id.as_str())
        .await
        .unwrap()
        .unwrap()
        .into();
    assert_eq!(daos[1].id, latest.id);
    assert_eq!(10.0, latest.record.temperature_deviation);
    assert_eq!(&tray_id, latest.tray_id());

    // missing
    let missing = combined_record::get_latest(&conn, &format!("{}0", tray_id))
        .await
        .unwrap();
    assert!(missing.is_none());
}
