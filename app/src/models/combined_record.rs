use chrono::{DateTime, Utc};
use traysync_core::{CombinedRecord, StoredRecord, TrayId};

use crate::error::DBError;

#[derive(sqlx::FromRow, Debug)]
pub struct CombinedRecordDao {
    pub(crate) id: i64,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) tray_id: String,
    pub(crate) plant_type: String,
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) temperature: f64,
    pub(crate) humidity: f64,
    pub(crate) light_intensity: f64,
    pub(crate) ph_level: f64,
    pub(crate) target_temperature: f64,
    pub(crate) target_humidity: f64,
    pub(crate) target_light_intensity: f64,
    pub(crate) target_ph_level: f64,
    pub(crate) tolerance_percentage: f64,
    pub(crate) temperature_deviation: f64,
    pub(crate) humidity_deviation: f64,
    pub(crate) light_intensity_deviation: f64,
    pub(crate) ph_level_deviation: f64,
    pub(crate) is_temperature_in_range: bool,
    pub(crate) is_humidity_in_range: bool,
    pub(crate) is_light_intensity_in_range: bool,
    pub(crate) is_ph_level_in_range: bool,
    // computed by the query, not a column
    pub(crate) all_in_range: bool,
}

impl From<CombinedRecordDao> for StoredRecord {
    fn from(val: CombinedRecordDao) -> Self {
        StoredRecord::new(
            val.id,
            val.created_at,
            CombinedRecord {
                tray_id: TrayId::from_canonical(val.tray_id),
                plant_type: val.plant_type,
                timestamp: val.timestamp,
                temperature: val.temperature,
                humidity: val.humidity,
                light_intensity: val.light_intensity,
                ph_level: val.ph_level,
                target_temperature: val.target_temperature,
                target_humidity: val.target_humidity,
                target_light_intensity: val.target_light_intensity,
                target_ph_level: val.target_ph_level,
                tolerance_percentage: val.tolerance_percentage,
                temperature_deviation: val.temperature_deviation,
                humidity_deviation: val.humidity_deviation,
                light_intensity_deviation: val.light_intensity_deviation,
                ph_level_deviation: val.ph_level_deviation,
                is_temperature_in_range: val.is_temperature_in_range,
                is_humidity_in_range: val.is_humidity_in_range,
                is_light_intensity_in_range: val.is_light_intensity_in_range,
                is_ph_level_in_range: val.is_ph_level_in_range,
                all_in_range: val.all_in_range,
            },
        )
    }
}

/// Inserts all records in one transaction, either every row is visible or none
pub async fn insert_batch(
    conn: &sqlx::PgPool,
    records: &[CombinedRecord],
) -> Result<Vec<CombinedRecordDao>, DBError> {
    let mut tx = conn.begin().await?;
    let mut inserted = Vec::with_capacity(records.len());

    for record in records {
        let dao = sql_stmnt!(
            CombinedRecordDao,
            r#"INSERT INTO combined_records
                (tray_id, plant_type, timestamp,
                 temperature, humidity, light_intensity, ph_level,
                 target_temperature, target_humidity, target_light_intensity, target_ph_level,
                 tolerance_percentage,
                 temperature_deviation, humidity_deviation, light_intensity_deviation, ph_level_deviation,
                 is_temperature_in_range, is_humidity_in_range, is_light_intensity_in_range, is_ph_level_in_range)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
                RETURNING id, created_at, tray_id, plant_type, timestamp,
                    temperature, humidity, light_intensity, ph_level,
                    target_temperature, target_humidity, target_light_intensity, target_ph_level,
                    tolerance_percentage,
                    temperature_deviation, humidity_deviation, light_intensity_deviation, ph_level_deviation,
                    is_temperature_in_range, is_humidity_in_range, is_light_intensity_in_range, is_ph_level_in_range,
                    (is_temperature_in_range AND is_humidity_in_range
                        AND is_light_intensity_in_range AND is_ph_level_in_range) AS all_in_range"#,
            record.tray_id.as_str(),
            record.plant_type.as_str(),
            record.timestamp,
            record.temperature,
            record.humidity,
            record.light_intensity,
            record.ph_level,
            record.target_temperature,
            record.target_humidity,
            record.target_light_intensity,
            record.target_ph_level,
            record.tolerance_percentage,
            record.temperature_deviation,
            record.humidity_deviation,
            record.light_intensity_deviation,
            record.ph_level_deviation,
            record.is_temperature_in_range,
            record.is_humidity_in_range,
            record.is_light_intensity_in_range,
            record.is_ph_level_in_range
        )
        .fetch_one(&mut *tx)
        .await?;
        inserted.push(dao);
    }

    tx.commit().await?;
    Ok(inserted)
}

// READ combined_records
pub async fn read(conn: &sqlx::PgPool) -> Result<Vec<CombinedRecordDao>, DBError> {
    Ok(sql_stmnt!(
        CombinedRecordDao,
        r#"SELECT id, created_at, tray_id, plant_type, timestamp,
                temperature, humidity, light_intensity, ph_level,
                target_temperature, target_humidity, target_light_intensity, target_ph_level,
                tolerance_percentage,
                temperature_deviation, humidity_deviation, light_intensity_deviation, ph_level_deviation,
                is_temperature_in_range, is_humidity_in_range, is_light_intensity_in_range, is_ph_level_in_range,
                (is_temperature_in_range AND is_humidity_in_range
                    AND is_light_intensity_in_range AND is_ph_level_in_range) AS all_in_range
            FROM combined_records
            ORDER BY timestamp DESC, id DESC"#
    )
    .fetch_all(conn)
    .await?)
}

pub async fn get_latest(
    conn: &sqlx::PgPool,
    search_tray_id: &str,
) -> Result<Option<CombinedRecordDao>, DBError> {
    Ok(sql_stmnt!(
        CombinedRecordDao,
        r#"SELECT id, created_at, tray_id, plant_type, timestamp,
                temperature, humidity, light_intensity, ph_level,
                target_temperature, target_humidity, target_light_intensity, target_ph_level,
                tolerance_percentage,
                temperature_deviation, humidity_deviation, light_intensity_deviation, ph_level_deviation,
                is_temperature_in_range, is_humidity_in_range, is_light_intensity_in_range, is_ph_level_in_range,
                (is_temperature_in_range AND is_humidity_in_range
                    AND is_light_intensity_in_range AND is_ph_level_in_range) AS all_in_range
            FROM combined_records
            WHERE tray_id = $1
            ORDER BY timestamp DESC, id DESC
            LIMIT 1"#,
        search_tray_id
    )
    .fetch_optional(conn)
    .await?)
}
