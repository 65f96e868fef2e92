use crate::deviation::MetricEvaluation;
use crate::reading::{PlantConfiguration, SensorReading};
use crate::tray::TrayId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A sensor reading joined with the configuration of its tray.
///
/// `all_in_range` is always the conjunction of the four `is_*_in_range`
/// flags, it is only ever set by [`CombinedRecord::evaluate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedRecord {
    pub tray_id: TrayId,
    pub plant_type: String,
    pub timestamp: DateTime<Utc>,

    pub temperature: f64,
    pub humidity: f64,
    pub light_intensity: f64,
    pub ph_level: f64,

    pub target_temperature: f64,
    pub target_humidity: f64,
    pub target_light_intensity: f64,
    pub target_ph_level: f64,
    pub tolerance_percentage: f64,

    pub temperature_deviation: f64,
    pub humidity_deviation: f64,
    pub light_intensity_deviation: f64,
    pub ph_level_deviation: f64,

    pub is_temperature_in_range: bool,
    pub is_humidity_in_range: bool,
    pub is_light_intensity_in_range: bool,
    pub is_ph_level_in_range: bool,
    pub all_in_range: bool,
}

impl CombinedRecord {
    pub fn evaluate(reading: &SensorReading, config: &PlantConfiguration) -> Self {
        let tolerance = config.tolerance_percentage;
        let temperature =
            MetricEvaluation::evaluate(reading.temperature, config.target_temperature, tolerance);
        let humidity =
            MetricEvaluation::evaluate(reading.humidity, config.target_humidity, tolerance);
        let light_intensity = MetricEvaluation::evaluate(
            reading.light_intensity,
            config.target_light_intensity,
            tolerance,
        );
        let ph_level =
            MetricEvaluation::evaluate(reading.ph_level, config.target_ph_level, tolerance);

        CombinedRecord {
            tray_id: reading.tray_id.clone(),
            plant_type: config.plant_type.clone(),
            timestamp: reading.timestamp,
            temperature: reading.temperature,
            humidity: reading.humidity,
            light_intensity: reading.light_intensity,
            ph_level: reading.ph_level,
            target_temperature: config.target_temperature,
            target_humidity: config.target_humidity,
            target_light_intensity: config.target_light_intensity,
            target_ph_level: config.target_ph_level,
            tolerance_percentage: tolerance,
            temperature_deviation: temperature.deviation,
            humidity_deviation: humidity.deviation,
            light_intensity_deviation: light_intensity.deviation,
            ph_level_deviation: ph_level.deviation,
            is_temperature_in_range: temperature.in_range,
            is_humidity_in_range: humidity.in_range,
            is_light_intensity_in_range: light_intensity.in_range,
            is_ph_level_in_range: ph_level.in_range,
            all_in_range: temperature.in_range
                && humidity.in_range
                && light_intensity.in_range
                && ph_level.in_range,
        }
    }
}

/// A combined record after a storage backend accepted it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub record: CombinedRecord,
}

impl StoredRecord {
    pub fn new(id: i64, created_at: DateTime<Utc>, record: CombinedRecord) -> Self {
        StoredRecord {
            id,
            created_at,
            record,
        }
    }

    pub fn tray_id(&self) -> &TrayId {
        &self.record.tray_id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.record.timestamp
    }
}

/// Most recent timestamp first, the higher id wins a tie
pub fn newest_first(a: &StoredRecord, b: &StoredRecord) -> Ordering {
    b.timestamp()
        .cmp(&a.timestamp())
        .then_with(|| b.id.cmp(&a.id))
}
