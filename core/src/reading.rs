use crate::error::ParseError;
use crate::tray::{normalize, RawTrayId, TrayId};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

pub const SENSOR_FEED: &str = "sensor";
pub const CONFIG_FEED: &str = "configuration";

/// One telemetry sample of a tray
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    pub tray_id: TrayId,
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub humidity: f64,
    pub light_intensity: f64,
    pub ph_level: f64,
}

/// Targets and tolerance configured for a tray
#[derive(Debug, Clone, PartialEq)]
pub struct PlantConfiguration {
    pub tray_id: TrayId,
    pub plant_type: String,
    pub target_temperature: f64,
    pub target_humidity: f64,
    pub target_light_intensity: f64,
    pub target_ph_level: f64,
    pub tolerance_percentage: f64,
}

#[derive(Debug, Deserialize)]
struct SensorReadingDto {
    tray_id: Option<Value>,
    timestamp: Option<Value>,
    temperature: Option<Value>,
    humidity: Option<Value>,
    light_intensity: Option<Value>,
    ph_level: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct PlantConfigurationDto {
    tray_id: Option<Value>,
    plant_type: Option<Value>,
    target_temperature: Option<Value>,
    target_humidity: Option<Value>,
    target_light_intensity: Option<Value>,
    target_ph_level: Option<Value>,
    tolerance_percentage: Option<Value>,
}

impl From<SensorReadingDto> for SensorReading {
    fn from(dto: SensorReadingDto) -> Self {
        let tray_id = tray_key(dto.tray_id.as_ref());
        SensorReading {
            timestamp: timestamp(&tray_id, dto.timestamp.as_ref()),
            temperature: number(&tray_id, "temperature", dto.temperature.as_ref()),
            humidity: number(&tray_id, "humidity", dto.humidity.as_ref()),
            light_intensity: number(&tray_id, "light_intensity", dto.light_intensity.as_ref()),
            ph_level: number(&tray_id, "ph_level", dto.ph_level.as_ref()),
            tray_id,
        }
    }
}

impl From<PlantConfigurationDto> for PlantConfiguration {
    fn from(dto: PlantConfigurationDto) -> Self {
        let tray_id = tray_key(dto.tray_id.as_ref());
        let plant_type = match dto.plant_type {
            Some(Value::String(s)) => s,
            _ => String::new(),
        };

        PlantConfiguration {
            plant_type,
            target_temperature: number(
                &tray_id,
                "target_temperature",
                dto.target_temperature.as_ref(),
            ),
            target_humidity: number(&tray_id, "target_humidity", dto.target_humidity.as_ref()),
            target_light_intensity: number(
                &tray_id,
                "target_light_intensity",
                dto.target_light_intensity.as_ref(),
            ),
            target_ph_level: number(&tray_id, "target_ph_level", dto.target_ph_level.as_ref()),
            tolerance_percentage: number(
                &tray_id,
                "tolerance_percentage",
                dto.tolerance_percentage.as_ref(),
            ),
            tray_id,
        }
    }
}

/// Parses a sensor feed body, a JSON array of reading objects
pub fn parse_sensor_readings(body: &str) -> Result<Vec<SensorReading>, ParseError> {
    let dtos: Vec<SensorReadingDto> =
        serde_json::from_str(body).map_err(|source| ParseError::Payload {
            feed: SENSOR_FEED,
            source,
        })?;
    Ok(dtos.into_iter().map(SensorReading::from).collect())
}

/// Parses a configuration feed body, a JSON array of configuration objects
pub fn parse_plant_configurations(body: &str) -> Result<Vec<PlantConfiguration>, ParseError> {
    let dtos: Vec<PlantConfigurationDto> =
        serde_json::from_str(body).map_err(|source| ParseError::Payload {
            feed: CONFIG_FEED,
            source,
        })?;
    Ok(dtos.into_iter().map(PlantConfiguration::from).collect())
}

fn tray_key(value: Option<&Value>) -> TrayId {
    match value.and_then(RawTrayId::from_value) {
        Some(raw) => normalize(&raw),
        None => {
            warn!(raw = ?value, "Missing tray id, using sentinel key");
            TrayId::unparseable()
        }
    }
}

fn number(tray_id: &TrayId, field: &str, value: Option<&Value>) -> f64 {
    let parsed = match value {
        None | Some(Value::Null) => return 0.0,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match parsed {
        Some(n) if n.is_finite() => n,
        _ => {
            warn!(tray_id = %tray_id, field, raw = ?value, "Unparseable number, using 0.0");
            0.0
        }
    }
}

fn timestamp(tray_id: &TrayId, value: Option<&Value>) -> DateTime<Utc> {
    let raw = match value {
        None | Some(Value::Null) => return Utc::now(),
        Some(Value::String(s)) => s.trim(),
        Some(other) => {
            warn!(tray_id = %tray_id, raw = ?other, "Unparseable timestamp, using now");
            return Utc::now();
        }
    };

    parse_timestamp(raw).unwrap_or_else(|| {
        warn!(tray_id = %tray_id, raw, "Unparseable timestamp, using now");
        Utc::now()
    })
}

/// RFC 3339, or a naive date time interpreted as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}
