use crate::reading::{PlantConfiguration, SensorReading};
use crate::record::CombinedRecord;
use crate::tray::TrayId;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Result of joining one sensor snapshot against one configuration snapshot
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    /// Combined records, in the order of the sensor readings
    pub records: Vec<CombinedRecord>,
    /// Trays of readings that had no configuration
    pub unmatched: Vec<TrayId>,
}

impl Reconciliation {
    pub fn matched(&self) -> usize {
        self.records.len()
    }
}

/// Joins readings and configurations by canonical tray key.
///
/// On duplicate configuration keys the later entry wins. Readings without a
/// configuration are skipped and reported in [`Reconciliation::unmatched`].
pub fn reconcile(readings: &[SensorReading], configs: &[PlantConfiguration]) -> Reconciliation {
    let mut by_tray: HashMap<&TrayId, &PlantConfiguration> = HashMap::with_capacity(configs.len());
    for config in configs {
        if by_tray.insert(&config.tray_id, config).is_some() {
            debug!(tray_id = %config.tray_id, "Duplicate configuration, keeping the latest");
        }
    }

    let mut result = Reconciliation::default();
    for reading in readings {
        match by_tray.get(&reading.tray_id) {
            Some(config) => result
                .records
                .push(CombinedRecord::evaluate(reading, config)),
            None => {
                warn!(tray_id = %reading.tray_id, "Skipping reading: no configuration");
                result.unmatched.push(reading.tray_id.clone());
            }
        }
    }
    result
}
