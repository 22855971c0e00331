//! Maintenance manuals and the operations they list

use crate::odometer::{OdometerLog, OdometerReading};
use crate::task::Task;
use crate::unit::Unit;
use crate::Result;
use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// One recurring maintenance operation of a vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceOperation {
    /// Vehicle system (engine, brakes, ...)
    pub system: String,
    /// Subsystem within `system`
    #[serde(default)]
    pub subsystem: String,
    /// Kind of work
    pub task: Task,
    /// Free-form description of the work
    #[serde(default)]
    pub description: String,
    /// How often the operation recurs, in `unit`
    pub frequency: i64,
    /// Unit of `frequency`
    pub unit: Unit,
}

impl MaintenanceOperation {
    /// Short human label, e.g. `Engine/Lubrication: R engine oil`
    pub fn label(&self) -> String {
        let mut label = self.system.clone();
        if !self.subsystem.is_empty() {
            label.push('/');
            label.push_str(&self.subsystem);
        }
        label.push_str(&format!(": {}", self.task));
        if !self.description.is_empty() {
            label.push(' ');
            label.push_str(&self.description);
        }
        label
    }
}

impl fmt::Display for MaintenanceOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} every {} {}", self.label(), self.frequency, self.unit)
    }
}

/// A vehicle's maintenance manual
///
/// Stored as TOML:
/// ```toml
/// vehicle = "PBA-1234"
/// start_date = "2024-01-01"
///
/// [[operations]]
/// system = "Engine"
/// subsystem = "Lubrication"
/// task = "R"
/// description = "engine oil"
/// frequency = 5000
/// unit = "km"
///
/// [[readings]]
/// value = 17000
/// unit = "km"
/// date = "2024-05-01"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceManual {
    /// Vehicle identifier (plate or fleet number)
    pub vehicle: String,
    /// Date calendar-based operations are counted from
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Recurring operations
    #[serde(default)]
    pub operations: Vec<MaintenanceOperation>,
    /// Recorded odometer readings
    #[serde(default)]
    pub readings: Vec<OdometerReading>,
}

impl MaintenanceManual {
    /// Parse a manual from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a manual from a TOML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manual: {}", path.display()))?;
        let manual = Self::from_toml_str(&text)
            .with_context(|| format!("Failed to parse manual: {}", path.display()))?;

        debug!(
            vehicle = %manual.vehicle,
            operations = manual.operations.len(),
            readings = manual.readings.len(),
            "loaded maintenance manual"
        );
        Ok(manual)
    }

    /// Readings as a queryable log
    pub fn odometer_log(&self) -> OdometerLog {
        self.readings.iter().cloned().collect()
    }
}
