//! Odometer reading log

use crate::unit::{Unit, UnitFamily};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A recorded odometer reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OdometerReading {
    /// Distance shown on the odometer
    pub value: i64,
    /// Unit of `value`
    pub unit: Unit,
    /// Day the reading was taken
    pub date: NaiveDate,
}

/// Readings of one vehicle, in recording order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OdometerLog {
    readings: Vec<OdometerReading>,
}

impl OdometerLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reading
    pub fn push(&mut self, reading: OdometerReading) {
        self.readings.push(reading);
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Most recent reading in `family`
    ///
    /// Later dates win; on the same date the later-recorded reading wins.
    pub fn latest(&self, family: UnitFamily) -> Option<&OdometerReading> {
        self.readings
            .iter()
            .enumerate()
            .filter(|(_, r)| r.unit.family() == family)
            .max_by_key(|(i, r)| (r.date, *i))
            .map(|(_, r)| r)
    }

    /// All readings in recording order
    pub fn iter(&self) -> impl Iterator<Item = &OdometerReading> {
        self.readings.iter()
    }
}

impl FromIterator<OdometerReading> for OdometerLog {
    fn from_iter<I: IntoIterator<Item = OdometerReading>>(iter: I) -> Self {
        Self {
            readings: iter.into_iter().collect(),
        }
    }
}
