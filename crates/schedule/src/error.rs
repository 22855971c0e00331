//! Errors raised while assembling or querying maintenance schedules

use crate::unit::UnitFamily;
use fleetcheck_core::IntervalError;
use thiserror::Error;

/// Schedule-level failure
///
/// Resolver failures are wrapped unchanged in `Interval`; the remaining
/// variants describe problems in the maintenance data itself.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error(transparent)]
    Interval(#[from] IntervalError),

    /// An operation carries a zero or negative frequency
    #[error("operation '{operation}' has non-positive frequency {frequency}")]
    NonPositiveFrequency { operation: String, frequency: i64 },

    /// Normalising a frequency to its family's base unit overflowed
    #[error("operation '{operation}' frequency is too large to normalise")]
    FrequencyOverflow { operation: String },

    /// Periods that are not multiples of the family's base granularity
    #[error("{family} periods {periods:?} are not multiples of the base granularity {base}")]
    NonHarmonic {
        family: UnitFamily,
        base: i64,
        periods: Vec<i64>,
    },

    /// No operation in the schedule uses this family
    #[error("no maintenance operations configured in {0}")]
    UnknownFamily(UnitFamily),

    /// A calendar query was made on a schedule without a start date
    #[error("schedule has no start date for calendar-based operations")]
    MissingStartDate,

    /// The manual could not be parsed
    #[error("invalid maintenance manual: {0}")]
    Parse(#[from] toml::de::Error),
}
