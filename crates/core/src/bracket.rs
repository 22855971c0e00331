//! Bracket computation and dominant-interval selection
//!
//! Both resolvers reduce their observation to a non-negative offset from
//! the progression origin and then run the same two steps:
//! 1. bracket the offset in steps of the base granularity
//! 2. pick the largest period dividing the relevant bracket bound

use crate::error::{IntervalError, Result};
use crate::interval::IntervalSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Half-open range `[lower, upper)` of width equal to the base granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bracket {
    /// Last checkpoint at or before the observation
    pub lower: i64,
    /// Next checkpoint strictly after the observation
    pub upper: i64,
}

impl Bracket {
    /// Distance between the two bounds
    pub fn width(&self) -> i64 {
        self.upper - self.lower
    }

    /// Check whether `position` falls inside `[lower, upper)`
    pub fn contains(&self, position: i64) -> bool {
        self.lower <= position && position < self.upper
    }
}

impl fmt::Display for Bracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.lower, self.upper)
    }
}

/// Bracket `offset` in steps of the set's base granularity
///
/// # Errors
/// * `NegativeObservation` if `offset < 0`
/// * `ObservationOverflow` if the next checkpoint does not fit in `i64`
pub fn bracket(set: &IntervalSet, offset: i64) -> Result<Bracket> {
    let lower = floor_checkpoint(set, offset)?;
    let upper = lower
        .checked_add(set.base_granularity())
        .ok_or(IntervalError::ObservationOverflow(offset))?;
    Ok(Bracket { lower, upper })
}

/// Last base checkpoint at or before `offset`
fn floor_checkpoint(set: &IntervalSet, offset: i64) -> Result<i64> {
    if offset < 0 {
        return Err(IntervalError::NegativeObservation(offset));
    }
    let step = set.base_granularity();
    Ok((offset / step) * step)
}

/// Largest period due at or before the next checkpoint above `offset`
///
/// # Errors
/// * `NegativeObservation` if `offset < 0`
/// * `ObservationOverflow` if the next checkpoint does not fit in `i64`
/// * `NoApplicableInterval` if no period divides the upper bound
pub fn closest_major(set: &IntervalSet, offset: i64) -> Result<i64> {
    let range = bracket(set, offset)?;
    let major = set
        .dominant_divisor(range.upper)
        .ok_or(IntervalError::NoApplicableInterval(range.upper))?;

    trace!(offset, %range, major, "resolved closest major");
    Ok(major)
}

/// Largest period already reached at or before `offset`
///
/// Returns `Ok(None)` while `offset` is still below the base granularity:
/// no checkpoint has been passed yet.
///
/// # Errors
/// * `NegativeObservation` if `offset < 0`
/// * `NoApplicableInterval` if no period divides the lower bound
pub fn nearest_minor(set: &IntervalSet, offset: i64) -> Result<Option<i64>> {
    let lower = floor_checkpoint(set, offset)?;
    if offset < set.base_granularity() {
        return Ok(None);
    }

    let minor = set
        .dominant_divisor(lower)
        .ok_or(IntervalError::NoApplicableInterval(lower))?;

    trace!(offset, lower, minor, "resolved nearest minor");
    Ok(Some(minor))
}
