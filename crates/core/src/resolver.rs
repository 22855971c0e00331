//! Checkpoint resolvers over numeric and calendar progressions

use crate::bracket::{self, Bracket};
use crate::error::Result;
use crate::interval::{Checkpoints, IntervalSet};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Maps observations onto non-negative offsets from a progression origin
///
/// Resolvers only ever see the offset; the progression decides what
/// "distance from the origin" means for its observation type.
pub trait Progression {
    /// What callers hand to a resolver (a reading, a date, ...)
    type Observation;

    /// Offset of `observation` from the origin; negative when before it
    fn offset(&self, observation: &Self::Observation) -> i64;

    /// Observation sitting at `offset`, if representable
    fn position(&self, offset: i64) -> Option<Self::Observation>;
}

/// Linear distance progression starting at zero (odometer readings)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Odometer;

impl Progression for Odometer {
    type Observation = i64;

    fn offset(&self, observation: &i64) -> i64 {
        *observation
    }

    fn position(&self, offset: i64) -> Option<i64> {
        Some(offset)
    }
}

/// Whole-day progression anchored at a start date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Calendar {
    start: NaiveDate,
}

impl Calendar {
    /// Progression whose position 0 is `start`
    pub fn starting(start: NaiveDate) -> Self {
        Self { start }
    }

    /// The origin date
    pub fn start(&self) -> NaiveDate {
        self.start
    }
}

impl Progression for Calendar {
    type Observation = NaiveDate;

    fn offset(&self, observation: &NaiveDate) -> i64 {
        observation.signed_duration_since(self.start).num_days()
    }

    fn position(&self, offset: i64) -> Option<NaiveDate> {
        let days = u64::try_from(offset).ok()?;
        self.start.checked_add_days(Days::new(days))
    }
}

/// Everything a resolver can say about one observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Offset of the observation from the origin
    pub offset: i64,
    /// Bracket containing the offset
    pub bracket: Bracket,
    /// Largest period due at the bracket's upper bound
    pub closest_major: i64,
    /// Largest period reached at the bracket's lower bound, if any
    pub nearest_minor: Option<i64>,
}

/// Resolves next/last dominant maintenance periods for a progression
///
/// Stateless apart from its immutable interval set and progression, so a
/// single resolver can serve concurrent queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointResolver<P> {
    set: IntervalSet,
    progression: P,
}

/// Resolver over raw distance readings
pub type NumericCheckpointResolver = CheckpointResolver<Odometer>;

/// Resolver over calendar dates anchored at a start date
pub type TemporalCheckpointResolver = CheckpointResolver<Calendar>;

impl<P: Progression> CheckpointResolver<P> {
    /// Create a resolver over `set` for the given progression
    pub fn with_progression(set: IntervalSet, progression: P) -> Self {
        Self { set, progression }
    }

    /// The periods this resolver selects from
    pub fn interval_set(&self) -> &IntervalSet {
        &self.set
    }

    /// The progression observations are measured against
    pub fn progression(&self) -> &P {
        &self.progression
    }

    /// Bracket containing `observation`, as offsets from the origin
    pub fn bracket(&self, observation: &P::Observation) -> Result<Bracket> {
        bracket::bracket(&self.set, self.progression.offset(observation))
    }

    /// Largest period coming due at the next checkpoint above `observation`
    pub fn closest_major(&self, observation: &P::Observation) -> Result<i64> {
        bracket::closest_major(&self.set, self.progression.offset(observation))
    }

    /// Largest period already reached at or before `observation`
    ///
    /// `Ok(None)` means no checkpoint has been passed yet.
    pub fn nearest_minor(&self, observation: &P::Observation) -> Result<Option<i64>> {
        bracket::nearest_minor(&self.set, self.progression.offset(observation))
    }

    /// Bracket, closest major and nearest minor in one query
    pub fn resolve(&self, observation: &P::Observation) -> Result<Resolution> {
        let offset = self.progression.offset(observation);
        Ok(Resolution {
            offset,
            bracket: bracket::bracket(&self.set, offset)?,
            closest_major: bracket::closest_major(&self.set, offset)?,
            nearest_minor: bracket::nearest_minor(&self.set, offset)?,
        })
    }

    /// Checkpoint offsets for `period` up to the largest period
    pub fn all_checkpoints(&self, period: i64) -> Result<Checkpoints> {
        self.set.all_checkpoints(period)
    }

    /// The observation at which the next checkpoint falls
    pub fn next_checkpoint(&self, observation: &P::Observation) -> Result<Option<P::Observation>> {
        let range = self.bracket(observation)?;
        Ok(self.progression.position(range.upper))
    }
}

impl NumericCheckpointResolver {
    /// Resolver over odometer-style readings
    pub fn new(set: IntervalSet) -> Self {
        Self::with_progression(set, Odometer)
    }
}

impl TemporalCheckpointResolver {
    /// Resolver over dates, with `start` as position 0
    pub fn new(set: IntervalSet, start: NaiveDate) -> Self {
        Self::with_progression(set, Calendar::starting(start))
    }

    /// The date elapsed days are counted from
    pub fn start(&self) -> NaiveDate {
        self.progression.start()
    }
}
