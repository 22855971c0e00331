//! Schedule assembly: maintenance operations grouped into interval sets
//!
//! Operations are grouped by unit family and their frequencies normalised
//! to the family's base unit. Each family gets one interval set whose
//! periods are sorted ascending, so the smallest frequency becomes the
//! base granularity. Resolver answers (dominant periods) are mapped back
//! to every operation sharing that normalised frequency.

use crate::error::ScheduleError;
use crate::manual::{MaintenanceManual, MaintenanceOperation};
use crate::unit::UnitFamily;
use crate::Result;
use chrono::NaiveDate;
use fleetcheck_core::{
    Bracket, IntervalSet, NumericCheckpointResolver, Resolution, TemporalCheckpointResolver,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Knobs for schedule assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleOptions {
    /// Days counted per month when normalising monthly frequencies (default: 30)
    pub month_length_days: i64,
    /// Reject families whose periods break the harmonic invariant
    pub strict_harmonic: bool,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            month_length_days: 30,
            strict_harmonic: false,
        }
    }
}

/// A dominant period together with the operations it stands for
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Milestone {
    /// Family the period belongs to
    pub family: UnitFamily,
    /// Checkpoint position the period was aligned with
    pub checkpoint: i64,
    /// Dominant period, in the family's base unit
    pub period: i64,
    /// Operations whose normalised frequency equals `period`
    pub operations: Vec<MaintenanceOperation>,
}

/// Periods and operations of one unit family
#[derive(Debug, Clone)]
struct FamilySchedule {
    set: IntervalSet,
    /// (normalised frequency, operation), in input order
    operations: Vec<(i64, MaintenanceOperation)>,
}

impl FamilySchedule {
    fn sharing(&self, period: i64) -> Vec<MaintenanceOperation> {
        self.operations
            .iter()
            .filter(|(freq, _)| *freq == period)
            .map(|(_, op)| op.clone())
            .collect()
    }

    fn dividing(&self, position: i64) -> Vec<&MaintenanceOperation> {
        self.operations
            .iter()
            .filter(|(freq, _)| position % freq == 0)
            .map(|(_, op)| op)
            .collect()
    }
}

/// Per-family interval sets for one vehicle
#[derive(Debug, Clone)]
pub struct MaintenanceSchedule {
    families: BTreeMap<UnitFamily, FamilySchedule>,
    start_date: Option<NaiveDate>,
}

impl MaintenanceSchedule {
    /// Group `operations` by unit family and build one interval set each
    ///
    /// # Errors
    /// * `NonPositiveFrequency` / `FrequencyOverflow` for bad frequencies
    /// * `NonHarmonic` when `options.strict_harmonic` is set and a family
    ///   has periods that are not multiples of its smallest period
    pub fn from_operations<I>(operations: I, options: ScheduleOptions) -> Result<Self>
    where
        I: IntoIterator<Item = MaintenanceOperation>,
    {
        let mut grouped: BTreeMap<UnitFamily, Vec<(i64, MaintenanceOperation)>> = BTreeMap::new();

        for op in operations {
            if op.frequency <= 0 {
                return Err(ScheduleError::NonPositiveFrequency {
                    operation: op.label(),
                    frequency: op.frequency,
                });
            }
            let normalised = op
                .unit
                .to_family(op.frequency, options.month_length_days)
                .ok_or_else(|| ScheduleError::FrequencyOverflow {
                    operation: op.label(),
                })?;
            grouped
                .entry(op.unit.family())
                .or_default()
                .push((normalised, op));
        }

        let mut families = BTreeMap::new();
        for (family, operations) in grouped {
            let mut periods: Vec<i64> = operations.iter().map(|(freq, _)| *freq).collect();
            periods.sort_unstable();
            periods.dedup();

            let set = IntervalSet::new(periods)?;
            let stray: Vec<i64> = set.non_harmonic_periods().collect();
            if !stray.is_empty() {
                if options.strict_harmonic {
                    return Err(ScheduleError::NonHarmonic {
                        family,
                        base: set.base_granularity(),
                        periods: stray,
                    });
                }
                warn!(
                    %family,
                    base = set.base_granularity(),
                    ?stray,
                    "periods are not multiples of the base granularity"
                );
            }

            debug!(%family, periods = %set, "assembled interval set");
            families.insert(family, FamilySchedule { set, operations });
        }

        Ok(Self {
            families,
            start_date: None,
        })
    }

    /// Build a schedule from a manual, anchored at the manual's start date
    pub fn from_manual(manual: &MaintenanceManual, options: ScheduleOptions) -> Result<Self> {
        let schedule = Self::from_operations(manual.operations.iter().cloned(), options)?;
        Ok(match manual.start_date {
            Some(start) => schedule.with_start_date(start),
            None => schedule,
        })
    }

    /// Anchor calendar-based operations at `start`
    pub fn with_start_date(mut self, start: NaiveDate) -> Self {
        self.start_date = Some(start);
        self
    }

    /// Date calendar-based operations are counted from
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    /// Families that have at least one operation, in stable order
    pub fn families(&self) -> impl Iterator<Item = UnitFamily> + '_ {
        self.families.keys().copied()
    }

    /// Interval set assembled for `family`
    pub fn interval_set(&self, family: UnitFamily) -> Result<&IntervalSet> {
        Ok(&self.family(family)?.set)
    }

    /// Resolver over raw positions (distance, or elapsed days) in `family`
    pub fn numeric_resolver(&self, family: UnitFamily) -> Result<NumericCheckpointResolver> {
        Ok(NumericCheckpointResolver::new(self.family(family)?.set.clone()))
    }

    /// Resolver over calendar dates for the `Days` family
    pub fn temporal_resolver(&self) -> Result<TemporalCheckpointResolver> {
        let start = self.start_date.ok_or(ScheduleError::MissingStartDate)?;
        let family = self.family(UnitFamily::Days)?;
        Ok(TemporalCheckpointResolver::new(family.set.clone(), start))
    }

    /// Resolve a raw position in `family`
    pub fn resolve(&self, family: UnitFamily, position: i64) -> Result<Resolution> {
        Ok(self.numeric_resolver(family)?.resolve(&position)?)
    }

    /// Resolve a calendar date against the `Days` family
    pub fn resolve_on(&self, date: NaiveDate) -> Result<Resolution> {
        Ok(self.temporal_resolver()?.resolve(&date)?)
    }

    /// Most significant milestone due at the next checkpoint above `position`
    pub fn next_due(&self, family: UnitFamily, position: i64) -> Result<Milestone> {
        let resolution = self.resolve(family, position)?;
        self.major_milestone(family, &resolution)
    }

    /// Most significant milestone already reached at `position`
    ///
    /// `Ok(None)` while no checkpoint has been passed.
    pub fn last_reached(&self, family: UnitFamily, position: i64) -> Result<Option<Milestone>> {
        let resolution = self.resolve(family, position)?;
        self.minor_milestone(family, &resolution)
    }

    /// Calendar counterpart of [`next_due`](Self::next_due)
    pub fn next_due_on(&self, date: NaiveDate) -> Result<Milestone> {
        let resolution = self.resolve_on(date)?;
        self.major_milestone(UnitFamily::Days, &resolution)
    }

    /// Calendar counterpart of [`last_reached`](Self::last_reached)
    pub fn last_reached_on(&self, date: NaiveDate) -> Result<Option<Milestone>> {
        let resolution = self.resolve_on(date)?;
        self.minor_milestone(UnitFamily::Days, &resolution)
    }

    /// Every operation whose frequency divides checkpoint `position`
    ///
    /// This is the full work order at that checkpoint, not just the
    /// dominant operation.
    pub fn operations_due_at(
        &self,
        family: UnitFamily,
        position: i64,
    ) -> Result<Vec<&MaintenanceOperation>> {
        let family = self.family(family)?;
        if position < 0 {
            return Err(fleetcheck_core::IntervalError::NegativeObservation(position).into());
        }
        Ok(family.dividing(position))
    }

    fn family(&self, family: UnitFamily) -> Result<&FamilySchedule> {
        self.families
            .get(&family)
            .ok_or(ScheduleError::UnknownFamily(family))
    }

    fn major_milestone(&self, family: UnitFamily, resolution: &Resolution) -> Result<Milestone> {
        let Bracket { upper, .. } = resolution.bracket;
        Ok(Milestone {
            family,
            checkpoint: upper,
            period: resolution.closest_major,
            operations: self.family(family)?.sharing(resolution.closest_major),
        })
    }

    fn minor_milestone(
        &self,
        family: UnitFamily,
        resolution: &Resolution,
    ) -> Result<Option<Milestone>> {
        let Some(period) = resolution.nearest_minor else {
            return Ok(None);
        };
        Ok(Some(Milestone {
            family,
            checkpoint: resolution.bracket.lower,
            period,
            operations: self.family(family)?.sharing(period),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;
    use crate::unit::Unit;
    use fleetcheck_core::IntervalError;

    fn op(system: &str, task: Task, frequency: i64, unit: Unit) -> MaintenanceOperation {
        MaintenanceOperation {
            system: system.to_string(),
            subsystem: String::new(),
            task,
            description: String::new(),
            frequency,
            unit,
        }
    }

    fn fleet_ops() -> Vec<MaintenanceOperation> {
        vec![
            op("Engine oil", Task::Replace, 5000, Unit::Kilometers),
            op("Air filter", Task::Replace, 20000, Unit::Kilometers),
            op("Brakes", Task::Inspect, 10000, Unit::Kilometers),
            op("Oil filter", Task::Replace, 5000, Unit::Kilometers),
            op("Battery", Task::Inspect, 30, Unit::Days),
            op("Coolant", Task::Replace, 3, Unit::Months),
            op("Insurance check", Task::Inspect, 1, Unit::Weeks),
        ]
    }

    #[test]
    fn test_groups_by_family_and_sorts() {
        let schedule = MaintenanceSchedule::from_operations(fleet_ops(), ScheduleOptions::default())
            .unwrap();

        let families: Vec<_> = schedule.families().collect();
        assert_eq!(families, vec![UnitFamily::Kilometers, UnitFamily::Days]);

        let km = schedule.interval_set(UnitFamily::Kilometers).unwrap();
        assert_eq!(km.base_granularity(), 5000);
        assert_eq!(km.periods(), &[5000, 10000, 20000]);

        let days = schedule.interval_set(UnitFamily::Days).unwrap();
        assert_eq!(days.base_granularity(), 7);
        assert_eq!(days.periods(), &[7, 30, 90]);
    }

    #[test]
    fn test_next_due_maps_back_to_operations() {
        let schedule = MaintenanceSchedule::from_operations(fleet_ops(), ScheduleOptions::default())
            .unwrap();

        let next = schedule.next_due(UnitFamily::Kilometers, 17000).unwrap();
        assert_eq!(next.checkpoint, 20000);
        assert_eq!(next.period, 20000);
        assert_eq!(next.operations.len(), 1);
        assert_eq!(next.operations[0].system, "Air filter");

        let last = schedule
            .last_reached(UnitFamily::Kilometers, 17000)
            .unwrap()
            .unwrap();
        assert_eq!(last.checkpoint, 15000);
        assert_eq!(last.period, 5000);
        let systems: Vec<_> = last.operations.iter().map(|o| o.system.as_str()).collect();
        assert_eq!(systems, vec!["Engine oil", "Oil filter"]);
    }

    #[test]
    fn test_last_reached_none_before_first_service() {
        let schedule = MaintenanceSchedule::from_operations(fleet_ops(), ScheduleOptions::default())
            .unwrap();
        assert!(schedule
            .last_reached(UnitFamily::Kilometers, 3000)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_operations_due_at_checkpoint() {
        let schedule = MaintenanceSchedule::from_operations(fleet_ops(), ScheduleOptions::default())
            .unwrap();

        let due = schedule
            .operations_due_at(UnitFamily::Kilometers, 20000)
            .unwrap();
        assert_eq!(due.len(), 4);

        let due = schedule
            .operations_due_at(UnitFamily::Kilometers, 15000)
            .unwrap();
        assert_eq!(due.len(), 2);

        assert!(matches!(
            schedule.operations_due_at(UnitFamily::Kilometers, -5),
            Err(ScheduleError::Interval(IntervalError::NegativeObservation(-5)))
        ));
    }

    #[test]
    fn test_calendar_queries_need_start_date() {
        let schedule = MaintenanceSchedule::from_operations(fleet_ops(), ScheduleOptions::default())
            .unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap();
        assert!(matches!(
            schedule.next_due_on(today),
            Err(ScheduleError::MissingStartDate)
        ));

        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let schedule = schedule.with_start_date(start);
        // 95 days in: bracket [91, 98) in weeks
        let next = schedule.next_due_on(today).unwrap();
        assert_eq!(next.checkpoint, 98);
        assert_eq!(next.period, 7);
        let last = schedule.last_reached_on(today).unwrap().unwrap();
        assert_eq!(last.checkpoint, 91);
        assert_eq!(last.period, 7);
    }

    #[test]
    fn test_calendar_quarter_milestone() {
        let ops = vec![
            op("Battery", Task::Inspect, 30, Unit::Days),
            op("Coolant", Task::Replace, 90, Unit::Days),
            op("Timing belt", Task::Replace, 365, Unit::Days),
        ];
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let schedule = MaintenanceSchedule::from_operations(ops, ScheduleOptions::default())
            .unwrap()
            .with_start_date(start);

        let observed = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap();
        let next = schedule.next_due_on(observed).unwrap();
        assert_eq!((next.checkpoint, next.period), (120, 30));
        let last = schedule.last_reached_on(observed).unwrap().unwrap();
        assert_eq!((last.checkpoint, last.period), (90, 90));
        assert_eq!(last.operations[0].system, "Coolant");
    }

    #[test]
    fn test_month_length_is_configurable() {
        let ops = vec![op("Coolant", Task::Replace, 1, Unit::Months)];
        let options = ScheduleOptions {
            month_length_days: 31,
            ..ScheduleOptions::default()
        };
        let schedule = MaintenanceSchedule::from_operations(ops, options).unwrap();
        assert_eq!(
            schedule.interval_set(UnitFamily::Days).unwrap().periods(),
            &[31]
        );
    }

    #[test]
    fn test_unknown_family() {
        let schedule = MaintenanceSchedule::from_operations(fleet_ops(), ScheduleOptions::default())
            .unwrap();
        assert!(matches!(
            schedule.next_due(UnitFamily::Miles, 100),
            Err(ScheduleError::UnknownFamily(UnitFamily::Miles))
        ));
    }

    #[test]
    fn test_rejects_bad_frequency() {
        let ops = vec![op("Brakes", Task::Inspect, 0, Unit::Kilometers)];
        assert!(matches!(
            MaintenanceSchedule::from_operations(ops, ScheduleOptions::default()),
            Err(ScheduleError::NonPositiveFrequency { frequency: 0, .. })
        ));

        let ops = vec![op("Brakes", Task::Inspect, i64::MAX, Unit::Weeks)];
        assert!(matches!(
            MaintenanceSchedule::from_operations(ops, ScheduleOptions::default()),
            Err(ScheduleError::FrequencyOverflow { .. })
        ));
    }

    #[test]
    fn test_non_harmonic_strict_and_lenient() {
        let ops = vec![
            op("Engine oil", Task::Replace, 5000, Unit::Kilometers),
            op("Tyres", Task::Inspect, 7500, Unit::Kilometers),
        ];

        let lenient = MaintenanceSchedule::from_operations(ops.clone(), ScheduleOptions::default());
        assert!(lenient.is_ok());

        let strict = ScheduleOptions {
            strict_harmonic: true,
            ..ScheduleOptions::default()
        };
        match MaintenanceSchedule::from_operations(ops, strict) {
            Err(ScheduleError::NonHarmonic { family, base, periods }) => {
                assert_eq!(family, UnitFamily::Kilometers);
                assert_eq!(base, 5000);
                assert_eq!(periods, vec![7500]);
            }
            other => panic!("expected NonHarmonic, got {:?}", other),
        }
    }

    #[test]
    fn test_from_manual_uses_start_date() {
        let manual = MaintenanceManual {
            vehicle: "PBA-1234".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            operations: fleet_ops(),
            readings: Vec::new(),
        };
        let schedule = MaintenanceSchedule::from_manual(&manual, ScheduleOptions::default()).unwrap();
        assert_eq!(schedule.start_date(), manual.start_date);
        assert!(schedule.temporal_resolver().is_ok());
    }
}
