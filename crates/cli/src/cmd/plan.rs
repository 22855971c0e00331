//! Maintenance plan for one vehicle manual
//!
//! For every unit family in the manual, resolves the current position
//! (latest odometer reading, or today's date for calendar operations)
//! into the last milestone reached, the next milestone due, and the full
//! work order at the next checkpoint.

use crate::util::{self, Output, Palette};
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use fleetcheck_core::{Calendar, Progression};
use fleetcheck_schedule::{
    MaintenanceManual, MaintenanceOperation, MaintenanceSchedule, Milestone, ScheduleOptions,
    Task, Unit, UnitFamily,
};
use std::collections::BTreeSet;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// Odometer value given with `--odometer`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OdometerFlag {
    pub value: i64,
    /// Unit of `value`; may be omitted when the manual has one distance family
    pub unit: Option<Unit>,
}

/// Where the position of a family came from
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PositionSource {
    /// `--odometer` flag
    Flag,
    /// Latest reading recorded in the manual
    Reading { date: NaiveDate },
    /// Calendar date (`--date` or today)
    Date { date: NaiveDate },
}

/// Resolved plan for one family
#[derive(Debug, Clone, Serialize)]
pub struct FamilyPlan {
    pub family: UnitFamily,
    pub periods: Vec<i64>,
    pub position: i64,
    pub source: PositionSource,
    pub last: Option<Milestone>,
    pub next: Milestone,
    pub next_date: Option<NaiveDate>,
    pub work_order: Vec<MaintenanceOperation>,
}

/// A family that could not be planned
#[derive(Debug, Clone, Serialize)]
pub struct Skipped {
    pub family: UnitFamily,
    pub reason: String,
}

/// Whole-manual plan
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub vehicle: String,
    pub families: Vec<FamilyPlan>,
    pub skipped: Vec<Skipped>,
}

/// Resolve every family of `manual`
pub fn build(
    manual: &MaintenanceManual,
    options: ScheduleOptions,
    odometer: Option<OdometerFlag>,
    date: NaiveDate,
) -> Result<Plan> {
    let schedule = MaintenanceSchedule::from_manual(manual, options)
        .with_context(|| format!("Invalid maintenance data for {}", manual.vehicle))?;
    let log = manual.odometer_log();
    let flagged = odometer
        .map(|flag| flag_family(&schedule, flag).map(|family| (family, flag.value)))
        .transpose()?;

    let mut plan = Plan {
        vehicle: manual.vehicle.clone(),
        families: Vec::new(),
        skipped: Vec::new(),
    };

    for family in schedule.families() {
        let periods = schedule.interval_set(family)?.periods().to_vec();

        let resolved = if family.is_temporal() {
            let Some(start) = schedule.start_date() else {
                warn!(vehicle = %manual.vehicle, "calendar operations without start_date");
                plan.skipped.push(Skipped {
                    family,
                    reason: "manual has no start_date".to_string(),
                });
                continue;
            };
            let calendar = Calendar::starting(start);
            let position = calendar.offset(&date);
            let next = schedule.next_due_on(date)?;
            let last = schedule.last_reached_on(date)?;
            let next_date = calendar.position(next.checkpoint);
            (position, PositionSource::Date { date }, last, next, next_date)
        } else {
            let flag = flagged.filter(|(flag_family, _)| *flag_family == family);
            let (position, source) = match (flag, log.latest(family)) {
                (Some((_, value)), _) => (value, PositionSource::Flag),
                (None, Some(reading)) => (
                    reading.value,
                    PositionSource::Reading { date: reading.date },
                ),
                (None, None) => {
                    plan.skipped.push(Skipped {
                        family,
                        reason: "no odometer reading recorded".to_string(),
                    });
                    continue;
                }
            };
            let next = schedule.next_due(family, position)?;
            let last = schedule.last_reached(family, position)?;
            (position, source, last, next, None)
        };

        let (position, source, last, next, next_date) = resolved;
        let work_order = schedule
            .operations_due_at(family, next.checkpoint)?
            .into_iter()
            .cloned()
            .collect();

        info!(%family, position, next = next.period, "resolved family plan");
        plan.families.push(FamilyPlan {
            family,
            periods,
            position,
            source,
            last,
            next,
            next_date,
            work_order,
        });
    }

    Ok(plan)
}

/// Distance family an `--odometer` value belongs to
fn flag_family(schedule: &MaintenanceSchedule, flag: OdometerFlag) -> Result<UnitFamily> {
    let distance: Vec<UnitFamily> = schedule.families().filter(|f| !f.is_temporal()).collect();

    match flag.unit {
        Some(unit) => {
            let family = unit.family();
            if family.is_temporal() {
                bail!("--odometer needs a distance unit, got '{}'", unit);
            }
            if !distance.contains(&family) {
                bail!("Manual has no operations measured in {}", family);
            }
            Ok(family)
        }
        None => match distance.as_slice() {
            [family] => Ok(*family),
            [] => bail!("Manual has no distance-based operations for --odometer"),
            several => {
                let names: Vec<&str> = several.iter().map(|f| f.as_str()).collect();
                bail!(
                    "Manual measures distance in {}; pass --unit with --odometer",
                    names.join(" and ")
                )
            }
        },
    }
}

pub fn run(
    manual_path: &Path,
    options: ScheduleOptions,
    odometer: Option<OdometerFlag>,
    date: Option<NaiveDate>,
    out: Output,
) -> Result<()> {
    let manual = MaintenanceManual::load(manual_path)?;
    let plan = build(&manual, options, odometer, date.unwrap_or_else(util::today))?;

    if out.json {
        return util::print_json(&plan);
    }

    let p = out.palette;
    println!("{} {}", "Vehicle:".style(p.heading), plan.vehicle.style(p.value));

    for fp in &plan.families {
        println!();
        print_family(fp, p);
    }

    for skipped in &plan.skipped {
        println!();
        println!(
            "{} {}",
            format!("[{}]", skipped.family).style(p.label),
            format!("skipped: {}", skipped.reason).style(p.warn)
        );
    }

    let tasks = tasks_used(&plan);
    if !tasks.is_empty() {
        println!();
        println!("{}", "Task codes:".style(p.heading));
        for task in tasks {
            println!("  {}  {}", task.style(p.label), task.description().style(p.dim));
        }
    }

    Ok(())
}

/// Task kinds appearing in any printed milestone or work order
fn tasks_used(plan: &Plan) -> BTreeSet<Task> {
    plan.families
        .iter()
        .flat_map(|fp| {
            let last = fp.last.iter().flat_map(|m| m.operations.iter());
            last.chain(&fp.next.operations).chain(&fp.work_order)
        })
        .map(|op| op.task)
        .collect()
}

fn print_family(fp: &FamilyPlan, p: Palette) {
    let unit = fp.family.as_str();
    let source = match &fp.source {
        PositionSource::Flag => "from --odometer".to_string(),
        PositionSource::Reading { date } => format!("reading of {}", date),
        PositionSource::Date { date } => format!("on {}", date),
    };
    let periods: Vec<String> = fp.periods.iter().map(|p| p.to_string()).collect();

    println!(
        "{} periods {}",
        format!("[{}]", unit).style(p.label),
        periods.join(", ")
    );
    println!(
        "  {:<14}{} {} {}",
        "Position:",
        fp.position.style(p.value),
        unit,
        format!("({})", source).style(p.dim)
    );

    match &fp.last {
        Some(last) => {
            println!(
                "  {:<14}{} {} {}",
                "Last reached:",
                last.period.style(p.value),
                unit,
                format!("(at {})", last.checkpoint).style(p.dim)
            );
            print_operations(&last.operations, p);
        }
        None => println!("  {:<14}{}", "Last reached:", "none yet".style(p.dim)),
    }

    println!(
        "  {:<14}{} {} {}",
        "Next due:",
        fp.next.period.style(p.ok),
        unit,
        format!("(at {}{})", fp.next.checkpoint, util::date_suffix(fp.next_date)).style(p.dim)
    );
    print_operations(&fp.next.operations, p);

    println!("  {}", format!("Work order at {}:", fp.next.checkpoint).style(p.heading));
    print_operations(&fp.work_order, p);
}

fn print_operations(ops: &[MaintenanceOperation], p: Palette) {
    for op in ops {
        println!("    - {}", op.label().style(p.dim));
    }
}
