//! Single-observation queries: bracket, next milestone, last milestone

use crate::util::{self, Output, Target};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use serde_json::json;

/// Which answer to print
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    /// Bracket containing the observation
    Bracket,
    /// Closest major milestone ahead
    Next,
    /// Nearest minor milestone behind
    Last,
}

pub fn run(
    query: Query,
    periods: &[i64],
    start: Option<NaiveDate>,
    value: &str,
    out: Output,
) -> Result<()> {
    let set = util::interval_set(periods)?;
    let target = Target::parse(set, start, value)?;

    let (offset, resolution) = match &target {
        Target::Numeric { resolver, reading } => (*reading, resolver.resolve(reading)),
        Target::Temporal { resolver, date } => {
            let offset = date.signed_duration_since(resolver.start()).num_days();
            (offset, resolver.resolve(date))
        }
    };
    let resolution = resolution.with_context(|| format!("Cannot resolve '{}'", value))?;

    let bracket = resolution.bracket;
    let lower_date = target.date_at(bracket.lower);
    let upper_date = target.date_at(bracket.upper);

    if out.json {
        let report = match query {
            Query::Bracket => json!({
                "offset": offset,
                "lower": bracket.lower,
                "upper": bracket.upper,
                "lower_date": lower_date,
                "upper_date": upper_date,
            }),
            Query::Next => json!({
                "offset": offset,
                "closest_major": resolution.closest_major,
                "checkpoint": bracket.upper,
                "date": upper_date,
            }),
            Query::Last => json!({
                "offset": offset,
                "nearest_minor": resolution.nearest_minor,
                "checkpoint": resolution.nearest_minor.map(|_| bracket.lower),
                "date": resolution.nearest_minor.and(lower_date),
            }),
        };
        return util::print_json(&report);
    }

    let p = out.palette;
    let unit = target.unit_suffix();
    let set = match &target {
        Target::Numeric { resolver, .. } => resolver.interval_set(),
        Target::Temporal { resolver, .. } => resolver.interval_set(),
    };

    println!("{:<15}{}", "Periods:".style(p.label), set);
    match &target {
        Target::Numeric { reading, .. } => {
            println!("{:<15}{}", "Observation:".style(p.label), reading);
        }
        Target::Temporal { date, .. } => {
            println!(
                "{:<15}{} {}",
                "Observation:".style(p.label),
                date,
                format!("(day {})", offset).style(p.dim)
            );
        }
    }

    match query {
        Query::Bracket => {
            println!(
                "{:<15}{}{}",
                "Bracket:".style(p.label),
                bracket.style(p.value),
                unit
            );
            if let (Some(lo), Some(hi)) = (lower_date, upper_date) {
                println!("{:<15}{} .. {}", "", lo, hi);
            }
        }
        Query::Next => {
            println!(
                "{:<15}{}{} {}",
                "Closest major:".style(p.label),
                resolution.closest_major.style(p.value),
                unit,
                format!("(at {}{})", bracket.upper, util::date_suffix(upper_date)).style(p.dim)
            );
        }
        Query::Last => match resolution.nearest_minor {
            Some(minor) => println!(
                "{:<15}{}{} {}",
                "Nearest minor:".style(p.label),
                minor.style(p.value),
                unit,
                format!("(at {}{})", bracket.lower, util::date_suffix(lower_date)).style(p.dim)
            ),
            None => println!(
                "{:<15}{}",
                "Nearest minor:".style(p.label),
                "none (no checkpoint reached yet)".style(p.dim)
            ),
        },
    }

    Ok(())
}
