//! List the checkpoint positions of one period

use crate::util::{self, Output};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use fleetcheck_core::{Calendar, Progression};
use owo_colors::OwoColorize;
use serde_json::json;

pub fn run(
    periods: &[i64],
    period: Option<i64>,
    start: Option<NaiveDate>,
    out: Output,
) -> Result<()> {
    let set = util::interval_set(periods)?;
    let period = period.unwrap_or_else(|| set.base_granularity());
    let checkpoints = set
        .all_checkpoints(period)
        .with_context(|| format!("Cannot list checkpoints for period {}", period))?;

    let calendar = start.map(Calendar::starting);
    let date_at = |offset: i64| calendar.as_ref().and_then(|cal| cal.position(offset));

    if out.json {
        let rows: Vec<_> = checkpoints
            .map(|c| json!({ "position": c, "date": date_at(c) }))
            .collect();
        return util::print_json(&json!({
            "period": period,
            "largest": set.largest(),
            "checkpoints": rows,
        }));
    }

    let p = out.palette;
    println!(
        "{} {} {}",
        "Checkpoints every".style(p.heading),
        period.style(p.value),
        format!("(up to {})", set.largest()).style(p.dim)
    );
    for position in checkpoints {
        match date_at(position) {
            Some(date) => println!("  {:>10}  {}", position, date.style(p.dim)),
            None => println!("  {:>10}", position),
        }
    }

    Ok(())
}
