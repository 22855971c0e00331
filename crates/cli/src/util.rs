//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use chrono::NaiveDate;
use fleetcheck_core::{IntervalSet, NumericCheckpointResolver, TemporalCheckpointResolver};
use owo_colors::Style;
use serde::Serialize;
use std::io::IsTerminal;

/// Output settings resolved from config and flags
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
    pub palette: Palette,
}

impl Output {
    /// Colour only when enabled and stdout is a terminal
    pub fn new(json: bool, color: bool) -> Self {
        let color = color && !json && std::io::stdout().is_terminal();
        Self {
            json,
            palette: Palette::new(color),
        }
    }
}

/// Text styles used by command output; all plain when colour is off
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub heading: Style,
    pub label: Style,
    pub value: Style,
    pub dim: Style,
    pub ok: Style,
    pub warn: Style,
}

impl Palette {
    pub fn new(color: bool) -> Self {
        if !color {
            let plain = Style::new();
            return Self {
                heading: plain,
                label: plain,
                value: plain,
                dim: plain,
                ok: plain,
                warn: plain,
            };
        }

        Self {
            heading: Style::new().bold(),
            label: Style::new().cyan(),
            value: Style::new().yellow(),
            dim: Style::new().dimmed(),
            ok: Style::new().green(),
            warn: Style::new().yellow().bold(),
        }
    }
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to render JSON")?;
    println!("{}", text);
    Ok(())
}

/// Build an interval set from `--periods`, base granularity first
pub fn interval_set(periods: &[i64]) -> Result<IntervalSet> {
    IntervalSet::new(periods.iter().copied())
        .with_context(|| format!("Invalid periods: {:?}", periods))
}

/// A query target: an odometer reading or a date on a calendar progression
#[derive(Debug, Clone)]
pub enum Target {
    Numeric {
        resolver: NumericCheckpointResolver,
        reading: i64,
    },
    Temporal {
        resolver: TemporalCheckpointResolver,
        date: NaiveDate,
    },
}

impl Target {
    /// Interpret `value` as a reading, or as a date when `start` is given
    pub fn parse(set: IntervalSet, start: Option<NaiveDate>, value: &str) -> Result<Self> {
        match start {
            Some(start) => Ok(Target::Temporal {
                resolver: TemporalCheckpointResolver::new(set, start),
                date: parse_date(value)?,
            }),
            None => Ok(Target::Numeric {
                resolver: NumericCheckpointResolver::new(set),
                reading: value
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid reading '{}': expected an integer", value))?,
            }),
        }
    }

    /// Date at day `offset`, for calendar targets
    pub fn date_at(&self, offset: i64) -> Option<NaiveDate> {
        use fleetcheck_core::Progression;

        match self {
            Target::Numeric { .. } => None,
            Target::Temporal { resolver, .. } => resolver.progression().position(offset),
        }
    }

    /// Unit suffix for human output
    pub fn unit_suffix(&self) -> &'static str {
        match self {
            Target::Numeric { .. } => "",
            Target::Temporal { .. } => " days",
        }
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}': expected YYYY-MM-DD", value))
}

/// Today's date in local time
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Format an optional date as ` (YYYY-MM-DD)` or nothing
pub fn date_suffix(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => format!(" ({})", d),
        None => String::new(),
    }
}
