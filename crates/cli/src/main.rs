//! Fleetcheck CLI - fleetcheck command

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use cli_lib::cmd;
use cli_lib::cmd::plan::OdometerFlag;
use cli_lib::cmd::query::Query;
use cli_lib::system_config::{self, SystemConfig};
use cli_lib::util::Output;
use fleetcheck_schedule::Unit;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Fleetcheck - periodic maintenance checkpoints for vehicle fleets
#[derive(Parser)]
#[command(name = "fleetcheck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Interval set and observation shared by the query commands
#[derive(Args)]
struct QueryArgs {
    /// Comma-separated periods, smallest (base granularity) first
    #[arg(long, value_delimiter = ',', required = true, allow_hyphen_values = true)]
    periods: Vec<i64>,

    /// Start date (YYYY-MM-DD); makes VALUE a calendar date
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Odometer reading, or a date (YYYY-MM-DD) when --start is given
    #[arg(allow_hyphen_values = true)]
    value: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the checkpoint bracket containing an observation
    Bracket(QueryArgs),
    /// Show the most significant period due at the next checkpoint
    Next(QueryArgs),
    /// Show the most significant period already reached
    Last(QueryArgs),
    /// List checkpoint positions for one period
    Checkpoints {
        /// Comma-separated periods, smallest (base granularity) first
        #[arg(long, value_delimiter = ',', required = true, allow_hyphen_values = true)]
        periods: Vec<i64>,

        /// Period to list (default: base granularity)
        #[arg(long, allow_hyphen_values = true)]
        period: Option<i64>,

        /// Start date; prints the calendar date of each checkpoint
        #[arg(long)]
        start: Option<NaiveDate>,
    },
    /// Resolve next and last milestones for a vehicle manual
    Plan {
        /// Maintenance manual (TOML)
        manual: PathBuf,

        /// Odometer reading (default: latest reading in the manual)
        #[arg(long)]
        odometer: Option<i64>,

        /// Unit of --odometer (km, mi); required when the manual uses both
        #[arg(long, requires = "odometer")]
        unit: Option<Unit>,

        /// Date for calendar operations (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Reject periods that are not multiples of the smallest period
        #[arg(long)]
        strict: bool,
    },
    /// View and edit configuration
    Config {
        /// List all values
        #[arg(long)]
        list: bool,

        /// Print one value
        #[arg(long, value_name = "KEY")]
        get: Option<String>,

        /// Set one value
        #[arg(long, num_args = 2, value_names = ["KEY", "VALUE"])]
        set: Option<Vec<String>>,

        /// Print the config file path
        #[arg(long)]
        path: bool,

        /// Create the config file if missing (with --path)
        #[arg(long, requires = "path")]
        create: bool,

        /// Print an annotated example config
        #[arg(long)]
        example: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, config_error) = match system_config::load() {
        Ok(config) => (config, None),
        Err(e) => (SystemConfig::default(), Some(e)),
    };

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Some(e) = config_error {
        warn!("Ignoring config file: {:#}", e);
    }

    let out = Output::new(
        cli.json || config.display.json,
        config.display.color && !cli.no_color,
    );

    match cli.command {
        Commands::Bracket(args) => run_query(Query::Bracket, args, out),
        Commands::Next(args) => run_query(Query::Next, args, out),
        Commands::Last(args) => run_query(Query::Last, args, out),
        Commands::Checkpoints { periods, period, start } => {
            cmd::checkpoints::run(&periods, period, start, out)
        }
        Commands::Plan { manual, odometer, unit, date, strict } => {
            let mut options = config.schedule;
            options.strict_harmonic |= strict;
            let odometer = odometer.map(|value| OdometerFlag { value, unit });
            cmd::plan::run(&manual, options, odometer, date, out)
        }
        Commands::Config { list, get, set, path, create, example } => {
            let p = out.palette;
            if list {
                cmd::config::run_list(p)
            } else if let Some(key) = get {
                cmd::config::run_get(&key)
            } else if let Some(pair) = set {
                cmd::config::run_set(&pair[0], &pair[1], p)
            } else if path {
                cmd::config::run_path(create, p)
            } else if example {
                cmd::config::run_example()
            } else {
                cmd::config::run_list(p)
            }
        }
    }
}

fn run_query(query: Query, args: QueryArgs, out: Output) -> Result<()> {
    cmd::query::run(query, &args.periods, args.start, &args.value, out)
}
