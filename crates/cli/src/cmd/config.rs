//! Configuration management command
//!
//! Provides CLI interface to view and edit system configuration.

use crate::system_config::{self, SystemConfig};
use crate::util::Palette;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;

/// Keys accepted by `--get` and `--set`
pub const KEYS: &[&str] = &[
    "display.color",
    "display.json",
    "schedule.month_length_days",
    "schedule.strict_harmonic",
    "log.level",
];

/// List all configuration values
pub fn run_list(p: Palette) -> Result<()> {
    let config = system_config::load()?;
    let config_path = system_config::config_file_path()
        .context("Could not determine config file path")?;

    println!("{}", "System Configuration".style(p.heading));
    println!(
        "{}: {}\n",
        "Location".style(p.dim),
        config_path.display().style(p.dim)
    );

    for key in KEYS {
        println!("  {} = {}", key.style(p.label), get_value(&config, key)?);
    }

    println!("\n{}", "Valid Ranges:".style(p.heading));
    println!("  schedule.month_length_days: 28-31");
    println!("  log.level: {}", system_config::LOG_LEVELS.join(", "));

    Ok(())
}

/// Get a single configuration value
pub fn run_get(key: &str) -> Result<()> {
    let config = system_config::load()?;
    println!("{}", get_value(&config, key)?);
    Ok(())
}

/// Set a configuration value
pub fn run_set(key: &str, value: &str, p: Palette) -> Result<()> {
    let mut config = system_config::load()?;
    set_value(&mut config, key, value)?;

    // Validate before saving
    config.validate().context("Invalid configuration value")?;

    system_config::save(&config)?;

    println!("{} {} = {}", "✓".style(p.ok), key.style(p.label), value);
    Ok(())
}

/// Show the config file path and optionally create it
pub fn run_path(create: bool, p: Palette) -> Result<()> {
    let config_path = system_config::config_file_path()
        .context("Could not determine config file path")?;

    if create && !config_path.exists() {
        system_config::init_if_missing()?;
        println!("{} Created config file at: {}", "✓".style(p.ok), config_path.display());
    } else {
        println!("{}", config_path.display());
        if !config_path.exists() {
            println!(
                "{}",
                "File does not exist. Use --create to create it.".style(p.warn)
            );
        }
    }

    Ok(())
}

/// Show example configuration
pub fn run_example() -> Result<()> {
    print!("{}", system_config::example_config());
    Ok(())
}

fn get_value(config: &SystemConfig, key: &str) -> Result<String> {
    let value = match key {
        "display.color" => config.display.color.to_string(),
        "display.json" => config.display.json.to_string(),
        "schedule.month_length_days" => config.schedule.month_length_days.to_string(),
        "schedule.strict_harmonic" => config.schedule.strict_harmonic.to_string(),
        "log.level" => config.log.level.clone(),
        _ => anyhow::bail!(
            "Unknown config key: {}. Use 'fleetcheck config --list' to see available keys.",
            key
        ),
    };
    Ok(value)
}

fn set_value(config: &mut SystemConfig, key: &str, value: &str) -> Result<()> {
    match key {
        "display.color" => {
            config.display.color = value
                .parse()
                .context("Invalid value: must be 'true' or 'false'")?;
        }
        "display.json" => {
            config.display.json = value
                .parse()
                .context("Invalid value: must be 'true' or 'false'")?;
        }
        "schedule.month_length_days" => {
            config.schedule.month_length_days = value
                .parse()
                .context("Invalid value: must be an integer")?;
        }
        "schedule.strict_harmonic" => {
            config.schedule.strict_harmonic = value
                .parse()
                .context("Invalid value: must be 'true' or 'false'")?;
        }
        "log.level" => {
            config.log.level = value.trim().to_lowercase();
        }
        _ => anyhow::bail!(
            "Unknown config key: {}. Use 'fleetcheck config --list' to see available keys.",
            key
        ),
    }
    Ok(())
}
