//! System-wide configuration file
//!
//! Lives at `<config dir>/fleetcheck/config.toml` unless the
//! `FLEETCHECK_CONFIG` environment variable points elsewhere. A missing
//! file means "all defaults".

use anyhow::{Context, Result};
use fleetcheck_schedule::ScheduleOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "FLEETCHECK_CONFIG";

/// Log levels accepted in `[log] level`
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub display: DisplayConfig,
    pub schedule: ScheduleOptions,
    pub log: LogConfig,
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Colour output when writing to a terminal (default: true)
    pub color: bool,
    /// Emit JSON instead of text (default: false)
    pub json: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            json: false,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter when `RUST_LOG` is unset (default: warn)
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl SystemConfig {
    /// Check every value against its valid range
    pub fn validate(&self) -> Result<()> {
        let month = self.schedule.month_length_days;
        if !(28..=31).contains(&month) {
            anyhow::bail!(
                "schedule.month_length_days must be between 28 and 31, got {}",
                month
            );
        }

        if !LOG_LEVELS.contains(&self.log.level.as_str()) {
            anyhow::bail!(
                "log.level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.log.level
            );
        }

        Ok(())
    }
}

/// Location of the config file
pub fn config_file_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("fleetcheck").join("config.toml"))
}

/// Load the config file, falling back to defaults if it does not exist
pub fn load() -> Result<SystemConfig> {
    let path = config_file_path().context("Could not determine config file path")?;
    load_from(&path)
}

/// Load a config file from an explicit path
pub fn load_from(path: &Path) -> Result<SystemConfig> {
    if !path.exists() {
        debug!("No config file at {}, using defaults", path.display());
        return Ok(SystemConfig::default());
    }

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config: SystemConfig = toml::from_str(&text)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config: {}", path.display()))?;

    Ok(config)
}

/// Save the config file
pub fn save(config: &SystemConfig) -> Result<()> {
    let path = config_file_path().context("Could not determine config file path")?;
    save_to(config, &path)
}

/// Save a config file to an explicit path
///
/// Writes a sibling temporary file and renames it over the target so a
/// crash never leaves a truncated config behind.
pub fn save_to(config: &SystemConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let text = toml::to_string_pretty(config).context("Failed to serialize config")?;
    let tmp_path = path.with_extension("toml.tmp");
    std::fs::write(&tmp_path, text)
        .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    debug!("Saved config to {}", path.display());
    Ok(())
}

/// Write a default config file if none exists yet
pub fn init_if_missing() -> Result<PathBuf> {
    let path = config_file_path().context("Could not determine config file path")?;
    if !path.exists() {
        save_to(&SystemConfig::default(), &path)?;
    }
    Ok(path)
}

/// Annotated example config
pub fn example_config() -> &'static str {
    r#"# fleetcheck configuration

[display]
# Colour output when writing to a terminal
color = true
# Emit JSON instead of text
json = false

[schedule]
# Days per month when normalising monthly frequencies (28-31)
month_length_days = 30
# Reject manuals whose periods are not multiples of the smallest period
strict_harmonic = false

[log]
# Default log filter when RUST_LOG is unset: trace, debug, info, warn, error
level = "warn"
"#
}
