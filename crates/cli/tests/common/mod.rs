//! Common utilities for integration tests

pub mod cli;

/// Kilometre and calendar manual used across command tests
pub const MANUAL: &str = r#"
vehicle = "PBA-1234"
start_date = "2024-01-01"

[[operations]]
system = "Engine"
subsystem = "Lubrication"
task = "R"
description = "engine oil"
frequency = 5000
unit = "km"

[[operations]]
system = "Engine"
subsystem = "Intake"
task = "R"
description = "air filter"
frequency = 20000
unit = "km"

[[operations]]
system = "Brakes"
task = "I"
frequency = 10000
unit = "km"

[[operations]]
system = "Battery"
task = "I"
frequency = 30
unit = "days"

[[operations]]
system = "Cooling"
task = "R"
description = "coolant"
frequency = 3
unit = "meses"

[[readings]]
value = 17000
unit = "km"
date = "2024-05-01"
"#;

/// Write `MANUAL` into `dir` and return its path as a string
pub fn write_manual(dir: &std::path::Path) -> anyhow::Result<String> {
    let path = dir.join("manual.toml");
    std::fs::write(&path, MANUAL)?;
    Ok(path.display().to_string())
}
