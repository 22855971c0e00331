//! Maintenance task codes used in manuals

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of work a maintenance operation performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Task {
    #[serde(rename = "I", alias = "inspect")]
    Inspect,
    #[serde(rename = "A", alias = "adjust")]
    Adjust,
    #[serde(rename = "R", alias = "replace")]
    Replace,
    #[serde(rename = "T", alias = "torque")]
    Torque,
    #[serde(rename = "L", alias = "lubricate")]
    Lubricate,
}

impl Task {
    /// One-letter code printed in maintenance tables
    pub fn code(self) -> char {
        match self {
            Task::Inspect => 'I',
            Task::Adjust => 'A',
            Task::Replace => 'R',
            Task::Torque => 'T',
            Task::Lubricate => 'L',
        }
    }

    /// Legend text for the code
    pub fn description(self) -> &'static str {
        match self {
            Task::Inspect => "Inspect and correct or replace if necessary",
            Task::Adjust => "Adjust",
            Task::Replace => "Replace or change",
            Task::Torque => "Tighten to the specified torque",
            Task::Lubricate => "Lubricate and/or grease",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_and_name_deserialize_to_same_task() {
        for task in [Task::Inspect, Task::Adjust, Task::Replace, Task::Torque, Task::Lubricate] {
            let by_code: Task = serde_json::from_str(&format!("\"{}\"", task.code())).unwrap();
            assert_eq!(by_code, task);
            assert_eq!(task.to_string(), task.code().to_string());
            assert!(!task.description().is_empty());
        }
        assert!(serde_json::from_str::<Task>("\"x\"").is_err());
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Task::Torque).unwrap(), "\"T\"");
        let task: Task = serde_json::from_str("\"replace\"").unwrap();
        assert_eq!(task, Task::Replace);
    }
}
