//! Measurement units for maintenance frequencies and readings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit a maintenance frequency or odometer reading is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// Kilometres driven
    #[serde(rename = "km", alias = "kilometers")]
    Kilometers,
    /// Miles driven
    #[serde(rename = "mi", alias = "miles")]
    Miles,
    /// Calendar days
    #[serde(rename = "days", alias = "días", alias = "dias")]
    Days,
    /// Calendar weeks (7 days)
    #[serde(rename = "weeks", alias = "semanas")]
    Weeks,
    /// Calendar months (fixed day length, see `to_family`)
    #[serde(rename = "months", alias = "meses")]
    Months,
}

/// Units that can share one interval set
///
/// Frequencies are normalised to the family's base unit before an
/// interval set is built, so weeks and months join the `Days` family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitFamily {
    Kilometers,
    Miles,
    Days,
}

impl Unit {
    /// The family this unit's values are normalised into
    pub fn family(self) -> UnitFamily {
        match self {
            Unit::Kilometers => UnitFamily::Kilometers,
            Unit::Miles => UnitFamily::Miles,
            Unit::Days | Unit::Weeks | Unit::Months => UnitFamily::Days,
        }
    }

    /// Convert `value` to the family's base unit
    ///
    /// Months count as `month_length_days` days. Returns `None` on overflow.
    pub fn to_family(self, value: i64, month_length_days: i64) -> Option<i64> {
        match self {
            Unit::Kilometers | Unit::Miles | Unit::Days => Some(value),
            Unit::Weeks => value.checked_mul(7),
            Unit::Months => value.checked_mul(month_length_days),
        }
    }

    /// Short label used in manuals and output
    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Kilometers => "km",
            Unit::Miles => "mi",
            Unit::Days => "days",
            Unit::Weeks => "weeks",
            Unit::Months => "months",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "km" | "kilometers" | "kilometres" => Ok(Unit::Kilometers),
            "mi" | "miles" => Ok(Unit::Miles),
            "d" | "days" | "días" | "dias" => Ok(Unit::Days),
            "w" | "weeks" | "semanas" => Ok(Unit::Weeks),
            "m" | "months" | "meses" => Ok(Unit::Months),
            other => Err(format!("Unknown unit: '{}'", other)),
        }
    }
}

impl UnitFamily {
    /// Whether positions in this family are calendar days
    pub fn is_temporal(self) -> bool {
        matches!(self, UnitFamily::Days)
    }

    /// Label of the family's base unit
    pub fn as_str(self) -> &'static str {
        match self {
            UnitFamily::Kilometers => "km",
            UnitFamily::Miles => "mi",
            UnitFamily::Days => "days",
        }
    }
}

impl fmt::Display for UnitFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
