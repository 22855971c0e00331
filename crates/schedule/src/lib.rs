//! Maintenance schedules built on top of the checkpoint resolver
//!
//! This crate provides:
//! - Units and unit families (distance vs. calendar)
//! - Maintenance tasks, operations and manuals
//! - Odometer reading logs
//! - Schedule assembly: one interval set per unit family, with
//!   dominant periods mapped back to the operations that share them

pub mod error;
pub mod manual;
pub mod odometer;
pub mod schedule;
pub mod task;
pub mod unit;

// Re-exports
pub use error::ScheduleError;
pub use manual::{MaintenanceManual, MaintenanceOperation};
pub use odometer::{OdometerLog, OdometerReading};
pub use schedule::{MaintenanceSchedule, Milestone, ScheduleOptions};
pub use task::Task;
pub use unit::{Unit, UnitFamily};

/// Result type for schedule operations
pub type Result<T, E = ScheduleError> = std::result::Result<T, E>;
