//! Fleetcheck Core - periodic maintenance checkpoint resolution
//!
//! This crate provides the pure computation layer:
//! - Validated, immutable interval sets (maintenance periods in one unit)
//! - Bracket computation in steps of the base granularity
//! - Dominant-interval selection (closest major / nearest minor)
//! - Numeric (odometer) and temporal (calendar) resolvers

pub mod bracket;
pub mod error;
pub mod interval;
pub mod resolver;

// Re-export main types for convenience
pub use bracket::{bracket, closest_major, nearest_minor, Bracket};
pub use error::{IntervalError, Result};
pub use interval::{Checkpoints, IntervalSet};
pub use resolver::{
    Calendar, CheckpointResolver, NumericCheckpointResolver, Odometer, Progression, Resolution,
    TemporalCheckpointResolver,
};
