//! CLI command implementations

pub mod checkpoints;
pub mod config;
pub mod plan;
pub mod query;
