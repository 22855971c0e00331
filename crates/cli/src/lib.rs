//! Fleetcheck CLI library
//!
//! Command implementations and configuration handling behind the
//! `fleetcheck` binary.

pub mod cmd;
pub mod system_config;
pub mod util;
