//! Process exit codes returned by [`crate::run`].

pub const SUCCESS: i32 = 0;

/// Invalid arguments, configuration or engine failure.
pub const ERROR: i32 = 2;

/// Simulation stopped before completing its rounds.
pub const INTERRUPTED: i32 = 130;
