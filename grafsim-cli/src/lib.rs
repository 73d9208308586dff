//! Support library for the grafsim CLI binary.
//!
//! Re-exports the command pipeline so doctests and tests can drive it without
//! forking a subprocess.

pub mod cli;
pub mod logging;
