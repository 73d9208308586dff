//! Command-line interface for grafsim.
//!
//! `run` simulates one model (or all of them) against edge-list networks and
//! writes a CSV per model, `describe` prints the parameters each network
//! resolves to and `list` prints the known identifiers.

mod commands;
mod config;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, ModelOutput, NetworkArgs, RunCommand,
    render_summary, run_cli,
};
pub use config::{
    ConfigError, ConfigFile, DEFAULT_SEED, InvalidNetworkEntry, NetworkEntry, Overrides, RunTable,
    Settings,
};

#[cfg(test)]
mod test_helpers;
