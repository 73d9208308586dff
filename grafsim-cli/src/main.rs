//! `grafsim` binary.
//!
//! `grafsim run` writes one `Modelo_<id>.csv` per selected model,
//! `grafsim describe` prints `N` and `⟨k⟩` for each network, and `grafsim list`
//! prints the model and metric identifiers. The summary goes to stdout.
//! A failing command logs its `GRAFSIM_*` code, when it has one, and exits
//! with status 1. Networks or trials that fail inside `run` are reported in
//! the summary and do not change the exit status.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use grafsim_cli::{
    cli::{Cli, CliError, render_summary, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

/// Runs the parsed command and prints its summary.
fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let summary = run_cli(cli).context("failed to execute command")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_summary(&summary, &mut writer).context("failed to render summary")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        let code = err.downcast_ref::<CliError>().and_then(CliError::code);
        error!(
            error = %format_args!("{err:#}"),
            code = code.map(field::display),
            "command execution failed"
        );
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialized"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
