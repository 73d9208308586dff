//! Diagnostics for `grafsim` runs.
//!
//! Trial, metric and network failures are reported as `tracing` events from
//! the core crate. This module routes them to stderr, one line or one JSON
//! object per event, so the summary printed on stdout stays machine-readable.
//! Span close events carry per-model timings and trial counts.

use std::{env, sync::OnceLock};

use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

const LOG_FORMAT_ENV: &str = "GRAFSIM_LOG_FORMAT";
const DEFAULT_FILTER: &str = "info";

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Human,
    /// One JSON object per event.
    Json,
}

/// Errors raised while initialising structured logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Environment variable contained invalid UTF-8 data.
    #[error("environment variable `{name}` contained invalid UTF-8: {source}")]
    InvalidUnicode {
        /// Name of the offending environment variable.
        name: &'static str,
        /// Underlying parse failure.
        #[source]
        source: env::VarError,
    },
    /// Unsupported log format requested via `GRAFSIM_LOG_FORMAT`.
    #[error("unsupported log format `{provided}`; expected `human` or `json`")]
    UnsupportedFormat {
        /// Raw value supplied by the user.
        provided: String,
    },
    /// Failed to install the global tracing subscriber.
    #[error("failed to install tracing subscriber: {source}")]
    InstallFailed {
        /// Error raised by `tracing_subscriber`.
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
}

/// Install global structured logging if it has not already been configured.
///
/// `GRAFSIM_LOG_FORMAT=json` switches to JSON output; the level filter comes
/// from `RUST_LOG` and defaults to `info`. Diagnostics go to stderr so the
/// command summary on stdout stays clean.
///
/// # Errors
/// Returns [`LoggingError`] if the environment variable contains invalid
/// Unicode or names an unsupported format.
pub fn init_logging() -> Result<(), LoggingError> {
    if INITIALISED.get().is_some() {
        return Ok(());
    }

    match install_subscriber() {
        Ok(()) => {}
        Err(LoggingError::InstallFailed { source }) => report_existing_subscriber(&source),
        Err(err) => return Err(err),
    }
    let _ = INITIALISED.set(());
    Ok(())
}

fn install_subscriber() -> Result<(), LoggingError> {
    let format = match env::var(LOG_FORMAT_ENV) {
        Ok(raw) => parse_log_format(&raw)?,
        Err(env::VarError::NotPresent) => LogFormat::Human,
        Err(err @ env::VarError::NotUnicode(_)) => {
            return Err(LoggingError::InvalidUnicode {
                name: LOG_FORMAT_ENV,
                source: err,
            });
        }
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);

    let fmt_layer = match format {
        LogFormat::Json => fmt_layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
        LogFormat::Human => fmt_layer.boxed(),
    };

    // Best effort: another logger may already own the `log` slot.
    let _ = LogTracer::init();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|source| LoggingError::InstallFailed { source })
}

fn parse_log_format(raw: &str) -> Result<LogFormat, LoggingError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "human" | "" => Ok(LogFormat::Human),
        "json" => Ok(LogFormat::Json),
        other => Err(LoggingError::UnsupportedFormat {
            provided: other.to_owned(),
        }),
    }
}

#[expect(
    clippy::print_stderr,
    reason = "tracing is owned by someone else, so it cannot carry this notice"
)]
fn report_existing_subscriber(source: &tracing_subscriber::util::TryInitError) {
    eprintln!("structured logging already configured elsewhere: {source}");
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case("human", LogFormat::Human)]
    #[case("HUMAN", LogFormat::Human)]
    #[case("", LogFormat::Human)]
    #[case(" json ", LogFormat::Json)]
    fn parse_log_format_accepts_supported_values(#[case] raw: &str, #[case] expected: LogFormat) {
        let format = parse_log_format(raw).expect("format must parse");
        assert_eq!(format, expected);
    }

    #[test]
    fn parse_log_format_rejects_unknown_values() {
        let err = parse_log_format("xml").expect_err("xml is not supported");
        match err {
            LoggingError::UnsupportedFormat { provided } => assert_eq!(provided, "xml"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn init_logging_is_idempotent() {
        init_logging().expect("logging must initialise");
        init_logging().expect("subsequent calls must be no-ops");
    }
}
