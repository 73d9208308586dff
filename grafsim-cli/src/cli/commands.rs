//! Command implementations and argument parsing for the grafsim CLI.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use grafsim_core::{
    MetricId, MetricRegistry, ModelId, ModelRegistry, ModelSelection, NetworkDescriptor,
    NetworkSource, NetworkStatus, Orchestrator, OrchestratorBuilder, RunReport, SeedScope,
    SimulationError, SinkError, persist,
};
use grafsim_providers_edgelist::EdgeListError;
use thiserror::Error;
use tracing::{Span, field, info, instrument, warn};

use super::config::{ConfigError, ConfigFile, NetworkEntry, Overrides, Settings};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "grafsim",
    about = "Compare real social networks against random-graph models."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Simulate a model against every network and write `Modelo_<id>.csv`.
    Run(RunCommand),
    /// Print the node count and mean degree of every network.
    Describe(NetworkArgs),
    /// Print the available model and metric identifiers.
    List,
}

/// Network selection shared by `run` and `describe`.
#[derive(Debug, Args, Clone, Default)]
pub struct NetworkArgs {
    /// TOML configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Network as `NAME=PATH`; repeat for several. Replaces the file's list.
    #[arg(long = "network", value_name = "NAME=PATH")]
    pub networks: Vec<NetworkEntry>,

    /// Comment marker for edge-list files (default `%`).
    #[arg(long)]
    pub comment: Option<String>,
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Model to simulate: ER, BA, WS_P10, WS_P05, WS_P01 or ALL.
    #[arg(long)]
    pub model: ModelSelection,

    /// Trials per network (default 10).
    #[arg(long)]
    pub trials: Option<usize>,

    /// Worker threads (default 5).
    #[arg(long)]
    pub workers: Option<usize>,

    /// Seed every trial reproducibly.
    #[arg(long)]
    pub fixed_seed: bool,

    /// Base seed; implies --fixed-seed (default 42).
    #[arg(long)]
    pub seed: Option<u64>,

    /// `run` derives a seed per trial, `trial` reuses the base seed.
    #[arg(long)]
    pub seed_scope: Option<SeedScope>,

    /// Directory receiving the CSV files (default `.`).
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Metric id to compute; repeat for several (default all).
    #[arg(long = "metric", value_name = "ID")]
    pub metrics: Vec<String>,

    /// Network selection.
    #[command(flatten)]
    pub networks: NetworkArgs,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A network failed to resolve during `describe`.
    #[error("network `{name}`: {source}")]
    Network {
        /// Network identifier.
        name: String,
        /// Provider failure.
        #[source]
        source: EdgeListError,
    },
    /// Simulation setup failed.
    #[error(transparent)]
    Core(#[from] SimulationError),
    /// A results file could not be written.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl CliError {
    /// Stable code of the underlying library error, when it carries one.
    #[must_use]
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Core(err) => Some(err.code().as_str()),
            Self::Sink(err) => Some(err.code().as_str()),
            Self::Config(_) | Self::Network { .. } => None,
        }
    }
}

/// One model's run and the file it produced.
#[derive(Debug, Clone)]
pub struct ModelOutput {
    /// Written CSV file.
    pub path: PathBuf,
    /// Run summary.
    pub report: RunReport,
}

/// Outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub enum ExecutionSummary {
    /// Files written by `run`, in model order.
    Run(Vec<ModelOutput>),
    /// Networks resolved by `describe`.
    Describe(Vec<NetworkDescriptor>),
    /// Identifiers printed by `list`.
    List {
        /// Model identifiers.
        models: Vec<ModelId>,
        /// Metric identifiers in column order.
        metrics: Vec<MetricId>,
    },
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when configuration, setup or persistence fails.
/// Failures of individual networks or trials during `run` are logged and
/// reported in the summary instead.
///
/// # Examples
/// ```
/// use grafsim_cli::cli::{Cli, Command, ExecutionSummary, run_cli};
///
/// let summary = run_cli(Cli { command: Command::List })?;
/// let ExecutionSummary::List { models, metrics } = summary else {
///     panic!("list returns identifiers");
/// };
/// assert_eq!(models.len(), 5);
/// assert_eq!(metrics.len(), 8);
/// # Ok::<(), grafsim_cli::cli::CliError>(())
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Run(run) => {
            span.record("command", field::display("run"));
            run_command(run)
        }
        Command::Describe(args) => {
            span.record("command", field::display("describe"));
            describe_command(&args)
        }
        Command::List => {
            span.record("command", field::display("list"));
            Ok(list_command())
        }
    }
}

pub(super) fn load_settings(
    args: &NetworkArgs,
    overrides: Overrides,
) -> Result<Settings, ConfigError> {
    let file = match &args.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    Settings::resolve(
        file,
        Overrides {
            comment: args.comment.clone(),
            networks: args.networks.clone(),
            ..overrides
        },
    )
}

fn overrides_for(command: &RunCommand) -> Overrides {
    Overrides {
        trials: command.trials,
        workers: command.workers,
        fixed_seed: command.fixed_seed,
        seed: command.seed,
        seed_scope: command.seed_scope,
        output_dir: command.output_dir.clone(),
        metrics: command.metrics.clone(),
        ..Overrides::default()
    }
}

fn build_orchestrator(settings: &Settings) -> Result<Orchestrator, SimulationError> {
    let metrics = match &settings.metrics {
        Some(ids) => MetricRegistry::standard().select(ids)?,
        None => MetricRegistry::standard(),
    };
    OrchestratorBuilder::new()
        .with_trials(settings.trials)
        .with_max_workers(settings.workers)
        .with_seed_policy(settings.seed_policy)
        .with_models(ModelRegistry::standard())
        .with_metrics(metrics)
        .build()
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(model = %command.model, networks = field::Empty, output_dir = field::Empty),
)]
pub(super) fn run_command(command: RunCommand) -> Result<ExecutionSummary, CliError> {
    let settings = load_settings(&command.networks, overrides_for(&command))?;
    let span = Span::current();
    span.record("networks", settings.networks.len());
    span.record("output_dir", field::display(settings.output_dir.display()));

    let orchestrator = build_orchestrator(&settings)?;
    let sources = settings.sources();
    let models: Vec<ModelId> = match command.model {
        ModelSelection::Single(id) => vec![id],
        ModelSelection::All => orchestrator.models().ids().collect(),
    };

    let mut outputs = Vec::with_capacity(models.len());
    for model in models {
        let (table, report) = orchestrator.run(model, &sources)?.into_parts();
        let path = persist(&table, &settings.output_dir, model)?;
        for entry in report.unresolved() {
            if let NetworkStatus::Unresolved { message } = entry.status() {
                warn!(model = %model, network = entry.network(), %message, "network skipped");
            }
        }
        info!(
            model = %model,
            path = %path.display(),
            completed = report.completed(),
            failed = report.failed(),
            lost = report.lost(),
            "model completed"
        );
        outputs.push(ModelOutput { path, report });
    }
    Ok(ExecutionSummary::Run(outputs))
}

#[instrument(name = "cli.describe", err, skip(args), fields(networks = field::Empty))]
pub(super) fn describe_command(args: &NetworkArgs) -> Result<ExecutionSummary, CliError> {
    let settings = load_settings(args, Overrides::default())?;
    Span::current().record("networks", settings.networks.len());
    let descriptors = settings
        .sources()
        .iter()
        .map(|source| {
            source.resolve().map_err(|err| CliError::Network {
                name: source.name().to_owned(),
                source: err,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ExecutionSummary::Describe(descriptors))
}

fn list_command() -> ExecutionSummary {
    ExecutionSummary::List {
        models: ModelRegistry::standard().ids().collect(),
        metrics: MetricRegistry::standard().ids().collect(),
    }
}

/// Renders `summary` to `writer` as plain text.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// use grafsim_cli::cli::{ExecutionSummary, render_summary};
/// use grafsim_core::NetworkDescriptor;
///
/// let summary = ExecutionSummary::Describe(vec![NetworkDescriptor::new("karate", 34, 4.5882)?]);
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(
///     String::from_utf8(buffer)?,
///     "network\tnodes\tmean_degree\nkarate\t34\t4.5882\n",
/// );
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match summary {
        ExecutionSummary::Run(outputs) => {
            for output in outputs {
                let report = &output.report;
                writeln!(
                    writer,
                    "{}\t{}\tcompleted={} failed={} lost={}",
                    report.model(),
                    output.path.display(),
                    report.completed(),
                    report.failed(),
                    report.lost(),
                )?;
                for entry in report.unresolved() {
                    if let NetworkStatus::Unresolved { message } = entry.status() {
                        writeln!(writer, "  skipped {}: {message}", entry.network())?;
                    }
                }
            }
        }
        ExecutionSummary::Describe(descriptors) => {
            writeln!(writer, "network\tnodes\tmean_degree")?;
            for descriptor in descriptors {
                writeln!(
                    writer,
                    "{}\t{}\t{:.4}",
                    descriptor.name(),
                    descriptor.nodes(),
                    descriptor.mean_degree(),
                )?;
            }
        }
        ExecutionSummary::List { models, metrics } => {
            writeln!(writer, "models:")?;
            for model in models {
                writeln!(writer, "  {model}")?;
            }
            writeln!(writer, "  {}", ModelSelection::ALL_KEYWORD)?;
            writeln!(writer, "metrics:")?;
            for metric in metrics {
                writeln!(writer, "  {metric}")?;
            }
        }
    }
    Ok(())
}
