//! Concurrent trial dispatch and result collection.
//!
//! For each network in turn the orchestrator resolves `(N, k)`, spawns one
//! task per iteration on a bounded rayon pool and collects outcomes on the
//! calling thread as they complete. Only the collector touches the results
//! table. The next network starts once every outcome of the current one has
//! been received.

use std::{
    collections::HashSet,
    num::NonZeroUsize,
    panic::{self, AssertUnwindSafe},
    sync::{Arc, mpsc},
    time::{Duration, Instant},
};

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{Span, error, field, info, instrument, warn};

use crate::{
    Result,
    error::{SimulationError, TrialError},
    evaluator::panic_message,
    metric::MetricRegistry,
    model::{GraphModel, ModelId, ModelRegistry},
    network::{NetworkDescriptor, NetworkSource},
    seed::SeedPolicy,
    table::ResultsTable,
    trial::{TrialKey, TrialOutcome, execute_trial},
};

/// Default number of trials per network.
pub const DEFAULT_TRIALS: usize = 10;
/// Default worker pool size.
pub const DEFAULT_MAX_WORKERS: usize = 5;

/// Configures and constructs an [`Orchestrator`].
///
/// # Examples
/// ```
/// use grafsim_core::{OrchestratorBuilder, SeedPolicy, SeedScope};
///
/// let orchestrator = OrchestratorBuilder::new()
///     .with_trials(3)
///     .with_max_workers(2)
///     .with_seed_policy(SeedPolicy::Fixed { seed: 1, scope: SeedScope::Run })
///     .build()?;
/// assert_eq!(orchestrator.trials().get(), 3);
/// assert_eq!(orchestrator.max_workers().get(), 2);
/// # Ok::<(), grafsim_core::SimulationError>(())
/// ```
#[derive(Debug, Clone)]
pub struct OrchestratorBuilder {
    trials: usize,
    max_workers: usize,
    seed_policy: SeedPolicy,
    models: ModelRegistry,
    metrics: MetricRegistry,
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            max_workers: DEFAULT_MAX_WORKERS,
            seed_policy: SeedPolicy::Entropy,
            models: ModelRegistry::standard(),
            metrics: MetricRegistry::standard(),
        }
    }
}

impl OrchestratorBuilder {
    /// Creates a builder with ten trials, five workers, entropy seeding and the
    /// standard registries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of trials per network.
    #[must_use]
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    /// Sets the worker pool size.
    #[must_use]
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Sets the seeding policy.
    #[must_use]
    pub fn with_seed_policy(mut self, policy: SeedPolicy) -> Self {
        self.seed_policy = policy;
        self
    }

    /// Replaces the model registry.
    #[must_use]
    pub fn with_models(mut self, models: ModelRegistry) -> Self {
        self.models = models;
        self
    }

    /// Replaces the metric registry.
    #[must_use]
    pub fn with_metrics(mut self, metrics: MetricRegistry) -> Self {
        self.metrics = metrics;
        self
    }

    /// Configured trial count.
    #[must_use]
    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Configured worker count.
    #[must_use]
    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Validates the configuration and starts the worker pool.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidTrialCount`],
    /// [`SimulationError::InvalidWorkerCount`] or
    /// [`SimulationError::EmptyMetricSet`] for invalid settings, and
    /// [`SimulationError::ThreadPool`] when the pool cannot be created.
    pub fn build(self) -> Result<Orchestrator> {
        let trials = NonZeroUsize::new(self.trials).ok_or(SimulationError::InvalidTrialCount {
            got: self.trials,
        })?;
        let max_workers =
            NonZeroUsize::new(self.max_workers).ok_or(SimulationError::InvalidWorkerCount {
                got: self.max_workers,
            })?;
        if self.metrics.is_empty() {
            return Err(SimulationError::EmptyMetricSet);
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(max_workers.get())
            .thread_name(|index| format!("grafsim-worker-{index}"))
            .build()
            .map_err(|err| SimulationError::ThreadPool {
                message: Arc::from(err.to_string()),
            })?;
        Ok(Orchestrator {
            trials,
            max_workers,
            seed_policy: self.seed_policy,
            models: self.models,
            metrics: Arc::new(self.metrics),
            pool,
        })
    }
}

/// Runs simulations for a fixed configuration.
#[derive(Debug)]
pub struct Orchestrator {
    trials: NonZeroUsize,
    max_workers: NonZeroUsize,
    seed_policy: SeedPolicy,
    models: ModelRegistry,
    metrics: Arc<MetricRegistry>,
    pool: ThreadPool,
}

impl Orchestrator {
    /// Trials per network.
    #[must_use]
    pub fn trials(&self) -> NonZeroUsize {
        self.trials
    }

    /// Worker pool size.
    #[must_use]
    pub fn max_workers(&self) -> NonZeroUsize {
        self.max_workers
    }

    /// Seeding policy.
    #[must_use]
    pub fn seed_policy(&self) -> SeedPolicy {
        self.seed_policy
    }

    /// Registered models.
    #[must_use]
    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    /// Metric battery.
    #[must_use]
    pub fn metrics(&self) -> &MetricRegistry {
        &self.metrics
    }

    /// Simulates `model` against every network.
    ///
    /// A network that fails to resolve is logged and recorded in the report;
    /// its rows stay undefined and the run moves on. Failed trials leave their
    /// row undefined.
    ///
    /// # Errors
    /// Returns [`SimulationError::UnknownModel`], [`SimulationError::NoNetworks`]
    /// or [`SimulationError::Table`] (duplicate network names) before any
    /// trial is dispatched.
    ///
    /// # Examples
    /// ```
    /// use grafsim_core::{ModelId, NetworkDescriptor, OrchestratorBuilder};
    ///
    /// let orchestrator = OrchestratorBuilder::new().with_trials(2).with_max_workers(2).build()?;
    /// let networks = [NetworkDescriptor::new("toy", 30, 4.0)?];
    /// let run = orchestrator.run(ModelId::Er, &networks)?;
    /// assert_eq!(run.table().len(), 2);
    /// assert_eq!(run.report().completed() + run.report().failed(), 2);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[instrument(
        name = "core.simulate",
        err,
        skip(self, networks),
        fields(
            networks = networks.len(),
            trials = self.trials.get(),
            workers = self.max_workers.get(),
            completed = field::Empty,
            failed = field::Empty,
        ),
    )]
    pub fn run<S: NetworkSource>(&self, model: ModelId, networks: &[S]) -> Result<SimulationRun> {
        let generator = self
            .models
            .get(model)
            .ok_or(SimulationError::UnknownModel { model })?;
        if networks.is_empty() {
            return Err(SimulationError::NoNetworks);
        }
        let mut table = ResultsTable::allocate(
            networks.iter().map(|source| source.name()),
            self.trials,
            self.metrics.ids(),
        )?;

        let started = Instant::now();
        let mut reports = Vec::with_capacity(networks.len());
        for (index, source) in networks.iter().enumerate() {
            let network_started = Instant::now();
            let status = match source.resolve() {
                Ok(descriptor) => {
                    info!(
                        network = source.name(),
                        nodes = descriptor.nodes().get(),
                        mean_degree = descriptor.mean_degree(),
                        "simulating network"
                    );
                    let tally = self.simulate_network(
                        model,
                        &generator,
                        index,
                        source.name(),
                        &descriptor,
                        &mut table,
                    );
                    NetworkStatus::Simulated { descriptor, tally }
                }
                Err(err) => {
                    error!(
                        network = source.name(),
                        error = %err,
                        "failed to resolve network; its rows stay undefined"
                    );
                    NetworkStatus::Unresolved {
                        message: Arc::from(err.to_string()),
                    }
                }
            };
            reports.push(NetworkReport {
                network: Arc::from(source.name()),
                status,
                elapsed: network_started.elapsed(),
            });
        }

        let report = RunReport {
            model,
            networks: reports,
            elapsed: started.elapsed(),
        };
        let span = Span::current();
        span.record("completed", report.completed());
        span.record("failed", report.failed());
        info!(
            completed = report.completed(),
            failed = report.failed(),
            lost = report.lost(),
            elapsed_ms = report.elapsed().as_millis() as u64,
            "model run finished"
        );
        Ok(SimulationRun {
            model,
            table,
            report,
        })
    }

    /// Runs every registered model in registry order.
    ///
    /// # Errors
    /// Stops at the first model whose run fails validation; see [`Self::run`].
    pub fn run_all<S: NetworkSource>(&self, networks: &[S]) -> Result<Vec<SimulationRun>> {
        self.models
            .ids()
            .map(|model| self.run(model, networks))
            .collect()
    }

    fn simulate_network(
        &self,
        model: ModelId,
        generator: &Arc<dyn GraphModel>,
        index: usize,
        network: &str,
        descriptor: &NetworkDescriptor,
        table: &mut ResultsTable,
    ) -> TrialTally {
        let network: Arc<str> = Arc::from(network);
        let params = descriptor.params();
        let (sender, receiver) = mpsc::channel();
        for iteration in (1..=self.trials.get()).filter_map(NonZeroUsize::new) {
            let key = TrialKey::new(Arc::clone(&network), iteration);
            let mut rng = self.seed_policy.rng_for(index, iteration);
            let generator = Arc::clone(generator);
            let metrics = Arc::clone(&self.metrics);
            let sender = sender.clone();
            let span = Span::current();
            self.pool.spawn(move || {
                let started = Instant::now();
                let result = span.in_scope(|| {
                    panic::catch_unwind(AssertUnwindSafe(|| {
                        execute_trial(generator.as_ref(), params, &mut rng, &metrics)
                    }))
                    .unwrap_or_else(|payload| {
                        Err(TrialError::Panicked {
                            message: panic_message(payload.as_ref()),
                        })
                    })
                });
                // Release the span before reporting so it closes with the run.
                drop(span);
                let outcome = TrialOutcome {
                    key,
                    result,
                    elapsed: started.elapsed(),
                };
                report_outcome(&sender, outcome);
            });
        }
        drop(sender);
        collect_outcomes(model, table, receiver, self.trials.get())
    }
}

/// Hands `outcome` to the collector. A closed channel means the collector has
/// already returned, so the outcome is logged and dropped.
pub(crate) fn report_outcome(sender: &mpsc::Sender<TrialOutcome>, outcome: TrialOutcome) {
    if let Err(mpsc::SendError(outcome)) = sender.send(outcome) {
        warn!(key = %outcome.key, "collector closed; trial outcome dropped");
    }
}

/// Writes outcomes into `table` in arrival order.
///
/// Successful trials overwrite their row; failed trials are logged and leave
/// the row undefined. Repeated reports for a key are ignored. Of the
/// `expected` trials, any that never report are counted as lost.
pub(crate) fn collect_outcomes<I>(
    model: ModelId,
    table: &mut ResultsTable,
    outcomes: I,
    expected: usize,
) -> TrialTally
where
    I: IntoIterator<Item = TrialOutcome>,
{
    let mut tally = TrialTally::default();
    let mut seen = HashSet::with_capacity(expected);
    for outcome in outcomes {
        record_duration(model, outcome.elapsed);
        if !seen.insert(outcome.key.clone()) {
            warn!(key = %outcome.key, "duplicate outcome ignored");
            continue;
        }
        match outcome.result {
            Ok(evaluation) => match table.write_row(&outcome.key, &evaluation) {
                Ok(()) => {
                    tally.completed += 1;
                    record_trial(model, true);
                }
                Err(err) => {
                    error!(key = %outcome.key, code = %err.code(), error = %err, "unable to store trial");
                    tally.failed += 1;
                    record_trial(model, false);
                }
            },
            Err(err) => {
                warn!(
                    network = outcome.key.network(),
                    iteration = outcome.key.iteration().get(),
                    code = %err.code(),
                    error = %err,
                    "trial failed; row left undefined"
                );
                tally.failed += 1;
                record_trial(model, false);
            }
        }
    }
    tally.lost = expected.saturating_sub(tally.completed + tally.failed);
    if tally.lost > 0 {
        warn!(lost = tally.lost, "some trials never reported");
    }
    tally
}

#[cfg(feature = "metrics")]
fn record_trial(model: ModelId, succeeded: bool) {
    let name = if succeeded {
        "grafsim_trials_completed"
    } else {
        "grafsim_trials_failed"
    };
    metrics::counter!(name, "model" => model.as_str()).increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record_trial(_model: ModelId, _succeeded: bool) {}

#[cfg(feature = "metrics")]
fn record_duration(model: ModelId, elapsed: Duration) {
    metrics::histogram!("grafsim_trial_duration_seconds", "model" => model.as_str())
        .record(elapsed.as_secs_f64());
}

#[cfg(not(feature = "metrics"))]
fn record_duration(_model: ModelId, _elapsed: Duration) {}

/// Trial counts for one network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrialTally {
    /// Trials whose metrics were written.
    pub completed: usize,
    /// Trials that reported a failure.
    pub failed: usize,
    /// Trials that never reported.
    pub lost: usize,
}

/// What happened to one network during a model run.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkStatus {
    /// The network resolved and its trials ran.
    Simulated {
        /// Resolved parameters.
        descriptor: NetworkDescriptor,
        /// Trial counts.
        tally: TrialTally,
    },
    /// The network could not be resolved; no trials ran.
    Unresolved {
        /// Rendered resolution error.
        message: Arc<str>,
    },
}

/// Per-network entry of a [`RunReport`].
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkReport {
    network: Arc<str>,
    status: NetworkStatus,
    elapsed: Duration,
}

impl NetworkReport {
    /// Network identifier.
    #[must_use]
    pub fn network(&self) -> &str {
        &self.network
    }

    /// Outcome for the network.
    #[must_use]
    pub fn status(&self) -> &NetworkStatus {
        &self.status
    }

    /// Trial counts; zero for an unresolved network.
    #[must_use]
    pub fn tally(&self) -> TrialTally {
        match &self.status {
            NetworkStatus::Simulated { tally, .. } => *tally,
            NetworkStatus::Unresolved { .. } => TrialTally::default(),
        }
    }

    /// Wall-clock time spent on the network.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// Summary of one model run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    model: ModelId,
    networks: Vec<NetworkReport>,
    elapsed: Duration,
}

impl RunReport {
    /// Model that was simulated.
    #[must_use]
    pub fn model(&self) -> ModelId {
        self.model
    }

    /// Per-network entries in input order.
    #[must_use]
    pub fn networks(&self) -> &[NetworkReport] {
        &self.networks
    }

    /// Total wall-clock time.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Completed trials across all networks.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.networks.iter().map(|entry| entry.tally().completed).sum()
    }

    /// Failed trials across all networks.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.networks.iter().map(|entry| entry.tally().failed).sum()
    }

    /// Trials that never reported.
    #[must_use]
    pub fn lost(&self) -> usize {
        self.networks.iter().map(|entry| entry.tally().lost).sum()
    }

    /// Networks that could not be resolved.
    pub fn unresolved(&self) -> impl Iterator<Item = &NetworkReport> + '_ {
        self.networks
            .iter()
            .filter(|entry| matches!(entry.status, NetworkStatus::Unresolved { .. }))
    }
}

/// Table and report produced by [`Orchestrator::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRun {
    model: ModelId,
    table: ResultsTable,
    report: RunReport,
}

impl SimulationRun {
    /// Model that was simulated.
    #[must_use]
    pub fn model(&self) -> ModelId {
        self.model
    }

    /// Completed results table.
    #[must_use]
    pub fn table(&self) -> &ResultsTable {
        &self.table
    }

    /// Run summary.
    #[must_use]
    pub fn report(&self) -> &RunReport {
        &self.report
    }

    /// Splits the run into its table and report.
    #[must_use]
    pub fn into_parts(self) -> (ResultsTable, RunReport) {
        (self.table, self.report)
    }
}

#[cfg(test)]
mod tests;
