//! One generate-normalise-measure cycle.

use std::{fmt, num::NonZeroUsize, sync::Arc, time::Duration};

use rand::rngs::SmallRng;
use tracing::instrument;

use crate::{
    components::largest_component,
    error::TrialError,
    evaluator::{MetricEvaluation, evaluate},
    graph::Graph,
    metric::MetricRegistry,
    model::{GraphModel, ModelParams},
};

/// Row key of the results table: a network and a 1-based iteration.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
///
/// use grafsim_core::TrialKey;
///
/// let key = TrialKey::new("karate", NonZeroUsize::MIN);
/// assert_eq!(key.network(), "karate");
/// assert_eq!(key.iteration().get(), 1);
/// assert_eq!(key.to_string(), "karate#1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrialKey {
    network: Arc<str>,
    iteration: NonZeroUsize,
}

impl TrialKey {
    /// Builds a key.
    #[must_use]
    pub fn new(network: impl Into<Arc<str>>, iteration: NonZeroUsize) -> Self {
        Self {
            network: network.into(),
            iteration,
        }
    }

    /// Network identifier.
    #[must_use]
    pub fn network(&self) -> &str {
        &self.network
    }

    /// Iteration, starting at one.
    #[must_use]
    pub fn iteration(&self) -> NonZeroUsize {
        self.iteration
    }
}

impl fmt::Display for TrialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.network, self.iteration)
    }
}

/// Message a worker sends back to the collector for every dispatched trial.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialOutcome {
    /// Row the outcome belongs to.
    pub key: TrialKey,
    /// Metric values, or the reason the whole trial failed.
    pub result: Result<MetricEvaluation, TrialError>,
    /// Wall-clock time spent in the worker.
    pub elapsed: Duration,
}

/// Generates one graph and reduces it to its largest connected component,
/// relabelled to `0..n`.
///
/// Components tied for size are resolved in favour of the one containing the
/// lowest node id.
///
/// # Errors
/// Returns [`TrialError::Model`] when the generator fails and
/// [`TrialError::EmptyGraph`] when it yields no nodes.
///
/// # Examples
/// ```
/// use grafsim_core::{ErdosRenyi, ModelParams, run_trial};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let graph = run_trial(
///     &ErdosRenyi,
///     ModelParams { nodes: 200, mean_degree: 4.0 },
///     &mut SmallRng::seed_from_u64(11),
/// )?;
/// assert!(graph.is_connected());
/// # Ok::<(), grafsim_core::TrialError>(())
/// ```
#[instrument(
    name = "core.run_trial",
    level = "debug",
    err(level = "debug"),
    skip(model, rng),
    fields(nodes = params.nodes, mean_degree = params.mean_degree),
)]
pub fn run_trial<M>(model: &M, params: ModelParams, rng: &mut SmallRng) -> Result<Graph, TrialError>
where
    M: GraphModel + ?Sized,
{
    let generated = model.generate(params, rng)?;
    largest_component(&generated).ok_or(TrialError::EmptyGraph)
}

/// Runs [`run_trial`] and evaluates `metrics` on the resulting graph.
///
/// # Errors
/// Propagates the errors of [`run_trial`]. Metric failures never fail the
/// trial; they surface as undefined values.
pub fn execute_trial<M>(
    model: &M,
    params: ModelParams,
    rng: &mut SmallRng,
    metrics: &MetricRegistry,
) -> Result<MetricEvaluation, TrialError>
where
    M: GraphModel + ?Sized,
{
    let graph = run_trial(model, params, rng)?;
    Ok(evaluate(&graph, metrics))
}
