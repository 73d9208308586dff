//! Structural graph metrics and the registry that orders them into table
//! columns.
//!
//! A metric reports "not computable" by returning [`MetricError`]; turning
//! that into the undefined sentinel is the evaluator's job.

mod betweenness;
mod clustering;
mod degree;
mod paths;

use std::{fmt, sync::Arc};

use crate::{
    error::{MetricError, SimulationError},
    graph::Graph,
};

pub use self::{
    betweenness::MeanBetweenness,
    clustering::{AverageClustering, Transitivity},
    degree::{DegreeAssortativity, Density, MeanDegree},
    paths::{AverageShortestPath, Diameter},
};

/// Identifier of a metric; doubles as its CSV column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetricId(&'static str);

impl MetricId {
    /// Mean degree `2E / n`.
    pub const MEAN_DEGREE: Self = Self::new("grau_medio");
    /// Edge density `2E / (n (n - 1))`.
    pub const DENSITY: Self = Self::new("densidade");
    /// Degree assortativity coefficient.
    pub const ASSORTATIVITY: Self = Self::new("assortatividade");
    /// Mean local clustering coefficient.
    pub const AVERAGE_CLUSTERING: Self = Self::new("agrupamento_medio");
    /// Global clustering coefficient.
    pub const TRANSITIVITY: Self = Self::new("transitividade");
    /// Average shortest-path length.
    pub const AVERAGE_SHORTEST_PATH: Self = Self::new("caminho_medio");
    /// Largest eccentricity.
    pub const DIAMETER: Self = Self::new("diametro");
    /// Mean normalised betweenness centrality.
    pub const MEAN_BETWEENNESS: Self = Self::new("betweenness_medio");

    /// Wraps a static identifier.
    #[must_use]
    pub const fn new(id: &'static str) -> Self {
        Self(id)
    }

    /// Returns the identifier text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A structural measurement of a graph.
pub trait GraphMetric: Send + Sync {
    /// Column identifier.
    fn id(&self) -> MetricId;

    /// Computes the metric.
    ///
    /// # Errors
    /// Returns [`MetricError`] when the metric is undefined for `graph`.
    fn compute(&self, graph: &Graph) -> Result<f64, MetricError>;
}

/// Adapts a closure into a [`GraphMetric`].
///
/// # Examples
/// ```
/// use grafsim_core::{Graph, GraphMetric, MetricId, metric_fn};
///
/// let edges = metric_fn(MetricId::new("arestas"), |graph: &Graph| {
///     Ok(graph.edge_count() as f64)
/// });
/// let graph = Graph::from_edges(3, [(0, 1), (1, 2)])?;
/// assert_eq!(edges.compute(&graph), Ok(2.0));
/// # Ok::<(), grafsim_core::GraphError>(())
/// ```
pub fn metric_fn<F>(id: MetricId, compute: F) -> FnMetric<F>
where
    F: Fn(&Graph) -> Result<f64, MetricError> + Send + Sync,
{
    FnMetric { id, compute }
}

/// Closure-backed metric produced by [`metric_fn`].
#[derive(Clone)]
pub struct FnMetric<F> {
    id: MetricId,
    compute: F,
}

impl<F> fmt::Debug for FnMetric<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMetric").field("id", &self.id).finish()
    }
}

impl<F> GraphMetric for FnMetric<F>
where
    F: Fn(&Graph) -> Result<f64, MetricError> + Send + Sync,
{
    fn id(&self) -> MetricId {
        self.id
    }

    fn compute(&self, graph: &Graph) -> Result<f64, MetricError> {
        (self.compute)(graph)
    }
}

/// Ordered set of metrics. Registration order is column order.
#[derive(Clone, Default)]
pub struct MetricRegistry {
    metrics: Vec<Arc<dyn GraphMetric>>,
}

impl fmt::Debug for MetricRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}

impl MetricRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in battery.
    ///
    /// # Examples
    /// ```
    /// use grafsim_core::{MetricId, MetricRegistry};
    ///
    /// let registry = MetricRegistry::standard();
    /// assert_eq!(registry.len(), 8);
    /// assert_eq!(registry.ids().next(), Some(MetricId::MEAN_DEGREE));
    /// ```
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .with_metric(MeanDegree)
            .with_metric(Density)
            .with_metric(DegreeAssortativity)
            .with_metric(AverageClustering)
            .with_metric(Transitivity)
            .with_metric(AverageShortestPath)
            .with_metric(Diameter)
            .with_metric(MeanBetweenness)
    }

    /// Appends `metric`, or replaces the metric already registered under the
    /// same id in place.
    #[must_use]
    pub fn with_metric(mut self, metric: impl GraphMetric + 'static) -> Self {
        let metric: Arc<dyn GraphMetric> = Arc::new(metric);
        match self
            .metrics
            .iter_mut()
            .find(|existing| existing.id() == metric.id())
        {
            Some(slot) => *slot = metric,
            None => self.metrics.push(metric),
        }
        self
    }

    /// Keeps only the metrics named in `ids`, preserving registry order.
    ///
    /// # Errors
    /// Returns [`SimulationError::UnknownMetric`] for an id that is not
    /// registered.
    ///
    /// # Examples
    /// ```
    /// use grafsim_core::{MetricId, MetricRegistry};
    ///
    /// let registry = MetricRegistry::standard().select(["diametro", "grau_medio"])?;
    /// assert_eq!(
    ///     registry.ids().collect::<Vec<_>>(),
    ///     vec![MetricId::MEAN_DEGREE, MetricId::DIAMETER],
    /// );
    /// # Ok::<(), grafsim_core::SimulationError>(())
    /// ```
    pub fn select<I, S>(&self, ids: I) -> Result<Self, SimulationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut wanted = Vec::new();
        for raw in ids {
            let raw = raw.as_ref();
            let id = self
                .get(raw)
                .map(|metric| metric.id())
                .ok_or_else(|| SimulationError::UnknownMetric {
                    metric: Arc::from(raw),
                })?;
            wanted.push(id);
        }
        let metrics = self
            .metrics
            .iter()
            .filter(|metric| wanted.contains(&metric.id()))
            .cloned()
            .collect();
        Ok(Self { metrics })
    }

    /// Looks up a metric by its identifier text.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&dyn GraphMetric> {
        self.metrics
            .iter()
            .find(|metric| metric.id().as_str() == id)
            .map(AsRef::as_ref)
    }

    /// Metrics in column order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn GraphMetric> + '_ {
        self.metrics.iter().map(AsRef::as_ref)
    }

    /// Identifiers in column order.
    pub fn ids(&self) -> impl Iterator<Item = MetricId> + '_ {
        self.metrics.iter().map(|metric| metric.id())
    }

    /// Number of registered metrics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Returns `true` when no metric is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

fn require_nodes(graph: &Graph, required: usize) -> Result<usize, MetricError> {
    let actual = graph.node_count();
    if actual < required {
        return Err(MetricError::TooFewNodes { required, actual });
    }
    Ok(actual)
}
