//! Fault-isolated application of the metric battery to one graph.

use std::{
    any::Any,
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use tracing::{instrument, warn};

use crate::{
    graph::Graph,
    metric::{MetricId, MetricRegistry},
};

/// Value stored in a results cell.
///
/// # Examples
/// ```
/// use grafsim_core::MetricValue;
///
/// assert_eq!(MetricValue::from_f64(0.5), MetricValue::Defined(0.5));
/// assert_eq!(MetricValue::from_f64(f64::INFINITY), MetricValue::Undefined);
/// assert_eq!(MetricValue::Undefined.to_string(), "NaN");
/// assert!(MetricValue::Undefined.as_f64().is_nan());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MetricValue {
    /// A finite measurement.
    Defined(f64),
    /// The metric could not be computed.
    #[default]
    Undefined,
}

impl MetricValue {
    /// Wraps `value`, mapping non-finite inputs to [`MetricValue::Undefined`].
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            Self::Defined(value)
        } else {
            Self::Undefined
        }
    }

    /// Returns the measurement, or `NaN` when undefined.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Defined(value) => value,
            Self::Undefined => f64::NAN,
        }
    }

    /// Returns the measurement when defined.
    #[must_use]
    pub fn defined(self) -> Option<f64> {
        match self {
            Self::Defined(value) => Some(value),
            Self::Undefined => None,
        }
    }

    /// Returns `true` for [`MetricValue::Defined`].
    #[must_use]
    pub fn is_defined(self) -> bool {
        matches!(self, Self::Defined(_))
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defined(value) => write!(f, "{value}"),
            Self::Undefined => f.write_str("NaN"),
        }
    }
}

/// Metric values for one graph, in registry order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricEvaluation {
    values: Vec<(MetricId, MetricValue)>,
}

impl MetricEvaluation {
    /// Creates an empty evaluation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `value` for `id`, overwriting an earlier entry.
    pub fn insert(&mut self, id: MetricId, value: MetricValue) {
        match self.values.iter_mut().find(|(existing, _)| *existing == id) {
            Some(slot) => slot.1 = value,
            None => self.values.push((id, value)),
        }
    }

    /// Value recorded for `id`.
    #[must_use]
    pub fn get(&self, id: MetricId) -> Option<MetricValue> {
        self.values
            .iter()
            .find(|(existing, _)| *existing == id)
            .map(|(_, value)| *value)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (MetricId, MetricValue)> + '_ {
        self.values.iter().copied()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of undefined entries.
    #[must_use]
    pub fn undefined_count(&self) -> usize {
        self.values
            .iter()
            .filter(|(_, value)| !value.is_defined())
            .count()
    }
}

impl FromIterator<(MetricId, MetricValue)> for MetricEvaluation {
    fn from_iter<I: IntoIterator<Item = (MetricId, MetricValue)>>(iter: I) -> Self {
        let mut evaluation = Self::new();
        for (id, value) in iter {
            evaluation.insert(id, value);
        }
        evaluation
    }
}

/// Applies every metric in `registry` to `graph`.
///
/// A metric that returns an error, yields a non-finite value or panics is
/// recorded as [`MetricValue::Undefined`] with a warning; the remaining
/// metrics still run. This function neither fails nor panics.
///
/// # Examples
/// ```
/// use grafsim_core::{Graph, MetricId, MetricRegistry, MetricValue, evaluate};
///
/// let graph = Graph::empty(1);
/// let evaluation = evaluate(&graph, &MetricRegistry::standard());
/// assert_eq!(evaluation.get(MetricId::MEAN_DEGREE), Some(MetricValue::Defined(0.0)));
/// assert_eq!(evaluation.get(MetricId::DIAMETER), Some(MetricValue::Undefined));
/// ```
#[instrument(
    name = "core.evaluate",
    level = "debug",
    skip_all,
    fields(nodes = graph.node_count(), edges = graph.edge_count(), metrics = registry.len()),
)]
#[must_use]
pub fn evaluate(graph: &Graph, registry: &MetricRegistry) -> MetricEvaluation {
    registry
        .iter()
        .map(|metric| {
            let id = metric.id();
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| metric.compute(graph)));
            let value = match outcome {
                Ok(Ok(value)) if value.is_finite() => MetricValue::Defined(value),
                Ok(Ok(value)) => {
                    warn!(metric = %id, value, "metric returned a non-finite value");
                    record_failure(id);
                    MetricValue::Undefined
                }
                Ok(Err(err)) => {
                    warn!(metric = %id, code = %err.code(), error = %err, "metric undefined");
                    record_failure(id);
                    MetricValue::Undefined
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    warn!(metric = %id, panic = %message, "metric panicked");
                    record_failure(id);
                    MetricValue::Undefined
                }
            };
            (id, value)
        })
        .collect()
}

#[cfg(feature = "metrics")]
fn record_failure(id: MetricId) {
    metrics::counter!("grafsim_metric_failures", "metric" => id.as_str()).increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record_failure(_id: MetricId) {}

/// Renders a panic payload as text.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> Arc<str> {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        Arc::from(*message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        Arc::from(message.as_str())
    } else {
        Arc::from("non-string panic payload")
    }
}
