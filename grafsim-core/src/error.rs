//! Error types for the grafsim core library.
//!
//! Defines the error enums exposed by the public API. Each enum carries a
//! stable machine-readable code so the CLI and log consumers can match on
//! failures without parsing messages.

use std::{fmt, io, path::PathBuf, sync::Arc};

use thiserror::Error;

use crate::model::ModelId;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced while constructing a [`crate::Graph`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GraphError {
    /// An edge referenced a node outside `0..node_count`.
    #[error("node {node} is out of range for a graph with {node_count} nodes")]
    NodeOutOfRange {
        /// Offending endpoint.
        node: usize,
        /// Number of nodes declared for the graph.
        node_count: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// An edge referenced a node outside `0..node_count`.
        NodeOutOfRange => NodeOutOfRange { .. } => "GRAFSIM_GRAPH_NODE_OUT_OF_RANGE",
    }
}

/// Error raised by a [`crate::GraphModel`] when it cannot produce a graph.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ModelError {
    /// The `(N, k)` pair cannot be realised by the model.
    #[error("model {model} rejected its parameters: {reason}")]
    InvalidParameters {
        /// Model that rejected the parameters.
        model: ModelId,
        /// Human-readable explanation.
        reason: Arc<str>,
    },
    /// The generator emitted an invalid edge.
    #[error(transparent)]
    Graph {
        /// Underlying graph construction failure.
        #[from]
        source: GraphError,
    },
}

define_error_codes! {
    /// Stable codes describing [`ModelError`] variants.
    enum ModelErrorCode for ModelError {
        /// The `(N, k)` pair cannot be realised by the model.
        InvalidParameters => InvalidParameters { .. } => "GRAFSIM_MODEL_INVALID_PARAMETERS",
        /// The generator emitted an invalid edge.
        Graph => Graph { .. } => "GRAFSIM_MODEL_GRAPH",
    }
}

/// Reason a [`crate::GraphMetric`] is undefined for a graph.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum MetricError {
    /// The graph is smaller than the metric requires.
    #[error("metric requires at least {required} nodes but the graph has {actual}")]
    TooFewNodes {
        /// Minimum node count.
        required: usize,
        /// Node count of the evaluated graph.
        actual: usize,
    },
    /// The metric is only defined on connected graphs.
    #[error("metric is undefined on a disconnected graph")]
    Disconnected,
    /// The metric's formula degenerates for this graph.
    #[error("metric is undefined: {reason}")]
    Undefined {
        /// Short description of the degenerate case.
        reason: &'static str,
    },
}

define_error_codes! {
    /// Stable codes describing [`MetricError`] variants.
    enum MetricErrorCode for MetricError {
        /// The graph is smaller than the metric requires.
        TooFewNodes => TooFewNodes { .. } => "GRAFSIM_METRIC_TOO_FEW_NODES",
        /// The metric is only defined on connected graphs.
        Disconnected => Disconnected => "GRAFSIM_METRIC_DISCONNECTED",
        /// The metric's formula degenerates for this graph.
        Undefined => Undefined { .. } => "GRAFSIM_METRIC_UNDEFINED",
    }
}

/// Failure of a whole trial. The corresponding table row stays undefined.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TrialError {
    /// Graph generation failed.
    #[error(transparent)]
    Model {
        /// Generator failure.
        #[from]
        source: ModelError,
    },
    /// The generator produced a graph without nodes.
    #[error("generated graph has no nodes")]
    EmptyGraph,
    /// The worker panicked while running the trial.
    #[error("trial panicked: {message}")]
    Panicked {
        /// Panic payload rendered as text.
        message: Arc<str>,
    },
}

define_error_codes! {
    /// Stable codes describing [`TrialError`] variants.
    enum TrialErrorCode for TrialError {
        /// Graph generation failed.
        Model => Model { .. } => "GRAFSIM_TRIAL_MODEL_FAILURE",
        /// The generator produced a graph without nodes.
        EmptyGraph => EmptyGraph => "GRAFSIM_TRIAL_EMPTY_GRAPH",
        /// The worker panicked while running the trial.
        Panicked => Panicked { .. } => "GRAFSIM_TRIAL_PANICKED",
    }
}

/// Invalid values supplied for a [`crate::NetworkDescriptor`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DescriptorError {
    /// The network has no nodes.
    #[error("network `{network}` has no nodes")]
    ZeroNodes {
        /// Network identifier.
        network: Arc<str>,
    },
    /// The mean degree is negative or not finite.
    #[error("network `{network}` has invalid mean degree {value}")]
    InvalidMeanDegree {
        /// Network identifier.
        network: Arc<str>,
        /// Rejected value.
        value: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`DescriptorError`] variants.
    enum DescriptorErrorCode for DescriptorError {
        /// The network has no nodes.
        ZeroNodes => ZeroNodes { .. } => "GRAFSIM_DESCRIPTOR_ZERO_NODES",
        /// The mean degree is negative or not finite.
        InvalidMeanDegree => InvalidMeanDegree { .. } => "GRAFSIM_DESCRIPTOR_INVALID_MEAN_DEGREE",
    }
}

/// Error raised by [`crate::ResultsTable`] operations.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TableError {
    /// The same network was listed twice at allocation.
    #[error("network `{network}` is listed more than once")]
    DuplicateNetwork {
        /// Repeated network identifier.
        network: Arc<str>,
    },
    /// A write addressed a row that was never allocated.
    #[error("no row for network `{network}` iteration {iteration}")]
    UnknownKey {
        /// Network part of the key.
        network: Arc<str>,
        /// Iteration part of the key.
        iteration: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`TableError`] variants.
    enum TableErrorCode for TableError {
        /// The same network was listed twice at allocation.
        DuplicateNetwork => DuplicateNetwork { .. } => "GRAFSIM_TABLE_DUPLICATE_NETWORK",
        /// A write addressed a row that was never allocated.
        UnknownKey => UnknownKey { .. } => "GRAFSIM_TABLE_UNKNOWN_KEY",
    }
}

/// Error type produced when configuring or running the
/// [`crate::Orchestrator`]. All variants are raised before any trial starts.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SimulationError {
    /// The repeat count must be at least one.
    #[error("trials must be at least 1 (got {got})")]
    InvalidTrialCount {
        /// Rejected trial count.
        got: usize,
    },
    /// The worker pool needs at least one thread.
    #[error("max_workers must be at least 1 (got {got})")]
    InvalidWorkerCount {
        /// Rejected worker count.
        got: usize,
    },
    /// No metrics are registered.
    #[error("the metric registry is empty")]
    EmptyMetricSet,
    /// The requested model is not in the registry.
    #[error("model {model} is not registered")]
    UnknownModel {
        /// Requested model.
        model: ModelId,
    },
    /// A requested metric identifier is not registered.
    #[error("metric `{metric}` is not registered")]
    UnknownMetric {
        /// Requested metric identifier.
        metric: Arc<str>,
    },
    /// The run was started without networks.
    #[error("no networks were supplied")]
    NoNetworks,
    /// The results table could not be allocated.
    #[error(transparent)]
    Table {
        /// Underlying table failure.
        #[from]
        source: TableError,
    },
    /// The worker pool could not be created.
    #[error("failed to build worker pool: {message}")]
    ThreadPool {
        /// Error reported by rayon.
        message: Arc<str>,
    },
}

define_error_codes! {
    /// Stable codes describing [`SimulationError`] variants.
    enum SimulationErrorCode for SimulationError {
        /// The repeat count must be at least one.
        InvalidTrialCount => InvalidTrialCount { .. } => "GRAFSIM_INVALID_TRIAL_COUNT",
        /// The worker pool needs at least one thread.
        InvalidWorkerCount => InvalidWorkerCount { .. } => "GRAFSIM_INVALID_WORKER_COUNT",
        /// No metrics are registered.
        EmptyMetricSet => EmptyMetricSet => "GRAFSIM_EMPTY_METRIC_SET",
        /// The requested model is not in the registry.
        UnknownModel => UnknownModel { .. } => "GRAFSIM_UNKNOWN_MODEL",
        /// A requested metric identifier is not registered.
        UnknownMetric => UnknownMetric { .. } => "GRAFSIM_UNKNOWN_METRIC",
        /// The run was started without networks.
        NoNetworks => NoNetworks => "GRAFSIM_NO_NETWORKS",
        /// The results table could not be allocated.
        Table => Table { .. } => "GRAFSIM_TABLE_FAILURE",
        /// The worker pool could not be created.
        ThreadPool => ThreadPool { .. } => "GRAFSIM_THREAD_POOL",
    }
}

impl SimulationError {
    /// Retrieve the inner [`TableErrorCode`] when the error originated in the
    /// results table.
    #[must_use]
    pub const fn table_code(&self) -> Option<TableErrorCode> {
        match self {
            Self::Table { source } => Some(source.code()),
            _ => None,
        }
    }
}

/// Failure while persisting a [`crate::ResultsTable`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SinkError {
    /// The output directory or file could not be created.
    #[error("failed to create `{path}`: {source}")]
    Io {
        /// Path being created.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// Writing a CSV record failed.
    #[error("failed to write CSV output: {source}")]
    Csv {
        /// Underlying CSV failure.
        #[from]
        source: csv::Error,
    },
}

define_error_codes! {
    /// Stable codes describing [`SinkError`] variants.
    enum SinkErrorCode for SinkError {
        /// The output directory or file could not be created.
        Io => Io { .. } => "GRAFSIM_SINK_IO",
        /// Writing a CSV record failed.
        Csv => Csv { .. } => "GRAFSIM_SINK_CSV",
    }
}

/// Convenient alias for results returned by the orchestration API.
pub type Result<T> = core::result::Result<T, SimulationError>;
