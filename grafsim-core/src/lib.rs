//! grafsim core library.
//!
//! Generates random graphs matched to real networks, measures them and
//! collects the measurements into a table keyed by (network, iteration).
#![cfg_attr(docsrs, feature(doc_cfg))]

mod components;
mod error;
mod evaluator;
mod graph;
mod metric;
mod model;
mod network;
mod orchestrator;
mod seed;
mod sink;
mod table;
mod trial;

pub use crate::{
    components::{connected_components, largest_component},
    error::{
        DescriptorError, DescriptorErrorCode, GraphError, GraphErrorCode, MetricError,
        MetricErrorCode, ModelError, ModelErrorCode, Result, SimulationError,
        SimulationErrorCode, SinkError, SinkErrorCode, TableError, TableErrorCode, TrialError,
        TrialErrorCode,
    },
    evaluator::{MetricEvaluation, MetricValue, evaluate},
    graph::Graph,
    metric::{
        AverageClustering, AverageShortestPath, DegreeAssortativity, Density, Diameter, FnMetric,
        GraphMetric, MeanBetweenness, MeanDegree, MetricId, MetricRegistry, Transitivity,
        metric_fn,
    },
    model::{
        BarabasiAlbert, ErdosRenyi, GraphModel, ModelId, ModelParams, ModelRegistry,
        ModelSelection, UnknownModelId, WattsStrogatz,
    },
    network::{NetworkDescriptor, NetworkSource},
    orchestrator::{
        DEFAULT_MAX_WORKERS, DEFAULT_TRIALS, NetworkReport, NetworkStatus, Orchestrator,
        OrchestratorBuilder, RunReport, SimulationRun, TrialTally,
    },
    seed::{SeedPolicy, SeedScope, UnknownSeedScope, derive_trial_seed},
    sink::{output_file_name, persist, write_csv},
    table::{ITERATION_COLUMN, NETWORK_COLUMN, ResultRow, ResultsTable},
    trial::{TrialKey, TrialOutcome, execute_trial, run_trial},
};
