use std::sync::Arc;

use grafsim_core::{
    DescriptorError, DescriptorErrorCode, GraphError, GraphErrorCode, MetricError,
    MetricErrorCode, ModelError, ModelErrorCode, ModelId, SimulationError, SimulationErrorCode,
    TableError, TableErrorCode, TrialError, TrialErrorCode,
};
use rstest::rstest;

#[rstest]
#[case(MetricError::TooFewNodes { required: 2, actual: 1 }, MetricErrorCode::TooFewNodes)]
#[case(MetricError::Disconnected, MetricErrorCode::Disconnected)]
#[case(MetricError::Undefined { reason: "flat" }, MetricErrorCode::Undefined)]
fn returns_expected_metric_code(#[case] error: MetricError, #[case] expected: MetricErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
#[case(
    ModelError::InvalidParameters { model: ModelId::Ba, reason: Arc::from("m = 0") },
    ModelErrorCode::InvalidParameters,
    "GRAFSIM_MODEL_INVALID_PARAMETERS",
)]
#[case(
    ModelError::from(GraphError::NodeOutOfRange { node: 3, node_count: 2 }),
    ModelErrorCode::Graph,
    "GRAFSIM_MODEL_GRAPH",
)]
fn returns_expected_model_code(
    #[case] error: ModelError,
    #[case] expected: ModelErrorCode,
    #[case] text: &str,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), text);
}

#[rstest]
#[case(TrialError::EmptyGraph, TrialErrorCode::EmptyGraph)]
#[case(TrialError::Panicked { message: Arc::from("boom") }, TrialErrorCode::Panicked)]
fn returns_expected_trial_code(#[case] error: TrialError, #[case] expected: TrialErrorCode) {
    assert_eq!(error.code(), expected);
}

#[test]
fn graph_and_descriptor_codes_are_stable() {
    let graph = GraphError::NodeOutOfRange {
        node: 1,
        node_count: 1,
    };
    assert_eq!(graph.code(), GraphErrorCode::NodeOutOfRange);
    let descriptor = DescriptorError::InvalidMeanDegree {
        network: Arc::from("x"),
        value: -1.0,
    };
    assert_eq!(descriptor.code(), DescriptorErrorCode::InvalidMeanDegree);
    assert_eq!(
        descriptor.code().as_str(),
        "GRAFSIM_DESCRIPTOR_INVALID_MEAN_DEGREE"
    );
}

#[rstest]
#[case(SimulationError::InvalidTrialCount { got: 0 }, SimulationErrorCode::InvalidTrialCount, None)]
#[case(SimulationError::InvalidWorkerCount { got: 0 }, SimulationErrorCode::InvalidWorkerCount, None)]
#[case(SimulationError::EmptyMetricSet, SimulationErrorCode::EmptyMetricSet, None)]
#[case(SimulationError::UnknownModel { model: ModelId::Er }, SimulationErrorCode::UnknownModel, None)]
#[case(
    SimulationError::UnknownMetric { metric: Arc::from("modularidade") },
    SimulationErrorCode::UnknownMetric,
    None,
)]
#[case(SimulationError::NoNetworks, SimulationErrorCode::NoNetworks, None)]
#[case(
    SimulationError::from(TableError::DuplicateNetwork { network: Arc::from("a") }),
    SimulationErrorCode::Table,
    Some(TableErrorCode::DuplicateNetwork),
)]
#[case(
    SimulationError::ThreadPool { message: Arc::from("no threads") },
    SimulationErrorCode::ThreadPool,
    None,
)]
fn returns_expected_simulation_code(
    #[case] error: SimulationError,
    #[case] expected: SimulationErrorCode,
    #[case] table: Option<TableErrorCode>,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.table_code(), table);
    assert!(error.code().as_str().starts_with("GRAFSIM_"));
}
