//! Unit tests for trial dispatch and collection.

use std::{
    io,
    num::NonZeroUsize,
    sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc,
    },
    thread,
    time::Duration,
};

use grafsim_test_support::tracing::RecordingLayer;
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rstest::rstest;

use super::{
    NetworkReport, Orchestrator, OrchestratorBuilder, SimulationRun, TrialTally, collect_outcomes,
    report_outcome,
};
use crate::{
    error::{ModelError, SimulationError, TableErrorCode, TrialError},
    evaluator::{MetricEvaluation, MetricValue},
    graph::Graph,
    metric::{MetricId, MetricRegistry},
    model::{ErdosRenyi, ModelId, ModelParams, ModelRegistry},
    network::{NetworkDescriptor, NetworkSource},
    seed::{SeedPolicy, SeedScope},
    table::ResultsTable,
    trial::{TrialKey, TrialOutcome},
};

/// Network source whose resolution can be made to fail.
#[derive(Debug, Clone)]
enum TestSource {
    Ready(NetworkDescriptor),
    Broken(&'static str),
}

impl NetworkSource for TestSource {
    type Error = io::Error;

    fn name(&self) -> &str {
        match self {
            Self::Ready(descriptor) => descriptor.name(),
            Self::Broken(name) => name,
        }
    }

    fn resolve(&self) -> Result<NetworkDescriptor, Self::Error> {
        match self {
            Self::Ready(descriptor) => Ok(descriptor.clone()),
            Self::Broken(name) => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{name}.txt is missing"),
            )),
        }
    }
}

fn descriptor(name: &str, nodes: usize, mean_degree: f64) -> NetworkDescriptor {
    NetworkDescriptor::new(name, nodes, mean_degree).expect("valid descriptor")
}

fn orchestrator_with(models: ModelRegistry, trials: usize, workers: usize) -> Orchestrator {
    OrchestratorBuilder::new()
        .with_models(models)
        .with_trials(trials)
        .with_max_workers(workers)
        .with_seed_policy(SeedPolicy::Fixed {
            seed: 42,
            scope: SeedScope::Run,
        })
        .build()
        .expect("valid configuration")
}

#[rstest]
#[case::zero_trials(0, 5, "GRAFSIM_INVALID_TRIAL_COUNT")]
#[case::zero_workers(10, 0, "GRAFSIM_INVALID_WORKER_COUNT")]
fn builder_rejects_zero_counts(
    #[case] trials: usize,
    #[case] workers: usize,
    #[case] expected: &str,
) {
    let err = OrchestratorBuilder::new()
        .with_trials(trials)
        .with_max_workers(workers)
        .build()
        .expect_err("configuration is invalid");
    assert_eq!(err.code().as_str(), expected);
}

#[test]
fn builder_rejects_empty_metric_set() {
    let err = OrchestratorBuilder::new()
        .with_metrics(MetricRegistry::new())
        .build()
        .expect_err("no metrics");
    assert_eq!(err, SimulationError::EmptyMetricSet);
}

#[test]
fn builder_defaults_match_documented_values() {
    let builder = OrchestratorBuilder::new();
    assert_eq!(builder.trials(), 10);
    assert_eq!(builder.max_workers(), 5);
}

#[test]
fn unregistered_model_is_rejected_before_work() {
    let orchestrator = orchestrator_with(
        ModelRegistry::new().with_model(ModelId::Er, ErdosRenyi),
        2,
        1,
    );
    let err = orchestrator
        .run(ModelId::Ba, &[descriptor("toy", 10, 2.0)])
        .expect_err("BA is not registered");
    assert_eq!(err, SimulationError::UnknownModel { model: ModelId::Ba });
}

#[test]
fn empty_network_list_is_rejected() {
    let orchestrator = orchestrator_with(ModelRegistry::standard(), 2, 1);
    let err = orchestrator
        .run::<NetworkDescriptor>(ModelId::Er, &[])
        .expect_err("no networks");
    assert_eq!(err, SimulationError::NoNetworks);
}

#[test]
fn duplicate_network_names_are_rejected() {
    let orchestrator = orchestrator_with(ModelRegistry::standard(), 2, 1);
    let networks = [descriptor("toy", 10, 2.0), descriptor("toy", 12, 2.0)];
    let err = orchestrator
        .run(ModelId::Er, &networks)
        .expect_err("duplicate names");
    assert_eq!(err.table_code(), Some(TableErrorCode::DuplicateNetwork));
}

#[test]
fn unresolved_network_is_reported_and_skipped() {
    let orchestrator = orchestrator_with(ModelRegistry::standard(), 3, 2);
    let networks = [
        TestSource::Broken("missing"),
        TestSource::Ready(descriptor("toy", 40, 4.0)),
    ];
    let run = orchestrator.run(ModelId::Er, &networks).expect("run succeeds");
    assert_eq!(run.table().len(), 6);

    let unresolved: Vec<_> = run.report().unresolved().map(NetworkReport::network).collect();
    assert_eq!(unresolved, vec!["missing"]);
    for iteration in (1..=3).filter_map(NonZeroUsize::new) {
        let row = run
            .table()
            .get(&TrialKey::new("missing", iteration))
            .expect("row allocated");
        assert!(row.is_undefined());
    }
    assert_eq!(run.report().completed(), 3);
    assert_eq!(run.report().lost(), 0);
}

#[test]
fn panicking_model_leaves_rows_undefined() {
    let exploding = |_: ModelParams, _: &mut SmallRng| -> Result<Graph, ModelError> {
        panic!("generator exploded")
    };
    let orchestrator = orchestrator_with(
        ModelRegistry::new().with_model(ModelId::Er, exploding),
        4,
        2,
    );
    let run = orchestrator
        .run(ModelId::Er, &[descriptor("toy", 10, 2.0)])
        .expect("panics are contained");
    assert_eq!(run.report().failed(), 4);
    assert_eq!(run.report().completed(), 0);
    assert!(run.table().rows().iter().all(|row| row.is_undefined()));
}

#[test]
fn every_trial_is_dispatched_once_and_workers_are_bounded() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);
    static ACTIVE: AtomicUsize = AtomicUsize::new(0);
    static PEAK: AtomicUsize = AtomicUsize::new(0);

    let counting = |params: ModelParams, _: &mut SmallRng| {
        CALLS.fetch_add(1, Ordering::SeqCst);
        let now = ACTIVE.fetch_add(1, Ordering::SeqCst) + 1;
        PEAK.fetch_max(now, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(5));
        ACTIVE.fetch_sub(1, Ordering::SeqCst);
        Graph::from_edges(params.nodes, (1..params.nodes).map(|node| (0, node)))
            .map_err(ModelError::from)
    };
    let orchestrator = orchestrator_with(
        ModelRegistry::new().with_model(ModelId::Er, counting),
        12,
        3,
    );
    let networks = [descriptor("a", 6, 2.0), descriptor("b", 8, 2.0)];
    let run = orchestrator.run(ModelId::Er, &networks).expect("run succeeds");

    assert_eq!(CALLS.load(Ordering::SeqCst), 24);
    assert!(PEAK.load(Ordering::SeqCst) <= 3);
    assert_eq!(run.report().completed(), 24);
    assert!(run.table().rows().iter().all(|row| !row.is_undefined()));
}

#[test]
fn run_all_covers_every_registered_model() {
    let orchestrator = orchestrator_with(ModelRegistry::standard(), 1, 2);
    let runs = orchestrator
        .run_all(&[descriptor("toy", 30, 4.0)])
        .expect("all models run");
    let models: Vec<_> = runs.iter().map(SimulationRun::model).collect();
    assert_eq!(models, ModelId::ALL);
}

fn outcome(network: &str, iteration: usize, density: Option<f64>) -> TrialOutcome {
    let key = TrialKey::new(network, NonZeroUsize::new(iteration).expect("non-zero"));
    let result = match density {
        Some(value) => Ok([(MetricId::DENSITY, MetricValue::Defined(value))]
            .into_iter()
            .collect::<MetricEvaluation>()),
        None => Err(TrialError::EmptyGraph),
    };
    TrialOutcome {
        key,
        result,
        elapsed: Duration::from_millis(1),
    }
}

fn empty_table(trials: usize) -> ResultsTable {
    ResultsTable::allocate(
        ["a", "b"],
        NonZeroUsize::new(trials).expect("non-zero"),
        [MetricId::DENSITY],
    )
    .expect("distinct networks")
}

#[test]
fn missing_outcomes_are_counted_as_lost() {
    let mut table = empty_table(3);
    let tally = collect_outcomes(
        ModelId::Er,
        &mut table,
        [outcome("a", 1, Some(0.5)), outcome("a", 3, None)],
        3,
    );
    assert_eq!(
        tally,
        TrialTally {
            completed: 1,
            failed: 1,
            lost: 1
        }
    );
}

#[test]
fn repeated_key_is_ignored() {
    let mut table = empty_table(1);
    let tally = collect_outcomes(
        ModelId::Er,
        &mut table,
        [outcome("a", 1, Some(0.5)), outcome("a", 1, Some(0.9))],
        1,
    );
    assert_eq!(tally.completed, 1);
    let key = TrialKey::new("a", NonZeroUsize::MIN);
    assert_eq!(
        table.value(&key, MetricId::DENSITY),
        Some(MetricValue::Defined(0.5))
    );
}

#[test]
fn outcome_sent_after_collector_closed_is_logged() {
    let (sender, receiver) = mpsc::channel();
    drop(receiver);
    let ((), layer) = RecordingLayer::capture(|| report_outcome(&sender, outcome("a", 2, None)));
    let warnings = layer.warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field("key"), Some("a#2"));
}

#[test]
fn outcome_reaches_open_collector_silently() {
    let (sender, receiver) = mpsc::channel();
    let ((), layer) = RecordingLayer::capture(|| report_outcome(&sender, outcome("a", 1, None)));
    assert!(layer.warnings().is_empty());
    let received = receiver.try_recv().expect("outcome was delivered");
    assert_eq!(received.key, TrialKey::new("a", NonZeroUsize::MIN));
}

fn scripted_outcomes() -> Vec<TrialOutcome> {
    (1..=4)
        .flat_map(|iteration| {
            let failing = iteration == 3;
            [
                outcome("a", iteration, (!failing).then_some(iteration as f64 / 10.0)),
                outcome("b", iteration, Some(iteration as f64)),
            ]
        })
        .collect()
}

proptest! {
    #[test]
    fn collection_is_independent_of_arrival_order(
        shuffled in Just(scripted_outcomes()).prop_shuffle(),
    ) {
        let mut in_order = empty_table(4);
        let mut permuted = empty_table(4);
        let expected = collect_outcomes(ModelId::Er, &mut in_order, scripted_outcomes(), 8);
        let tally = collect_outcomes(ModelId::Er, &mut permuted, shuffled, 8);
        prop_assert_eq!(expected, TrialTally { completed: 7, failed: 1, lost: 0 });
        prop_assert_eq!(tally, expected);
        prop_assert_eq!(permuted, in_order);
    }
}
