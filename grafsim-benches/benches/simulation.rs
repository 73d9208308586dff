//! End-to-end simulation benchmarks.
//!
//! Runs the orchestrator over one mid-sized network with a fixed seed while
//! varying the worker count, isolating the effect of trial parallelism.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use grafsim_benches::{error::BenchSetupError, params::SimulationBenchParams};
use grafsim_core::{
    MetricId, MetricRegistry, ModelId, NetworkDescriptor, OrchestratorBuilder, SeedPolicy,
    SeedScope,
};

const SEED: u64 = 42;
const TRIALS: usize = 10;
const WORKER_COUNTS: &[usize] = &[1, 2, 5];

fn simulation_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let networks = [NetworkDescriptor::new("bench", 500, 8.0)?];
    let metrics = MetricRegistry::standard().select([
        MetricId::MEAN_DEGREE.as_str(),
        MetricId::AVERAGE_CLUSTERING.as_str(),
        MetricId::AVERAGE_SHORTEST_PATH.as_str(),
    ])?;
    let mut group = c.benchmark_group("simulate");
    group.sample_size(10);

    for &workers in WORKER_COUNTS {
        let orchestrator = OrchestratorBuilder::new()
            .with_trials(TRIALS)
            .with_max_workers(workers)
            .with_seed_policy(SeedPolicy::Fixed {
                seed: SEED,
                scope: SeedScope::Run,
            })
            .with_metrics(metrics.clone())
            .build()?;
        let params = SimulationBenchParams {
            trials: TRIALS,
            workers,
        };
        group.bench_with_input(
            BenchmarkId::from_parameter(params),
            &orchestrator,
            |b, runner| b.iter(|| runner.run(ModelId::Er, &networks)),
        );
    }

    group.finish();
    Ok(())
}

fn simulation(c: &mut Criterion) {
    if let Err(err) = simulation_impl(c) {
        panic!("simulation benchmark setup failed: {err}");
    }
}

criterion_group!(benches, simulation);
criterion_main!(benches);
