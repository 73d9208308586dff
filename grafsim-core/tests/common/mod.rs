use grafsim_core::{NetworkDescriptor, Orchestrator, OrchestratorBuilder, SeedPolicy, SeedScope};

#[must_use]
pub fn descriptor(name: &str, nodes: usize, mean_degree: f64) -> NetworkDescriptor {
    NetworkDescriptor::new(name, nodes, mean_degree).expect("valid descriptor")
}

#[must_use]
pub fn seeded(trials: usize, workers: usize, seed: u64, scope: SeedScope) -> Orchestrator {
    OrchestratorBuilder::new()
        .with_trials(trials)
        .with_max_workers(workers)
        .with_seed_policy(SeedPolicy::Fixed { seed, scope })
        .build()
        .expect("valid configuration")
}

/// CSV text of `table`, for comparisons that must treat `NaN` cells as equal.
#[must_use]
pub fn csv_text(table: &grafsim_core::ResultsTable) -> String {
    let mut buffer = Vec::new();
    grafsim_core::write_csv(table, &mut buffer).expect("in-memory write succeeds");
    String::from_utf8(buffer).expect("csv is utf-8")
}
