//! Benchmark parameter types.

use std::fmt;

use grafsim_core::{ModelId, ModelParams};

/// Parameters for a single generated graph.
#[derive(Clone, Copy, Debug)]
pub struct GraphBenchParams {
    /// Model used to generate the graph.
    pub model: ModelId,
    /// Requested node count.
    pub nodes: usize,
    /// Requested mean degree.
    pub mean_degree: f64,
}

impl GraphBenchParams {
    /// Generator parameters.
    #[must_use]
    pub fn model_params(&self) -> ModelParams {
        ModelParams {
            nodes: self.nodes,
            mean_degree: self.mean_degree,
        }
    }
}

impl fmt::Display for GraphBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},n={},k={}", self.model, self.nodes, self.mean_degree)
    }
}

/// Parameters for a full orchestrated run.
#[derive(Clone, Copy, Debug)]
pub struct SimulationBenchParams {
    /// Trials per network.
    pub trials: usize,
    /// Worker threads.
    pub workers: usize,
}

impl fmt::Display for SimulationBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trials={},workers={}", self.trials, self.workers)
    }
}
