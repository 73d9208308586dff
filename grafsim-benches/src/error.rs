//! Benchmark setup error type.
//!
//! Lets setup functions propagate failures with `?` instead of `.expect()`.

use grafsim_core::{DescriptorError, ModelError, ModelId, SimulationError};

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// The standard registry has no model under this id.
    #[error("model {model} is not registered")]
    UnknownModel {
        /// Requested model.
        model: ModelId,
    },
    /// Graph generation failed.
    #[error("graph generation failed: {0}")]
    Model(#[from] ModelError),
    /// The generated graph had no nodes.
    #[error("model {model} produced an empty graph")]
    EmptyGraph {
        /// Model that produced it.
        model: ModelId,
    },
    /// A network descriptor was rejected.
    #[error("invalid network descriptor: {0}")]
    Descriptor(#[from] DescriptorError),
    /// Orchestrator configuration failed.
    #[error("simulation setup failed: {0}")]
    Simulation(#[from] SimulationError),
}
