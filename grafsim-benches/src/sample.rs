//! Seeded sample graphs for benchmarks.

use grafsim_core::{Graph, ModelRegistry, largest_component};
use rand::{SeedableRng, rngs::SmallRng};

use crate::{error::BenchSetupError, params::GraphBenchParams};

/// Generates the largest connected component of one seeded graph.
///
/// # Errors
/// Returns [`BenchSetupError`] when the model is missing, rejects the
/// parameters or produces no nodes.
///
/// # Examples
/// ```
/// use grafsim_benches::{params::GraphBenchParams, sample::sample_graph};
/// use grafsim_core::ModelId;
///
/// let params = GraphBenchParams { model: ModelId::WsP10, nodes: 50, mean_degree: 4.0 };
/// let graph = sample_graph(&params, 42)?;
/// assert!(graph.is_connected());
/// # Ok::<(), grafsim_benches::error::BenchSetupError>(())
/// ```
pub fn sample_graph(params: &GraphBenchParams, seed: u64) -> Result<Graph, BenchSetupError> {
    let model = ModelRegistry::standard()
        .get(params.model)
        .ok_or(BenchSetupError::UnknownModel {
            model: params.model,
        })?;
    let mut rng = SmallRng::seed_from_u64(seed);
    let graph = model.generate(params.model_params(), &mut rng)?;
    largest_component(&graph).ok_or(BenchSetupError::EmptyGraph {
        model: params.model,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use grafsim_core::ModelId;
    use rstest::rstest;

    #[rstest]
    #[case(ModelId::Er)]
    #[case(ModelId::Ba)]
    #[case(ModelId::WsP01)]
    fn sample_graph_is_connected_and_seeded(#[case] model: ModelId) {
        let params = GraphBenchParams {
            model,
            nodes: 120,
            mean_degree: 6.0,
        };
        let first = sample_graph(&params, 9).expect("sample graph builds");
        let second = sample_graph(&params, 9).expect("sample graph builds");
        assert!(first.is_connected());
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_parameters_surface_model_errors() {
        let params = GraphBenchParams {
            model: ModelId::Ba,
            nodes: 10,
            mean_degree: 1.0,
        };
        let err = sample_graph(&params, 1).expect_err("BA needs k >= 2");
        assert!(matches!(err, BenchSetupError::Model(_)));
    }
}
