//! Erdős–Rényi `G(N, p)` generator backed by `rustworkx_core`.
//!
//! `gnp_random_graph` uses geometric skipping over the pair sequence, so the
//! cost is proportional to `N + E` rather than `N²`, which matters for targets
//! with millions of nodes.

use rand::{RngCore, rngs::SmallRng};
use rustworkx_core::{generators::gnp_random_graph, petgraph::graph::UnGraph};

use crate::{error::ModelError, graph::Graph};

use super::{GraphModel, ModelId, ModelParams, invalid};

/// Each pair of nodes is joined independently with probability
/// `p = k / (N - 1)`.
///
/// The generator is seeded from one draw of the trial RNG, so fixed seeding
/// reproduces the same graph.
///
/// # Examples
/// ```
/// use grafsim_core::{ErdosRenyi, GraphModel, ModelParams};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let graph = ErdosRenyi.generate(
///     ModelParams { nodes: 200, mean_degree: 6.0 },
///     &mut SmallRng::seed_from_u64(42),
/// )?;
/// assert_eq!(graph.node_count(), 200);
/// # Ok::<(), grafsim_core::ModelError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ErdosRenyi;

impl ErdosRenyi {
    /// Edge probability for the requested parameters, clamped to `[0, 1]`.
    #[must_use]
    pub fn edge_probability(params: ModelParams) -> f64 {
        if params.nodes < 2 {
            return 0.0;
        }
        (params.mean_degree / (params.nodes - 1) as f64).clamp(0.0, 1.0)
    }
}

impl GraphModel for ErdosRenyi {
    fn generate(&self, params: ModelParams, rng: &mut SmallRng) -> Result<Graph, ModelError> {
        if !params.mean_degree.is_finite() || params.mean_degree < 0.0 {
            return Err(invalid(
                ModelId::Er,
                format!("mean degree {} must be finite and non-negative", params.mean_degree),
            ));
        }
        let nodes = params.nodes;
        let p = Self::edge_probability(params);
        // Below about 1.1e-16, `1 - p` rounds to 1 and the skip length
        // `ln(u) / ln(1 - p)` is no longer finite.
        if p <= 0.0 || 1.0 - p == 1.0 {
            return Ok(Graph::empty(nodes));
        }

        let seed = rng.next_u64();
        let inner: UnGraph<(), ()> = gnp_random_graph(nodes, p, Some(seed), || (), || ())
            .map_err(|_| invalid(ModelId::Er, format!("edge probability {p} is outside [0, 1]")))?;
        Ok(Graph::from_simple(inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rstest::rstest;

    fn params(nodes: usize, mean_degree: f64) -> ModelParams {
        ModelParams { nodes, mean_degree }
    }

    #[rstest]
    #[case(1, 4.0, 0.0)]
    #[case(11, 5.0, 0.5)]
    #[case(5, 10.0, 1.0)]
    fn edge_probability_follows_mean_degree(
        #[case] nodes: usize,
        #[case] mean_degree: f64,
        #[case] expected: f64,
    ) {
        let p = ErdosRenyi::edge_probability(params(nodes, mean_degree));
        assert!((p - expected).abs() < 1e-12, "p = {p}");
    }

    #[test]
    fn single_node_yields_isolated_node() {
        let graph = ErdosRenyi
            .generate(params(1, 3.0), &mut SmallRng::seed_from_u64(0))
            .expect("single node is valid");
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn saturated_probability_yields_complete_graph() {
        let graph = ErdosRenyi
            .generate(params(6, 9.0), &mut SmallRng::seed_from_u64(0))
            .expect("complete graph is valid");
        assert_eq!(graph.edge_count(), 15);
    }

    #[rstest]
    #[case(7)]
    #[case(42)]
    #[case(1234)]
    fn mean_degree_is_close_to_target(#[case] seed: u64) {
        let graph = ErdosRenyi
            .generate(params(2_000, 6.0), &mut SmallRng::seed_from_u64(seed))
            .expect("parameters are valid");
        let mean = 2.0 * graph.edge_count() as f64 / graph.node_count() as f64;
        assert!((mean - 6.0).abs() < 0.5, "mean degree {mean}");
    }

    #[test]
    fn same_seed_same_graph() {
        let first = ErdosRenyi
            .generate(params(300, 4.0), &mut SmallRng::seed_from_u64(9))
            .expect("parameters are valid");
        let second = ErdosRenyi
            .generate(params(300, 4.0), &mut SmallRng::seed_from_u64(9))
            .expect("parameters are valid");
        assert_eq!(first, second);
    }

    #[rstest]
    #[case::below_rounding(1e-15)]
    #[case::at_rounding(1.2e-14)]
    #[case::tiny(1e-9)]
    fn tiny_positive_mean_degree_terminates(#[case] mean_degree: f64) {
        let graph = ErdosRenyi
            .generate(params(100, mean_degree), &mut SmallRng::seed_from_u64(1))
            .expect("tiny k is valid");
        assert_eq!(graph.node_count(), 100);
        assert!(graph.edge_count() <= 1, "edges = {}", graph.edge_count());
    }

    #[test]
    fn negative_mean_degree_is_rejected() {
        let err = ErdosRenyi
            .generate(params(10, -1.0), &mut SmallRng::seed_from_u64(0))
            .expect_err("negative k is invalid");
        assert!(matches!(
            err,
            ModelError::InvalidParameters {
                model: ModelId::Er,
                ..
            }
        ));
    }
}
