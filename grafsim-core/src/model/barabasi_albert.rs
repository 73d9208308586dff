//! Barabási–Albert preferential-attachment generator.
//!
//! Targets are drawn into an ordered list rather than a set, so the edge order
//! and every later draw depend only on the RNG state.

use rand::{Rng, rngs::SmallRng};
use rustworkx_core::petgraph::graph::{NodeIndex, UnGraph};

use crate::{error::ModelError, graph::Graph};

use super::{GraphModel, ModelId, ModelParams, invalid};

/// Grows a graph by attaching every new node to `m = floor(k / 2)` distinct
/// existing nodes chosen with probability proportional to their degree.
///
/// Growth starts from a star on `m + 1` nodes. Requires `1 <= m < N`.
///
/// # Examples
/// ```
/// use grafsim_core::{BarabasiAlbert, GraphModel, ModelParams};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let graph = BarabasiAlbert.generate(
///     ModelParams { nodes: 100, mean_degree: 6.0 },
///     &mut SmallRng::seed_from_u64(42),
/// )?;
/// // The star contributes m edges, every later node another m.
/// assert_eq!(graph.edge_count(), 3 + (100 - 4) * 3);
/// # Ok::<(), grafsim_core::ModelError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BarabasiAlbert;

impl BarabasiAlbert {
    /// Number of edges each new node attaches with.
    #[must_use]
    pub fn attachment_edges(mean_degree: f64) -> usize {
        if mean_degree.is_finite() && mean_degree > 0.0 {
            (mean_degree / 2.0).floor() as usize
        } else {
            0
        }
    }
}

impl GraphModel for BarabasiAlbert {
    fn generate(&self, params: ModelParams, rng: &mut SmallRng) -> Result<Graph, ModelError> {
        let nodes = params.nodes;
        let m = Self::attachment_edges(params.mean_degree);
        if m < 1 || m >= nodes {
            return Err(invalid(
                ModelId::Ba,
                format!("attachment edges m = {m} must satisfy 1 <= m < {nodes}"),
            ));
        }

        let mut graph = UnGraph::<(), ()>::with_capacity(nodes, m * (nodes - m));
        for _ in 0..nodes {
            graph.add_node(());
        }
        // Every node appears once per incident edge, so uniform draws from this
        // list are degree-proportional.
        let mut repeated = Vec::with_capacity(2 * m * (nodes - m));
        for leaf in 1..=m {
            graph.add_edge(NodeIndex::new(0), NodeIndex::new(leaf), ());
            repeated.push(0);
            repeated.push(leaf);
        }

        let mut targets = Vec::with_capacity(m);
        for source in (m + 1)..nodes {
            targets.clear();
            while targets.len() < m {
                let candidate = repeated[rng.gen_range(0..repeated.len())];
                if !targets.contains(&candidate) {
                    targets.push(candidate);
                }
            }
            for &target in &targets {
                graph.add_edge(NodeIndex::new(source), NodeIndex::new(target), ());
                repeated.push(target);
                repeated.push(source);
            }
        }
        Ok(Graph::from_simple(graph))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rstest::rstest;

    fn generate(nodes: usize, mean_degree: f64, seed: u64) -> Result<Graph, ModelError> {
        BarabasiAlbert.generate(
            ModelParams { nodes, mean_degree },
            &mut SmallRng::seed_from_u64(seed),
        )
    }

    #[rstest]
    #[case(6.0, 3)]
    #[case(6.9, 3)]
    #[case(1.5, 0)]
    #[case(f64::NAN, 0)]
    fn attachment_edges_floor_half_the_degree(#[case] k: f64, #[case] expected: usize) {
        assert_eq!(BarabasiAlbert::attachment_edges(k), expected);
    }

    #[rstest]
    #[case::degree_too_small(50, 1.0)]
    #[case::degree_too_large(3, 8.0)]
    fn rejects_unrealisable_parameters(#[case] nodes: usize, #[case] k: f64) {
        let err = generate(nodes, k, 1).expect_err("parameters are invalid");
        assert_eq!(err.code().as_str(), "GRAFSIM_MODEL_INVALID_PARAMETERS");
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    fn generated_graph_is_connected_and_grown_nodes_have_degree_m(#[case] seed: u64) {
        let graph = generate(500, 4.0, seed).expect("parameters are valid");
        assert!(graph.is_connected());
        // Star leaves may keep degree 1; every node added later has m = 2.
        assert!((3..500).all(|node| graph.degree(node) >= 2));
    }

    #[test]
    fn same_seed_same_edge_order() {
        let first = generate(300, 6.0, 21).expect("parameters are valid");
        let second = generate(300, 6.0, 21).expect("parameters are valid");
        assert!(first.edges().eq(second.edges()));
    }

    #[test]
    fn hubs_emerge() {
        let graph = generate(2_000, 4.0, 11).expect("parameters are valid");
        let max_degree = graph.nodes().map(|node| graph.degree(node)).max();
        assert!(max_degree.is_some_and(|degree| degree > 30));
    }
}
