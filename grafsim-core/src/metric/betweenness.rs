//! Mean betweenness centrality, computed by `rustworkx_core`.

use rustworkx_core::centrality::betweenness_centrality;

use crate::{error::MetricError, graph::Graph};

use super::{GraphMetric, MetricId, require_nodes};

/// Trials already run on the worker pool, so scoring stays on one thread.
const PARALLEL_THRESHOLD: usize = usize::MAX;

/// Mean over all nodes of the normalised betweenness centrality.
///
/// Scores are normalised by `(n - 1)(n - 2)` over both orientations of every
/// pair, so each node lies in `[0, 1]`. Graphs with two nodes score zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanBetweenness;

impl GraphMetric for MeanBetweenness {
    fn id(&self) -> MetricId {
        MetricId::MEAN_BETWEENNESS
    }

    fn compute(&self, graph: &Graph) -> Result<f64, MetricError> {
        let nodes = require_nodes(graph, 2)?;
        if nodes == 2 {
            return Ok(0.0);
        }
        let total: f64 = normalised_scores(graph).iter().sum();
        Ok(total / nodes as f64)
    }
}

/// Normalised score of every node, indexed by node id.
fn normalised_scores(graph: &Graph) -> Vec<f64> {
    betweenness_centrality(graph.as_petgraph(), false, true, PARALLEL_THRESHOLD)
        .into_iter()
        .map(|score| score.unwrap_or(0.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use grafsim_test_support::fixtures;

    fn build(fixture: fixtures::EdgeList) -> Graph {
        Graph::from_edges(fixture.node_count, fixture.edges).expect("fixture is valid")
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-12, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn star_centre_carries_every_path() {
        let graph = build(fixtures::star(5));
        assert_close(&normalised_scores(&graph), &[1.0, 0.0, 0.0, 0.0, 0.0]);
        let mean = MeanBetweenness.compute(&graph).expect("defined");
        assert!((mean - 0.2).abs() < 1e-12, "mean = {mean}");
    }

    #[test]
    fn complete_graph_has_zero_betweenness() {
        assert_eq!(MeanBetweenness.compute(&build(fixtures::complete(5))), Ok(0.0));
    }

    #[test]
    fn path_middle_nodes_share_paths() {
        // Node 1 lies on 0-2 and 0-3, node 2 on 0-3 and 1-3: two of the three
        // pairs that avoid each of them.
        let graph = build(fixtures::path(4));
        assert_close(&normalised_scores(&graph), &[0.0, 2.0 / 3.0, 2.0 / 3.0, 0.0]);
        let mean = MeanBetweenness.compute(&graph).expect("defined");
        assert!((mean - 1.0 / 3.0).abs() < 1e-12, "mean = {mean}");
    }

    #[test]
    fn pair_scores_zero_and_single_node_is_rejected() {
        assert_eq!(MeanBetweenness.compute(&build(fixtures::path(2))), Ok(0.0));
        assert!(MeanBetweenness.compute(&Graph::empty(1)).is_err());
    }
}
