//! Watts–Strogatz small-world generator.

use rand::{Rng, distributions::Standard, rngs::SmallRng};
use rustworkx_core::petgraph::graph::{NodeIndex, UnGraph};

use crate::{error::ModelError, graph::Graph};

use super::{GraphModel, ModelId, ModelParams, invalid};

/// Ring lattice where each node links to its `K = round(k)` nearest
/// neighbours (`K / 2` on either side), followed by a rewiring pass that moves
/// the far endpoint of each lattice edge with probability `beta`.
///
/// Rewiring never creates self-loops or duplicate edges; a node already joined
/// to every other node keeps its edge.
///
/// # Examples
/// ```
/// use grafsim_core::{GraphModel, ModelId, ModelParams, WattsStrogatz};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let model = WattsStrogatz::new(ModelId::WsP10, 0.1);
/// let graph = model.generate(
///     ModelParams { nodes: 100, mean_degree: 6.0 },
///     &mut SmallRng::seed_from_u64(42),
/// )?;
/// // Rewiring moves edges but never changes their number.
/// assert_eq!(graph.edge_count(), 300);
/// # Ok::<(), grafsim_core::ModelError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct WattsStrogatz {
    id: ModelId,
    beta: f64,
}

impl WattsStrogatz {
    /// Creates a generator reported as `id` with rewiring probability `beta`.
    #[must_use]
    pub fn new(id: ModelId, beta: f64) -> Self {
        Self {
            id,
            beta: beta.clamp(0.0, 1.0),
        }
    }

    /// Rewiring probability.
    #[must_use]
    pub fn beta(&self) -> f64 {
        self.beta
    }
}

impl GraphModel for WattsStrogatz {
    fn generate(&self, params: ModelParams, rng: &mut SmallRng) -> Result<Graph, ModelError> {
        let nodes = params.nodes;
        if !params.mean_degree.is_finite() || params.mean_degree < 0.0 {
            return Err(invalid(
                self.id,
                format!("mean degree {} must be finite and non-negative", params.mean_degree),
            ));
        }
        let neighbours = params.mean_degree.round() as usize;
        if neighbours > nodes {
            return Err(invalid(
                self.id,
                format!("lattice degree {neighbours} exceeds node count {nodes}"),
            ));
        }
        if neighbours == nodes {
            let edges = (0..nodes).flat_map(|v| (0..v).map(move |w| (v, w)));
            return Ok(Graph::from_edges(nodes, edges)?);
        }

        let half = neighbours / 2;
        let mut graph = UnGraph::<(), ()>::with_capacity(nodes, nodes * half);
        for _ in 0..nodes {
            graph.add_node(());
        }
        for offset in 1..=half {
            for node in 0..nodes {
                let (left, right) = (NodeIndex::new(node), NodeIndex::new((node + offset) % nodes));
                if !graph.contains_edge(left, right) {
                    graph.add_edge(left, right, ());
                }
            }
        }

        for offset in 1..=half {
            for node in 0..nodes {
                let draw: f64 = rng.sample(Standard);
                if draw >= self.beta {
                    continue;
                }
                let source = NodeIndex::new(node);
                let Some(target) = pick_rewire_target(rng, &graph, source) else {
                    continue;
                };
                let old = NodeIndex::new((node + offset) % nodes);
                if let Some(edge) = graph.find_edge(source, old) {
                    graph.remove_edge(edge);
                    graph.add_edge(source, target, ());
                }
            }
        }
        Ok(Graph::from_simple(graph))
    }
}

/// Draws a node that is neither `node` nor already adjacent to it. Returns
/// `None` when `node` is saturated.
fn pick_rewire_target(
    rng: &mut SmallRng,
    graph: &UnGraph<(), ()>,
    node: NodeIndex,
) -> Option<NodeIndex> {
    let nodes = graph.node_count();
    if graph.neighbors(node).count() >= nodes - 1 {
        return None;
    }
    loop {
        let candidate = NodeIndex::new(rng.gen_range(0..nodes));
        if candidate != node && !graph.contains_edge(node, candidate) {
            return Some(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rstest::rstest;

    fn generate(beta: f64, nodes: usize, k: f64, seed: u64) -> Result<Graph, ModelError> {
        WattsStrogatz::new(ModelId::WsP10, beta).generate(
            ModelParams {
                nodes,
                mean_degree: k,
            },
            &mut SmallRng::seed_from_u64(seed),
        )
    }

    #[test]
    fn zero_beta_is_a_ring_lattice() {
        let graph = generate(0.0, 10, 4.0, 0).expect("parameters are valid");
        assert_eq!(graph.edge_count(), 20);
        let mut neighbours: Vec<_> = graph.neighbours(0).collect();
        neighbours.sort_unstable();
        assert_eq!(neighbours, vec![1, 2, 8, 9]);
        assert!(graph.nodes().all(|node| graph.degree(node) == 4));
    }

    #[rstest]
    #[case(0.01)]
    #[case(0.1)]
    #[case(1.0)]
    fn rewiring_preserves_edge_count(#[case] beta: f64) {
        let graph = generate(beta, 200, 6.0, 5).expect("parameters are valid");
        assert_eq!(graph.edge_count(), 600);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    #[case(17)]
    #[case(99)]
    fn saturated_lattice_is_never_rewired(#[case] seed: u64) {
        // K = 4 on five nodes is already the complete graph.
        let graph = generate(1.0, 5, 4.0, seed).expect("parameters are valid");
        assert_eq!(graph.edge_count(), 10);
        assert!(graph.nodes().all(|node| graph.degree(node) == 4));
    }

    #[test]
    fn rounding_selects_lattice_degree() {
        let graph = generate(0.0, 20, 5.6, 0).expect("parameters are valid");
        // round(5.6) = 6 -> three neighbours on each side.
        assert_eq!(graph.edge_count(), 60);
    }

    #[test]
    fn degree_equal_to_node_count_yields_complete_graph() {
        let graph = generate(0.5, 5, 5.0, 0).expect("parameters are valid");
        assert_eq!(graph.edge_count(), 10);
    }

    #[test]
    fn degree_above_node_count_is_rejected() {
        let err = generate(0.1, 4, 6.0, 0).expect_err("lattice cannot fit");
        assert!(matches!(err, ModelError::InvalidParameters { .. }));
    }

    #[test]
    fn beta_is_clamped() {
        assert_eq!(WattsStrogatz::new(ModelId::WsP01, 3.0).beta(), 1.0);
    }
}
