//! Shortest-path metrics computed by breadth-first search from every node.
//!
//! Searches run on petgraph's [`Bfs`] walker. Cost is `O(n · (n + E))`;
//! there is no cut-off for large graphs.

use rustworkx_core::petgraph::{
    graph::{NodeIndex, UnGraph},
    visit::Bfs,
};

use crate::{error::MetricError, graph::Graph};

use super::{GraphMetric, MetricId, require_nodes};

/// Mean hop distance over all ordered pairs of distinct nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AverageShortestPath;

impl GraphMetric for AverageShortestPath {
    fn id(&self) -> MetricId {
        MetricId::AVERAGE_SHORTEST_PATH
    }

    fn compute(&self, graph: &Graph) -> Result<f64, MetricError> {
        let nodes = require_nodes(graph, 2)?;
        let mut depth = vec![UNREACHED; nodes];
        let mut total: u128 = 0;
        for source in graph.nodes() {
            let sweep = sweep(graph.as_petgraph(), source, &mut depth);
            if sweep.reached != nodes {
                return Err(MetricError::Disconnected);
            }
            total += u128::from(sweep.distance_sum);
        }
        Ok(total as f64 / (nodes as f64 * (nodes as f64 - 1.0)))
    }
}

/// Largest shortest-path distance between any two nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Diameter;

impl GraphMetric for Diameter {
    fn id(&self) -> MetricId {
        MetricId::DIAMETER
    }

    fn compute(&self, graph: &Graph) -> Result<f64, MetricError> {
        let nodes = require_nodes(graph, 2)?;
        let mut depth = vec![UNREACHED; nodes];
        let mut diameter = 0;
        for source in graph.nodes() {
            let sweep = sweep(graph.as_petgraph(), source, &mut depth);
            if sweep.reached != nodes {
                return Err(MetricError::Disconnected);
            }
            diameter = diameter.max(sweep.eccentricity);
        }
        Ok(diameter as f64)
    }
}

const UNREACHED: usize = usize::MAX;

struct Sweep {
    reached: usize,
    distance_sum: u64,
    eccentricity: usize,
}

/// Walks the graph breadth-first from `source`. `Bfs` yields nodes in
/// non-decreasing distance, so a node's depth is fixed by the first yielded
/// neighbour.
fn sweep(graph: &UnGraph<(), ()>, source: usize, depth: &mut [usize]) -> Sweep {
    depth.fill(UNREACHED);
    depth[source] = 0;
    let mut sweep = Sweep {
        reached: 0,
        distance_sum: 0,
        eccentricity: 0,
    };
    let mut bfs = Bfs::new(graph, NodeIndex::new(source));
    while let Some(node) = bfs.next(graph) {
        let distance = depth[node.index()];
        sweep.reached += 1;
        sweep.distance_sum += distance as u64;
        sweep.eccentricity = sweep.eccentricity.max(distance);
        for neighbour in graph.neighbors(node) {
            let slot = &mut depth[neighbour.index()];
            if *slot == UNREACHED {
                *slot = distance + 1;
            }
        }
    }
    sweep
}
