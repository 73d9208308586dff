//! Triangle-based clustering metrics.

use crate::{error::MetricError, graph::Graph};

use super::{GraphMetric, MetricId, require_nodes};

/// Mean of the local clustering coefficient over all nodes. Nodes with degree
/// below two contribute zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct AverageClustering;

impl GraphMetric for AverageClustering {
    fn id(&self) -> MetricId {
        MetricId::AVERAGE_CLUSTERING
    }

    fn compute(&self, graph: &Graph) -> Result<f64, MetricError> {
        let nodes = require_nodes(graph, 1)?;
        let triangles = triangles_per_node(graph);
        let total: f64 = graph
            .degrees()
            .into_iter()
            .enumerate()
            .map(|(node, degree)| {
                if degree < 2 {
                    return 0.0;
                }
                let pairs = (degree * (degree - 1)) as f64;
                2.0 * triangles[node] as f64 / pairs
            })
            .sum();
        Ok(total / nodes as f64)
    }
}

/// Global clustering coefficient: three times the triangle count over the
/// number of connected triples. Zero when the graph has no triples.
#[derive(Debug, Clone, Copy, Default)]
pub struct Transitivity;

impl GraphMetric for Transitivity {
    fn id(&self) -> MetricId {
        MetricId::TRANSITIVITY
    }

    fn compute(&self, graph: &Graph) -> Result<f64, MetricError> {
        require_nodes(graph, 1)?;
        let closed: usize = triangles_per_node(graph).iter().sum();
        let triples: usize = graph
            .degrees()
            .into_iter()
            .map(|degree| degree * degree.saturating_sub(1) / 2)
            .sum();
        if triples == 0 {
            return Ok(0.0);
        }
        Ok(closed as f64 / triples as f64)
    }
}

/// Number of triangles through each node.
fn triangles_per_node(graph: &Graph) -> Vec<usize> {
    let adjacency: Vec<Vec<usize>> = graph
        .nodes()
        .map(|node| {
            let mut neighbours: Vec<usize> = graph.neighbours(node).collect();
            neighbours.sort_unstable();
            neighbours
        })
        .collect();
    adjacency
        .iter()
        .map(|own| {
            let shared: usize = own
                .iter()
                .map(|&other| sorted_intersection_len(own, &adjacency[other]))
                .sum();
            shared / 2
        })
        .collect()
}

fn sorted_intersection_len(left: &[usize], right: &[usize]) -> usize {
    let (mut i, mut j, mut count) = (0, 0, 0);
    while i < left.len() && j < right.len() {
        match left[i].cmp(&right[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                count += 1;
                i += 1;
                j += 1;
            }
        }
    }
    count
}
