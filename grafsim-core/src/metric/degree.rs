//! Degree-based metrics.

use crate::{error::MetricError, graph::Graph};

use super::{GraphMetric, MetricId, require_nodes};

/// Mean degree `2E / n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanDegree;

impl GraphMetric for MeanDegree {
    fn id(&self) -> MetricId {
        MetricId::MEAN_DEGREE
    }

    fn compute(&self, graph: &Graph) -> Result<f64, MetricError> {
        let nodes = require_nodes(graph, 1)?;
        Ok(2.0 * graph.edge_count() as f64 / nodes as f64)
    }
}

/// Fraction of possible edges present, `2E / (n (n - 1))`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Density;

impl GraphMetric for Density {
    fn id(&self) -> MetricId {
        MetricId::DENSITY
    }

    fn compute(&self, graph: &Graph) -> Result<f64, MetricError> {
        let nodes = require_nodes(graph, 2)? as f64;
        Ok(2.0 * graph.edge_count() as f64 / (nodes * (nodes - 1.0)))
    }
}

/// Newman's degree assortativity: the Pearson correlation between the degrees
/// at either end of an edge, taken over both orientations of every edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct DegreeAssortativity;

impl GraphMetric for DegreeAssortativity {
    fn id(&self) -> MetricId {
        MetricId::ASSORTATIVITY
    }

    fn compute(&self, graph: &Graph) -> Result<f64, MetricError> {
        require_nodes(graph, 2)?;
        let edges = graph.edge_count();
        if edges == 0 {
            return Err(MetricError::Undefined {
                reason: "graph has no edges",
            });
        }

        let mut sum_product = 0.0;
        let mut sum_half = 0.0;
        let mut sum_squares_half = 0.0;
        let degrees = graph.degrees();
        for (left, right) in graph.edges() {
            let j = degrees[left] as f64;
            let k = degrees[right] as f64;
            sum_product += j * k;
            sum_half += 0.5 * (j + k);
            sum_squares_half += 0.5 * (j * j + k * k);
        }
        let m = edges as f64;
        let mean = sum_half / m;
        let numerator = sum_product / m - mean * mean;
        let denominator = sum_squares_half / m - mean * mean;
        if denominator.abs() <= f64::EPSILON * sum_squares_half.max(1.0) / m {
            return Err(MetricError::Undefined {
                reason: "degree variance across edge endpoints is zero",
            });
        }
        Ok(numerator / denominator)
    }
}
