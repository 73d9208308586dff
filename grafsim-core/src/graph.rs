//! Undirected simple graph used throughout the pipeline.
//!
//! [`Graph`] wraps a `petgraph` [`UnGraph`] and keeps it simple: no self-loops
//! and at most one edge per node pair. Node ids are the dense indices
//! `0..node_count`, so the graph-algorithm crates can run directly on
//! [`Graph::as_petgraph`].

use std::{collections::HashSet, ops::Range};

use rustworkx_core::petgraph::{
    algo,
    graph::{NodeIndex, UnGraph},
};

use crate::error::GraphError;

/// Undirected simple graph over the node ids `0..node_count`.
///
/// Node ids are stored as `u32` indices, so graphs are limited to
/// `u32::MAX - 1` nodes.
///
/// # Examples
/// ```
/// use grafsim_core::Graph;
///
/// let graph = Graph::from_edges(3, [(0, 1), (1, 2), (2, 1)])?;
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 2);
/// assert_eq!(graph.degree(1), 2);
/// assert!(graph.has_edge(2, 1));
/// # Ok::<(), grafsim_core::GraphError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Graph {
    inner: UnGraph<(), ()>,
}

impl Graph {
    /// Builds a graph with `node_count` nodes and no edges.
    ///
    /// # Examples
    /// ```
    /// use grafsim_core::Graph;
    ///
    /// let graph = Graph::empty(4);
    /// assert_eq!(graph.node_count(), 4);
    /// assert_eq!(graph.edge_count(), 0);
    /// ```
    #[must_use]
    pub fn empty(node_count: usize) -> Self {
        let mut inner = UnGraph::with_capacity(node_count, 0);
        for _ in 0..node_count {
            inner.add_node(());
        }
        Self { inner }
    }

    /// Builds a graph from an edge iterator.
    ///
    /// Edge direction is ignored, so `(u, v)` and `(v, u)` describe the same
    /// edge. Repeated edges are merged and self-loops are discarded. Edges keep
    /// the order in which they are first seen.
    ///
    /// # Errors
    /// Returns [`GraphError::NodeOutOfRange`] when an endpoint is not below
    /// `node_count`.
    pub fn from_edges<I>(node_count: usize, edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut graph = Self::empty(node_count);
        let mut seen = HashSet::new();
        for (left, right) in edges {
            for node in [left, right] {
                if node >= node_count {
                    return Err(GraphError::NodeOutOfRange { node, node_count });
                }
            }
            if left == right || !seen.insert((left.min(right), left.max(right))) {
                continue;
            }
            graph
                .inner
                .add_edge(NodeIndex::new(left), NodeIndex::new(right), ());
        }
        Ok(graph)
    }

    /// Wraps a petgraph graph the caller has already kept simple.
    pub(crate) fn from_simple(inner: UnGraph<(), ()>) -> Self {
        debug_assert!(
            inner
                .raw_edges()
                .iter()
                .all(|edge| edge.source() != edge.target()),
            "simple graphs have no self-loops"
        );
        Self { inner }
    }

    /// Underlying petgraph graph, for running library algorithms.
    #[must_use]
    pub fn as_petgraph(&self) -> &UnGraph<(), ()> {
        &self.inner
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Returns `true` when the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    /// Iterates over node ids.
    #[must_use]
    pub fn nodes(&self) -> Range<usize> {
        0..self.node_count()
    }

    /// Neighbours of `node`, in no particular order.
    ///
    /// # Panics
    /// Panics if `node` is not below [`Self::node_count`].
    pub fn neighbours(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.inner
            .neighbors(NodeIndex::new(node))
            .map(|neighbour| neighbour.index())
    }

    /// Degree of `node`.
    ///
    /// # Panics
    /// Panics if `node` is not below [`Self::node_count`].
    #[must_use]
    pub fn degree(&self, node: usize) -> usize {
        self.inner.neighbors(NodeIndex::new(node)).count()
    }

    /// Degree of every node, indexed by node id.
    #[must_use]
    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.node_count()];
        for (left, right) in self.edges() {
            degrees[left] += 1;
            degrees[right] += 1;
        }
        degrees
    }

    /// Returns whether `left` and `right` are adjacent.
    #[must_use]
    pub fn has_edge(&self, left: usize, right: usize) -> bool {
        left < self.node_count()
            && right < self.node_count()
            && self
                .inner
                .contains_edge(NodeIndex::new(left), NodeIndex::new(right))
    }

    /// Iterates over each undirected edge once, as `(low, high)` pairs in
    /// insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.inner.raw_edges().iter().map(|edge| {
            let (left, right) = (edge.source().index(), edge.target().index());
            (left.min(right), left.max(right))
        })
    }

    /// Returns whether the graph forms a single component. The empty graph is
    /// not considered connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        !self.is_empty() && algo::connected_components(&self.inner) == 1
    }

    fn sorted_edges(&self) -> Vec<(usize, usize)> {
        let mut edges: Vec<_> = self.edges().collect();
        edges.sort_unstable();
        edges
    }
}

/// Graphs are equal when they have the same node count and edge set,
/// regardless of edge insertion order.
impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.node_count() == other.node_count()
            && self.edge_count() == other.edge_count()
            && self.sorted_edges() == other.sorted_edges()
    }
}

impl Eq for Graph {}
