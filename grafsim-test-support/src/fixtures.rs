//! Small reference graphs with known metric values.
//!
//! Fixtures are plain edge lists so each crate can build its own graph type
//! from them.

/// Node count plus undirected edge list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeList {
    /// Number of nodes; ids run from `0` to `node_count - 1`.
    pub node_count: usize,
    /// Undirected edges, each listed once.
    pub edges: Vec<(usize, usize)>,
}

impl EdgeList {
    /// Wraps an explicit edge list.
    #[must_use]
    pub fn new(node_count: usize, edges: Vec<(usize, usize)>) -> Self {
        Self { node_count, edges }
    }

    /// Renders the edges as whitespace-separated text, one edge per line.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.edges
            .iter()
            .map(|(left, right)| format!("{left} {right}\n"))
            .collect()
    }
}

/// Path `0 - 1 - ... - (n - 1)`.
#[must_use]
pub fn path(n: usize) -> EdgeList {
    EdgeList::new(n, (1..n).map(|node| (node - 1, node)).collect())
}

/// Cycle on `n` nodes. Requires `n >= 3` to be simple.
#[must_use]
pub fn cycle(n: usize) -> EdgeList {
    EdgeList::new(n, (0..n).map(|node| (node, (node + 1) % n)).collect())
}

/// Star with centre `0` and `n - 1` leaves.
#[must_use]
pub fn star(n: usize) -> EdgeList {
    EdgeList::new(n, (1..n).map(|leaf| (0, leaf)).collect())
}

/// Complete graph on `n` nodes.
#[must_use]
pub fn complete(n: usize) -> EdgeList {
    let edges = (0..n)
        .flat_map(|left| (left + 1..n).map(move |right| (left, right)))
        .collect();
    EdgeList::new(n, edges)
}

/// Two disjoint triangles, `{0, 1, 2}` and `{3, 4, 5}`.
#[must_use]
pub fn two_triangles() -> EdgeList {
    EdgeList::new(6, vec![(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)])
}
