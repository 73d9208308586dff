//! Connected-component discovery and largest-component extraction.
//!
//! Components are discovered with petgraph's union-find over the edge list.
//! When several components share the largest size, the one containing the
//! lowest node id wins, so extraction is deterministic for a given graph.

use rustworkx_core::petgraph::unionfind::UnionFind;

use crate::graph::Graph;

/// Groups node ids by connected component.
///
/// Each component lists its members in ascending order, and components are
/// ordered by their lowest member.
///
/// # Examples
/// ```
/// use grafsim_core::{Graph, connected_components};
///
/// let graph = Graph::from_edges(5, [(3, 4), (0, 1)])?;
/// let components = connected_components(&graph);
/// assert_eq!(components, vec![vec![0, 1], vec![2], vec![3, 4]]);
/// # Ok::<(), grafsim_core::GraphError>(())
/// ```
#[must_use]
pub fn connected_components(graph: &Graph) -> Vec<Vec<usize>> {
    let nodes = graph.node_count();
    let mut sets = UnionFind::<usize>::new(nodes);
    for (left, right) in graph.edges() {
        sets.union(left, right);
    }

    let mut slot_of_root = vec![usize::MAX; nodes];
    let mut components: Vec<Vec<usize>> = Vec::new();
    for (node, root) in sets.into_labeling().into_iter().enumerate() {
        if slot_of_root[root] == usize::MAX {
            slot_of_root[root] = components.len();
            components.push(Vec::new());
        }
        components[slot_of_root[root]].push(node);
    }
    components
}

/// Extracts the largest connected component and relabels it to `0..n`.
///
/// Relative order of the original ids is preserved. Ties between equally sized
/// components go to the one holding the lowest node id. Returns `None` for a
/// graph without nodes.
///
/// # Examples
/// ```
/// use grafsim_core::{Graph, largest_component};
///
/// let graph = Graph::from_edges(6, [(0, 1), (2, 3), (3, 4), (4, 2)])?;
/// let giant = largest_component(&graph).expect("graph has nodes");
/// assert_eq!(giant.node_count(), 3);
/// assert_eq!(giant.edge_count(), 3);
/// assert!(giant.is_connected());
/// # Ok::<(), grafsim_core::GraphError>(())
/// ```
#[must_use]
pub fn largest_component(graph: &Graph) -> Option<Graph> {
    let components = connected_components(graph);
    // `max_by_key` keeps the last maximum, so scan in reverse to favour the
    // component with the lowest member.
    let members = components
        .iter()
        .rev()
        .max_by_key(|component| component.len())?;

    if members.len() == graph.node_count() {
        return Some(graph.clone());
    }

    let mut keep = vec![false; graph.node_count()];
    for &node in members {
        keep[node] = true;
    }
    // `filter_map` re-adds surviving nodes in index order, which compacts the
    // ids without reordering them, and drops edges that lose an endpoint.
    let inner = graph
        .as_petgraph()
        .filter_map(|node, _| keep[node.index()].then_some(()), |_, _| Some(()));
    Some(Graph::from_simple(inner))
}
