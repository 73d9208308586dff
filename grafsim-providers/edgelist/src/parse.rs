//! Streaming edge-list summary.
use std::{collections::HashSet, io::BufRead};

use crate::errors::EdgeListError;

/// Marker that starts a comment unless configured otherwise.
pub const DEFAULT_COMMENT: &str = "%";

/// Degree statistics of an edge list, read as an undirected simple graph that
/// may contain self-loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeListSummary {
    /// Distinct node ids.
    pub nodes: usize,
    /// Distinct undirected edges, self-loops included.
    pub edges: usize,
    /// Distinct self-loops.
    pub self_loops: usize,
}

impl EdgeListSummary {
    /// Mean degree `2 · edges / nodes`; a self-loop adds two to its node.
    #[must_use]
    pub fn mean_degree(&self) -> f64 {
        if self.nodes == 0 {
            return 0.0;
        }
        2.0 * self.edges as f64 / self.nodes as f64
    }
}

/// Reads an edge list and counts its nodes and distinct edges.
///
/// Text from `comment` to the end of a line is ignored. Lines with fewer than
/// two tokens are skipped. The first two tokens are node ids; an optional
/// third token must be a number and anything after it is ignored.
///
/// # Errors
/// Returns [`EdgeListError::InvalidNode`] or [`EdgeListError::InvalidWeight`]
/// for malformed tokens, [`EdgeListError::Read`] when the reader fails and
/// [`EdgeListError::Empty`] when no edge was found.
///
/// # Examples
/// ```
/// use grafsim_providers_edgelist::{DEFAULT_COMMENT, summarise};
///
/// let text = "% triangle\n1 2\n2 3 0.5\n3 1\n2 1\n";
/// let summary = summarise(text.as_bytes(), DEFAULT_COMMENT)?;
/// assert_eq!(summary.nodes, 3);
/// assert_eq!(summary.edges, 3);
/// assert_eq!(summary.mean_degree(), 2.0);
/// # Ok::<(), grafsim_providers_edgelist::EdgeListError>(())
/// ```
pub fn summarise<R: BufRead>(reader: R, comment: &str) -> Result<EdgeListSummary, EdgeListError> {
    let mut nodes = HashSet::new();
    let mut edges = HashSet::new();
    for (index, line) in reader.lines().enumerate() {
        let number = index + 1;
        let line = line.map_err(|source| EdgeListError::Read {
            line: number,
            source,
        })?;
        let Some((left, right)) = parse_line(&line, comment, number)? else {
            continue;
        };
        nodes.insert(left);
        nodes.insert(right);
        edges.insert((left.min(right), left.max(right)));
    }
    if edges.is_empty() {
        return Err(EdgeListError::Empty);
    }
    let self_loops = edges.iter().filter(|(left, right)| left == right).count();
    Ok(EdgeListSummary {
        nodes: nodes.len(),
        edges: edges.len(),
        self_loops,
    })
}

fn parse_line(
    line: &str,
    comment: &str,
    number: usize,
) -> Result<Option<(u64, u64)>, EdgeListError> {
    let content = match comment {
        "" => line,
        marker => line.split_once(marker).map_or(line, |(before, _)| before),
    };
    let mut tokens = content.split_whitespace();
    let (Some(left), Some(right)) = (tokens.next(), tokens.next()) else {
        return Ok(None);
    };
    let left = parse_node(left, number)?;
    let right = parse_node(right, number)?;
    if let Some(weight) = tokens.next() {
        weight
            .parse::<f64>()
            .map_err(|_| EdgeListError::InvalidWeight {
                line: number,
                token: weight.to_owned(),
            })?;
    }
    Ok(Some((left, right)))
}

fn parse_node(token: &str, line: usize) -> Result<u64, EdgeListError> {
    token.parse().map_err(|_| EdgeListError::InvalidNode {
        line,
        token: token.to_owned(),
    })
}
