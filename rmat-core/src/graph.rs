//! Graph container and vertex-set derivation for generated edge lists.

use dashmap::DashSet;
use rayon::prelude::*;

/// Identifier of a generated vertex, in `[0, vertex_count)`.
pub type VertexId = u64;

/// A directed edge without payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    source: VertexId,
    target: VertexId,
}

impl Edge {
    /// Creates an edge from `source` to `target`.
    #[must_use]
    pub const fn new(source: VertexId, target: VertexId) -> Self {
        Self { source, target }
    }

    /// Returns the tail of the edge.
    #[must_use]
    pub const fn source(&self) -> VertexId {
        self.source
    }

    /// Returns the head of the edge.
    #[must_use]
    pub const fn target(&self) -> VertexId {
        self.target
    }
}

/// Collects every distinct endpoint of `edges`, in ascending order.
///
/// Workers insert endpoints into a sharded concurrent set, so the edge list is
/// never funnelled through a single owner; only the distinct ids are
/// gathered and sorted at the end.
///
/// # Examples
/// ```
/// use rmat_core::{Edge, vertex_set};
///
/// let edges = [Edge::new(3, 1), Edge::new(1, 3), Edge::new(7, 7)];
/// assert_eq!(vertex_set(&edges), [1, 3, 7]);
/// ```
#[must_use]
pub fn vertex_set(edges: &[Edge]) -> Vec<VertexId> {
    let seen = DashSet::new();
    edges.par_iter().for_each(|edge| {
        seen.insert(edge.source);
        seen.insert(edge.target);
    });
    let mut vertices: Vec<VertexId> = seen.into_iter().collect();
    vertices.par_sort_unstable();
    vertices
}

/// A directed, unit-valued graph produced by the generator.
///
/// Vertices are exactly the endpoints of the stored edges; vertices that no
/// edge touches are absent. Parallel edges and self-loops are kept.
///
/// # Examples
/// ```
/// use rmat_core::{Edge, RmatGraph};
///
/// let graph = RmatGraph::from_edges(vec![Edge::new(0, 2), Edge::new(0, 2)]);
/// assert_eq!(graph.vertices(), [0, 2]);
/// assert_eq!(graph.edge_count(), 2);
/// assert!(graph.is_directed());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RmatGraph {
    vertices: Vec<VertexId>,
    edges: Vec<Edge>,
}

impl RmatGraph {
    /// Builds a graph whose vertex set is derived from `edges`.
    #[must_use]
    pub fn from_edges(edges: Vec<Edge>) -> Self {
        let vertices = vertex_set(&edges);
        Self { vertices, edges }
    }

    /// Distinct vertex ids in ascending order.
    #[must_use]
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    /// Edges in generation order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of distinct vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges, duplicates included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Generated graphs are always directed.
    #[must_use]
    pub const fn is_directed(&self) -> bool {
        true
    }

    /// Splits the graph into its vertex and edge lists.
    #[must_use]
    pub fn into_parts(self) -> (Vec<VertexId>, Vec<Edge>) {
        (self.vertices, self.edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::empty(vec![], vec![])]
    #[case::self_loop(vec![Edge::new(4, 4)], vec![4])]
    #[case::duplicates(vec![Edge::new(2, 0), Edge::new(2, 0), Edge::new(0, 2)], vec![0, 2])]
    #[case::unsorted(vec![Edge::new(9, 1), Edge::new(5, 3)], vec![1, 3, 5, 9])]
    fn vertex_set_is_sorted_and_distinct(#[case] edges: Vec<Edge>, #[case] expected: Vec<u64>) {
        assert_eq!(vertex_set(&edges), expected);
    }

    #[test]
    fn vertex_set_scales_past_one_worker() {
        let edges: Vec<Edge> = (0..10_000_u64).map(|i| Edge::new(i % 97, i % 13)).collect();
        let vertices = vertex_set(&edges);
        assert_eq!(vertices, (0..97).collect::<Vec<_>>());
    }

    #[test]
    fn graph_keeps_edge_order() {
        let edges = vec![Edge::new(1, 0), Edge::new(0, 1), Edge::new(1, 0)];
        let graph = RmatGraph::from_edges(edges.clone());
        assert_eq!(graph.edges(), edges.as_slice());
        assert_eq!(graph.vertex_count(), 2);
        let (vertices, parts) = graph.into_parts();
        assert_eq!(vertices, vec![0, 1]);
        assert_eq!(parts, edges);
    }
}
