use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, VecDeque};
use fnv::{FnvHashMap, FnvHashSet};
use crate::common::error::{GraphError, Result};
use crate::common::types::{Distance, VertexId};
use super::graph::Graph;

/// Priority queue item for Dijkstra
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeapItem {
    cost: u64,
    vertex: VertexId,
}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .cmp(&other.cost)
            .then_with(|| self.vertex.cmp(&other.vertex))
    }
}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest distances from `source` to each vertex in `targets`, following edge direction.
///
/// Unweighted graphs are searched breadth-first, weighted graphs with Dijkstra. Both stop
/// as soon as every target has been settled. Every target gets an entry in the result;
/// targets that cannot be reached map to `Distance::Unreachable`.
pub fn shortest_path_lengths(
    graph: &Graph,
    source: VertexId,
    targets: &[VertexId],
) -> Result<FnvHashMap<VertexId, Distance>> {
    if !graph.contains_vertex(source) {
        return Err(GraphError::VertexNotFound(source));
    }
    if let Some(&missing) = targets.iter().find(|&&t| !graph.contains_vertex(t)) {
        return Err(GraphError::VertexNotFound(missing));
    }

    let wanted: FnvHashSet<VertexId> = targets.iter().copied().collect();
    let settled = if graph.is_weighted() {
        dijkstra(graph, source, &wanted)
    } else {
        bfs(graph, source, &wanted)
    };

    Ok(targets
        .iter()
        .map(|&t| (t, settled.get(&t).copied().map(Distance::Finite).unwrap_or(Distance::Unreachable)))
        .collect())
}

/// Shortest distances from `source` to every vertex of the graph
pub fn single_source_lengths(graph: &Graph, source: VertexId) -> Result<FnvHashMap<VertexId, Distance>> {
    shortest_path_lengths(graph, source, &graph.vertices())
}

fn bfs(graph: &Graph, source: VertexId, targets: &FnvHashSet<VertexId>) -> FnvHashMap<VertexId, u64> {
    let mut distances: FnvHashMap<VertexId, u64> = FnvHashMap::default();
    let mut queue = VecDeque::new();
    let mut remaining = targets.len();

    distances.insert(source, 0);
    queue.push_back(source);
    if targets.contains(&source) {
        remaining -= 1;
    }

    while let Some(v) = queue.pop_front() {
        if remaining == 0 {
            break;
        }
        let depth = distances[&v];
        for edge in graph.edges_of(v) {
            if distances.contains_key(&edge.end) {
                continue;
            }
            distances.insert(edge.end, depth + 1);
            queue.push_back(edge.end);
            if targets.contains(&edge.end) {
                remaining -= 1;
            }
        }
    }

    distances
}

fn dijkstra(graph: &Graph, source: VertexId, targets: &FnvHashSet<VertexId>) -> FnvHashMap<VertexId, u64> {
    let mut best: FnvHashMap<VertexId, u64> = FnvHashMap::default();
    let mut settled: FnvHashMap<VertexId, u64> = FnvHashMap::default();
    let mut heap = BinaryHeap::new();
    let mut remaining = targets.len();

    best.insert(source, 0);
    heap.push(Reverse(HeapItem { cost: 0, vertex: source }));

    while let Some(Reverse(HeapItem { cost, vertex })) = heap.pop() {
        if settled.contains_key(&vertex) {
            continue;
        }
        settled.insert(vertex, cost);
        if targets.contains(&vertex) {
            remaining -= 1;
            if remaining == 0 {
                break;
            }
        }

        for edge in graph.edges_of(vertex) {
            if settled.contains_key(&edge.end) {
                continue;
            }
            let next = cost.saturating_add(graph.effective_weight(edge));
            if best.get(&edge.end).map_or(true, |&current| next < current) {
                best.insert(edge.end, next);
                heap.push(Reverse(HeapItem { cost: next, vertex: edge.end }));
            }
        }
    }

    settled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::graph::GraphKind;

    #[test]
    fn test_bfs_distances() {
        let graph = Graph::from_edges(GraphKind::UNDIRECTED, [(1, 2), (2, 3), (3, 4), (1, 5), (5, 4)]);
        let lengths = single_source_lengths(&graph, 1).unwrap();

        assert_eq!(lengths[&1], Distance::Finite(0));
        assert_eq!(lengths[&2], Distance::Finite(1));
        assert_eq!(lengths[&3], Distance::Finite(2));
        assert_eq!(lengths[&4], Distance::Finite(2));
        assert_eq!(lengths.len(), 5);
    }

    #[test]
    fn test_bfs_follows_direction() {
        let graph = Graph::from_edges(GraphKind::DIRECTED, [(1, 2), (2, 3), (4, 1)]);
        let lengths = shortest_path_lengths(&graph, 1, &[3, 4]).unwrap();

        assert_eq!(lengths[&3], Distance::Finite(2));
        assert_eq!(lengths[&4], Distance::Unreachable);
    }

    #[test]
    fn test_unreachable_targets_are_reported() {
        let mut graph = Graph::from_edges(GraphKind::UNDIRECTED, [(1, 2)]);
        graph.add_vertex(9);
        let lengths = shortest_path_lengths(&graph, 1, &[2, 9]).unwrap();

        assert_eq!(lengths.len(), 2);
        assert_eq!(lengths[&9], Distance::Unreachable);
    }

    #[test]
    fn test_dijkstra_prefers_lighter_path() {
        let mut graph = Graph::new(GraphKind::WEIGHTED_DIRECTED);
        graph.add_weighted_edge(1, 2, 10).unwrap();
        graph.add_weighted_edge(1, 3, 2).unwrap();
        graph.add_weighted_edge(3, 4, 2).unwrap();
        graph.add_weighted_edge(4, 2, 2).unwrap();
        graph.add_weighted_edge(2, 5, 1).unwrap();

        let lengths = single_source_lengths(&graph, 1).unwrap();
        assert_eq!(lengths[&2], Distance::Finite(6));
        assert_eq!(lengths[&5], Distance::Finite(7));
        assert_eq!(lengths[&1], Distance::ZERO);
    }

    #[test]
    fn test_dijkstra_undirected_weights() {
        let mut graph = Graph::new(GraphKind::WEIGHTED_UNDIRECTED);
        graph.add_weighted_edge(1, 2, 3).unwrap();
        graph.add_weighted_edge(2, 3, 4).unwrap();
        graph.add_weighted_edge(1, 3, 9).unwrap();

        let lengths = shortest_path_lengths(&graph, 3, &[1]).unwrap();
        assert_eq!(lengths[&1], Distance::Finite(7));
    }

    #[test]
    fn test_unknown_vertices() {
        let graph = Graph::from_edges(GraphKind::UNDIRECTED, [(1, 2)]);
        assert!(matches!(
            shortest_path_lengths(&graph, 7, &[1]),
            Err(GraphError::VertexNotFound(7))
        ));
        assert!(matches!(
            shortest_path_lengths(&graph, 1, &[2, 8]),
            Err(GraphError::VertexNotFound(8))
        ));
    }

    #[test]
    fn test_long_chain() {
        let edges: Vec<(VertexId, VertexId)> = (0..50_000).map(|i| (i, i + 1)).collect();
        let graph = Graph::from_edges(GraphKind::UNDIRECTED, edges);
        let lengths = shortest_path_lengths(&graph, 0, &[50_000]).unwrap();
        assert_eq!(lengths[&50_000], Distance::Finite(50_000));
    }
}
