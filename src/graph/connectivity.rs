//! Weak and strong component decomposition.
//!
//! Both traversals keep their own heap-allocated stack of frames instead of recursing,
//! so graphs with chains far longer than the native call stack can hold are safe.

use std::collections::{BTreeMap, BTreeSet};
use fnv::{FnvHashMap, FnvHashSet};
use serde::Serialize;
use tracing::{debug, info};
use crate::common::types::VertexId;
use super::graph::Graph;

/// A set of vertex identifiers forming one component
pub type Component = BTreeSet<VertexId>;

/// DFS frame for the weak traversal: the vertex plus cursors into its edge lists
struct WeakFrame {
    vertex: VertexId,
    out_pos: usize,
    in_pos: usize,
}

/// DFS frame for the strong traversal: the vertex plus cursor into a pre-ordered successor list
struct OrderedFrame {
    vertex: VertexId,
    successors: Vec<VertexId>,
    pos: usize,
}

/// Partition the graph into weak components, ignoring edge direction.
///
/// Each stack-top vertex first tries an unvisited outgoing neighbor, then an unvisited
/// incoming one, and is recorded into the current component once neither exists.
pub fn weak_components(graph: &Graph) -> Vec<Component> {
    let mut visited: FnvHashSet<VertexId> = FnvHashSet::default();
    let mut components = Vec::new();

    for seed in graph.vertices() {
        if visited.contains(&seed) {
            continue;
        }

        let mut component = Component::new();
        let mut stack = vec![WeakFrame { vertex: seed, out_pos: 0, in_pos: 0 }];
        visited.insert(seed);

        while let Some(frame) = stack.last_mut() {
            let v = frame.vertex;
            let mut next = None;

            let outgoing = graph.edges_of(v);
            while frame.out_pos < outgoing.len() {
                let w = outgoing[frame.out_pos].end;
                frame.out_pos += 1;
                if !visited.contains(&w) {
                    next = Some(w);
                    break;
                }
            }

            if next.is_none() {
                let incoming = graph.incoming_edges_of(v);
                while frame.in_pos < incoming.len() {
                    let w = incoming[frame.in_pos].start;
                    frame.in_pos += 1;
                    if !visited.contains(&w) {
                        next = Some(w);
                        break;
                    }
                }
            }

            match next {
                Some(w) => {
                    visited.insert(w);
                    stack.push(WeakFrame { vertex: w, out_pos: 0, in_pos: 0 });
                }
                None => {
                    stack.pop();
                    component.insert(v);
                }
            }
        }

        components.push(component);
    }

    info!(components = components.len(), vertices = graph.vertex_count(), "computed weak components");
    components
}

/// Partition the graph into strong components (two-pass Kosaraju).
///
/// The first pass runs DFS over incoming edges and ranks vertices by finishing time.
/// The second pass seeds from the highest-ranked unvisited vertex and follows outgoing
/// edges, visiting successors in descending rank, so each forward tree spans exactly
/// one strong component.
pub fn strong_components(graph: &Graph) -> Vec<Component> {
    let rank = finishing_ranks(graph);

    // rank -> vertex for every vertex not yet assigned to a component
    let mut remaining: BTreeMap<usize, VertexId> = rank.iter().map(|(&v, &r)| (r, v)).collect();
    let mut components = Vec::new();

    while let Some((_, seed)) = remaining.pop_last() {
        let mut component = Component::new();
        let mut stack = vec![ordered_frame(graph, seed, &rank)];

        while let Some(frame) = stack.last_mut() {
            let mut next = None;
            while frame.pos < frame.successors.len() {
                let w = frame.successors[frame.pos];
                frame.pos += 1;
                if remaining.remove(&rank[&w]).is_some() {
                    next = Some(w);
                    break;
                }
            }

            match next {
                Some(w) => stack.push(ordered_frame(graph, w, &rank)),
                None => {
                    let v = frame.vertex;
                    stack.pop();
                    component.insert(v);
                }
            }
        }

        components.push(component);
    }

    info!(components = components.len(), vertices = graph.vertex_count(), "computed strong components");
    components
}

/// Post-order finishing rank of every vertex for a DFS over incoming edges
fn finishing_ranks(graph: &Graph) -> FnvHashMap<VertexId, usize> {
    let mut rank: FnvHashMap<VertexId, usize> = FnvHashMap::default();
    let mut visited: FnvHashSet<VertexId> = FnvHashSet::default();

    for seed in graph.vertices() {
        if !visited.insert(seed) {
            continue;
        }
        // (vertex, cursor into incoming edges)
        let mut stack: Vec<(VertexId, usize)> = vec![(seed, 0)];

        while let Some((v, pos)) = stack.last_mut() {
            let incoming = graph.incoming_edges_of(*v);
            let mut next = None;
            while *pos < incoming.len() {
                let w = incoming[*pos].start;
                *pos += 1;
                if visited.insert(w) {
                    next = Some(w);
                    break;
                }
            }

            match next {
                Some(w) => stack.push((w, 0)),
                None => {
                    let finished = *v;
                    stack.pop();
                    let r = rank.len();
                    rank.insert(finished, r);
                }
            }
        }
    }

    debug!(ranked = rank.len(), "reverse pass finished");
    rank
}

fn ordered_frame(graph: &Graph, vertex: VertexId, rank: &FnvHashMap<VertexId, usize>) -> OrderedFrame {
    let mut successors: Vec<VertexId> = graph.edges_of(vertex).iter().map(|e| e.end).collect();
    successors.sort_unstable_by(|a, b| rank[b].cmp(&rank[a]));
    successors.dedup();
    OrderedFrame { vertex, successors, pos: 0 }
}

/// Size summary of a component decomposition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentSummary {
    pub count: usize,
    pub largest: usize,
    pub largest_share: f64,
}

impl ComponentSummary {
    pub fn new(components: &[Component], vertex_count: usize) -> Self {
        let largest = components.iter().map(BTreeSet::len).max().unwrap_or(0);
        let largest_share = if vertex_count == 0 {
            0.0
        } else {
            largest as f64 / vertex_count as f64
        };
        ComponentSummary {
            count: components.len(),
            largest,
            largest_share,
        }
    }
}

/// One induced subgraph per component, largest component first
pub fn split_graph(graph: &Graph, components: &[Component]) -> Vec<Graph> {
    let mut ordered: Vec<&Component> = components.iter().collect();
    ordered.sort_by(|a, b| b.len().cmp(&a.len()));

    ordered
        .into_iter()
        .map(|component| graph.induced_subgraph(component))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::graph::GraphKind;

    fn set(items: &[VertexId]) -> Component {
        items.iter().copied().collect()
    }

    fn sorted(mut components: Vec<Component>) -> Vec<Component> {
        components.sort();
        components
    }

    #[test]
    fn test_weak_components_directed() {
        let mut graph = Graph::from_edges(GraphKind::DIRECTED, [(1, 2), (3, 2), (4, 5), (6, 6)]);
        graph.add_vertex(7);

        let components = sorted(weak_components(&graph));
        assert_eq!(
            components,
            vec![set(&[1, 2, 3]), set(&[4, 5]), set(&[6]), set(&[7])]
        );
    }

    #[test]
    fn test_weak_components_undirected() {
        let graph = Graph::from_edges(GraphKind::UNDIRECTED, [(1, 2), (2, 3), (10, 11)]);
        let components = sorted(weak_components(&graph));
        assert_eq!(components, vec![set(&[1, 2, 3]), set(&[10, 11])]);
    }

    #[test]
    fn test_strong_components() {
        // two cycles joined by a one-way bridge, plus a tail
        let graph = Graph::from_edges(
            GraphKind::DIRECTED,
            [(1, 2), (2, 3), (3, 1), (3, 4), (4, 5), (5, 6), (6, 4), (6, 7)],
        );
        let components = sorted(strong_components(&graph));
        assert_eq!(components, vec![set(&[1, 2, 3]), set(&[4, 5, 6]), set(&[7])]);
    }

    #[test]
    fn test_strong_components_of_dag_are_singletons() {
        let graph = Graph::from_edges(GraphKind::DIRECTED, [(1, 2), (1, 3), (2, 4), (3, 4)]);
        let components = strong_components(&graph);
        assert_eq!(components.len(), 4);
        assert!(components.iter().all(|c| c.len() == 1));
    }

    #[test]
    fn test_strong_components_undirected_match_weak() {
        let graph = Graph::from_edges(GraphKind::UNDIRECTED, [(1, 2), (2, 3), (4, 5)]);
        assert_eq!(sorted(strong_components(&graph)), sorted(weak_components(&graph)));
    }

    #[test]
    fn test_strong_refines_weak() {
        let graph = Graph::from_edges(
            GraphKind::DIRECTED,
            [(1, 2), (2, 1), (2, 3), (4, 3), (5, 6), (6, 7), (7, 5), (8, 8)],
        );
        let weak = weak_components(&graph);
        let strong = strong_components(&graph);

        for component in &strong {
            let containing = weak.iter().filter(|w| component.is_subset(w)).count();
            assert_eq!(containing, 1);
        }
        let total: usize = strong.iter().map(BTreeSet::len).sum();
        assert_eq!(total, graph.vertex_count());
    }

    #[test]
    fn test_long_chain_does_not_overflow() {
        let n: VertexId = 200_000;
        let edges: Vec<(VertexId, VertexId)> = (0..n).map(|i| (i, i + 1)).collect();
        let mut graph = Graph::from_edges(GraphKind::DIRECTED, edges);

        assert_eq!(weak_components(&graph).len(), 1);
        assert_eq!(strong_components(&graph).len(), (n + 1) as usize);

        graph.add_edge(n, 0);
        let strong = strong_components(&graph);
        assert_eq!(strong.len(), 1);
        assert_eq!(strong[0].len(), (n + 1) as usize);
    }

    #[test]
    fn test_empty_graph() {
        let graph = Graph::directed();
        assert!(weak_components(&graph).is_empty());
        assert!(strong_components(&graph).is_empty());
        assert_eq!(ComponentSummary::new(&[], 0).largest_share, 0.0);
    }

    #[test]
    fn test_summary_and_split() {
        let graph = Graph::from_edges(GraphKind::UNDIRECTED, [(1, 2), (3, 4), (4, 5), (5, 3)]);
        let components = weak_components(&graph);

        let summary = ComponentSummary::new(&components, graph.vertex_count());
        assert_eq!(summary.count, 2);
        assert_eq!(summary.largest, 3);
        assert!((summary.largest_share - 0.6).abs() < 1e-9);

        let parts = split_graph(&graph, &components);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].vertices(), vec![3, 4, 5]);
        assert_eq!(parts[0].edge_count(), 3);
        assert_eq!(parts[1].vertices(), vec![1, 2]);
    }

    #[test]
    fn test_split_is_reproducible() {
        use crate::landmarks::{LandmarkConfig, SelectionMethod, select_landmarks};
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        // 8x8 grid plus a detached edge, so the split has real work to do
        let mut edges = Vec::new();
        for r in 0..8u64 {
            for c in 0..8u64 {
                let v = r * 8 + c;
                if c < 7 {
                    edges.push((v, v + 1));
                }
                if r < 7 {
                    edges.push((v, v + 8));
                }
            }
        }
        edges.push((100, 101));
        let graph = Graph::from_edges(GraphKind::UNDIRECTED, edges);
        let components = weak_components(&graph);
        let config = LandmarkConfig::new(SelectionMethod::BestCoverage, 3).with_path_samples(30);

        let first = split_graph(&graph, &components).remove(0);
        let expected = select_landmarks(&first, &config, &mut StdRng::seed_from_u64(1)).unwrap();
        for _ in 0..20 {
            let again = split_graph(&graph, &components).remove(0);
            for v in first.vertices() {
                assert_eq!(again.neighbors(v), first.neighbors(v));
            }
            let selection = select_landmarks(&again, &config, &mut StdRng::seed_from_u64(1)).unwrap();
            assert_eq!(selection, expected);
        }
    }
}
