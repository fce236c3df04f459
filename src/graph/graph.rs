// Graph - in-memory adjacency store for edge-list datasets

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use fnv::{FnvHashMap, FnvHashSet};
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::common::error::{GraphError, Result};
use crate::common::types::VertexId;

/// Directedness and weighting of a graph, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GraphKind {
    pub directed: bool,
    pub weighted: bool,
}

impl GraphKind {
    pub const UNDIRECTED: GraphKind = GraphKind { directed: false, weighted: false };
    pub const DIRECTED: GraphKind = GraphKind { directed: true, weighted: false };
    pub const WEIGHTED_UNDIRECTED: GraphKind = GraphKind { directed: false, weighted: true };
    pub const WEIGHTED_DIRECTED: GraphKind = GraphKind { directed: true, weighted: true };
}

/// Edge representation.
///
/// Equality and hashing ignore orientation and weight: `Edge::new(a, b)` equals
/// `Edge::new(b, a)`, so the two records an undirected graph stores for one logical
/// edge are interchangeable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Edge {
    pub start: VertexId,
    pub end: VertexId,
    weight: Option<u64>,
}

impl Edge {
    /// Create an unweighted edge
    pub fn new(start: VertexId, end: VertexId) -> Self {
        Edge { start, end, weight: None }
    }

    /// Create a weighted edge
    pub fn weighted(start: VertexId, end: VertexId, weight: u64) -> Self {
        Edge { start, end, weight: Some(weight) }
    }

    /// Edge weight, 1 when none was given
    pub fn weight(&self) -> u64 {
        self.weight.unwrap_or(1)
    }

    /// The same edge traversed in the opposite direction
    pub fn reversed(&self) -> Self {
        Edge {
            start: self.end,
            end: self.start,
            weight: self.weight,
        }
    }

    pub fn is_loop(&self) -> bool {
        self.start == self.end
    }

    fn endpoints(&self) -> (VertexId, VertexId) {
        (self.start.min(self.end), self.start.max(self.end))
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.endpoints() == other.endpoints()
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.endpoints().hash(state);
    }
}

/// Adjacency store.
///
/// Every vertex has an entry in all three maps. For an undirected graph each logical
/// edge is stored as two records (`a->b` in `outgoing[a]`, `b->a` in `outgoing[b]`)
/// and `incoming` is the transpose of `outgoing` in both modes.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    kind: GraphKind,
    outgoing: FnvHashMap<VertexId, Vec<Edge>>,
    incoming: FnvHashMap<VertexId, Vec<Edge>>,
    neighbors: FnvHashMap<VertexId, Vec<VertexId>>,
    edge_count: usize,
}

impl Graph {
    /// Create an empty graph of the given kind
    pub fn new(kind: GraphKind) -> Self {
        Graph {
            kind,
            ..Default::default()
        }
    }

    pub fn undirected() -> Self {
        Self::new(GraphKind::UNDIRECTED)
    }

    pub fn directed() -> Self {
        Self::new(GraphKind::DIRECTED)
    }

    /// Build a graph from `(start, end)` pairs
    pub fn from_edges<I>(kind: GraphKind, edges: I) -> Self
    where
        I: IntoIterator<Item = (VertexId, VertexId)>,
    {
        let mut graph = Graph::new(kind);
        for (start, end) in edges {
            graph.add_edge(start, end);
        }
        graph
    }

    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    pub fn is_directed(&self) -> bool {
        self.kind.directed
    }

    pub fn is_weighted(&self) -> bool {
        self.kind.weighted
    }

    /// Add a vertex with no edges. No-op if it already exists.
    pub fn add_vertex(&mut self, v: VertexId) {
        self.outgoing.entry(v).or_default();
        self.incoming.entry(v).or_default();
        self.neighbors.entry(v).or_default();
    }

    /// Add an edge of weight 1
    pub fn add_edge(&mut self, start: VertexId, end: VertexId) {
        self.insert(Edge::new(start, end));
    }

    /// Add a weighted edge. Fails on an unweighted graph.
    pub fn add_weighted_edge(&mut self, start: VertexId, end: VertexId, weight: u64) -> Result<()> {
        if !self.kind.weighted {
            return Err(GraphError::invalid_argument(format!(
                "cannot add weighted edge {}->{} to an unweighted graph",
                start, end
            )));
        }
        self.insert(Edge::weighted(start, end, weight));
        Ok(())
    }

    fn insert(&mut self, edge: Edge) {
        self.add_vertex(edge.start);
        self.add_vertex(edge.end);

        self.push_record(edge);
        if !self.kind.directed {
            self.push_record(edge.reversed());
        }

        self.neighbors.entry(edge.start).or_default().push(edge.end);
        self.neighbors.entry(edge.end).or_default().push(edge.start);
        self.edge_count += 1;
    }

    fn push_record(&mut self, edge: Edge) {
        self.outgoing.entry(edge.start).or_default().push(edge);
        self.incoming.entry(edge.end).or_default().push(edge);
    }

    /// Outgoing edges of `v`; empty for an unknown vertex
    pub fn edges_of(&self, v: VertexId) -> &[Edge] {
        self.outgoing.get(&v).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Incoming edges of `v`; empty for an unknown vertex
    pub fn incoming_edges_of(&self, v: VertexId) -> &[Edge] {
        self.incoming.get(&v).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Neighbor list of `v` regardless of direction; empty for an unknown vertex
    pub fn neighbors(&self, v: VertexId) -> &[VertexId] {
        self.neighbors.get(&v).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn degree(&self, v: VertexId) -> usize {
        self.neighbors(v).len()
    }

    /// Effective weight of an edge in this graph: 1 unless the graph is weighted
    pub fn effective_weight(&self, edge: &Edge) -> u64 {
        if self.kind.weighted { edge.weight() } else { 1 }
    }

    pub fn contains_vertex(&self, v: VertexId) -> bool {
        self.neighbors.contains_key(&v)
    }

    /// All vertices in ascending order
    pub fn vertices(&self) -> Vec<VertexId> {
        let mut vertices: Vec<VertexId> = self.neighbors.keys().copied().collect();
        vertices.sort_unstable();
        vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Number of logical edges (an undirected edge counts once)
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Every stored edge record. Undirected graphs yield both orientations.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.outgoing.values().flat_map(|edges| edges.iter())
    }

    /// Remove `v` and every edge referencing it.
    ///
    /// Only the adjacency lists of `v`'s neighbors are touched.
    pub fn delete_vertex(&mut self, v: VertexId) -> Result<()> {
        let neighbors = self.neighbors.remove(&v).ok_or(GraphError::VertexNotFound(v))?;
        let outgoing = self.outgoing.remove(&v).unwrap_or_default();
        let incoming = self.incoming.remove(&v).unwrap_or_default();

        for edge in &outgoing {
            if let Some(records) = self.incoming.get_mut(&edge.end) {
                records.retain(|e| e.start != v);
            }
        }
        for edge in &incoming {
            if let Some(records) = self.outgoing.get_mut(&edge.start) {
                records.retain(|e| e.end != v);
            }
        }
        for w in &neighbors {
            if let Some(list) = self.neighbors.get_mut(w) {
                list.retain(|&x| x != v);
            }
        }

        let loops = outgoing.iter().filter(|e| e.is_loop()).count();
        let removed = if self.kind.directed {
            outgoing.len() + incoming.len() - loops
        } else {
            // each undirected self-loop was stored twice in outgoing[v]
            outgoing.len() - loops / 2
        };
        self.edge_count -= removed;

        debug!(vertex = v, removed_edges = removed, "deleted vertex");
        Ok(())
    }

    /// Remove several vertices, failing on the first unknown one
    pub fn delete_vertices<I>(&mut self, vertices: I) -> Result<()>
    where
        I: IntoIterator<Item = VertexId>,
    {
        for v in vertices {
            self.delete_vertex(v)?;
        }
        Ok(())
    }

    /// Subgraph induced by `keep`: those vertices and every edge between two of them.
    ///
    /// Vertices are copied in ascending order, so adjacency order in the result depends
    /// only on `self` and `keep`.
    pub fn induced_subgraph(&self, keep: &BTreeSet<VertexId>) -> Graph {
        let mut subgraph = Graph::new(self.kind);
        let mut seen: FnvHashSet<(VertexId, VertexId)> = FnvHashSet::default();

        for &v in keep {
            if !self.contains_vertex(v) {
                continue;
            }
            subgraph.add_vertex(v);
            for edge in self.edges_of(v) {
                if !keep.contains(&edge.end) {
                    continue;
                }
                if !self.kind.directed {
                    // the reciprocal record will be visited from the other endpoint
                    if edge.start > edge.end {
                        continue;
                    }
                    if edge.is_loop() && !seen.insert((edge.start, edge.end)) {
                        seen.remove(&(edge.start, edge.end));
                        continue;
                    }
                }
                subgraph.insert(*edge);
            }
        }
        subgraph
    }
}
