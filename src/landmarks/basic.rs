use fnv::FnvHashMap;
use rand::Rng;
use tracing::{debug, info};
use crate::common::error::{GraphError, Result};
use crate::common::types::{Distance, VertexId};
use crate::graph::Graph;
use crate::graph::shortest_path::single_source_lengths;
use super::oracle::{DistanceOracle, ensure_landmarks};
use super::selection::{LandmarkConfig, Selection, manual_selection, select_landmarks};

/// Landmark oracle over precomputed exact distances.
///
/// `distance(a, b)` is `min over L of d(L, a) + d(L, b)`, an upper bound on the
/// true distance by the triangle inequality when the graph is undirected.
#[derive(Debug, Clone)]
pub struct BasicOracle {
    selection: Selection,
    distances: FnvHashMap<VertexId, FnvHashMap<VertexId, Distance>>,
}

impl BasicOracle {
    /// Select landmarks per `config`, then precompute their distance maps
    pub fn new<R: Rng>(graph: &Graph, config: &LandmarkConfig, rng: &mut R) -> Result<Self> {
        let selection = select_landmarks(graph, config, rng)?;
        Self::build(graph, selection)
    }

    /// Build over caller-supplied landmarks
    pub fn with_landmarks(graph: &Graph, landmarks: Vec<VertexId>) -> Result<Self> {
        Self::build(graph, manual_selection(graph, landmarks)?)
    }

    fn build(graph: &Graph, selection: Selection) -> Result<Self> {
        ensure_landmarks(&selection)?;
        let mut distances = FnvHashMap::default();
        for &landmark in &selection.landmarks {
            let lengths = single_source_lengths(graph, landmark)?;
            debug!(landmark, reached = lengths.values().filter(|d| d.is_finite()).count(), "landmark distances ready");
            distances.insert(landmark, lengths);
        }

        info!(landmarks = selection.landmarks.len(), vertices = graph.vertex_count(), "basic oracle built");
        Ok(BasicOracle { selection, distances })
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Precomputed distance from `landmark` to `v`, if both are known
    pub fn landmark_distance(&self, landmark: VertexId, v: VertexId) -> Option<Distance> {
        self.distances.get(&landmark)?.get(&v).copied()
    }

    fn ensure_known(&self, v: VertexId) -> Result<()> {
        // every landmark map covers every vertex of the graph
        match self.distances.values().next() {
            Some(map) if !map.contains_key(&v) => Err(GraphError::VertexNotFound(v)),
            _ => Ok(()),
        }
    }
}

impl DistanceOracle for BasicOracle {
    fn distance(&self, start: VertexId, end: VertexId) -> Result<Distance> {
        self.ensure_known(start)?;
        self.ensure_known(end)?;
        if start == end {
            return Ok(Distance::ZERO);
        }

        let mut best = Distance::Unreachable;
        for landmark in &self.selection.landmarks {
            let map = &self.distances[landmark];
            let through = map[&start] + map[&end];
            best = best.min(through);
        }
        Ok(best)
    }

    fn landmarks(&self) -> &[VertexId] {
        &self.selection.landmarks
    }
}
