use fnv::{FnvHashMap, FnvHashSet};
use rand::Rng;
use tracing::{debug, info};
use crate::common::error::{GraphError, Result};
use crate::common::types::{Distance, VertexId};
use crate::graph::Graph;
use super::oracle::{DistanceOracle, ensure_landmarks};
use super::selection::{LandmarkConfig, Selection, manual_selection, select_landmarks};
use super::tree::ShortestPathTree;

/// Landmark oracle over per-landmark BFS trees.
///
/// For each landmark the distance is the hop length of the tree path between the two
/// vertices through their least common ancestor; the oracle reports the minimum.
#[derive(Debug, Clone)]
pub struct LcaOracle {
    selection: Selection,
    trees: FnvHashMap<VertexId, ShortestPathTree>,
    vertices: FnvHashSet<VertexId>,
}

impl LcaOracle {
    /// Select landmarks per `config`, then build one tree per landmark
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
        let mut trees = FnvHashMap::default();
        for &landmark in &selection.landmarks {
            let tree = ShortestPathTree::build(graph, landmark)?;
            debug!(landmark, size = tree.vertex_count(), "landmark tree ready");
            trees.insert(landmark, tree);
        }

        info!(landmarks = selection.landmarks.len(), vertices = graph.vertex_count(), "lca oracle built");
        Ok(LcaOracle {
            selection,
            trees,
            vertices: graph.vertices().into_iter().collect(),
        })
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn tree(&self, landmark: VertexId) -> Option<&ShortestPathTree> {
        self.trees.get(&landmark)
    }

    /// Shortest of the per-landmark tree paths, or `None` if no tree holds both vertices
    pub fn path(&self, start: VertexId, end: VertexId) -> Result<Option<Vec<VertexId>>> {
        self.ensure_known(start)?;
        self.ensure_known(end)?;

        let mut best: Option<Vec<VertexId>> = None;
        for landmark in &self.selection.landmarks {
            let tree = &self.trees[landmark];
            if !tree.contains(start) || !tree.contains(end) {
                continue;
            }
            let path = tree.path_between(start, end)?;
            if best.as_ref().map_or(true, |b| path.len() < b.len()) {
                best = Some(path);
            }
        }
        Ok(best)
    }

    fn ensure_known(&self, v: VertexId) -> Result<()> {
        if self.vertices.contains(&v) {
            Ok(())
        } else {
            Err(GraphError::VertexNotFound(v))
        }
    }
}

impl DistanceOracle for LcaOracle {
    fn distance(&self, start: VertexId, end: VertexId) -> Result<Distance> {
        Ok(match self.path(start, end)? {
            Some(path) => Distance::Finite(path.len() as u64 - 1),
            None => Distance::Unreachable,
        })
    }

    fn landmarks(&self) -> &[VertexId] {
        &self.selection.landmarks
    }
}
