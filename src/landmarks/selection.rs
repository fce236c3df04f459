use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use fnv::{FnvHashMap, FnvHashSet};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use crate::common::error::{ErrorCode, GraphError, Result};
use crate::graph_ensure;
use crate::common::types::VertexId;
use crate::graph::Graph;
use super::tree::ShortestPathTree;

/// Landmark selection strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SelectionMethod {
    /// Uniform sample without replacement
    #[default]
    #[serde(rename = "rnd")]
    Random,
    /// Highest neighbor-list size first
    #[serde(rename = "max_deg")]
    MaxDegree,
    /// Greedy cover of sampled shortest paths
    #[serde(rename = "best_cov")]
    BestCoverage,
    /// Landmarks supplied by the caller
    #[serde(rename = "manual")]
    Manual,
}

impl SelectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionMethod::Random => "rnd",
            SelectionMethod::MaxDegree => "max_deg",
            SelectionMethod::BestCoverage => "best_cov",
            SelectionMethod::Manual => "manual",
        }
    }
}

impl fmt::Display for SelectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionMethod {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rnd" | "random" => Ok(SelectionMethod::Random),
            "max_deg" | "max-degree" => Ok(SelectionMethod::MaxDegree),
            "best_cov" | "best-coverage" => Ok(SelectionMethod::BestCoverage),
            "manual" => Ok(SelectionMethod::Manual),
            other => Err(GraphError::UnsupportedStrategy(other.to_string())),
        }
    }
}

fn default_count() -> usize {
    4
}

fn default_path_samples() -> usize {
    200
}

/// Landmark selection parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandmarkConfig {
    /// Number of landmarks to select. Ignored for `Manual`, which uses `manual` as given.
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default)]
    pub method: SelectionMethod,
    /// Random vertex pairs whose tree paths form the coverage units of `BestCoverage`
    #[serde(default = "default_path_samples")]
    pub path_samples: usize,
    #[serde(default)]
    pub manual: Vec<VertexId>,
}

impl Default for LandmarkConfig {
    fn default() -> Self {
        LandmarkConfig {
            count: default_count(),
            method: SelectionMethod::default(),
            path_samples: default_path_samples(),
            manual: Vec::new(),
        }
    }
}

impl LandmarkConfig {
    pub fn new(method: SelectionMethod, count: usize) -> Self {
        LandmarkConfig {
            count,
            method,
            ..Default::default()
        }
    }

    pub fn manual(landmarks: Vec<VertexId>) -> Self {
        LandmarkConfig {
            count: landmarks.len(),
            method: SelectionMethod::Manual,
            manual: landmarks,
            ..Default::default()
        }
    }

    pub fn with_path_samples(mut self, path_samples: usize) -> Self {
        self.path_samples = path_samples;
        self
    }
}

/// Outcome of a selection: the landmarks and how many were asked for.
///
/// `BestCoverage` may return fewer landmarks than requested when its sampled paths
/// run out; `is_complete` reports that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub landmarks: Vec<VertexId>,
    pub requested: usize,
}

impl Selection {
    pub fn is_complete(&self) -> bool {
        self.landmarks.len() >= self.requested
    }

    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.landmarks.len())
    }
}

/// Choose landmarks from `graph` according to `config`
pub fn select_landmarks<R: Rng>(graph: &Graph, config: &LandmarkConfig, rng: &mut R) -> Result<Selection> {
    let requested = match config.method {
        SelectionMethod::Manual => config.manual.len(),
        _ => config.count,
    };
    validate_request(graph, requested)?;

    let landmarks = match config.method {
        SelectionMethod::Random => random(graph, requested, rng),
        SelectionMethod::MaxDegree => max_degree(graph, requested),
        SelectionMethod::BestCoverage => best_coverage(graph, requested, config.path_samples, rng)?,
        SelectionMethod::Manual => manual(graph, &config.manual)?,
    };

    let selection = Selection { landmarks, requested };
    if selection.is_complete() {
        info!(method = %config.method, landmarks = ?selection.landmarks, "selected landmarks");
    } else {
        warn!(
            method = %config.method,
            requested,
            achieved = selection.landmarks.len(),
            "path samples exhausted before reaching the requested landmark count"
        );
    }
    Ok(selection)
}

/// Validate caller-supplied landmarks; no randomness is involved
pub fn manual_selection(graph: &Graph, landmarks: Vec<VertexId>) -> Result<Selection> {
    validate_request(graph, landmarks.len())?;
    let landmarks = manual(graph, &landmarks)?;
    Ok(Selection {
        requested: landmarks.len(),
        landmarks,
    })
}

fn validate_request(graph: &Graph, requested: usize) -> Result<()> {
    if graph.is_empty() {
        return Err(GraphError::empty_graph("landmark selection"));
    }
    graph_ensure!(requested > 0, ErrorCode::BadParameter, "landmark count must be positive");
    if requested > graph.vertex_count() {
        return Err(GraphError::landmark_count(requested, graph.vertex_count()));
    }
    Ok(())
}

fn random<R: Rng>(graph: &Graph, count: usize, rng: &mut R) -> Vec<VertexId> {
    graph.vertices().choose_multiple(rng, count).copied().collect()
}

fn max_degree(graph: &Graph, count: usize) -> Vec<VertexId> {
    let mut vertices = graph.vertices();
    // stable: equal degrees keep ascending id order
    vertices.sort_by_key(|&v| Reverse(graph.degree(v)));
    vertices.truncate(count);
    vertices
}

fn manual(graph: &Graph, landmarks: &[VertexId]) -> Result<Vec<VertexId>> {
    let mut seen: FnvHashSet<VertexId> = FnvHashSet::default();
    for &v in landmarks {
        if !graph.contains_vertex(v) {
            return Err(GraphError::VertexNotFound(v));
        }
        if !seen.insert(v) {
            return Err(GraphError::invalid_argument(format!("landmark {} listed twice", v)));
        }
    }
    Ok(landmarks.to_vec())
}

/// Sample tree paths between random vertex pairs as coverage units
fn sample_coverage_units<R: Rng>(
    graph: &Graph,
    vertices: &[VertexId],
    path_samples: usize,
    rng: &mut R,
) -> Result<BTreeSet<BTreeSet<VertexId>>> {
    let mut units = BTreeSet::new();
    if vertices.len() < 2 {
        return Ok(units);
    }

    let mut trees: FnvHashMap<VertexId, ShortestPathTree> = FnvHashMap::default();
    for _ in 0..path_samples {
        let pair: Vec<VertexId> = vertices.choose_multiple(rng, 2).copied().collect();
        let (start, end) = (pair[0], pair[1]);

        if !trees.contains_key(&start) {
            trees.insert(start, ShortestPathTree::build(graph, start)?);
        }
        let tree = &trees[&start];
        if !tree.contains(end) {
            // pair spans two components; there is no path to cover
            continue;
        }
        units.insert(tree.path_between(start, end)?.into_iter().collect());
    }

    debug!(samples = path_samples, units = units.len(), trees = trees.len(), "sampled coverage units");
    Ok(units)
}

fn best_coverage<R: Rng>(
    graph: &Graph,
    count: usize,
    path_samples: usize,
    rng: &mut R,
) -> Result<Vec<VertexId>> {
    let vertices = graph.vertices();
    let mut units = sample_coverage_units(graph, &vertices, path_samples, rng)?;
    let mut candidates: BTreeSet<VertexId> = vertices.into_iter().collect();
    let mut landmarks = Vec::with_capacity(count);

    while landmarks.len() < count && !units.is_empty() {
        let mut coverage: FnvHashMap<VertexId, usize> = FnvHashMap::default();
        for unit in &units {
            for v in unit {
                if candidates.contains(v) {
                    *coverage.entry(*v).or_insert(0) += 1;
                }
            }
        }

        // most units covered, smallest id on ties
        let best = coverage
            .into_iter()
            .max_by(|(va, ca), (vb, cb)| ca.cmp(cb).then_with(|| vb.cmp(va)))
            .map(|(v, _)| v);
        let Some(best) = best else { break };

        units.retain(|unit| !unit.contains(&best));
        candidates.remove(&best);
        landmarks.push(best);
        debug!(landmark = best, remaining_units = units.len(), "picked coverage landmark");
    }

    Ok(landmarks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn star_with_tail() -> Graph {
        // hub 1 with leaves 2..=6, and a tail 6-7-8
        Graph::from_edges(
            GraphKind::UNDIRECTED,
            [(1, 2), (1, 3), (1, 4), (1, 5), (1, 6), (6, 7), (7, 8)],
        )
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("rnd".parse::<SelectionMethod>().unwrap(), SelectionMethod::Random);
        assert_eq!("max_deg".parse::<SelectionMethod>().unwrap(), SelectionMethod::MaxDegree);
        assert_eq!("best_cov".parse::<SelectionMethod>().unwrap(), SelectionMethod::BestCoverage);
        assert_eq!("manual".parse::<SelectionMethod>().unwrap(), SelectionMethod::Manual);

        let err = "closeness".parse::<SelectionMethod>().unwrap_err();
        assert!(matches!(err, GraphError::UnsupportedStrategy(ref s) if s == "closeness"));
        assert_eq!(SelectionMethod::BestCoverage.to_string(), "best_cov");
    }

    #[test]
    fn test_random_selection() {
        let graph = star_with_tail();
        let config = LandmarkConfig::new(SelectionMethod::Random, 3);

        let a = select_landmarks(&graph, &config, &mut StdRng::seed_from_u64(11)).unwrap();
        let b = select_landmarks(&graph, &config, &mut StdRng::seed_from_u64(11)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.landmarks.len(), 3);
        let distinct: FnvHashSet<VertexId> = a.landmarks.iter().copied().collect();
        assert_eq!(distinct.len(), 3);
        assert!(a.landmarks.iter().all(|&v| graph.contains_vertex(v)));
    }

    #[test]
    fn test_max_degree_selection() {
        let graph = star_with_tail();
        let mut rng = StdRng::seed_from_u64(0);
        let selection =
            select_landmarks(&graph, &LandmarkConfig::new(SelectionMethod::MaxDegree, 3), &mut rng).unwrap();
        // degrees: 1 -> 5, 6 -> 2, 7 -> 2, everything else 1
        assert_eq!(selection.landmarks, vec![1, 6, 7]);
        assert!(selection.is_complete());
    }

    #[test]
    fn test_manual_selection() {
        let graph = star_with_tail();
        let mut rng = StdRng::seed_from_u64(0);

        let selection = select_landmarks(&graph, &LandmarkConfig::manual(vec![8, 2]), &mut rng).unwrap();
        assert_eq!(selection.landmarks, vec![8, 2]);

        let missing = select_landmarks(&graph, &LandmarkConfig::manual(vec![99]), &mut rng);
        assert!(matches!(missing, Err(GraphError::VertexNotFound(99))));

        let twice = select_landmarks(&graph, &LandmarkConfig::manual(vec![2, 2]), &mut rng);
        assert!(twice.unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_count_validation() {
        let graph = star_with_tail();
        let mut rng = StdRng::seed_from_u64(0);

        for method in [SelectionMethod::Random, SelectionMethod::MaxDegree, SelectionMethod::BestCoverage] {
            let err = select_landmarks(&graph, &LandmarkConfig::new(method, 9), &mut rng).unwrap_err();
            assert!(err.is_invalid_argument());
            let err = select_landmarks(&graph, &LandmarkConfig::new(method, 0), &mut rng).unwrap_err();
            assert!(err.is_invalid_argument());
        }

        let empty = Graph::undirected();
        let err = select_landmarks(&empty, &LandmarkConfig::default(), &mut rng).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_best_coverage_prefers_hub() {
        let graph = star_with_tail();
        let config = LandmarkConfig::new(SelectionMethod::BestCoverage, 1).with_path_samples(100);
        let selection = select_landmarks(&graph, &config, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(selection.landmarks, vec![1]);
    }

    #[test]
    fn test_best_coverage_degrades_without_duplicates() {
        let graph = star_with_tail();
        let config = LandmarkConfig::new(SelectionMethod::BestCoverage, 8).with_path_samples(3);
        let selection = select_landmarks(&graph, &config, &mut StdRng::seed_from_u64(1)).unwrap();

        assert!(selection.landmarks.len() <= 3);
        assert!(!selection.landmarks.is_empty());
        assert!(!selection.is_complete());
        assert_eq!(selection.shortfall(), 8 - selection.landmarks.len());
        let distinct: FnvHashSet<VertexId> = selection.landmarks.iter().copied().collect();
        assert_eq!(distinct.len(), selection.landmarks.len());
    }

    #[test]
    fn test_best_coverage_without_samples() {
        let graph = star_with_tail();
        let config = LandmarkConfig::new(SelectionMethod::BestCoverage, 2).with_path_samples(0);
        let selection = select_landmarks(&graph, &config, &mut StdRng::seed_from_u64(1)).unwrap();
        assert!(selection.landmarks.is_empty());
        assert_eq!(selection.shortfall(), 2);
    }

    #[test]
    fn test_config_deserialize_defaults() {
        let config: LandmarkConfig = serde_json::from_str(r#"{"method": "best_cov"}"#).unwrap();
        assert_eq!(config.method, SelectionMethod::BestCoverage);
        assert_eq!(config.count, 4);
        assert_eq!(config.path_samples, 200);
        assert!(config.manual.is_empty());
    }
}
