// Sample-based estimates of radius, diameter and distance percentiles

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::debug;
use crate::common::error::{GraphError, Result};
use crate::common::types::VertexId;
use super::graph::Graph;
use super::shortest_path::single_source_lengths;

/// Degree statistics over the neighbor lists
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DegreeStatistics {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
}

/// Summary characteristics of a graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphCharacteristics {
    pub vertex_count: usize,
    pub edge_count: usize,
    /// Fraction of possible ordered vertex pairs joined by an edge record
    pub density: f64,
    pub degree: DegreeStatistics,
    /// Smallest eccentricity among sampled vertices
    pub radius: u64,
    /// Largest eccentricity among sampled vertices
    pub diameter: u64,
    /// 90th percentile of the finite distances from sampled vertices
    pub percentile_90: u64,
    pub sampled: usize,
}

pub fn degree_statistics(graph: &Graph) -> Result<DegreeStatistics> {
    if graph.is_empty() {
        return Err(GraphError::empty_graph("degree statistics"));
    }
    let degrees: Vec<usize> = graph.vertices().into_iter().map(|v| graph.degree(v)).collect();
    let total: usize = degrees.iter().sum();

    Ok(DegreeStatistics {
        min: degrees.iter().copied().min().unwrap_or(0),
        max: degrees.iter().copied().max().unwrap_or(0),
        mean: total as f64 / degrees.len() as f64,
    })
}

/// Estimate characteristics from up to `sample_size` random source vertices.
///
/// Eccentricities only consider reachable vertices, so on a disconnected graph the
/// estimate describes the components the samples fall into. Pass the largest
/// component from `split_graph` for the usual reading of radius and diameter.
pub fn estimate_characteristics<R: Rng>(
    graph: &Graph,
    sample_size: usize,
    rng: &mut R,
) -> Result<GraphCharacteristics> {
    if graph.is_empty() {
        return Err(GraphError::empty_graph("characteristics estimation"));
    }
    if sample_size == 0 {
        return Err(GraphError::invalid_argument("sample size must be positive"));
    }

    let vertices = graph.vertices();
    let sources: Vec<VertexId> = vertices
        .choose_multiple(rng, sample_size.min(vertices.len()))
        .copied()
        .collect();

    let mut eccentricities = Vec::with_capacity(sources.len());
    let mut distances: Vec<u64> = Vec::new();
    for &source in &sources {
        let lengths = single_source_lengths(graph, source)?;
        let finite: Vec<u64> = lengths.values().filter_map(|d| d.value()).collect();
        eccentricities.push(finite.iter().copied().max().unwrap_or(0));
        distances.extend(finite.into_iter().filter(|&d| d > 0));
        debug!(source, "sampled eccentricity");
    }

    distances.sort_unstable();
    let percentile_90 = if distances.is_empty() {
        0
    } else {
        let idx = ((distances.len() as f64) * 0.9).ceil() as usize;
        distances[idx.saturating_sub(1).min(distances.len() - 1)]
    };

    let n = graph.vertex_count();
    let records = graph.edges().count();
    let density = if n > 1 {
        records as f64 / (n as f64 * (n as f64 - 1.0))
    } else {
        0.0
    };

    Ok(GraphCharacteristics {
        vertex_count: n,
        edge_count: graph.edge_count(),
        density,
        degree: degree_statistics(graph)?,
        radius: eccentricities.iter().copied().min().unwrap_or(0),
        diameter: eccentricities.iter().copied().max().unwrap_or(0),
        percentile_90,
        sampled: sources.len(),
    })
}
