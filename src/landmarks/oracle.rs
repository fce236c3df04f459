use std::fmt;
use std::str::FromStr;
use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::common::error::{GraphError, Result};
use crate::common::types::{Distance, VertexId};
use crate::graph::Graph;
use super::basic::BasicOracle;
use super::lca::LcaOracle;
use super::selection::{LandmarkConfig, Selection};

/// Approximate distance queries answered from landmark data built once per graph
pub trait DistanceOracle {
    /// Upper bound on the shortest-path distance between `start` and `end`
    fn distance(&self, start: VertexId, end: VertexId) -> Result<Distance>;

    /// Landmarks in selection order
    fn landmarks(&self) -> &[VertexId];
}

/// Oracle variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleKind {
    #[default]
    Basic,
    Lca,
}

impl fmt::Display for OracleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleKind::Basic => write!(f, "basic"),
            OracleKind::Lca => write!(f, "lca"),
        }
    }
}

impl FromStr for OracleKind {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "basic" => Ok(OracleKind::Basic),
            "lca" => Ok(OracleKind::Lca),
            other => Err(GraphError::invalid_argument(format!("unknown oracle kind '{}'", other))),
        }
    }
}

/// Either oracle variant behind one type
#[derive(Debug, Clone)]
pub enum Oracle {
    Basic(BasicOracle),
    Lca(LcaOracle),
}

impl Oracle {
    pub fn build<R: Rng>(kind: OracleKind, graph: &Graph, config: &LandmarkConfig, rng: &mut R) -> Result<Self> {
        match kind {
            OracleKind::Basic => Ok(Oracle::Basic(BasicOracle::new(graph, config, rng)?)),
            OracleKind::Lca => Ok(Oracle::Lca(LcaOracle::new(graph, config, rng)?)),
        }
    }

    pub fn kind(&self) -> OracleKind {
        match self {
            Oracle::Basic(_) => OracleKind::Basic,
            Oracle::Lca(_) => OracleKind::Lca,
        }
    }

    pub fn selection(&self) -> &Selection {
        match self {
            Oracle::Basic(oracle) => oracle.selection(),
            Oracle::Lca(oracle) => oracle.selection(),
        }
    }
}

impl DistanceOracle for Oracle {
    fn distance(&self, start: VertexId, end: VertexId) -> Result<Distance> {
        match self {
            Oracle::Basic(oracle) => oracle.distance(start, end),
            Oracle::Lca(oracle) => oracle.distance(start, end),
        }
    }

    fn landmarks(&self) -> &[VertexId] {
        match self {
            Oracle::Basic(oracle) => oracle.landmarks(),
            Oracle::Lca(oracle) => oracle.landmarks(),
        }
    }
}

/// An oracle needs at least one landmark to answer anything
pub(crate) fn ensure_landmarks(selection: &Selection) -> Result<()> {
    if selection.landmarks.is_empty() {
        return Err(GraphError::invalid_argument(format!(
            "no landmarks were selected out of {} requested",
            selection.requested
        )));
    }
    Ok(())
}
