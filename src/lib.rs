// Graph Landmarks Library
// Component decomposition and landmark-based distance estimation for large graphs

// Common modules
pub mod common {
    pub mod error;
    pub mod types;
}

pub mod graph;
pub mod landmarks;
pub mod io;
pub mod settings;

// Re-export commonly used types for convenience
pub use common::error::{ErrorCode, GraphError, Result};
pub use common::types::{Distance, VertexId};

pub use graph::{
    Component,
    ComponentSummary,
    Edge,
    Graph,
    GraphCharacteristics,
    GraphKind,
    estimate_characteristics,
    shortest_path_lengths,
    split_graph,
    strong_components,
    weak_components,
};

pub use landmarks::{
    BasicOracle,
    DistanceOracle,
    LandmarkConfig,
    LcaOracle,
    Oracle,
    OracleKind,
    Selection,
    SelectionMethod,
    ShortestPathTree,
    select_landmarks,
};

pub use settings::Settings;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "graph-landmarks");
    }
}
