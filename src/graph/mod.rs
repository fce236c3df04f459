pub mod graph;
pub mod shortest_path;
pub mod connectivity;
pub mod characteristics;

// Re-export main types from graph module
pub use graph::{
    Graph,
    GraphKind,
    Edge,
};

pub use shortest_path::{shortest_path_lengths, single_source_lengths};

pub use connectivity::{
    Component,
    ComponentSummary,
    weak_components,
    strong_components,
    split_graph,
};

pub use characteristics::{
    DegreeStatistics,
    GraphCharacteristics,
    degree_statistics,
    estimate_characteristics,
};
