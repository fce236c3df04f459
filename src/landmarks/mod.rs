pub mod tree;
pub mod selection;
pub mod oracle;
pub mod basic;
pub mod lca;

pub use tree::ShortestPathTree;

pub use selection::{
    LandmarkConfig,
    Selection,
    SelectionMethod,
    manual_selection,
    select_landmarks,
};

pub use oracle::{DistanceOracle, Oracle, OracleKind};
pub use basic::BasicOracle;
pub use lca::LcaOracle;
