pub mod edge_list;

pub use edge_list::{EdgeListFormat, EdgeListReader, load_edge_list, read_edge_list};
