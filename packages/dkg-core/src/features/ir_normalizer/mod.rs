pub mod domain;
pub mod infrastructure;

pub use domain::build_nodes_and_edges;
pub use infrastructure::load_netlist_json;
