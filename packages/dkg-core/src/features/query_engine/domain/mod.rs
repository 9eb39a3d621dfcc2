pub mod filters;
pub mod index;
pub mod path;

pub use filters::{find_critical_edges, find_critical_nodes, find_edges, find_nodes, EdgeFilter, NodeFilter};
pub use index::GraphIndex;
pub use path::{FanoutResult, PathResult, PathWeight, TraversalDirection};
