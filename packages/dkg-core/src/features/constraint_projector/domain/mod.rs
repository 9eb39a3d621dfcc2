pub mod target_matcher;

pub use target_matcher::{match_edges, match_edges_between, match_nodes};
