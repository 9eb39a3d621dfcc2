//! Resolves a constraint pattern against the graph's nodes/edges. Tried, in
//! order, against `hier_path`, `local_name`, then `canonical_name` — first
//! field that yields any match wins; no silent partial/substring fallback.

use crate::features::identity::pattern_cache::PatternCache;
use crate::shared::models::{DesignGraph, Edge, Node};

pub fn match_nodes<'a>(graph: &'a DesignGraph, cache: &PatternCache, pattern: &str) -> Vec<&'a Node> {
    let by_hier: Vec<&Node> = graph.nodes.values().filter(|n| cache.matches(pattern, &n.hier_path)).collect();
    if !by_hier.is_empty() {
        return by_hier;
    }
    let by_local: Vec<&Node> = graph.nodes.values().filter(|n| cache.matches(pattern, &n.local_name)).collect();
    if !by_local.is_empty() {
        return by_local;
    }
    graph.nodes.values().filter(|n| cache.matches(pattern, &n.canonical_name)).collect()
}

/// An edge matches if either its `base_signal` or its `canonical_name`
/// matches the pattern.
pub fn match_edges<'a>(graph: &'a DesignGraph, cache: &PatternCache, pattern: &str) -> Vec<&'a Edge> {
    let by_signal: Vec<&Edge> = graph.edges.values().filter(|e| cache.matches(pattern, &e.base_signal)).collect();
    if !by_signal.is_empty() {
        return by_signal;
    }
    graph.edges.values().filter(|e| cache.matches(pattern, &e.canonical_name)).collect()
}

/// An edge matches a from/to pair if its `src`/`dst` node matches `from`
/// and `to` respectively (via `match_nodes` on each endpoint).
pub fn match_edges_between(graph: &DesignGraph, cache: &PatternCache, from: &str, to: &str) -> Vec<String> {
    let from_ids: std::collections::BTreeSet<&str> =
        match_nodes(graph, cache, from).into_iter().map(|n| n.node_id.as_str()).collect();
    let to_ids: std::collections::BTreeSet<&str> =
        match_nodes(graph, cache, to).into_iter().map(|n| n.node_id.as_str()).collect();
    graph
        .edges
        .values()
        .filter(|e| from_ids.contains(e.src.as_str()) && to_ids.contains(e.dst.as_str()))
        .map(|e| e.edge_id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::EntityClass;

    #[test]
    fn matches_by_hier_path_first() {
        let mut graph = DesignGraph::new();
        graph.insert_node(Node::new("N_a".into(), EntityClass::IoPort, "top/sub".into(), "clk".into()));
        let cache = PatternCache::new();
        let found = match_nodes(&graph, &cache, "top/*");
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn literal_pattern_does_not_substring_match() {
        let mut graph = DesignGraph::new();
        graph.insert_node(Node::new("N_a".into(), EntityClass::IoPort, "top".into(), "clk_buf".into()));
        let cache = PatternCache::new();
        assert!(match_nodes(&graph, &cache, "clk").is_empty());
    }
}
