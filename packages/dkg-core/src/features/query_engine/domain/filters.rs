//! Node/edge filtering: every provided criterion must hold (AND semantics).
//! An empty filter matches everything.

use super::index::GraphIndex;
use crate::features::identity::pattern_cache::PatternCache;
use crate::shared::models::{DesignGraph, Edge, EdgeId, EntityClass, Node, NodeId, RelationType};

#[derive(Default)]
pub struct NodeFilter<'a> {
    pub entity_class: Option<EntityClass>,
    pub name_pattern: Option<&'a str>,
    pub hierarchy_prefix: Option<&'a str>,
    pub clock_domain: Option<&'a str>,
    pub slack_range: Option<(f64, f64)>,
    pub custom: Option<&'a dyn Fn(&Node) -> bool>,
}

pub fn find_nodes(graph: &DesignGraph, index: &GraphIndex, cache: &PatternCache, filter: &NodeFilter) -> Vec<NodeId> {
    let mut candidates: Option<std::collections::BTreeSet<NodeId>> = None;

    if let Some(class) = filter.entity_class {
        candidates = Some(intersect(candidates, index.nodes_of_class(class)));
    }
    if let Some(prefix) = filter.hierarchy_prefix {
        candidates = Some(intersect(candidates, index.hierarchy_subtree(prefix)));
    }

    let mut result: Vec<NodeId> = match candidates {
        Some(ids) => ids.into_iter().collect(),
        None => graph.nodes.keys().cloned().collect(),
    };

    result.retain(|id| {
        let Some(node) = graph.node(id) else { return false };
        if let Some(pattern) = filter.name_pattern {
            if !cache.matches(pattern, &node.local_name) && !cache.matches(pattern, &node.hier_path) {
                return false;
            }
        }
        if let Some(domain) = filter.clock_domain {
            if node.clock_domain.as_deref() != Some(domain) {
                return false;
            }
        }
        if let Some((lo, hi)) = filter.slack_range {
            match node.slack {
                Some(s) if s >= lo && s <= hi => {}
                _ => return false,
            }
        }
        if let Some(custom) = filter.custom {
            if !custom(node) {
                return false;
            }
        }
        true
    });

    result
}

fn intersect(acc: Option<std::collections::BTreeSet<NodeId>>, next: std::collections::BTreeSet<NodeId>) -> std::collections::BTreeSet<NodeId> {
    match acc {
        Some(existing) => existing.intersection(&next).cloned().collect(),
        None => next,
    }
}

/// Nodes with `slack < threshold`, worst first. `top_n` truncates after
/// sorting; `None` returns every match.
pub fn find_critical_nodes(graph: &DesignGraph, slack_threshold: f64, top_n: Option<usize>) -> Vec<(NodeId, f64)> {
    let mut matches: Vec<(NodeId, f64)> =
        graph.nodes.values().filter_map(|n| n.slack.filter(|&s| s < slack_threshold).map(|s| (n.node_id.clone(), s))).collect();
    matches.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
    if let Some(n) = top_n {
        matches.truncate(n);
    }
    matches
}

#[derive(Default)]
pub struct EdgeFilter<'a> {
    pub relation_type: Option<RelationType>,
    pub signal_pattern: Option<&'a str>,
    pub custom: Option<&'a dyn Fn(&Edge) -> bool>,
}

pub fn find_edges(graph: &DesignGraph, index: &GraphIndex, cache: &PatternCache, filter: &EdgeFilter) -> Vec<EdgeId> {
    let mut result: Vec<EdgeId> = match filter.relation_type {
        Some(rel) => index.edges_of_relation(rel).into_iter().collect(),
        None => graph.edges.keys().cloned().collect(),
    };

    result.retain(|id| {
        let Some(edge) = graph.edge(id) else { return false };
        if let Some(pattern) = filter.signal_pattern {
            if !cache.matches(pattern, &edge.base_signal) {
                return false;
            }
        }
        if let Some(custom) = filter.custom {
            if !custom(edge) {
                return false;
            }
        }
        true
    });

    result
}

/// Edges with `delay < threshold` (or any recorded delay if `threshold` is
/// `None`), worst (largest delay) first.
pub fn find_critical_edges(graph: &DesignGraph, delay_threshold: Option<f64>, top_n: Option<usize>) -> Vec<(EdgeId, f64)> {
    let mut matches: Vec<(EdgeId, f64)> = graph
        .edges
        .values()
        .filter_map(|e| e.delay.map(|d| (e.edge_id.clone(), d)))
        .filter(|(_, d)| match delay_threshold {
            Some(t) => *d >= t,
            None => true,
        })
        .collect();
    matches.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
    if let Some(n) = top_n {
        matches.truncate(n);
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::DesignGraph;

    fn sample() -> DesignGraph {
        let mut graph = DesignGraph::new();
        let mut ff0 = Node::new("n0".into(), EntityClass::FlipFlop, "cpu/s0".into(), "ff0".into());
        ff0.slack = Some(1.0);
        let mut ff1 = Node::new("n1".into(), EntityClass::Lut, "cpu/s1".into(), "lut1".into());
        ff1.slack = Some(-0.2);
        graph.insert_node(ff0);
        graph.insert_node(ff1);
        graph
    }

    #[test]
    fn entity_class_and_hierarchy_prefix_combine_with_and() {
        let graph = sample();
        let index = GraphIndex::build(&graph);
        let cache = PatternCache::new();
        let filter = NodeFilter { entity_class: Some(EntityClass::FlipFlop), hierarchy_prefix: Some("cpu/s0"), ..Default::default() };
        let found = find_nodes(&graph, &index, &cache, &filter);
        assert_eq!(found, vec!["n0".to_string()]);
    }

    #[test]
    fn name_pattern_matches_local_name_or_hier_path() {
        let graph = sample();
        let index = GraphIndex::build(&graph);
        let cache = PatternCache::new();
        let filter = NodeFilter { name_pattern: Some("lut*"), ..Default::default() };
        let found = find_nodes(&graph, &index, &cache, &filter);
        assert_eq!(found, vec!["n1".to_string()]);
    }

    #[test]
    fn critical_nodes_are_sorted_worst_first() {
        let graph = sample();
        let critical = find_critical_nodes(&graph, 2.0, None);
        assert_eq!(critical[0].0, "n1");
        assert_eq!(critical[1].0, "n0");
    }

    #[test]
    fn top_n_truncates_after_sorting() {
        let graph = sample();
        let critical = find_critical_nodes(&graph, 2.0, Some(1));
        assert_eq!(critical.len(), 1);
        assert_eq!(critical[0].0, "n1");
    }

    #[test]
    fn find_edges_filters_by_relation_and_signal_pattern() {
        let mut graph = DesignGraph::new();
        graph.insert_node(Node::new("a".into(), EntityClass::FlipFlop, "top".into(), "a".into()));
        graph.insert_node(Node::new("b".into(), EntityClass::FlipFlop, "top".into(), "b".into()));
        graph.insert_edge(Edge::new(
            "e0".into(),
            "a".into(),
            "b".into(),
            RelationType::Clock,
            crate::shared::models::EdgeFlowType::ClockTree,
            "clk".into(),
            None,
        ));
        let index = GraphIndex::build(&graph);
        let cache = PatternCache::new();
        let filter = EdgeFilter { relation_type: Some(RelationType::Clock), signal_pattern: Some("clk"), custom: None };
        assert_eq!(find_edges(&graph, &index, &cache, &filter), vec!["e0".to_string()]);
    }

    #[test]
    fn critical_edges_sort_by_delay_descending() {
        let mut graph = DesignGraph::new();
        graph.insert_node(Node::new("a".into(), EntityClass::FlipFlop, "top".into(), "a".into()));
        graph.insert_node(Node::new("b".into(), EntityClass::FlipFlop, "top".into(), "b".into()));
        let mut e0 = Edge::new(
            "e0".into(),
            "a".into(),
            "b".into(),
            RelationType::Data,
            crate::shared::models::EdgeFlowType::Combinational,
            "d".into(),
            None,
        );
        e0.delay = Some(0.9);
        let mut e1 = Edge::new(
            "e1".into(),
            "a".into(),
            "b".into(),
            RelationType::Data,
            crate::shared::models::EdgeFlowType::Combinational,
            "d2".into(),
            None,
        );
        e1.delay = Some(0.2);
        graph.insert_edge(e0);
        graph.insert_edge(e1);
        let critical = find_critical_edges(&graph, None, None);
        assert_eq!(critical[0].0, "e0");
        assert_eq!(critical[1].0, "e1");
    }
}
