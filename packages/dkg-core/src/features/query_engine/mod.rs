//! Query Layer: read-only lookup, traversal, and statistics over a final
//! `DesignGraph`. Builds its indices once at construction; if the graph
//! changes underneath it, build a fresh `DkgQuery`.

pub mod domain;
pub mod infrastructure;

use crate::features::identity::pattern_cache::PatternCache;
use crate::shared::models::{DesignGraph, EdgeId, EntityClass, NodeId};
use std::collections::BTreeMap;

pub use domain::{
    find_critical_edges, find_critical_nodes, find_edges, find_nodes, EdgeFilter, FanoutResult, GraphIndex, NodeFilter, PathResult,
    PathWeight, TraversalDirection,
};
pub use infrastructure::TraversalEngine;

#[derive(Debug, Clone, PartialEq)]
pub struct GraphStatistics {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub nodes_by_class: BTreeMap<String, usize>,
}

pub struct DkgQuery<'a> {
    graph: &'a DesignGraph,
    index: GraphIndex,
    cache: PatternCache,
}

impl<'a> DkgQuery<'a> {
    pub fn new(graph: &'a DesignGraph) -> Self {
        Self { graph, index: GraphIndex::build(graph), cache: PatternCache::new() }
    }

    pub fn find_nodes(&self, filter: &NodeFilter) -> Vec<NodeId> {
        find_nodes(self.graph, &self.index, &self.cache, filter)
    }

    pub fn find_edges(&self, filter: &EdgeFilter) -> Vec<EdgeId> {
        find_edges(self.graph, &self.index, &self.cache, filter)
    }

    pub fn find_critical_nodes(&self, slack_threshold: f64, top_n: Option<usize>) -> Vec<(NodeId, f64)> {
        find_critical_nodes(self.graph, slack_threshold, top_n)
    }

    pub fn find_critical_edges(&self, delay_threshold: Option<f64>, top_n: Option<usize>) -> Vec<(EdgeId, f64)> {
        find_critical_edges(self.graph, delay_threshold, top_n)
    }

    pub fn find_paths(
        &self,
        sources: &[NodeId],
        targets: &[NodeId],
        direction: TraversalDirection,
        max_depth: usize,
        max_paths: usize,
        timeout_ms: u64,
        data_only: bool,
    ) -> Vec<PathResult> {
        TraversalEngine::new(self.graph).find_paths(sources, targets, direction, max_depth, max_paths, timeout_ms, data_only)
    }

    pub fn shortest_path(&self, from: &str, to: &str, weight: PathWeight) -> Option<PathResult> {
        TraversalEngine::new(self.graph).shortest_path(from, to, weight)
    }

    pub fn get_fanout(&self, node_id: &str, max_depth: usize) -> FanoutResult {
        TraversalEngine::new(self.graph).fanout(node_id, TraversalDirection::Forward, max_depth)
    }

    pub fn get_fanin(&self, node_id: &str, max_depth: usize) -> FanoutResult {
        TraversalEngine::new(self.graph).fanout(node_id, TraversalDirection::Backward, max_depth)
    }

    pub fn get_hierarchy_children(&self, prefix: &str) -> Vec<NodeId> {
        self.index.hierarchy_children(prefix).into_iter().collect()
    }

    pub fn get_hierarchy_subtree(&self, prefix: &str) -> Vec<NodeId> {
        self.index.hierarchy_subtree(prefix).into_iter().collect()
    }

    pub fn get_statistics(&self) -> GraphStatistics {
        let mut nodes_by_class: BTreeMap<String, usize> = BTreeMap::new();
        for node in self.graph.nodes.values() {
            *nodes_by_class.entry(node.entity_class.as_str().to_string()).or_insert(0) += 1;
        }
        GraphStatistics { total_nodes: self.index.node_count(), total_edges: self.index.edge_count(), nodes_by_class }
    }
}

/// Convenience matching the teacher's module-level constructor idiom.
pub fn create_query(graph: &DesignGraph) -> DkgQuery<'_> {
    DkgQuery::new(graph)
}
