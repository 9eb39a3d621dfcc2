//! Three read-only indices built once per `DesignGraph` snapshot: entity
//! class, hierarchy-path trie, and relation type. The query layer never
//! mutates the graph it indexes — rebuild a new `GraphIndex` if the graph
//! changes underneath it.

use crate::shared::models::{DesignGraph, EdgeId, EntityClass, NodeId, RelationType};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Default)]
struct TrieNode {
    node_ids: BTreeSet<NodeId>,
    children: BTreeMap<String, TrieNode>,
}

impl TrieNode {
    fn collect_subtree(&self, out: &mut BTreeSet<NodeId>) {
        out.extend(self.node_ids.iter().cloned());
        for child in self.children.values() {
            child.collect_subtree(out);
        }
    }
}

#[derive(Debug, Default)]
struct HierarchyTrie {
    root: TrieNode,
}

impl HierarchyTrie {
    fn insert(&mut self, hier_path: &str, node_id: &NodeId) {
        let mut cursor = &mut self.root;
        for segment in hier_path.split('/').filter(|s| !s.is_empty()) {
            cursor = cursor.children.entry(segment.to_string()).or_default();
        }
        cursor.node_ids.insert(node_id.clone());
    }

    fn navigate(&self, prefix: &str) -> Option<&TrieNode> {
        let mut cursor = &self.root;
        for segment in prefix.split('/').filter(|s| !s.is_empty()) {
            cursor = cursor.children.get(segment)?;
        }
        Some(cursor)
    }

    /// Nodes whose `hier_path` is exactly one segment below `prefix`.
    fn children(&self, prefix: &str) -> BTreeSet<NodeId> {
        let Some(node) = self.navigate(prefix) else { return BTreeSet::new() };
        node.children.values().flat_map(|child| child.node_ids.iter().cloned()).collect()
    }

    /// Every node at or below `prefix`, any depth.
    fn subtree(&self, prefix: &str) -> BTreeSet<NodeId> {
        let mut out = BTreeSet::new();
        if let Some(node) = self.navigate(prefix) {
            node.collect_subtree(&mut out);
        }
        out
    }
}

pub struct GraphIndex {
    by_entity_class: BTreeMap<EntityClass, BTreeSet<NodeId>>,
    hierarchy: HierarchyTrie,
    by_relation_type: BTreeMap<RelationType, BTreeSet<EdgeId>>,
    node_count: usize,
    edge_count: usize,
}

impl GraphIndex {
    pub fn build(graph: &DesignGraph) -> Self {
        let mut by_entity_class: BTreeMap<EntityClass, BTreeSet<NodeId>> = BTreeMap::new();
        let mut hierarchy = HierarchyTrie::default();
        for node in graph.nodes.values() {
            by_entity_class.entry(node.entity_class).or_default().insert(node.node_id.clone());
            hierarchy.insert(&node.hier_path, &node.node_id);
        }

        let mut by_relation_type: BTreeMap<RelationType, BTreeSet<EdgeId>> = BTreeMap::new();
        for edge in graph.edges.values() {
            by_relation_type.entry(edge.relation_type).or_default().insert(edge.edge_id.clone());
        }

        Self { by_entity_class, hierarchy, by_relation_type, node_count: graph.nodes.len(), edge_count: graph.edges.len() }
    }

    pub fn nodes_of_class(&self, class: EntityClass) -> BTreeSet<NodeId> {
        self.by_entity_class.get(&class).cloned().unwrap_or_default()
    }

    pub fn edges_of_relation(&self, relation: RelationType) -> BTreeSet<EdgeId> {
        self.by_relation_type.get(&relation).cloned().unwrap_or_default()
    }

    pub fn hierarchy_children(&self, prefix: &str) -> BTreeSet<NodeId> {
        self.hierarchy.children(prefix)
    }

    pub fn hierarchy_subtree(&self, prefix: &str) -> BTreeSet<NodeId> {
        self.hierarchy.subtree(prefix)
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
}
