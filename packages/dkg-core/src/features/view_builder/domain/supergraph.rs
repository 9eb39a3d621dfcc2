//! The SuperGraph and its constituent types, plus the pure id/name helpers
//! used to construct them. The `ViewBuilder` in `builder.rs` is the only
//! thing that mutates these; once built a `SuperGraph` is never edited in
//! place.

use crate::shared::models::{EdgeFlowType, Provenance, RelationType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub type SuperNodeId = String;
pub type SuperEdgeId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GraphView {
    Structural,
    Connectivity,
    Physical,
}

impl GraphView {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structural => "Structural",
            Self::Connectivity => "Connectivity",
            Self::Physical => "Physical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExecutionContext {
    Design,
    Simulation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SuperClass {
    Atomic,
    ModuleCluster,
    SequentialChain,
    CombinationalCloud,
    IoCluster,
    ConstraintGroup,
    Eliminated,
}

impl SuperClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Atomic => "Atomic",
            Self::ModuleCluster => "ModuleCluster",
            Self::SequentialChain => "SequentialChain",
            Self::CombinationalCloud => "CombinationalCloud",
            Self::IoCluster => "IOCluster",
            Self::ConstraintGroup => "ConstraintGroup",
            Self::Eliminated => "EliminatedNode",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeAction {
    Promote,
    Merge,
    Eliminate,
}

/// The result of looking up (and applying context overrides to) a node's
/// policy. `merge_class` is only meaningful when `action == Merge` — it is
/// the `SuperClass` the node's connected component will be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodePolicy {
    pub action: NodeAction,
    pub merge_class: Option<SuperClass>,
}

impl NodePolicy {
    pub fn promote() -> Self {
        Self { action: NodeAction::Promote, merge_class: None }
    }

    pub fn merge(class: SuperClass) -> Self {
        Self { action: NodeAction::Merge, merge_class: Some(class) }
    }

    pub fn eliminate() -> Self {
        Self { action: NodeAction::Eliminate, merge_class: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuperNode {
    pub node_id: SuperNodeId,
    pub super_class: SuperClass,
    pub member_nodes: BTreeSet<String>,
    pub member_edges: BTreeSet<String>,
    pub aggregated_attrs: BTreeMap<String, serde_json::Value>,
    pub provenances: Vec<Provenance>,
    pub canonical_name: String,
    pub display_name: String,
    /// Immutable per-`AnalysisKind` metrics bundles attached by the
    /// analysis aggregator, keyed by kind name (e.g. `"Timing"`). Never
    /// touched by the view builder itself — populated in a later pass.
    #[serde(default)]
    pub analysis: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuperEdge {
    pub edge_id: SuperEdgeId,
    pub src_node: SuperNodeId,
    pub dst_node: SuperNodeId,
    pub member_edges: BTreeSet<String>,
    pub member_nodes: BTreeSet<String>,
    pub relation_types: BTreeSet<RelationType>,
    pub flow_types: BTreeSet<EdgeFlowType>,
    pub provenances: Vec<Provenance>,
    pub canonical_name: String,
    pub display_name: String,
    #[serde(default)]
    pub analysis: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuperGraph {
    pub super_nodes: BTreeMap<SuperNodeId, SuperNode>,
    pub super_edges: BTreeMap<String, SuperEdge>,
    pub node_to_super: BTreeMap<String, SuperNodeId>,
}

impl SuperGraph {
    /// Composite key for `super_edges`, matching the snapshot format's
    /// `"{src}|{dst}"` separator (spec §4.10 — `|` cannot appear in a
    /// super-node id, which is only ever `SN_...` hex/alnum).
    pub fn edge_key(src: &str, dst: &str) -> String {
        format!("{src}|{dst}")
    }
}

pub fn make_supernode_canonical_name(super_class: SuperClass, any_member_hier_path: &str) -> String {
    format!("{any_member_hier_path} : {}", super_class.as_str())
}

pub fn make_supernode_display_name(super_class: SuperClass) -> String {
    match super_class {
        SuperClass::CombinationalCloud => "Combinational Logic".to_string(),
        SuperClass::SequentialChain => "Sequential Chain".to_string(),
        SuperClass::Atomic => "Block".to_string(),
        SuperClass::Eliminated => "Collapsed".to_string(),
        _ => super_class.as_str().to_string(),
    }
}

pub fn make_superedge_canonical_name(src_canonical: &str, dst_canonical: &str) -> String {
    format!("{src_canonical} -> {dst_canonical}")
}

pub fn make_superedge_display_name(relation_types: &BTreeSet<RelationType>) -> String {
    if relation_types.len() == 1 {
        let only = relation_types.iter().next().unwrap();
        return only.as_str().replace("Relation", "");
    }
    "Multiple Signals".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_for_single_relation_strips_relation_suffix() {
        let mut set = BTreeSet::new();
        set.insert(RelationType::Clock);
        assert_eq!(make_superedge_display_name(&set), "Clock");
    }

    #[test]
    fn display_name_for_multiple_relations_is_generic() {
        let mut set = BTreeSet::new();
        set.insert(RelationType::Clock);
        set.insert(RelationType::Data);
        assert_eq!(make_superedge_display_name(&set), "Multiple Signals");
    }

    #[test]
    fn edge_key_uses_pipe_separator() {
        assert_eq!(SuperGraph::edge_key("SN_a", "SN_b"), "SN_a|SN_b");
    }
}
