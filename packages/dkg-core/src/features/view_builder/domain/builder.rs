//! The three-phase ViewBuilder: Promote, Merge, Eliminate, then an edge
//! rewrite pass. Grounded on `supergraph.py`'s `ViewBuilder`
//! (`cycle1_promote`/`cycle2_merge`/`cycle2_5_eliminate`/
//! `cycle3_rewrite_edges`/`build`), generalized where noted in this
//! repo's design ledger.

use super::policy::resolve_node_policy;
use super::supergraph::{
    make_superedge_canonical_name, make_superedge_display_name, make_supernode_canonical_name, make_supernode_display_name,
    ExecutionContext, GraphView, NodeAction, SuperClass, SuperEdge, SuperGraph, SuperNode,
};
use crate::features::identity::ids::{make_superedge_id, make_supernode_id, SignatureBuilder};
use crate::shared::models::{DesignGraph, DkgError, DkgResult};
use std::collections::{BTreeMap, BTreeSet, HashSet};

const POLICY_VERSION: &str = "v1";
/// Merge-phase supernodes are signed under a distinct policy version from
/// Promote/Eliminate, so a component's id changes if the merge algorithm's
/// behavior ever changes independent of the rest of the policy table.
const MERGE_POLICY_VERSION: &str = "v2";

fn supernode_signature(view: GraphView, super_class: SuperClass, members: &BTreeSet<String>, policy_version: &str) -> String {
    let nodes_part = members.iter().cloned().collect::<Vec<_>>().join(",");
    SignatureBuilder::new()
        .field(view.as_str())
        .field(super_class.as_str())
        .field(policy_version)
        .field(nodes_part)
        .signature()
}

fn supernode_id(view: GraphView, super_class: SuperClass, members: &BTreeSet<String>, policy_version: &str) -> String {
    make_supernode_id(view.as_str(), super_class.as_str(), &supernode_signature(view, super_class, members, policy_version))
}

fn superedge_signature(src_sn: &str, dst_sn: &str, member_edges: &BTreeSet<String>) -> String {
    let edges_part = member_edges.iter().cloned().collect::<Vec<_>>().join(",");
    SignatureBuilder::new().field(src_sn).field(dst_sn).field(POLICY_VERSION).field(edges_part).signature()
}

fn superedge_id(src_sn: &str, dst_sn: &str, member_edges: &BTreeSet<String>) -> String {
    make_superedge_id(&superedge_signature(src_sn, dst_sn, member_edges))
}

pub struct ViewBuilder<'a> {
    graph: &'a DesignGraph,
    view: GraphView,
    context: ExecutionContext,
    node_to_super: BTreeMap<String, String>,
    super_nodes: BTreeMap<String, SuperNode>,
    super_edges: BTreeMap<String, SuperEdge>,
}

impl<'a> ViewBuilder<'a> {
    pub fn new(graph: &'a DesignGraph, view: GraphView, context: ExecutionContext) -> Self {
        Self {
            graph,
            view,
            context,
            node_to_super: BTreeMap::new(),
            super_nodes: BTreeMap::new(),
            super_edges: BTreeMap::new(),
        }
    }

    fn neighbors_1hop(&self, node_id: &str) -> BTreeSet<String> {
        let Some(node) = self.graph.node(node_id) else {
            return BTreeSet::new();
        };
        let mut neighbors = BTreeSet::new();
        for edge_id in node.in_edges.iter().chain(node.out_edges.iter()) {
            if let Some(edge) = self.graph.edge(edge_id) {
                neighbors.insert(edge.src.clone());
                neighbors.insert(edge.dst.clone());
            }
        }
        neighbors.remove(node_id);
        neighbors
    }

    fn cycle1_promote(&mut self) {
        for node in self.graph.nodes.values() {
            let policy = resolve_node_policy(self.context, self.view, node);
            if policy.action != NodeAction::Promote {
                continue;
            }
            let members: BTreeSet<String> = std::iter::once(node.node_id.clone()).collect();
            let sn_id = supernode_id(self.view, SuperClass::Atomic, &members, POLICY_VERSION);
            let canonical_name = make_supernode_canonical_name(SuperClass::Atomic, &node.hier_path);
            let display_name = make_supernode_display_name(SuperClass::Atomic);
            let sn = SuperNode {
                node_id: sn_id.clone(),
                super_class: SuperClass::Atomic,
                member_nodes: members,
                member_edges: BTreeSet::new(),
                aggregated_attrs: BTreeMap::new(),
                provenances: vec![node.provenance.clone()],
                canonical_name,
                display_name,
                analysis: BTreeMap::new(),
            };
            self.super_nodes.insert(sn_id.clone(), sn);
            self.node_to_super.insert(node.node_id.clone(), sn_id);
        }
    }

    /// Connected-component merge, restricted to neighbors that are also
    /// merge candidates targeting the *same* super-class — a generalization
    /// of the original's single hardcoded `CombinationalCloud` target,
    /// needed once more than one merge target exists in a policy table
    /// (the `Physical` view merges both `ModuleCluster` and
    /// `ConstraintGroup`).
    fn cycle2_merge(&mut self) {
        let mut merge_class_of: BTreeMap<String, SuperClass> = BTreeMap::new();
        for node in self.graph.nodes.values() {
            let policy = resolve_node_policy(self.context, self.view, node);
            if policy.action == NodeAction::Merge {
                merge_class_of.insert(node.node_id.clone(), policy.merge_class.expect("merge policy always carries a class"));
            }
        }

        let mut visited: HashSet<String> = HashSet::new();
        let candidate_ids: Vec<String> = merge_class_of.keys().cloned().collect();

        for start in candidate_ids {
            if visited.contains(&start) {
                continue;
            }
            let target_class = merge_class_of[&start];
            let mut stack = vec![start];
            let mut component: BTreeSet<String> = BTreeSet::new();

            while let Some(cur) = stack.pop() {
                if visited.contains(&cur) {
                    continue;
                }
                let Some(&cur_class) = merge_class_of.get(&cur) else {
                    continue;
                };
                if cur_class != target_class {
                    continue;
                }
                visited.insert(cur.clone());
                component.insert(cur.clone());
                for nb in self.neighbors_1hop(&cur) {
                    if !visited.contains(&nb) {
                        stack.push(nb);
                    }
                }
            }

            if component.is_empty() {
                continue;
            }

            let sn_id = supernode_id(self.view, target_class, &component, MERGE_POLICY_VERSION);
            let any_hier_path = component
                .iter()
                .next()
                .and_then(|id| self.graph.node(id))
                .map(|n| n.hier_path.clone())
                .unwrap_or_default();
            let canonical_name = make_supernode_canonical_name(target_class, &any_hier_path);
            let display_name = make_supernode_display_name(target_class);
            let sn = SuperNode {
                node_id: sn_id.clone(),
                super_class: target_class,
                member_nodes: component.clone(),
                member_edges: BTreeSet::new(),
                aggregated_attrs: BTreeMap::new(),
                provenances: Vec::new(),
                canonical_name,
                display_name,
                analysis: BTreeMap::new(),
            };
            self.super_nodes.insert(sn_id.clone(), sn);
            for member in component {
                self.node_to_super.insert(member, sn_id.clone());
            }
        }
    }

    fn cycle2_5_eliminate(&mut self) -> DkgResult<()> {
        let unassigned: Vec<String> = self
            .graph
            .nodes
            .keys()
            .filter(|id| !self.node_to_super.contains_key(*id))
            .cloned()
            .collect();

        for node_id in unassigned {
            let node = &self.graph.nodes[&node_id];
            let policy = resolve_node_policy(self.context, self.view, node);
            if policy.action != NodeAction::Eliminate {
                return Err(DkgError::view_build(format!(
                    "unassigned node in view {}: {node_id}",
                    self.view.as_str()
                )));
            }
            let members: BTreeSet<String> = std::iter::once(node_id.clone()).collect();
            let sn_id = supernode_id(self.view, SuperClass::Eliminated, &members, POLICY_VERSION);
            let canonical_name = make_supernode_canonical_name(SuperClass::Eliminated, &node.hier_path);
            let display_name = make_supernode_display_name(SuperClass::Eliminated);
            let sn = SuperNode {
                node_id: sn_id.clone(),
                super_class: SuperClass::Eliminated,
                member_nodes: members,
                member_edges: BTreeSet::new(),
                aggregated_attrs: BTreeMap::new(),
                provenances: Vec::new(),
                canonical_name,
                display_name,
                analysis: BTreeMap::new(),
            };
            self.super_nodes.insert(sn_id.clone(), sn);
            self.node_to_super.insert(node_id, sn_id);
        }
        Ok(())
    }

    fn cycle3_rewrite_edges(&mut self) {
        for edge in self.graph.edges.values() {
            let Some(src_sn) = self.node_to_super.get(&edge.src).cloned() else { continue };
            let Some(dst_sn) = self.node_to_super.get(&edge.dst).cloned() else { continue };

            if src_sn == dst_sn {
                if let Some(sn) = self.super_nodes.get_mut(&src_sn) {
                    sn.member_edges.insert(edge.edge_id.clone());
                }
                continue;
            }

            let key = SuperGraph::edge_key(&src_sn, &dst_sn);
            if !self.super_edges.contains_key(&key) {
                // `edge_id` and `display_name` are content-addressed over
                // `member_edges`/`relation_types`, which are only complete
                // once this loop finishes populating them — both are
                // finalized in `finalize_superedges` after this pass.
                let src_canonical = self.super_nodes.get(&src_sn).map(|n| n.canonical_name.clone()).unwrap_or_default();
                let dst_canonical = self.super_nodes.get(&dst_sn).map(|n| n.canonical_name.clone()).unwrap_or_default();
                let canonical_name = make_superedge_canonical_name(&src_canonical, &dst_canonical);
                self.super_edges.insert(
                    key.clone(),
                    SuperEdge {
                        edge_id: String::new(),
                        src_node: src_sn.clone(),
                        dst_node: dst_sn.clone(),
                        member_edges: BTreeSet::new(),
                        member_nodes: BTreeSet::new(),
                        relation_types: BTreeSet::new(),
                        flow_types: BTreeSet::new(),
                        provenances: Vec::new(),
                        canonical_name,
                        display_name: String::new(),
                        analysis: BTreeMap::new(),
                    },
                );
            }

            let se = self.super_edges.get_mut(&key).unwrap();
            se.member_edges.insert(edge.edge_id.clone());
            se.member_nodes.insert(edge.src.clone());
            se.member_nodes.insert(edge.dst.clone());
            se.relation_types.insert(edge.relation_type);
            se.flow_types.insert(edge.flow_type);
            se.provenances.push(edge.provenance.clone());
        }
    }

    /// Signs every super-edge's id over its *final* `member_edges` set (per
    /// §4.1's `src_sn | dst_sn | policy_version | sorted(member_edge_ids)`
    /// signature) and derives `display_name` from the final `relation_types`
    /// set, now that `cycle3_rewrite_edges` has finished populating both.
    fn finalize_superedges(&mut self) {
        for se in self.super_edges.values_mut() {
            se.edge_id = superedge_id(&se.src_node, &se.dst_node, &se.member_edges);
            se.display_name = make_superedge_display_name(&se.relation_types);
        }
    }

    pub fn build(mut self) -> DkgResult<SuperGraph> {
        self.cycle1_promote();
        self.cycle2_merge();
        self.cycle2_5_eliminate()?;
        self.cycle3_rewrite_edges();
        self.finalize_superedges();

        Ok(SuperGraph {
            super_nodes: self.super_nodes,
            super_edges: self.super_edges,
            node_to_super: self.node_to_super,
        })
    }
}

pub fn build_view(graph: &DesignGraph, view: GraphView, context: ExecutionContext) -> DkgResult<SuperGraph> {
    ViewBuilder::new(graph, view, context).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{Edge, EdgeFlowType, EntityClass, Node, RelationType};

    fn sample_graph() -> DesignGraph {
        let mut graph = DesignGraph::new();
        graph.insert_node(Node::new("N_mod".into(), EntityClass::ModuleInstance, "top".into(), "u_core".into()));
        graph.insert_node(Node::new("N_ff1".into(), EntityClass::FlipFlop, "top".into(), "ff1".into()));
        graph.insert_node(Node::new("N_ff2".into(), EntityClass::FlipFlop, "top".into(), "ff2".into()));
        graph.insert_node(Node::new("N_pin".into(), EntityClass::PackagePin, "top".into(), "pin0".into()));
        graph.insert_edge(Edge::new(
            "E_1".into(),
            "N_ff1".into(),
            "N_ff2".into(),
            RelationType::Data,
            EdgeFlowType::Combinational,
            "d".into(),
            None,
        ));
        graph.insert_edge(Edge::new(
            "E_2".into(),
            "N_mod".into(),
            "N_ff1".into(),
            RelationType::Data,
            EdgeFlowType::Combinational,
            "q".into(),
            None,
        ));
        graph.reindex_adjacency();
        graph
    }

    #[test]
    fn promoted_module_gets_atomic_supernode() {
        let graph = sample_graph();
        let sg = build_view(&graph, GraphView::Structural, ExecutionContext::Design).unwrap();
        let sn_id = &sg.node_to_super["N_mod"];
        assert_eq!(sg.super_nodes[sn_id].super_class, SuperClass::Atomic);
    }

    #[test]
    fn connected_flip_flops_merge_into_one_supernode() {
        let graph = sample_graph();
        let sg = build_view(&graph, GraphView::Structural, ExecutionContext::Design).unwrap();
        let sn1 = &sg.node_to_super["N_ff1"];
        let sn2 = &sg.node_to_super["N_ff2"];
        assert_eq!(sn1, sn2);
        assert_eq!(sg.super_nodes[sn1].super_class, SuperClass::CombinationalCloud);
    }

    #[test]
    fn package_pin_is_eliminated_in_structural_view() {
        let graph = sample_graph();
        let sg = build_view(&graph, GraphView::Structural, ExecutionContext::Design).unwrap();
        let sn_id = &sg.node_to_super["N_pin"];
        assert_eq!(sg.super_nodes[sn_id].super_class, SuperClass::Eliminated);
    }

    #[test]
    fn edges_between_distinct_supernodes_rewrite_into_a_superedge() {
        let graph = sample_graph();
        let sg = build_view(&graph, GraphView::Structural, ExecutionContext::Design).unwrap();
        let mod_sn = &sg.node_to_super["N_mod"];
        let ff_sn = &sg.node_to_super["N_ff1"];
        let key = SuperGraph::edge_key(mod_sn, ff_sn);
        assert!(sg.super_edges.contains_key(&key));
        assert!(sg.super_edges[&key].member_edges.contains("E_2"));
    }

    #[test]
    fn superedge_id_is_signed_over_its_final_member_edges() {
        let graph = sample_graph();
        let sg = build_view(&graph, GraphView::Structural, ExecutionContext::Design).unwrap();
        let mod_sn = &sg.node_to_super["N_mod"];
        let ff_sn = &sg.node_to_super["N_ff1"];
        let key = SuperGraph::edge_key(mod_sn, ff_sn);
        let se = &sg.super_edges[&key];

        let expected_id = superedge_id(mod_sn, ff_sn, &se.member_edges);
        assert_eq!(se.edge_id, expected_id);

        // The id must actually depend on membership, not just endpoints —
        // signing over an empty set would give a different (and wrong) id.
        let empty_set_id = superedge_id(mod_sn, ff_sn, &BTreeSet::new());
        assert_ne!(se.edge_id, empty_set_id);
    }

    #[test]
    fn superedge_display_name_reflects_its_single_relation_type_not_a_placeholder() {
        let graph = sample_graph();
        let sg = build_view(&graph, GraphView::Structural, ExecutionContext::Design).unwrap();
        let mod_sn = &sg.node_to_super["N_mod"];
        let ff_sn = &sg.node_to_super["N_ff1"];
        let key = SuperGraph::edge_key(mod_sn, ff_sn);
        let se = &sg.super_edges[&key];

        assert_eq!(se.relation_types.len(), 1);
        assert_eq!(se.display_name, "Data");
    }

    #[test]
    fn merged_supernode_id_is_signed_under_the_merge_policy_version() {
        let graph = sample_graph();
        let sg = build_view(&graph, GraphView::Structural, ExecutionContext::Design).unwrap();
        let ff_sn = &sg.node_to_super["N_ff1"];
        let members: BTreeSet<String> = BTreeSet::from(["N_ff1".to_string(), "N_ff2".to_string()]);
        let expected = supernode_id(GraphView::Structural, SuperClass::CombinationalCloud, &members, MERGE_POLICY_VERSION);
        assert_eq!(ff_sn, &expected);
        let under_v1 = supernode_id(GraphView::Structural, SuperClass::CombinationalCloud, &members, POLICY_VERSION);
        assert_ne!(ff_sn, &under_v1);
    }

    #[test]
    fn self_loop_within_a_supernode_becomes_a_member_edge_not_a_superedge() {
        let graph = sample_graph();
        let sg = build_view(&graph, GraphView::Structural, ExecutionContext::Design).unwrap();
        let ff_sn = &sg.node_to_super["N_ff1"];
        assert!(sg.super_nodes[ff_sn].member_edges.contains("E_1"));
    }
}
