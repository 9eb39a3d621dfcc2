//! Assigns `EdgeFlowType`/`clock_domain` to already-built edges: clock/reset
//! nets take priority, then sequential launch/capture based on whether
//! either endpoint is a flip-flop, else combinational.

use crate::shared::models::{DesignGraph, EdgeFlowType, EntityClass};
use std::collections::{BTreeMap, BTreeSet};

/// Per §4.3 step 9: a clock-net edge is `ClockTree`, a reset-net edge is
/// `AsyncReset`, otherwise an edge launched by a flip-flop is `SeqLaunch`,
/// one captured by a flip-flop is `SeqCapture`, and everything else is
/// `Combinational`. `relation_type` is left untouched — it stays whatever
/// value the edge was constructed with.
pub fn assign_edge_flow_types(graph: &mut DesignGraph, clocks: &BTreeSet<String>, resets: &BTreeSet<String>) {
    let edge_ids: Vec<String> = graph.edges.keys().cloned().collect();
    for id in edge_ids {
        let (base_signal, src, dst) = {
            let edge = &graph.edges[&id];
            (edge.base_signal.clone(), edge.src.clone(), edge.dst.clone())
        };
        let flow = if clocks.contains(&base_signal) {
            EdgeFlowType::ClockTree
        } else if resets.contains(&base_signal) {
            EdgeFlowType::AsyncReset
        } else {
            let src_is_ff = graph.nodes.get(&src).map(|n| n.entity_class == EntityClass::FlipFlop).unwrap_or(false);
            let dst_is_ff = graph.nodes.get(&dst).map(|n| n.entity_class == EntityClass::FlipFlop).unwrap_or(false);
            if src_is_ff {
                EdgeFlowType::SeqLaunch
            } else if dst_is_ff {
                EdgeFlowType::SeqCapture
            } else {
                EdgeFlowType::Combinational
            }
        };
        if let Some(edge) = graph.edges.get_mut(&id) {
            edge.flow_type = flow;
        }
    }
}

/// Assigns each flip-flop's `clock_domain` by scanning its in-edges in id
/// order and taking the first whose `base_signal` is a known clock net; any
/// later disagreeing clock edge is silently ignored. Checks net membership
/// directly (not `flow_type`) so this can run independently of
/// `assign_edge_flow_types`, matching the net-membership scan the original
/// clock-domain pass performs.
pub fn assign_clock_domains(graph: &mut DesignGraph, clocks: &BTreeSet<String>) {
    let mut assignments: BTreeMap<String, String> = BTreeMap::new();
    for node in graph.nodes.values() {
        if node.entity_class != EntityClass::FlipFlop {
            continue;
        }
        for edge_id in &node.in_edges {
            if let Some(edge) = graph.edges.get(edge_id) {
                if clocks.contains(&edge.base_signal) {
                    assignments.insert(node.node_id.clone(), edge.base_signal.clone());
                    break;
                }
            }
        }
    }
    for (node_id, domain) in assignments {
        if let Some(node) = graph.nodes.get_mut(&node_id) {
            node.clock_domain = Some(domain);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{Edge, Node, RelationType};

    #[test]
    fn clock_net_edges_become_clock_tree_flow_without_retagging_relation() {
        let mut graph = DesignGraph::new();
        graph.insert_node(Node::new("N_clk".into(), EntityClass::IoPort, "top".into(), "clk".into()));
        graph.insert_node(Node::new("N_ff".into(), EntityClass::FlipFlop, "top".into(), "ff0".into()));
        graph.insert_edge(Edge::new(
            "E_1".into(),
            "N_clk".into(),
            "N_ff".into(),
            RelationType::Data,
            EdgeFlowType::Combinational,
            "clk".into(),
            None,
        ));
        let mut clocks = BTreeSet::new();
        clocks.insert("clk".to_string());
        assign_edge_flow_types(&mut graph, &clocks, &BTreeSet::new());
        assert_eq!(graph.edges["E_1"].flow_type, EdgeFlowType::ClockTree);
        assert_eq!(graph.edges["E_1"].relation_type, RelationType::Data);
    }

    #[test]
    fn reset_net_edges_become_async_reset_flow() {
        let mut graph = DesignGraph::new();
        graph.insert_node(Node::new("N_rst".into(), EntityClass::IoPort, "top".into(), "rst_n".into()));
        graph.insert_node(Node::new("N_ff".into(), EntityClass::FlipFlop, "top".into(), "ff0".into()));
        graph.insert_edge(Edge::new(
            "E_1".into(),
            "N_rst".into(),
            "N_ff".into(),
            RelationType::Data,
            EdgeFlowType::Combinational,
            "rst_n".into(),
            None,
        ));
        let mut resets = BTreeSet::new();
        resets.insert("rst_n".to_string());
        assign_edge_flow_types(&mut graph, &BTreeSet::new(), &resets);
        assert_eq!(graph.edges["E_1"].flow_type, EdgeFlowType::AsyncReset);
    }

    #[test]
    fn ff_source_edge_is_seq_launch_and_ff_dest_is_seq_capture() {
        let mut graph = DesignGraph::new();
        graph.insert_node(Node::new("N_ff1".into(), EntityClass::FlipFlop, "top".into(), "ff1".into()));
        graph.insert_node(Node::new("N_ff2".into(), EntityClass::FlipFlop, "top".into(), "ff2".into()));
        graph.insert_edge(Edge::new(
            "E_1".into(),
            "N_ff1".into(),
            "N_ff2".into(),
            RelationType::Data,
            EdgeFlowType::Combinational,
            "mid".into(),
            None,
        ));
        assign_edge_flow_types(&mut graph, &BTreeSet::new(), &BTreeSet::new());
        assert_eq!(graph.edges["E_1"].flow_type, EdgeFlowType::SeqLaunch);
    }

    #[test]
    fn neither_endpoint_a_flip_flop_is_combinational() {
        let mut graph = DesignGraph::new();
        graph.insert_node(Node::new("N_a".into(), EntityClass::RtlBlock, "top".into(), "a".into()));
        graph.insert_node(Node::new("N_b".into(), EntityClass::RtlBlock, "top".into(), "b".into()));
        graph.insert_edge(Edge::new(
            "E_1".into(),
            "N_a".into(),
            "N_b".into(),
            RelationType::Data,
            EdgeFlowType::ClockTree,
            "mid".into(),
            None,
        ));
        assign_edge_flow_types(&mut graph, &BTreeSet::new(), &BTreeSet::new());
        assert_eq!(graph.edges["E_1"].flow_type, EdgeFlowType::Combinational);
    }

    #[test]
    fn first_clock_edge_wins_domain_assignment() {
        let mut graph = DesignGraph::new();
        graph.insert_node(Node::new("N_ff".into(), EntityClass::FlipFlop, "top".into(), "ff0".into()));
        graph.insert_edge(Edge::new(
            "E_1".into(),
            "N_a".into(),
            "N_ff".into(),
            RelationType::Data,
            EdgeFlowType::ClockTree,
            "clk_a".into(),
            None,
        ));
        graph.insert_edge(Edge::new(
            "E_2".into(),
            "N_b".into(),
            "N_ff".into(),
            RelationType::Data,
            EdgeFlowType::ClockTree,
            "clk_b".into(),
            None,
        ));
        graph.reindex_adjacency();
        let mut clocks = BTreeSet::new();
        clocks.insert("clk_a".to_string());
        clocks.insert("clk_b".to_string());
        assign_clock_domains(&mut graph, &clocks);
        assert_eq!(graph.nodes["N_ff"].clock_domain.as_deref(), Some("clk_a"));
    }
}
