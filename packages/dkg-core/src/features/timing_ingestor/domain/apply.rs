//! Reduces a batch of parsed `TimingPath`s onto a `DesignGraph`: worst-case
//! scalar fields plus per-path accumulation into list-valued attributes.
//! Node/edge resolution degrades to a logged warning on no match — a
//! timing report naming something the netlist doesn't know about is not
//! fatal, it just contributes nothing.

use super::path::TimingPath;
use crate::domain::ports::DiagnosticsSink;
use crate::features::field_updater::GraphUpdater;
use crate::shared::models::{DesignGraph, FieldSource, Node, ParsingStage};

pub fn apply_to_graph(paths: &[TimingPath], graph: &mut DesignGraph, diagnostics: &dyn DiagnosticsSink) {
    for path in paths {
        update_node_timing(&path.startpoint, path, graph, diagnostics, false);
        update_node_timing(&path.endpoint, path, graph, diagnostics, true);

        for window in path.stages.windows(2) {
            let (src_stage, dst_stage) = (&window[0], &window[1]);
            update_edge_timing(src_stage, dst_stage, path, graph, diagnostics);
        }
    }
}

/// Four-tier node resolution: exact id, then `hier_path`, then
/// `canonical_name`, then substring containment either way — in that
/// priority order, first tier with any match wins.
fn find_node_id_by_name(name: &str, graph: &DesignGraph) -> Option<String> {
    if graph.nodes.contains_key(name) {
        return Some(name.to_string());
    }
    if let Some(n) = graph.nodes.values().find(|n| n.hier_path == name) {
        return Some(n.node_id.clone());
    }
    if let Some(n) = graph.nodes.values().find(|n| n.canonical_name == name) {
        return Some(n.node_id.clone());
    }
    graph
        .nodes
        .values()
        .find(|n| name.contains(&n.hier_path) || n.hier_path.contains(name))
        .map(|n| n.node_id.clone())
}

fn find_edge_id_by_pins(src_pin: &str, dst_pin: &str, graph: &DesignGraph) -> Option<String> {
    graph
        .edges
        .values()
        .find(|e| {
            let src_name = node_name(graph, &e.src);
            let dst_name = node_name(graph, &e.dst);
            pins_match(src_pin, &src_name) && pins_match(dst_pin, &dst_name)
        })
        .map(|e| e.edge_id.clone())
}

fn node_name(graph: &DesignGraph, node_id: &str) -> String {
    graph.node(node_id).map(|n: &Node| n.hier_path.clone()).unwrap_or_default()
}

fn pins_match(pin: &str, node_name: &str) -> bool {
    !node_name.is_empty() && (pin.contains(node_name) || node_name.contains(pin))
}

fn update_node_timing(
    name: &str,
    path: &TimingPath,
    graph: &mut DesignGraph,
    diagnostics: &dyn DiagnosticsSink,
    is_endpoint: bool,
) {
    if name.is_empty() {
        return;
    }
    let Some(node_id) = find_node_id_by_name(name, graph) else {
        diagnostics.warn("timing_ingestor", &format!("no node matched timing point: {name}"));
        return;
    };

    let mut updater = GraphUpdater::new(graph);

    if !is_endpoint {
        if let Some(slack) = path.slack {
            updater.update_node_field(&node_id, "slack", FieldSource::Analyzed, ParsingStage::Timing, None, None, |n| {
                n.slack = Some(match n.slack {
                    Some(current) if current <= slack => current,
                    _ => slack,
                });
            });

            let record = serde_json::json!({
                "slack": slack,
                "path_type": path.path_type,
                "clock": path.clock,
                "endpoint": path.endpoint,
            });
            append_node_attribute_list(&mut updater, &node_id, "timing_slacks", record);
        }
    }

    if let Some(arrival) = path.arrival_time {
        updater.update_node_field(&node_id, "arrival_time", FieldSource::Analyzed, ParsingStage::Timing, None, None, |n| {
            n.arrival_time = Some(match n.arrival_time {
                Some(current) if current >= arrival => current,
                _ => arrival,
            });
        });
    }

    if let Some(required) = path.required_time {
        updater.update_node_field(&node_id, "required_time", FieldSource::Analyzed, ParsingStage::Timing, None, None, |n| {
            n.required_time = Some(match n.required_time {
                Some(current) if current <= required => current,
                _ => required,
            });
        });
    }

    if !path.clock.is_empty() && graph.node(&node_id).map(|n| n.clock_domain.is_none()).unwrap_or(false) {
        let clock = path.clock.clone();
        let mut updater = GraphUpdater::new(graph);
        updater.update_node_field(&node_id, "clock_domain", FieldSource::Analyzed, ParsingStage::Timing, None, None, |n| {
            n.clock_domain = Some(clock);
        });
    }
}

fn update_edge_timing(
    src_stage: &super::path::TimingStage,
    dst_stage: &super::path::TimingStage,
    path: &TimingPath,
    graph: &mut DesignGraph,
    diagnostics: &dyn DiagnosticsSink,
) {
    let Some(edge_id) = find_edge_id_by_pins(&src_stage.point, &dst_stage.point, graph) else {
        diagnostics.warn(
            "timing_ingestor",
            &format!("no edge matched timing stage pair: {} -> {}", src_stage.point, dst_stage.point),
        );
        return;
    };

    let incr = dst_stage.incr_delay;
    let cumulative = dst_stage.cumulative_delay;
    let mut updater = GraphUpdater::new(graph);

    updater.update_edge_field(&edge_id, "delay", FieldSource::Analyzed, ParsingStage::Timing, None, None, |e| {
        e.delay = Some(match e.delay {
            Some(current) if current >= incr => current,
            _ => incr,
        });
    });

    updater.update_edge_field(&edge_id, "arrival_time", FieldSource::Analyzed, ParsingStage::Timing, None, None, |e| {
        e.arrival_time = Some(match e.arrival_time {
            Some(current) if current >= cumulative => current,
            _ => cumulative,
        });
    });

    let record = serde_json::json!({
        "delay": incr,
        "path_type": path.path_type,
        "clock": path.clock,
    });
    append_edge_attribute_list(&mut updater, &edge_id, "timing_delays", record);

    if !path.clock.is_empty() && graph.edge(&edge_id).map(|e| e.clock_domain_id.is_none()).unwrap_or(false) {
        let clock = path.clock.clone();
        let mut updater = GraphUpdater::new(graph);
        updater.update_edge_field(&edge_id, "clock_domain_id", FieldSource::Analyzed, ParsingStage::Timing, None, None, |e| {
            e.clock_domain_id = Some(clock);
        });
    }
}

/// Appends `record` onto the node attribute's existing JSON array (or
/// starts a fresh one), writing the whole array back through the updater.
fn append_node_attribute_list(updater: &mut GraphUpdater, node_id: &str, key: &str, record: serde_json::Value) {
    let field_name = format!("attributes.{key}");
    let key = key.to_string();
    updater.update_node_field(node_id, &field_name, FieldSource::Analyzed, ParsingStage::Timing, None, None, |n| {
        let mut list = n.attributes.get(&key).and_then(|v| v.as_array().cloned()).unwrap_or_default();
        list.push(record);
        n.attributes.insert(key, serde_json::Value::Array(list));
    });
}

fn append_edge_attribute_list(updater: &mut GraphUpdater, edge_id: &str, key: &str, record: serde_json::Value) {
    let field_name = format!("attributes.{key}");
    let key = key.to_string();
    updater.update_edge_field(edge_id, &field_name, FieldSource::Analyzed, ParsingStage::Timing, None, None, |e| {
        let mut list = e.attributes.get(&key).and_then(|v| v.as_array().cloned()).unwrap_or_default();
        list.push(record);
        e.attributes.insert(key, serde_json::Value::Array(list));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::TracingDiagnostics;
    use crate::features::timing_ingestor::domain::path::TimingStage;
    use crate::shared::models::{Edge, EdgeFlowType, EntityClass, RelationType};

    fn graph_with_ff_path() -> DesignGraph {
        let mut graph = DesignGraph::new();
        graph.insert_node(Node::new("N_a".into(), EntityClass::FlipFlop, "cpu/pc_reg[0]".into(), "pc_reg".into()));
        graph.insert_node(Node::new("N_b".into(), EntityClass::FlipFlop, "cpu/ir_reg".into(), "ir_reg".into()));
        graph.insert_edge(Edge::new(
            "E_1".into(),
            "N_a".into(),
            "N_b".into(),
            RelationType::Data,
            EdgeFlowType::Combinational,
            "d".into(),
            None,
        ));
        graph
    }

    #[test]
    fn worst_case_slack_keeps_minimum_across_paths() {
        let mut graph = graph_with_ff_path();
        let mut path1 = TimingPath::new();
        path1.startpoint = "cpu/pc_reg[0]".into();
        path1.slack = Some(2.5);
        let mut path2 = TimingPath::new();
        path2.startpoint = "cpu/pc_reg[0]".into();
        path2.slack = Some(0.8);

        apply_to_graph(&[path1, path2], &mut graph, &TracingDiagnostics);
        assert_eq!(graph.nodes["N_a"].slack, Some(0.8));
    }

    #[test]
    fn timing_slacks_accumulate_per_path() {
        let mut graph = graph_with_ff_path();
        let mut path1 = TimingPath::new();
        path1.startpoint = "cpu/pc_reg[0]".into();
        path1.slack = Some(2.5);
        path1.path_type = "Setup".into();
        let mut path2 = path1.clone();
        path2.slack = Some(0.8);
        path2.path_type = "Hold".into();

        apply_to_graph(&[path1, path2], &mut graph, &TracingDiagnostics);
        let slacks = graph.nodes["N_a"].attributes.get("timing_slacks").unwrap().as_array().unwrap();
        assert_eq!(slacks.len(), 2);
    }

    #[test]
    fn edge_delay_resolved_by_fuzzy_pin_matching() {
        let mut graph = graph_with_ff_path();
        let mut path = TimingPath::new();
        path.stages = vec![
            TimingStage { point: "cpu/pc_reg[0]/Q".into(), incr_delay: 0.0, cumulative_delay: 0.0, transition: "r".into() },
            TimingStage { point: "cpu/ir_reg/D".into(), incr_delay: 0.3, cumulative_delay: 0.9, transition: "r".into() },
        ];
        apply_to_graph(&[path], &mut graph, &TracingDiagnostics);
        assert_eq!(graph.edges["E_1"].delay, Some(0.3));
    }

    #[test]
    fn unmatched_point_warns_without_panicking() {
        let mut graph = graph_with_ff_path();
        let mut path = TimingPath::new();
        path.startpoint = "nowhere/unknown_reg".into();
        path.slack = Some(1.0);
        apply_to_graph(&[path], &mut graph, &TracingDiagnostics);
        assert_eq!(graph.nodes["N_a"].slack, None);
    }
}
