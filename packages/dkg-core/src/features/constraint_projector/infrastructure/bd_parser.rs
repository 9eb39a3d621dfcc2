//! Block-design (BD) projection: IP instance grouping seeds from
//! `create_bd_cell -type ip -vlnv <vlnv> <inst>`.

use crate::domain::ports::DiagnosticsSink;
use crate::features::field_updater::GraphUpdater;
use crate::features::identity::pattern_cache::PatternCache;
use crate::shared::models::{DesignGraph, FieldSource, ParsingStage};
use regex::Regex;
use std::sync::OnceLock;

fn create_bd_cell_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"create_bd_cell\s+-type\s+ip\s+-vlnv\s+(\S+)\s+(\S+)").unwrap())
}

pub fn parse_and_update(
    content: &str,
    graph: &mut DesignGraph,
    _cache: &PatternCache,
    diagnostics: &dyn DiagnosticsSink,
    origin_file: Option<&str>,
) {
    for (line_num, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line_num = line_num as u32 + 1;
        if line.starts_with("create_bd_cell") {
            parse_create_bd_cell(line, graph, diagnostics, origin_file, line_num);
        } else {
            diagnostics.warn("constraint_projector.bd", &format!("unrecognized BD command: {line}"));
        }
    }
}

/// Matches by exact name or substring containment against `local_name`,
/// `hier_path`, and `canonical_name` — looser than the glob matching the
/// other dialects use, since BD instance names are rarely hierarchical.
fn parse_create_bd_cell(
    line: &str,
    graph: &mut DesignGraph,
    diagnostics: &dyn DiagnosticsSink,
    origin_file: Option<&str>,
    line_num: u32,
) {
    let Some(caps) = create_bd_cell_re().captures(line) else {
        diagnostics.warn("constraint_projector.bd", &format!("malformed create_bd_cell: {line}"));
        return;
    };
    let vlnv = caps.get(1).unwrap().as_str().to_string();
    let inst = caps.get(2).unwrap().as_str();

    let node_ids: Vec<String> = graph
        .nodes
        .values()
        .filter(|n| {
            [n.local_name.as_str(), n.hier_path.as_str(), n.canonical_name.as_str()]
                .iter()
                .any(|cand| *cand == inst || cand.contains(inst))
        })
        .map(|n| n.node_id.clone())
        .collect();
    if node_ids.is_empty() {
        diagnostics.warn("constraint_projector.bd", &format!("no nodes matched bd cell instance: {inst}"));
        return;
    }

    let mut updater = GraphUpdater::new(graph);
    for node_id in node_ids {
        let vlnv = vlnv.clone();
        updater.update_node_attribute(
            &node_id,
            "bd_ip",
            serde_json::json!(vlnv.clone()),
            FieldSource::Declared,
            ParsingStage::Board,
            origin_file.map(String::from),
            Some(line_num),
        );
        updater.update_node_attribute(
            &node_id,
            "bd_group",
            serde_json::json!(vlnv),
            FieldSource::Declared,
            ParsingStage::Board,
            origin_file.map(String::from),
            Some(line_num),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::TracingDiagnostics;
    use crate::shared::models::{EntityClass, Node};

    #[test]
    fn create_bd_cell_tags_matching_instance() {
        let mut graph = DesignGraph::new();
        graph.insert_node(Node::new("N_a".into(), EntityClass::ModuleInstance, "top".into(), "axi_dma_0".into()));
        let cache = PatternCache::new();
        parse_and_update(
            "create_bd_cell -type ip -vlnv xilinx.com:ip:axi_dma:7.1 axi_dma_0",
            &mut graph,
            &cache,
            &TracingDiagnostics,
            None,
        );
        assert_eq!(
            graph.nodes["N_a"].attributes.get("bd_ip").and_then(|v| v.as_str()),
            Some("xilinx.com:ip:axi_dma:7.1")
        );
    }

    #[test]
    fn no_matching_instance_is_a_warning_not_an_error() {
        let mut graph = DesignGraph::new();
        let cache = PatternCache::new();
        parse_and_update(
            "create_bd_cell -type ip -vlnv xilinx.com:ip:axi_dma:7.1 missing_inst",
            &mut graph,
            &cache,
            &TracingDiagnostics,
            None,
        );
        assert!(graph.nodes.is_empty());
    }
}
