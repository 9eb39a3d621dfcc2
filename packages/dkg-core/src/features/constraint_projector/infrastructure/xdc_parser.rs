//! XDC (Xilinx Design Constraints) projection: SDC-like syntax plus
//! Xilinx-specific placement commands — `set_property LOC`/`IOSTANDARD`,
//! `create_pblock`, `add_cells_to_pblock`.

use crate::domain::ports::DiagnosticsSink;
use crate::features::constraint_projector::domain::match_nodes;
use crate::features::field_updater::GraphUpdater;
use crate::features::identity::pattern_cache::PatternCache;
use crate::shared::models::{DesignGraph, FieldSource, ParsingStage};
use regex::Regex;
use std::sync::OnceLock;

fn set_property_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"set_property\s+(LOC|IOSTANDARD)\s+(\S+)").unwrap())
}

fn bracket_targets_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[get_(?:ports|pins|cells)\s+([^\]]+)\]").unwrap())
}

fn create_pblock_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"create_pblock\s+(\S+)").unwrap())
}

fn add_cells_pblock_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"add_cells_to_pblock\s+\[get_pblocks\s+([^\]]+)\]").unwrap())
}

fn add_cells_pblock_direct_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"add_cells_to_pblock\s+(\S+)").unwrap())
}

fn targets(line: &str) -> Vec<String> {
    bracket_targets_re()
        .captures_iter(line)
        .flat_map(|c| c.get(1).unwrap().as_str().split_whitespace())
        .map(|s| s.trim_matches(|ch| ch == '{' || ch == '}').to_string())
        .collect()
}

/// Parses and applies every recognized XDC line in `content`.
/// `create_pblock` alone declares the pblock name but has no nodes to
/// attach it to; only `add_cells_to_pblock` writes anything.
pub fn parse_and_update(
    content: &str,
    graph: &mut DesignGraph,
    cache: &PatternCache,
    diagnostics: &dyn DiagnosticsSink,
    origin_file: Option<&str>,
) {
    for (line_num, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line_num = line_num as u32 + 1;
        if line.starts_with("set_property") {
            parse_set_property(line, graph, cache, diagnostics, origin_file, line_num);
        } else if line.starts_with("create_pblock") {
            if create_pblock_re().captures(line).is_none() {
                diagnostics.warn("constraint_projector.xdc", &format!("malformed create_pblock: {line}"));
            }
        } else if line.starts_with("add_cells_to_pblock") {
            parse_add_cells_to_pblock(line, graph, cache, diagnostics, origin_file, line_num);
        } else {
            diagnostics.warn("constraint_projector.xdc", &format!("unrecognized XDC command: {line}"));
        }
    }
}

fn parse_set_property(
    line: &str,
    graph: &mut DesignGraph,
    cache: &PatternCache,
    diagnostics: &dyn DiagnosticsSink,
    origin_file: Option<&str>,
    line_num: u32,
) {
    let Some(caps) = set_property_re().captures(line) else {
        diagnostics.warn("constraint_projector.xdc", &format!("malformed set_property: {line}"));
        return;
    };
    let prop = caps.get(1).unwrap().as_str().to_string();
    let value = caps.get(2).unwrap().as_str().to_string();
    let target_patterns = targets(line);
    if target_patterns.is_empty() {
        diagnostics.warn("constraint_projector.xdc", &format!("set_property has no bracket targets: {line}"));
        return;
    }
    let mut node_ids: Vec<String> = Vec::new();
    for pattern in &target_patterns {
        node_ids.extend(match_nodes(graph, cache, pattern).into_iter().map(|n| n.node_id.clone()));
    }
    if node_ids.is_empty() {
        diagnostics.warn("constraint_projector.xdc", &format!("no nodes matched set_property targets: {line}"));
        return;
    }
    let mut updater = GraphUpdater::new(graph);
    for node_id in node_ids {
        updater.update_node_attribute(
            &node_id,
            &prop,
            serde_json::json!(value),
            FieldSource::Declared,
            ParsingStage::Constraints,
            origin_file.map(String::from),
            Some(line_num),
        );
    }
}

fn parse_add_cells_to_pblock(
    line: &str,
    graph: &mut DesignGraph,
    cache: &PatternCache,
    diagnostics: &dyn DiagnosticsSink,
    origin_file: Option<&str>,
    line_num: u32,
) {
    let pblock_name = add_cells_pblock_name_re()
        .captures(line)
        .or_else(|| add_cells_pblock_direct_re().captures(line))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string());
    let Some(pblock_name) = pblock_name else {
        diagnostics.warn("constraint_projector.xdc", &format!("add_cells_to_pblock has no pblock name: {line}"));
        return;
    };
    let target_patterns = targets(line);
    if target_patterns.is_empty() {
        diagnostics.warn("constraint_projector.xdc", &format!("add_cells_to_pblock has no cell targets: {line}"));
        return;
    }
    let mut node_ids: Vec<String> = Vec::new();
    for pattern in &target_patterns {
        node_ids.extend(match_nodes(graph, cache, pattern).into_iter().map(|n| n.node_id.clone()));
    }
    if node_ids.is_empty() {
        diagnostics.warn("constraint_projector.xdc", &format!("no cells matched pblock targets: {line}"));
        return;
    }
    let mut updater = GraphUpdater::new(graph);
    for node_id in node_ids {
        let pblock_name = pblock_name.clone();
        updater.update_node_attribute(
            &node_id,
            "pblock",
            serde_json::json!(pblock_name),
            FieldSource::Declared,
            ParsingStage::Floorplan,
            origin_file.map(String::from),
            Some(line_num),
        );
        updater.update_node_attribute(
            &node_id,
            "pblock_seed",
            serde_json::json!(pblock_name),
            FieldSource::Declared,
            ParsingStage::Floorplan,
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
    fn set_property_loc_writes_attribute() {
        let mut graph = DesignGraph::new();
        graph.insert_node(Node::new("N_a".into(), EntityClass::IoPort, "top".into(), "clk".into()));
        let cache = PatternCache::new();
        parse_and_update(
            "set_property LOC AA4 [get_ports clk]",
            &mut graph,
            &cache,
            &TracingDiagnostics,
            Some("top.xdc"),
        );
        assert_eq!(graph.nodes["N_a"].attributes.get("LOC").and_then(|v| v.as_str()), Some("AA4"));
    }

    #[test]
    fn add_cells_to_pblock_writes_pblock_and_seed() {
        let mut graph = DesignGraph::new();
        graph.insert_node(Node::new("N_a".into(), EntityClass::FlipFlop, "top".into(), "ff0".into()));
        let cache = PatternCache::new();
        parse_and_update(
            "add_cells_to_pblock [get_pblocks pblock_core] [get_cells ff0]",
            &mut graph,
            &cache,
            &TracingDiagnostics,
            None,
        );
        assert_eq!(
            graph.nodes["N_a"].attributes.get("pblock").and_then(|v| v.as_str()),
            Some("pblock_core")
        );
        assert_eq!(
            graph.nodes["N_a"].attributes.get("pblock_seed").and_then(|v| v.as_str()),
            Some("pblock_core")
        );
    }

    #[test]
    fn create_pblock_alone_touches_no_nodes() {
        let mut graph = DesignGraph::new();
        graph.insert_node(Node::new("N_a".into(), EntityClass::FlipFlop, "top".into(), "ff0".into()));
        let cache = PatternCache::new();
        parse_and_update("create_pblock pblock_core", &mut graph, &cache, &TracingDiagnostics, None);
        assert!(graph.nodes["N_a"].attributes.is_empty());
    }
}
