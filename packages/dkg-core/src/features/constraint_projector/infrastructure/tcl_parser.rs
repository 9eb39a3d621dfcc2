//! TCL floorplan projection: top-scope declaration and design/simulation
//! context tagging. Unlike the other constraint dialects this one scans the
//! whole file before writing anything — `top_scope`/`design_context` can
//! appear on any line, first occurrence wins, and once both are known (or
//! known to be absent) every node under `top_scope` gets tagged once.

use crate::domain::ports::DiagnosticsSink;
use crate::features::field_updater::GraphUpdater;
use crate::features::identity::pattern_cache::PatternCache;
use crate::shared::models::{DesignGraph, FieldSource, ParsingStage};
use regex::Regex;
use std::sync::OnceLock;

fn top_scope_property_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"set_property\s+top\s+(\S+)").unwrap())
}

fn top_scope_set_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"set\s+top_(?:module|scope)\s+(\S+)").unwrap())
}

fn design_mode_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"set_property\s+design_mode\s+(\S+)").unwrap())
}

fn parse_top_scope(line: &str) -> Option<String> {
    top_scope_property_re()
        .captures(line)
        .or_else(|| top_scope_set_re().captures(line))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn parse_design_context(line: &str) -> Option<&'static str> {
    if line.contains("-simset") || line.to_ascii_lowercase().contains("simulation") {
        return Some("sim");
    }
    if line.contains("-constrset") || line.to_ascii_lowercase().contains("synth") {
        return Some("design");
    }
    if let Some(caps) = design_mode_re().captures(line) {
        let value = caps.get(1).unwrap().as_str().to_ascii_lowercase();
        return Some(if value.contains("sim") { "sim" } else { "design" });
    }
    None
}

/// `cache`/`diagnostics` are taken for dialect-dispatch uniformity with the
/// other parsers even though this one has no glob targets to match and
/// never warns on unrecognized lines (a TCL floorplan file legitimately
/// contains many lines this parser has no opinion about).
pub fn parse_and_update(
    content: &str,
    graph: &mut DesignGraph,
    _cache: &PatternCache,
    _diagnostics: &dyn DiagnosticsSink,
    origin_file: Option<&str>,
) {
    let mut top_scope: Option<String> = None;
    let mut design_context: Option<&'static str> = None;

    for raw_line in content.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if top_scope.is_none() {
            top_scope = parse_top_scope(line);
        }
        if design_context.is_none() {
            design_context = parse_design_context(line);
        }
    }

    if top_scope.is_none() && design_context.is_none() {
        return;
    }

    let node_ids: Vec<String> = match &top_scope {
        Some(scope) => graph.nodes.values().filter(|n| &n.hier_path == scope).map(|n| n.node_id.clone()).collect(),
        None => graph.nodes.keys().cloned().collect(),
    };

    let mut updater = GraphUpdater::new(graph);
    for node_id in node_ids {
        if let Some(scope) = &top_scope {
            updater.update_node_attribute(
                &node_id,
                "top_scope",
                serde_json::json!(scope),
                FieldSource::Declared,
                ParsingStage::Floorplan,
                origin_file.map(String::from),
                None,
            );
        }
        if let Some(context) = design_context {
            updater.update_node_attribute(
                &node_id,
                "design_context",
                serde_json::json!(context),
                FieldSource::Declared,
                ParsingStage::Floorplan,
                origin_file.map(String::from),
                None,
            );
        }
    }
}
