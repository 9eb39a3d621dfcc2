//! SDC constraint projection: `create_clock`, `set_false_path`,
//! `set_multicycle_path`, `set_max_delay`/`set_min_delay`,
//! `set_input_delay`/`set_output_delay`.

use crate::domain::ports::DiagnosticsSink;
use crate::features::constraint_projector::domain::{match_edges_between, match_nodes};
use crate::features::field_updater::GraphUpdater;
use crate::features::identity::pattern_cache::PatternCache;
use crate::shared::models::{DesignGraph, FieldSource, ParsingStage};
use regex::Regex;
use std::sync::OnceLock;

fn create_clock_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-name\s+(\w+).*?get_ports\s*\{?\s*([\w\[\]]+)\s*\}?").unwrap())
}

fn clock_period_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-period\s+([\d.]+)").unwrap())
}

fn port_targets_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[get_(?:ports|pins|cells)\s+([^\]]+)\]").unwrap())
}

fn multicycle_n_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^set_multicycle_path\s+(\d+)").unwrap())
}

fn delay_value_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^set_(?:max|min)_delay\s+([\d.]+)").unwrap())
}

fn io_delay_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^set_(input|output)_delay\s+([\d.]+)\s+-clock\s+(\w+).*?get_ports\s*\{?\s*([\w\[\]]+)\s*\}?")
            .unwrap()
    })
}

/// Parses and applies every recognized SDC line in `content`. Unrecognized
/// lines/commands are skipped (reported via `diagnostics`, never an error —
/// per the non-error posture for unknown constraint commands).
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
        if line.starts_with("create_clock") {
            parse_create_clock(line, graph, cache, diagnostics, origin_file, line_num as u32 + 1);
        } else if line.starts_with("set_false_path") {
            parse_false_path(line, graph, cache, diagnostics, origin_file, line_num as u32 + 1);
        } else if line.starts_with("set_multicycle_path") {
            parse_multicycle_path(line, graph, cache, diagnostics, origin_file, line_num as u32 + 1);
        } else if line.starts_with("set_max_delay") {
            parse_delay(line, graph, cache, diagnostics, origin_file, line_num as u32 + 1, "max_delay");
        } else if line.starts_with("set_min_delay") {
            parse_delay(line, graph, cache, diagnostics, origin_file, line_num as u32 + 1, "min_delay");
        } else if line.starts_with("set_input_delay") || line.starts_with("set_output_delay") {
            parse_io_delay(line, graph, cache, diagnostics, origin_file, line_num as u32 + 1);
        } else {
            diagnostics.warn("constraint_projector.sdc", &format!("unrecognized SDC command: {line}"));
        }
    }
}

fn parse_create_clock(
    line: &str,
    graph: &mut DesignGraph,
    cache: &PatternCache,
    diagnostics: &dyn DiagnosticsSink,
    origin_file: Option<&str>,
    line_num: u32,
) {
    let Some(caps) = create_clock_re().captures(line) else {
        diagnostics.warn("constraint_projector.sdc", &format!("malformed create_clock: {line}"));
        return;
    };
    let clock_name = caps.get(1).unwrap().as_str().to_string();
    let port_pattern = caps.get(2).unwrap().as_str();
    let period = clock_period_re().captures(line).and_then(|c| c.get(1)).and_then(|m| m.as_str().parse::<f64>().ok());

    let target_ids: Vec<String> = match_nodes(graph, cache, port_pattern).into_iter().map(|n| n.node_id.clone()).collect();
    let edge_ids: Vec<String> = graph
        .edges
        .values()
        .filter(|e| cache.matches(port_pattern, &e.base_signal))
        .map(|e| e.edge_id.clone())
        .collect();

    let mut updater = GraphUpdater::new(graph);
    for node_id in &target_ids {
        updater.update_node_field(
            node_id,
            "clock_domain",
            FieldSource::Declared,
            ParsingStage::Constraints,
            origin_file.map(String::from),
            Some(line_num),
            |n| n.clock_domain = Some(clock_name.clone()),
        );
        if let Some(period) = period {
            updater.update_node_attribute(
                node_id,
                "clock_period",
                serde_json::json!(period),
                FieldSource::Declared,
                ParsingStage::Constraints,
                origin_file.map(String::from),
                Some(line_num),
            );
        }
    }
    for edge_id in edge_ids {
        let clock_name = clock_name.clone();
        updater.update_edge_field(
            &edge_id,
            "clock_signal",
            FieldSource::Declared,
            ParsingStage::Constraints,
            origin_file.map(String::from),
            Some(line_num),
            |e| e.clock_signal = Some(clock_name),
        );
    }
}

fn endpoint_patterns(line: &str) -> Vec<String> {
    port_targets_re()
        .captures_iter(line)
        .map(|c| c.get(1).unwrap().as_str().trim().to_string())
        .collect()
}

fn parse_false_path(
    line: &str,
    graph: &mut DesignGraph,
    cache: &PatternCache,
    diagnostics: &dyn DiagnosticsSink,
    origin_file: Option<&str>,
    line_num: u32,
) {
    apply_timing_exception(line, graph, cache, diagnostics, origin_file, line_num, "false_path".to_string());
}

fn parse_multicycle_path(
    line: &str,
    graph: &mut DesignGraph,
    cache: &PatternCache,
    diagnostics: &dyn DiagnosticsSink,
    origin_file: Option<&str>,
    line_num: u32,
) {
    let Some(cycles) = multicycle_n_re().captures(line).and_then(|c| c.get(1)).and_then(|m| m.as_str().parse::<u32>().ok())
    else {
        diagnostics.warn("constraint_projector.sdc", &format!("set_multicycle_path missing positional cycle count: {line}"));
        return;
    };
    // SDC applies a multicycle path to setup checks unless -hold is given.
    let path_type = if line.contains("-hold") { "hold" } else { "setup" };
    apply_timing_exception(
        line,
        graph,
        cache,
        diagnostics,
        origin_file,
        line_num,
        format!("multicycle_{cycles}_{path_type}"),
    );
}

/// Resolves `-from`/`-to` (preferred) or the first two bare endpoint
/// patterns on the line, matches every edge between them, and stamps
/// `timing_exception` at `Declared` priority.
fn apply_timing_exception(
    line: &str,
    graph: &mut DesignGraph,
    cache: &PatternCache,
    diagnostics: &dyn DiagnosticsSink,
    origin_file: Option<&str>,
    line_num: u32,
    exception: String,
) {
    let patterns = endpoint_patterns(line);
    if patterns.len() < 2 {
        diagnostics.warn(
            "constraint_projector.sdc",
            &format!("timing exception line has fewer than 2 endpoints, skipped: {line}"),
        );
        return;
    }
    let from = &patterns[0];
    let to = &patterns[1];
    let edge_ids = match_edges_between(graph, cache, from, to);
    if edge_ids.is_empty() {
        diagnostics.warn("constraint_projector.sdc", &format!("no edges matched timing exception: {line}"));
        return;
    }
    let mut updater = GraphUpdater::new(graph);
    for edge_id in edge_ids {
        let exception = exception.clone();
        updater.update_edge_field(
            &edge_id,
            "timing_exception",
            FieldSource::Declared,
            ParsingStage::Constraints,
            origin_file.map(String::from),
            Some(line_num),
            |e| e.timing_exception = Some(exception),
        );
    }
}

/// `set_max_delay <v> -from ... -to ...` / `set_min_delay <v> -from ... -to ...`:
/// writes `parameters.max_delay`/`parameters.min_delay` on every edge between
/// the matched endpoints. Stored under `attributes` (this crate has no
/// separate `parameters` bag on `Edge`, matching how every other constraint
/// writes land in `attributes`).
fn parse_delay(
    line: &str,
    graph: &mut DesignGraph,
    cache: &PatternCache,
    diagnostics: &dyn DiagnosticsSink,
    origin_file: Option<&str>,
    line_num: u32,
    field: &str,
) {
    let Some(value) = delay_value_re().captures(line).and_then(|c| c.get(1)).and_then(|m| m.as_str().parse::<f64>().ok())
    else {
        diagnostics.warn("constraint_projector.sdc", &format!("malformed delay value: {line}"));
        return;
    };
    let patterns = endpoint_patterns(line);
    if patterns.len() < 2 {
        diagnostics.warn("constraint_projector.sdc", &format!("delay constraint has fewer than 2 endpoints, skipped: {line}"));
        return;
    }
    let edge_ids = match_edges_between(graph, cache, &patterns[0], &patterns[1]);
    if edge_ids.is_empty() {
        diagnostics.warn("constraint_projector.sdc", &format!("no edges matched delay constraint: {line}"));
        return;
    }
    let mut updater = GraphUpdater::new(graph);
    for edge_id in edge_ids {
        updater.update_edge_field(
            &edge_id,
            &format!("parameters.{field}"),
            FieldSource::Declared,
            ParsingStage::Constraints,
            origin_file.map(String::from),
            Some(line_num),
            |e| {
                e.attributes.insert(field.to_string(), serde_json::json!(value));
            },
        );
    }
}

/// `set_input_delay <v> -clock <c> [get_ports <pat>]` /
/// `set_output_delay <v> -clock <c> [get_ports <pat>]`: writes
/// `attributes.{input|output}_delay` and `..._delay_clock` on matched port
/// nodes.
fn parse_io_delay(
    line: &str,
    graph: &mut DesignGraph,
    cache: &PatternCache,
    diagnostics: &dyn DiagnosticsSink,
    origin_file: Option<&str>,
    line_num: u32,
) {
    let Some(caps) = io_delay_re().captures(line) else {
        diagnostics.warn("constraint_projector.sdc", &format!("malformed io delay: {line}"));
        return;
    };
    let direction = caps.get(1).unwrap().as_str();
    let value: f64 = caps.get(2).unwrap().as_str().parse().unwrap_or(0.0);
    let clock = caps.get(3).unwrap().as_str().to_string();
    let port_pattern = caps.get(4).unwrap().as_str();

    let target_ids: Vec<String> = match_nodes(graph, cache, port_pattern).into_iter().map(|n| n.node_id.clone()).collect();
    if target_ids.is_empty() {
        diagnostics.warn("constraint_projector.sdc", &format!("no ports matched io delay: {line}"));
        return;
    }
    let delay_field = format!("{direction}_delay");
    let clock_field = format!("{direction}_delay_clock");
    let mut updater = GraphUpdater::new(graph);
    for node_id in target_ids {
        updater.update_node_attribute(
            &node_id,
            &delay_field,
            serde_json::json!(value),
            FieldSource::Declared,
            ParsingStage::Constraints,
            origin_file.map(String::from),
            Some(line_num),
        );
        updater.update_node_attribute(
            &node_id,
            &clock_field,
            serde_json::json!(clock.clone()),
            FieldSource::Declared,
            ParsingStage::Constraints,
            origin_file.map(String::from),
            Some(line_num),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::TracingDiagnostics;
    use crate::shared::models::{Edge, EdgeFlowType, EntityClass, Node, RelationType};

    fn graph_with_path() -> DesignGraph {
        let mut graph = DesignGraph::new();
        graph.insert_node(Node::new("N_a".into(), EntityClass::FlipFlop, "top".into(), "ff_a".into()));
        graph.insert_node(Node::new("N_b".into(), EntityClass::FlipFlop, "top".into(), "ff_b".into()));
        graph.insert_edge(Edge::new(
            "E_1".into(),
            "N_a".into(),
            "N_b".into(),
            RelationType::Data,
            EdgeFlowType::SeqLaunch,
            "d".into(),
            None,
        ));
        graph
    }

    #[test]
    fn create_clock_sets_clock_domain() {
        let mut graph = DesignGraph::new();
        graph.insert_node(Node::new("N_clk".into(), EntityClass::IoPort, "top".into(), "clk".into()));
        let cache = PatternCache::new();
        parse_and_update(
            "create_clock -name sysclk -period 10 [get_ports clk]",
            &mut graph,
            &cache,
            &TracingDiagnostics,
            Some("top.sdc"),
        );
        assert_eq!(graph.nodes["N_clk"].clock_domain.as_deref(), Some("sysclk"));
    }

    #[test]
    fn false_path_is_fully_implemented_not_a_stub() {
        let mut graph = graph_with_path();
        let cache = PatternCache::new();
        parse_and_update(
            "set_false_path -from [get_pins ff_a] -to [get_pins ff_b]",
            &mut graph,
            &cache,
            &TracingDiagnostics,
            None,
        );
        assert_eq!(graph.edges["E_1"].timing_exception.as_deref(), Some("false_path"));
    }

    #[test]
    fn multicycle_path_records_positional_cycle_count_and_setup_default() {
        let mut graph = graph_with_path();
        let cache = PatternCache::new();
        parse_and_update(
            "set_multicycle_path 3 -setup -from [get_pins ff_a] -to [get_pins ff_b]",
            &mut graph,
            &cache,
            &TracingDiagnostics,
            None,
        );
        assert_eq!(graph.edges["E_1"].timing_exception.as_deref(), Some("multicycle_3_setup"));
    }

    #[test]
    fn multicycle_path_records_hold_path_type() {
        let mut graph = graph_with_path();
        let cache = PatternCache::new();
        parse_and_update(
            "set_multicycle_path 2 -hold -from [get_pins ff_a] -to [get_pins ff_b]",
            &mut graph,
            &cache,
            &TracingDiagnostics,
            None,
        );
        assert_eq!(graph.edges["E_1"].timing_exception.as_deref(), Some("multicycle_2_hold"));
    }
}
