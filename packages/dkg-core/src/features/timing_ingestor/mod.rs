//! Timing Ingestor: reads a Vivado-format static timing analysis report
//! and folds it onto a `DesignGraph` — worst-case slack/arrival/required
//! time on matched nodes, worst-case delay on matched edges, and a
//! per-path accumulation trail kept alongside for audit.

pub mod domain;
pub mod infrastructure;

use crate::domain::ports::DiagnosticsSink;
use crate::shared::models::DesignGraph;

/// Parses `content` as a Vivado timing report and applies every path onto
/// `graph`. Never errors: an unparseable or empty report simply
/// contributes no paths.
pub fn ingest_timing_report(content: &str, graph: &mut DesignGraph, diagnostics: &dyn DiagnosticsSink) {
    let paths = infrastructure::vivado_parser::parse_file(content);
    domain::apply_to_graph(&paths, graph, diagnostics);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::TracingDiagnostics;
    use crate::shared::models::{EntityClass, Node};

    #[test]
    fn ingest_applies_slack_to_matching_node() {
        let mut graph = DesignGraph::new();
        graph.insert_node(Node::new("N_a".into(), EntityClass::FlipFlop, "cpu/pc_reg[0]".into(), "pc_reg".into()));
        let report = "Startpoint: cpu/pc_reg[0] (rising edge-triggered flip-flop clocked by sys_clk)\nslack (MET)  1.25\n";
        ingest_timing_report(report, &mut graph, &TracingDiagnostics);
        assert_eq!(graph.nodes["N_a"].slack, Some(1.25));
    }
}
