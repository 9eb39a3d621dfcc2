//! Analysis Aggregator: read-only statistical roll-ups attached to the
//! super-graph under `analysis[AnalysisKind::Timing]`, plus an alert list
//! and a graph-wide summary that live outside the graph entirely.

pub mod domain;

pub use domain::{
    aggregate_timing_to_supergraph, compute_timing_summary, generate_timing_alerts, Alert, AlertSeverity, AnalysisKind,
    TimingEdgeMetrics, TimingNodeMetrics, TimingSummary, TimingThresholds,
};
