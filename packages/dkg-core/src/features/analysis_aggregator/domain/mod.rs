pub mod aggregator;
pub mod metrics;

pub use aggregator::{aggregate_timing_to_supergraph, compute_timing_summary, generate_timing_alerts, percentile};
pub use metrics::{Alert, AlertSeverity, AnalysisKind, TimingEdgeMetrics, TimingNodeMetrics, TimingSummary, TimingThresholds};
