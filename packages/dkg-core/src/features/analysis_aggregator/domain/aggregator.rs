//! Computes `TimingNodeMetrics`/`TimingEdgeMetrics` from member nodes/edges
//! and attaches them under `AnalysisKind::Timing`. Aggregation only — never
//! mutates the base graph or the super-graph's structural fields.

use super::metrics::{Alert, AlertSeverity, AnalysisKind, TimingEdgeMetrics, TimingNodeMetrics, TimingSummary, TimingThresholds};
use crate::features::view_builder::domain::supergraph::{SuperEdge, SuperGraph, SuperNode};
use crate::shared::models::DesignGraph;
use std::collections::BTreeMap;

/// Linear-interpolated percentile over an unsorted slice, `0.0 <= p <= 1.0`.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = p * (n - 1) as f64;
    let lower = rank as usize;
    let upper = (lower + 1).min(n - 1);
    let weight = rank - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

pub fn compute_timing_node_metrics(supernode: &SuperNode, graph: &DesignGraph, thresholds: TimingThresholds) -> Option<TimingNodeMetrics> {
    let mut slack_values = Vec::new();
    let mut arrival_times = Vec::new();
    let mut required_times = Vec::new();

    for node_id in &supernode.member_nodes {
        let Some(node) = graph.node(node_id) else { continue };
        if let Some(s) = node.slack {
            slack_values.push(s);
        }
        if let Some(a) = node.arrival_time {
            arrival_times.push(a);
        }
        if let Some(r) = node.required_time {
            required_times.push(r);
        }
    }

    if slack_values.is_empty() && arrival_times.is_empty() && required_times.is_empty() {
        return None;
    }

    let min_slack = slack_values.iter().cloned().fold(f64::INFINITY, f64::min);
    let min_slack = if min_slack.is_finite() { min_slack } else { 0.0 };
    let p5_slack = if slack_values.len() >= 2 { percentile(&slack_values, 0.05) } else { min_slack };

    let max_arrival_time = arrival_times.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let max_arrival_time = if max_arrival_time.is_finite() { max_arrival_time } else { 0.0 };
    let min_required_time = required_times.iter().cloned().fold(f64::INFINITY, f64::min);
    let min_required_time = if min_required_time.is_finite() { min_required_time } else { 0.0 };

    let total = slack_values.len();
    let critical_count = slack_values.iter().filter(|&&s| s < thresholds.critical_threshold).count();
    let near_critical_count = slack_values.iter().filter(|&&s| s < thresholds.near_critical_alpha * thresholds.clock_period).count();

    let critical_node_ratio = if total > 0 { critical_count as f64 / total as f64 } else { 0.0 };
    let near_critical_ratio = if total > 0 { near_critical_count as f64 / total as f64 } else { 0.0 };

    let timing_risk_score = if !slack_values.is_empty() {
        let normalized_min_slack = ((min_slack + thresholds.clock_period) / thresholds.clock_period).clamp(0.0, 1.0);
        Some(critical_node_ratio * 10.0 + (1.0 - normalized_min_slack) * 5.0)
    } else {
        None
    };

    Some(TimingNodeMetrics {
        min_slack,
        p5_slack,
        max_arrival_time,
        min_required_time,
        critical_node_ratio,
        near_critical_ratio,
        timing_risk_score,
    })
}

pub fn compute_timing_edge_metrics(superedge: &SuperEdge, graph: &DesignGraph) -> Option<TimingEdgeMetrics> {
    let mut delay_values = Vec::new();
    let mut flow_type_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut fanout_values = Vec::new();

    for edge_id in &superedge.member_edges {
        let Some(edge) = graph.edge(edge_id) else { continue };
        if let Some(d) = edge.delay {
            delay_values.push(d);
        }
        *flow_type_counts.entry(edge.flow_type.as_str().to_string()).or_insert(0) += 1;
        fanout_values.push(graph.edges_from(&edge.src).count() as f64);
    }

    if delay_values.is_empty() && flow_type_counts.is_empty() {
        return None;
    }

    let max_delay = delay_values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let max_delay = if max_delay.is_finite() { max_delay } else { 0.0 };
    let p95_delay = if delay_values.len() >= 2 { percentile(&delay_values, 0.95) } else { max_delay };

    let fanout_max = fanout_values.iter().cloned().fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))));
    let fanout_p95 = if fanout_values.len() >= 2 {
        Some(percentile(&fanout_values, 0.95))
    } else {
        fanout_max
    };

    Some(TimingEdgeMetrics { max_delay, p95_delay, flow_type_histogram: flow_type_counts, fanout_max, fanout_p95 })
}

/// Attaches timing bundles to every super-node/super-edge that has timing
/// data. Writes replace any prior bundle under the same key atomically —
/// there is no partial update.
pub fn aggregate_timing_to_supergraph(supergraph: &mut SuperGraph, graph: &DesignGraph, thresholds: TimingThresholds) {
    for sn in supergraph.super_nodes.values_mut() {
        if let Some(metrics) = compute_timing_node_metrics(sn, graph, thresholds) {
            sn.analysis.insert(AnalysisKind::Timing.as_str().to_string(), serde_json::to_value(metrics).unwrap());
        }
    }
    for se in supergraph.super_edges.values_mut() {
        if let Some(metrics) = compute_timing_edge_metrics(se, graph) {
            se.analysis.insert(AnalysisKind::Timing.as_str().to_string(), serde_json::to_value(metrics).unwrap());
        }
    }
}

fn timing_metrics_of(sn: &SuperNode) -> Option<TimingNodeMetrics> {
    let value = sn.analysis.get(AnalysisKind::Timing.as_str())?;
    serde_json::from_value(value.clone()).ok()
}

/// Generates alerts for every super-node carrying a timing bundle. A single
/// super-node can surface both a slack alert and a risk-score alert.
pub fn generate_timing_alerts(supergraph: &SuperGraph, thresholds: TimingThresholds) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for sn in supergraph.super_nodes.values() {
        let Some(metrics) = timing_metrics_of(sn) else { continue };

        if metrics.min_slack < thresholds.critical_threshold {
            alerts.push(Alert {
                entity_ref: sn.node_id.clone(),
                entity_type: "supernode".to_string(),
                severity: AlertSeverity::Error,
                reason: format!("Timing violation: min_slack={:.3}ns", metrics.min_slack),
                metrics_snapshot: BTreeMap::from([
                    ("min_slack".to_string(), serde_json::json!(metrics.min_slack)),
                    ("p5_slack".to_string(), serde_json::json!(metrics.p5_slack)),
                    ("max_arrival_time".to_string(), serde_json::json!(metrics.max_arrival_time)),
                ]),
            });
        } else if metrics.min_slack < thresholds.warn_threshold {
            alerts.push(Alert {
                entity_ref: sn.node_id.clone(),
                entity_type: "supernode".to_string(),
                severity: AlertSeverity::Warn,
                reason: format!("Near-critical path: min_slack={:.3}ns", metrics.min_slack),
                metrics_snapshot: BTreeMap::from([
                    ("min_slack".to_string(), serde_json::json!(metrics.min_slack)),
                    ("critical_node_ratio".to_string(), serde_json::json!(metrics.critical_node_ratio)),
                ]),
            });
        }

        if metrics.timing_risk_score.is_some_and(|s| s > 10.0) {
            alerts.push(Alert {
                entity_ref: sn.node_id.clone(),
                entity_type: "supernode".to_string(),
                severity: AlertSeverity::Warn,
                reason: format!("High timing risk: score={:.2}", metrics.timing_risk_score.unwrap()),
                metrics_snapshot: BTreeMap::from([
                    ("timing_risk_score".to_string(), serde_json::json!(metrics.timing_risk_score)),
                    ("critical_node_ratio".to_string(), serde_json::json!(metrics.critical_node_ratio)),
                    ("near_critical_ratio".to_string(), serde_json::json!(metrics.near_critical_ratio)),
                ]),
            });
        }
    }

    alerts
}

pub fn compute_timing_summary(graph: &DesignGraph, thresholds: TimingThresholds) -> TimingSummary {
    let slack_values: Vec<f64> = graph.nodes.values().filter_map(|n| n.slack).collect();
    let worst_slack = slack_values.iter().cloned().fold(f64::INFINITY, f64::min);
    let worst_slack = if worst_slack.is_finite() { worst_slack } else { 0.0 };
    let violation_count = slack_values.iter().filter(|&&s| s < 0.0).count();
    let near_critical_count =
        slack_values.iter().filter(|&&s| s >= 0.0 && s < thresholds.near_critical_alpha * thresholds.clock_period).count();

    TimingSummary { worst_slack, violation_count, near_critical_count, clock_period: thresholds.clock_period }
}
