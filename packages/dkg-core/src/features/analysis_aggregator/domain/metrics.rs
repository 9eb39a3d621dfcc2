//! The metrics bundle shapes attached under `SuperNode.analysis` /
//! `SuperEdge.analysis`, plus the outside-graph alert/summary types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key under which a metrics bundle lives in `SuperNode.analysis` /
/// `SuperEdge.analysis`. Only `Timing` exists today; the map shape is what
/// leaves room for more kinds without touching the super-graph shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AnalysisKind {
    Timing,
}

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timing => "Timing",
        }
    }
}

/// Tunables for timing aggregation. Defaults mirror the original
/// implementation's hardcoded constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingThresholds {
    pub clock_period: f64,
    pub critical_threshold: f64,
    pub near_critical_alpha: f64,
    pub warn_threshold: f64,
}

impl Default for TimingThresholds {
    fn default() -> Self {
        Self { clock_period: 10.0, critical_threshold: 0.0, near_critical_alpha: 0.1, warn_threshold: 0.5 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingNodeMetrics {
    pub min_slack: f64,
    pub p5_slack: f64,
    pub max_arrival_time: f64,
    pub min_required_time: f64,
    pub critical_node_ratio: f64,
    pub near_critical_ratio: f64,
    pub timing_risk_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingEdgeMetrics {
    pub max_delay: f64,
    pub p95_delay: f64,
    pub flow_type_histogram: BTreeMap<String, usize>,
    pub fanout_max: Option<f64>,
    pub fanout_p95: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertSeverity {
    Error,
    Warn,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub entity_ref: String,
    pub entity_type: String,
    pub severity: AlertSeverity,
    pub reason: String,
    pub metrics_snapshot: BTreeMap<String, serde_json::Value>,
}

/// Graph-wide timing digest. Lives outside the super-graph entirely — never
/// attached under an `AnalysisKind` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingSummary {
    pub worst_slack: f64,
    pub violation_count: usize,
    pub near_critical_count: usize,
    pub clock_period: f64,
}
