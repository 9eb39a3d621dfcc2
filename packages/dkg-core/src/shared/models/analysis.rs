//! The key space for analysis bundles attached to super-nodes/super-edges.
//!
//! Kept in `shared::models` rather than in `features::analysis_aggregator`
//! so that `view_builder` can carry an `analysis` map on `SuperNode`/
//! `SuperEdge` without depending on the aggregator feature — dependency
//! inversion per §9 "do not add a critical boolean to nodes; derive it from
//! the metrics bundle". Bundles themselves are stored as `serde_json::Value`
//! so the SuperGraph's shape does not know the concrete metrics struct.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AnalysisKind {
    Timing,
}

pub type AnalysisMap = BTreeMap<AnalysisKind, serde_json::Value>;
