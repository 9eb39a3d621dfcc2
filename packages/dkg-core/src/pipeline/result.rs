//! What a pipeline run hands back: the enriched base graph, one
//! `SuperGraph`/alert-list pair per requested view, the graph-wide timing
//! digest, and the `Version` record a snapshot is stamped with.

use crate::domain::version::Version;
use crate::features::analysis_aggregator::domain::{Alert, TimingSummary};
use crate::features::view_builder::domain::SuperGraph;
use crate::shared::models::DesignGraph;
use std::collections::BTreeMap;

pub struct ViewOutput {
    pub supergraph: SuperGraph,
    pub alerts: Vec<Alert>,
}

pub struct PipelineResult {
    pub graph: DesignGraph,
    pub version: Version,
    /// Keyed by `"{view}:{context}"`, one entry per `ViewContext` the
    /// run's config requested.
    pub views: BTreeMap<String, ViewOutput>,
    pub summary: TimingSummary,
}
