//! Pairs a `GraphView` with its `ExecutionContext`, and the policy-version
//! tag threaded into a build's `Version` record.

use crate::features::view_builder::domain::supergraph::{ExecutionContext, GraphView};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewContext {
    pub view: GraphView,
    pub context: ExecutionContext,
}

impl ViewContext {
    pub fn new(view: GraphView, context: ExecutionContext) -> Self {
        Self { view, context }
    }
}

/// The policy version tag recorded under `Version.policy_versions` for a
/// view that was built. The view builder signs super-ids with its own
/// internal constant; this is the audit trail a downstream consumer reads
/// to know which policy table actually produced a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyVersion(pub String);

impl Default for PolicyVersion {
    fn default() -> Self {
        Self("v1".to_string())
    }
}

impl std::fmt::Display for PolicyVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_version_matches_the_view_builder_constant() {
        assert_eq!(PolicyVersion::default().0, "v1");
    }

    #[test]
    fn view_context_pairs_view_and_execution_context() {
        let vc = ViewContext::new(GraphView::Physical, ExecutionContext::Simulation);
        assert_eq!(vc.view, GraphView::Physical);
        assert_eq!(vc.context, ExecutionContext::Simulation);
    }
}
