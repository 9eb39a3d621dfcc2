//! Root configuration surface: which view(s) a pipeline run builds, under
//! what analysis thresholds, tagged with a policy version. Scaled down from
//! the teacher's multi-tier preset/override/YAML system to this crate's
//! actual knob count — a handful of fields, one `Preset` enum, no patch
//! layer.

mod preset;
mod view_context;

pub use preset::Preset;
pub use view_context::{PolicyVersion, ViewContext};

pub use crate::features::analysis_aggregator::domain::TimingThresholds as AnalysisThresholds;

/// Everything a pipeline run needs besides the input files themselves:
/// which views to build and the thresholds/tag to build them with.
#[derive(Debug, Clone, PartialEq)]
pub struct DkgConfig {
    pub views: Vec<ViewContext>,
    pub thresholds: AnalysisThresholds,
    pub policy_version: PolicyVersion,
}

impl DkgConfig {
    pub fn from_preset(preset: Preset) -> Self {
        Self { views: preset.view_contexts(), thresholds: preset.analysis_thresholds(), policy_version: PolicyVersion::default() }
    }
}

impl Default for DkgConfig {
    fn default() -> Self {
        Self::from_preset(Preset::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::view_builder::domain::supergraph::GraphView;

    #[test]
    fn default_config_builds_structural_and_connectivity() {
        let cfg = DkgConfig::default();
        let views: Vec<GraphView> = cfg.views.iter().map(|vc| vc.view).collect();
        assert_eq!(views, vec![GraphView::Structural, GraphView::Connectivity]);
    }

    #[test]
    fn signoff_preset_carries_wider_thresholds_into_the_config() {
        let cfg = DkgConfig::from_preset(Preset::Signoff);
        assert_eq!(cfg.thresholds.near_critical_alpha, 0.2);
        assert_eq!(cfg.views.len(), 3);
    }
}
