//! `Preset`: the single knob most pipeline invocations need. Scaled down
//! from the teacher's `Fast`/`Balanced`/`Thorough`/`Custom` idiom to this
//! system's own view-and-thoroughness tradeoff.

use super::view_context::ViewContext;
use crate::features::analysis_aggregator::domain::TimingThresholds;
use crate::features::view_builder::domain::supergraph::{ExecutionContext, GraphView};
use crate::shared::models::{DkgError, DkgResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preset {
    /// Structural view only, default thresholds. Fast turnaround while RTL
    /// is still in flux.
    Quick,
    /// Structural and Connectivity views, default thresholds. The default.
    Standard,
    /// All three views, a wider near-critical band so a borderline path
    /// still raises a warning instead of passing silently.
    Signoff,
}

impl Default for Preset {
    fn default() -> Self {
        Self::Standard
    }
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quick => "quick",
            Self::Standard => "standard",
            Self::Signoff => "signoff",
        }
    }

    pub fn view_contexts(&self) -> Vec<ViewContext> {
        match self {
            Self::Quick => vec![ViewContext::new(GraphView::Structural, ExecutionContext::Design)],
            Self::Standard => vec![
                ViewContext::new(GraphView::Structural, ExecutionContext::Design),
                ViewContext::new(GraphView::Connectivity, ExecutionContext::Design),
            ],
            Self::Signoff => vec![
                ViewContext::new(GraphView::Structural, ExecutionContext::Design),
                ViewContext::new(GraphView::Connectivity, ExecutionContext::Design),
                ViewContext::new(GraphView::Physical, ExecutionContext::Design),
            ],
        }
    }

    pub fn analysis_thresholds(&self) -> TimingThresholds {
        match self {
            Self::Signoff => TimingThresholds { near_critical_alpha: 0.2, warn_threshold: 0.8, ..TimingThresholds::default() },
            _ => TimingThresholds::default(),
        }
    }
}

impl std::str::FromStr for Preset {
    type Err = DkgError;

    fn from_str(s: &str) -> DkgResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quick" => Ok(Self::Quick),
            "standard" => Ok(Self::Standard),
            "signoff" => Ok(Self::Signoff),
            other => Err(DkgError::config(format!("unknown preset: {other}"))),
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_preset_is_standard() {
        assert_eq!(Preset::default(), Preset::Standard);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("SIGNOFF".parse::<Preset>().unwrap(), Preset::Signoff);
    }

    #[test]
    fn unknown_preset_is_a_config_error() {
        assert!("nonsense".parse::<Preset>().is_err());
    }

    #[test]
    fn quick_builds_only_the_structural_view() {
        assert_eq!(Preset::Quick.view_contexts().len(), 1);
    }

    #[test]
    fn signoff_widens_the_near_critical_band() {
        let t = Preset::Signoff.analysis_thresholds();
        assert!(t.near_critical_alpha > TimingThresholds::default().near_critical_alpha);
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for preset in [Preset::Quick, Preset::Standard, Preset::Signoff] {
            assert_eq!(preset.to_string().parse::<Preset>().unwrap(), preset);
        }
    }
}
