//! Parsed timing path shapes. One node/edge can appear in many paths (a
//! setup path and a hold path, several clock domains) — the parser keeps
//! every path; it's `apply.rs` that reduces them onto the graph.

#[derive(Debug, Clone, PartialEq)]
pub struct TimingStage {
    pub point: String,
    pub incr_delay: f64,
    pub cumulative_delay: f64,
    pub transition: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimingPath {
    pub startpoint: String,
    pub endpoint: String,
    pub clock: String,
    pub path_type: String,
    pub slack: Option<f64>,
    pub arrival_time: Option<f64>,
    pub required_time: Option<f64>,
    pub stages: Vec<TimingStage>,
}

impl TimingPath {
    pub fn new() -> Self {
        Self {
            startpoint: String::new(),
            endpoint: String::new(),
            clock: String::new(),
            path_type: "Setup".to_string(),
            slack: None,
            arrival_time: None,
            required_time: None,
            stages: Vec::new(),
        }
    }
}

impl Default for TimingPath {
    fn default() -> Self {
        Self::new()
    }
}
