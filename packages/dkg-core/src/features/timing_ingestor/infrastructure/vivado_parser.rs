//! Parses Vivado-format static timing analysis reports into `TimingPath`s.
//! Sections are split on lines starting with `Startpoint:` (the `regex`
//! crate has no lookahead, so this is done with a manual scan rather than
//! the lookahead split the grammar would otherwise suggest).

use crate::features::timing_ingestor::domain::{TimingPath, TimingStage};
use regex::Regex;
use std::sync::OnceLock;

fn startpoint_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Startpoint:\s+(\S+)").unwrap())
}
fn endpoint_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Endpoint:\s+(\S+)").unwrap())
}
fn clock_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"clocked by (\w+)").unwrap())
}
fn path_type_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Path Type:\s+(\w+)").unwrap())
}
fn slack_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)slack.*?([-\d.]+)").unwrap())
}
fn arrival_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"data arrival time\s+([\d.]+)").unwrap())
}
fn required_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"data required time\s+([\d.]+)").unwrap())
}
fn table_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\S+(?:\s+\([^)]+\))?)\s+([-\d.]+)\s+([-\d.]+)\s*([rf])?\s*$").unwrap())
}
fn cell_type_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*\([^)]+\)").unwrap())
}

/// Parses `content`. Only the Vivado format (sections introduced by
/// `Startpoint:`) is supported; a PrimeTime-format report produces no
/// paths, matching the Vivado-only scope of this ingester.
pub fn parse_file(content: &str) -> Vec<TimingPath> {
    if !content.contains("Startpoint:") {
        return Vec::new();
    }
    let sections = split_sections(content);
    sections.iter().filter_map(|s| parse_single_path(s)).collect()
}

fn split_sections(content: &str) -> Vec<String> {
    let lines: Vec<&str> = content.lines().collect();
    let mut starts = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if line.trim_start().starts_with("Startpoint:") {
            starts.push(i);
        }
    }
    let mut sections = Vec::new();
    for (idx, &start) in starts.iter().enumerate() {
        let end = starts.get(idx + 1).copied().unwrap_or(lines.len());
        sections.push(lines[start..end].join("\n"));
    }
    sections
}

fn parse_single_path(section: &str) -> Option<TimingPath> {
    let mut path = TimingPath::new();

    path.startpoint = startpoint_re().captures(section)?.get(1)?.as_str().to_string();
    if let Some(c) = endpoint_re().captures(section) {
        path.endpoint = c.get(1)?.as_str().to_string();
    }
    if let Some(c) = clock_re().captures(section) {
        path.clock = c.get(1)?.as_str().to_string();
    }
    if let Some(c) = path_type_re().captures(section) {
        path.path_type = c.get(1)?.as_str().to_string();
    }
    if let Some(c) = slack_re().captures(section) {
        path.slack = c.get(1).and_then(|m| m.as_str().parse().ok());
    }
    if let Some(c) = arrival_re().captures(section) {
        path.arrival_time = c.get(1).and_then(|m| m.as_str().parse().ok());
    }
    if let Some(c) = required_re().captures(section) {
        path.required_time = c.get(1).and_then(|m| m.as_str().parse().ok());
    }

    path.stages = parse_timing_table(section);
    Some(path)
}

/// Finds the `Point  Incr  Path` header, skips its dash separator, and
/// collects rows until `data arrival time` (exclusive) or a blank line.
fn parse_timing_table(section: &str) -> Vec<TimingStage> {
    let lines: Vec<&str> = section.lines().collect();
    let mut header_idx = None;
    for (i, line) in lines.iter().enumerate() {
        if line.contains("Point") && line.contains("Incr") && line.contains("Path") {
            header_idx = Some(i);
            break;
        }
    }
    let Some(header_idx) = header_idx else {
        return Vec::new();
    };
    let mut start = header_idx + 1;
    if lines.get(start).map(|l| l.trim_start().starts_with('-')).unwrap_or(false) {
        start += 1;
    }

    let mut stages = Vec::new();
    for line in &lines[start..] {
        if line.contains("data arrival time") {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('-') {
            continue;
        }
        if let Some(stage) = parse_timing_line(trimmed) {
            stages.push(stage);
        }
    }
    stages
}

fn parse_timing_line(line: &str) -> Option<TimingStage> {
    let caps = table_line_re().captures(line)?;
    let raw_point = caps.get(1)?.as_str();
    let point = cell_type_suffix_re().replace_all(raw_point, "").trim().to_string();
    let incr_delay = caps.get(2)?.as_str().parse().ok()?;
    let cumulative_delay = caps.get(3)?.as_str().parse().ok()?;
    let transition = caps.get(4).map(|m| m.as_str().to_string()).unwrap_or_default();
    Some(TimingStage { point, incr_delay, cumulative_delay, transition })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_REPORT: &str = r#"
Startpoint: cpu/pc_reg[0] (rising edge-triggered flip-flop clocked by sys_clk)
Endpoint: cpu/ir_reg (rising edge-triggered flip-flop clocked by sys_clk)
Path Type: Setup (Max at Slow Process Corner)

Point                                    Incr       Path
--------------------------------------------------------
cpu/pc_reg[0]/Q (DFFQX1)                 0.15       0.65 r
cpu/decode_inst/U123/Y (AND2X1)          0.08       0.73 r
cpu/ir_reg/D (DFFQX1)                    0.00       0.73 r
  data arrival time                                 0.73

  data required time                                10.10
slack (MET)                                         9.37
"#;

    #[test]
    fn parses_startpoint_endpoint_clock_and_path_type() {
        let paths = parse_file(SAMPLE_REPORT);
        assert_eq!(paths.len(), 1);
        let p = &paths[0];
        assert_eq!(p.startpoint, "cpu/pc_reg[0]");
        assert_eq!(p.endpoint, "cpu/ir_reg");
        assert_eq!(p.clock, "sys_clk");
        assert_eq!(p.path_type, "Setup");
    }

    #[test]
    fn parses_slack_arrival_and_required() {
        let paths = parse_file(SAMPLE_REPORT);
        let p = &paths[0];
        assert_eq!(p.slack, Some(9.37));
        assert_eq!(p.arrival_time, Some(0.73));
        assert_eq!(p.required_time, Some(10.10));
    }

    #[test]
    fn parses_stage_table_stripping_cell_type() {
        let paths = parse_file(SAMPLE_REPORT);
        let stages = &paths[0].stages;
        assert_eq!(stages.len(), 3);
        assert_eq!(stages[0].point, "cpu/pc_reg[0]/Q");
        assert_eq!(stages[0].incr_delay, 0.15);
        assert_eq!(stages[1].cumulative_delay, 0.73);
    }

    #[test]
    fn non_vivado_report_yields_no_paths() {
        assert!(parse_file("some PrimeTime-style report with no Startpoint marker").is_empty());
    }

    #[test]
    fn multiple_sections_produce_multiple_paths() {
        let doubled = format!("{SAMPLE_REPORT}\n{SAMPLE_REPORT}");
        let paths = parse_file(&doubled);
        assert_eq!(paths.len(), 2);
    }
}
