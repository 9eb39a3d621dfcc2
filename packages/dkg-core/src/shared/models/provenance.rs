//! Provenance: where an entity came from, as a append-only record list.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolStage {
    Rtl,
    Synth,
    Timing,
    Constraint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Confidence {
    Exact,
    Inferred,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceRecord {
    pub origin_file: Option<String>,
    pub origin_line: Option<u32>,
    pub tool_stage: ToolStage,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub records: Vec<ProvenanceRecord>,
    pub primary: Option<ProvenanceRecord>,
}

impl Provenance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ProvenanceRecord) {
        self.records.push(record);
        self.recompute_primary();
    }

    /// The merge rule: the primary record's `origin_file` is the first
    /// non-empty file observed (in append order), `origin_line` is the
    /// minimum observed line, and `tool_stage`/`confidence` are fixed at
    /// `Rtl`/`Inferred` regardless of what any individual record says.
    fn recompute_primary(&mut self) {
        let origin_file = self
            .records
            .iter()
            .find_map(|r| r.origin_file.clone().filter(|f| !f.is_empty()));
        let origin_line = self.records.iter().filter_map(|r| r.origin_line).min();
        self.primary = Some(ProvenanceRecord {
            origin_file,
            origin_line,
            tool_stage: ToolStage::Rtl,
            confidence: Confidence::Inferred,
        });
    }
}

/// Merge two provenance lists (e.g. when coalescing bit-edges into a bus
/// edge), following the same merge rule as a single append.
pub fn merge_provenances(lists: impl IntoIterator<Item = Provenance>) -> Provenance {
    let mut merged = Provenance::new();
    for p in lists {
        merged.records.extend(p.records);
    }
    merged.recompute_primary();
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(file: Option<&str>, line: Option<u32>) -> ProvenanceRecord {
        ProvenanceRecord {
            origin_file: file.map(String::from),
            origin_line: line,
            tool_stage: ToolStage::Synth,
            confidence: Confidence::Exact,
        }
    }

    #[test]
    fn primary_takes_first_nonempty_file_and_min_line() {
        let mut prov = Provenance::new();
        prov.push(rec(None, Some(10)));
        prov.push(rec(Some("top.v"), Some(3)));
        prov.push(rec(Some("sub.v"), Some(7)));
        let primary = prov.primary.unwrap();
        assert_eq!(primary.origin_file.as_deref(), Some("top.v"));
        assert_eq!(primary.origin_line, Some(3));
        assert_eq!(primary.tool_stage, ToolStage::Rtl);
        assert_eq!(primary.confidence, Confidence::Inferred);
    }

    #[test]
    fn empty_strings_do_not_count_as_nonempty() {
        let mut prov = Provenance::new();
        prov.push(rec(Some(""), Some(1)));
        prov.push(rec(Some("top.v"), Some(2)));
        assert_eq!(prov.primary.unwrap().origin_file.as_deref(), Some("top.v"));
    }
}
