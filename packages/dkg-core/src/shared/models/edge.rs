//! The `Edge` entity: a signal relation between two nodes.

use super::field_source::EntityMetadata;
use super::provenance::Provenance;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type EdgeId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RelationType {
    Data,
    Clock,
    Reset,
    Parameter,
    Constraint,
    PhysicalMap,
}

impl RelationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Data => "DataRelation",
            Self::Clock => "ClockRelation",
            Self::Reset => "ResetRelation",
            Self::Parameter => "ParameterRelation",
            Self::Constraint => "ConstraintRelation",
            Self::PhysicalMap => "PhysicalMappingRelation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EdgeFlowType {
    Combinational,
    SeqLaunch,
    SeqCapture,
    ClockTree,
    AsyncReset,
}

impl EdgeFlowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Combinational => "Combinational",
            Self::SeqLaunch => "SeqLaunch",
            Self::SeqCapture => "SeqCapture",
            Self::ClockTree => "ClockTree",
            Self::AsyncReset => "AsyncReset",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub edge_id: EdgeId,
    pub src: String,
    pub dst: String,
    pub relation_type: RelationType,
    pub flow_type: EdgeFlowType,
    pub canonical_name: String,
    pub display_name: String,
    pub base_signal: String,
    pub bit_index: Option<u32>,
    pub bit_range: Option<(u32, u32)>,
    pub clock_domain_id: Option<String>,
    pub clock_signal: Option<String>,
    pub timing_exception: Option<String>,
    pub delay: Option<f64>,
    pub arrival_time: Option<f64>,
    pub required_time: Option<f64>,
    pub slack: Option<f64>,
    pub attributes: BTreeMap<String, serde_json::Value>,
    pub provenance: Provenance,
    #[serde(skip)]
    pub metadata: EntityMetadata,
}

impl Edge {
    pub fn new(
        edge_id: EdgeId,
        src: String,
        dst: String,
        relation_type: RelationType,
        flow_type: EdgeFlowType,
        base_signal: String,
        bit_index: Option<u32>,
    ) -> Self {
        let canonical_name = make_edge_canonical_name(&src, &dst, relation_type, &base_signal, bit_index);
        let display_name = make_edge_display_name(relation_type, &base_signal, bit_index);
        Self {
            edge_id,
            src,
            dst,
            relation_type,
            flow_type,
            canonical_name,
            display_name,
            base_signal,
            bit_index,
            bit_range: None,
            clock_domain_id: None,
            clock_signal: None,
            timing_exception: None,
            delay: None,
            arrival_time: None,
            required_time: None,
            slack: None,
            attributes: BTreeMap::new(),
            provenance: Provenance::new(),
            metadata: EntityMetadata::new(),
        }
    }
}

pub fn make_edge_canonical_name(
    src: &str,
    dst: &str,
    relation_type: RelationType,
    base_signal: &str,
    bit_index: Option<u32>,
) -> String {
    match bit_index {
        Some(b) => format!("{src}->{dst}${}:{base_signal}[{b}]", relation_type.as_str()),
        None => format!("{src}->{dst}${}:{base_signal}", relation_type.as_str()),
    }
}

pub fn make_edge_display_name(relation_type: RelationType, base_signal: &str, bit_index: Option<u32>) -> String {
    match bit_index {
        Some(b) => format!("{}:{}[{}]", relation_type.as_str(), base_signal, b),
        None => format!("{}:{}", relation_type.as_str(), base_signal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_includes_bit_index() {
        let name = make_edge_canonical_name("N_a", "N_b", RelationType::Data, "bus", Some(3));
        assert_eq!(name, "N_a->N_b$DataRelation:bus[3]");
    }

    #[test]
    fn canonical_name_without_bit_index() {
        let name = make_edge_canonical_name("N_a", "N_b", RelationType::Clock, "clk", None);
        assert_eq!(name, "N_a->N_b$ClockRelation:clk");
    }
}
