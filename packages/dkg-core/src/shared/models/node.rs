//! The `Node` entity and its closed vocabulary of entity classes.

use super::field_source::EntityMetadata;
use super::provenance::Provenance;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type NodeId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityClass {
    ModuleInstance,
    RtlBlock,
    Fsm,
    FlipFlop,
    Lut,
    Mux,
    Dsp,
    Bram,
    IoPort,
    PackagePin,
    Pblock,
    BoardConnector,
}

impl EntityClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ModuleInstance => "ModuleInstance",
            Self::RtlBlock => "RTLBlock",
            Self::Fsm => "FSM",
            Self::FlipFlop => "FlipFlop",
            Self::Lut => "LUT",
            Self::Mux => "MUX",
            Self::Dsp => "DSP",
            Self::Bram => "BRAM",
            Self::IoPort => "IOPort",
            Self::PackagePin => "PackagePin",
            Self::Pblock => "Pblock",
            Self::BoardConnector => "BoardConnector",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub node_id: NodeId,
    pub entity_class: EntityClass,
    pub hier_path: String,
    pub local_name: String,
    pub canonical_name: String,
    pub display_name: String,
    pub module_type: Option<String>,
    pub bit_width: Option<u32>,
    pub clock_domain: Option<String>,
    pub is_clock: bool,
    pub is_reset: bool,
    pub is_active_low_reset: bool,
    pub slack: Option<f64>,
    pub arrival_time: Option<f64>,
    pub required_time: Option<f64>,
    pub attributes: BTreeMap<String, serde_json::Value>,
    /// Incoming/outgoing edge ids, kept in sync by `DesignGraph::reindex_adjacency`
    /// whenever edges are inserted, removed, or reassigned new ids.
    pub in_edges: Vec<String>,
    pub out_edges: Vec<String>,
    pub provenance: Provenance,
    #[serde(skip)]
    pub metadata: EntityMetadata,
}

impl Node {
    pub fn new(node_id: NodeId, entity_class: EntityClass, hier_path: String, local_name: String) -> Self {
        let canonical_name = make_node_canonical_name(entity_class, &hier_path, &local_name);
        let display_name = make_node_display_name(entity_class, &local_name);
        Self {
            node_id,
            entity_class,
            hier_path,
            local_name,
            canonical_name,
            display_name,
            module_type: None,
            bit_width: None,
            clock_domain: None,
            is_clock: false,
            is_reset: false,
            is_active_low_reset: false,
            slack: None,
            arrival_time: None,
            required_time: None,
            attributes: BTreeMap::new(),
            in_edges: Vec::new(),
            out_edges: Vec::new(),
            provenance: Provenance::new(),
            metadata: EntityMetadata::new(),
        }
    }

    pub fn refresh_names(&mut self) {
        self.canonical_name = make_node_canonical_name(self.entity_class, &self.hier_path, &self.local_name);
        self.display_name = make_node_display_name(self.entity_class, &self.local_name);
    }
}

/// Stable, derived debug label. Not part of identity — recomputed whenever
/// `hier_path`/`local_name` change, never stored as its own source of truth.
/// Suffix scheme mirrors the original implementation's
/// `make_node_canonical_name` (flip-flops get `reg_<name>`, LUTs collapse to
/// `comb`, BRAM/DSP collapse to their class name, ports keep their name).
pub fn make_node_canonical_name(entity_class: EntityClass, hier_path: &str, local_name: &str) -> String {
    let suffix = match entity_class {
        EntityClass::FlipFlop => format!("reg_{local_name}"),
        EntityClass::Mux => "mux".to_string(),
        EntityClass::Lut => "comb".to_string(),
        EntityClass::Bram => "bram".to_string(),
        EntityClass::Dsp => "dsp".to_string(),
        EntityClass::IoPort => format!("port_{local_name}"),
        _ if !local_name.is_empty() => local_name.to_string(),
        _ => entity_class.as_str().to_ascii_lowercase(),
    };
    if hier_path.is_empty() {
        suffix
    } else {
        format!("{hier_path}.{suffix}")
    }
}

pub fn make_node_display_name(entity_class: EntityClass, local_name: &str) -> String {
    match entity_class {
        EntityClass::FlipFlop => format!("Reg {local_name}"),
        EntityClass::Bram => "BRAM".to_string(),
        EntityClass::Mux => "MUX".to_string(),
        EntityClass::Lut => "Logic".to_string(),
        EntityClass::Dsp => "DSP".to_string(),
        EntityClass::IoPort => format!("Port {local_name}"),
        _ if !local_name.is_empty() => local_name.to_string(),
        _ => entity_class.as_str().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_includes_hier_path_and_suffix() {
        let name = make_node_canonical_name(EntityClass::FlipFlop, "top/sub", "ff0");
        assert_eq!(name, "top/sub.reg_ff0");
    }

    #[test]
    fn canonical_name_without_hier_path() {
        let name = make_node_canonical_name(EntityClass::IoPort, "", "clk");
        assert_eq!(name, "port_clk");
    }

    #[test]
    fn refresh_names_updates_after_rename() {
        let mut node = Node::new("N_rtl_abc".into(), EntityClass::RtlBlock, "top".into(), "g0".into());
        node.local_name = "g1".into();
        node.refresh_names();
        assert!(node.canonical_name.ends_with("g1"));
    }
}
