//! Netlist IR -> `DesignGraph`: cell node construction, wire-routed
//! driver/load edges, bus coalescing, adjacency reindexing, clock/reset
//! classification, and edge flow/domain assignment, end to end.
//!
//! Wires are never graph nodes — a wire only routes a cell output to the
//! cell inputs it fans out to, exactly as the literal netlist-normalizer
//! algorithm treats it: `connect_wires_to_cells` records drivers/loads per
//! wire, and `build_nodes_and_edges` emits one edge per (driver, load) pair
//! on that wire.

use super::bus_coalesce::merge_bit_edges_to_bus;
use super::cell_classification::map_cell_type;
use super::clock_reset::detect_clock_reset_signals;
use super::edge_flow::{assign_clock_domains, assign_edge_flow_types};
use super::ir::{Bit, Cell, Direction, NetlistDocument};
use crate::features::identity::ids::{make_edge_id, make_node_id, SignatureBuilder};
use crate::shared::models::{
    Confidence, DesignGraph, DkgResult, Edge, EdgeFlowType, EntityClass, Node, ProvenanceRecord, RelationType,
    ToolStage,
};
use crate::shared::utils::split_signal_bit;
use std::collections::BTreeMap;

/// One per-module net: which bit of which net drives which cell-node ids,
/// and which cell-node ids load it. Built once per module so edge
/// construction is a direct lookup instead of a rescan of every cell.
#[derive(Default)]
struct WireFanout {
    drivers: Vec<String>,
    loads: Vec<String>,
}

fn bit_key(bit: &Bit) -> Option<String> {
    match bit {
        Bit::Index(i) => Some(format!("#{i}")),
        Bit::Const(_) => None,
    }
}

/// `(module_name, bit_key) -> (net_name, bit_position, fanout)`.
struct ModuleWires {
    // bit_key -> (net_name, position)
    net_of_bit: BTreeMap<String, (String, usize)>,
    fanout: BTreeMap<String, WireFanout>,
}

impl ModuleWires {
    fn build(module: &super::ir::Module) -> Self {
        let mut net_of_bit = BTreeMap::new();
        let mut fanout = BTreeMap::new();
        for (name, netname) in &module.netnames {
            fanout.insert(name.clone(), WireFanout::default());
            for (pos, bit) in netname.bits.iter().enumerate() {
                if let Some(key) = bit_key(bit) {
                    net_of_bit.entry(key).or_insert_with(|| (name.clone(), pos));
                }
            }
        }
        Self { net_of_bit, fanout }
    }

    fn resolve(&self, bit: &Bit) -> Option<(&str, usize)> {
        bit_key(bit).and_then(|key| self.net_of_bit.get(&key)).map(|(n, p)| (n.as_str(), *p))
    }
}

pub fn build_nodes_and_edges(doc: &NetlistDocument) -> DkgResult<DesignGraph> {
    let mut graph = DesignGraph::new();

    for (module_name, module) in &doc.modules {
        let cell_ids = build_cell_nodes(&mut graph, module_name, module);
        let mut wires = ModuleWires::build(module);
        connect_wires_to_cells(module, &cell_ids, &mut wires);
        build_wire_edges(&mut graph, module_name, module, &wires);
    }

    let coalesced = merge_bit_edges_to_bus(graph.edges.into_values().collect());
    graph.edges = coalesced
        .into_iter()
        .map(|mut e| {
            let signal_sig = match e.bit_range {
                Some((msb, lsb)) => format!("{}[{msb}:{lsb}]", e.base_signal),
                None => match e.bit_index {
                    Some(b) => format!("{}[{b}]", e.base_signal),
                    None => e.base_signal.clone(),
                },
            };
            let signature = SignatureBuilder::new()
                .field(&e.src)
                .field(&e.dst)
                .field(e.relation_type.as_str())
                .field(format!("{:?}", e.flow_type))
                .field(signal_sig)
                .signature();
            e.edge_id = make_edge_id(e.relation_type.as_str(), &signature);
            (e.edge_id.clone(), e)
        })
        .collect();

    graph.reindex_adjacency();

    let all_net_names: Vec<String> =
        doc.modules.values().flat_map(|m| m.netnames.keys().cloned()).collect();
    let mut cell_refs: Vec<(&str, &Cell)> = Vec::new();
    for module in doc.modules.values() {
        for (id, cell) in &module.cells {
            cell_refs.push((id.as_str(), cell));
        }
    }
    let mut module_bit_index: BTreeMap<&str, ModuleWires> = BTreeMap::new();
    for (name, module) in &doc.modules {
        module_bit_index.insert(name.as_str(), ModuleWires::build(module));
    }
    let cell_to_module: BTreeMap<&str, &str> = doc
        .modules
        .iter()
        .flat_map(|(mname, m)| m.cells.keys().map(move |cid| (cid.as_str(), mname.as_str())))
        .collect();

    let signals = detect_clock_reset_signals(&cell_refs, &all_net_names, |cell_id, port| {
        let module_name = cell_to_module.get(cell_id)?;
        let module = doc.modules.get(*module_name)?;
        let cell = module.cells.get(cell_id)?;
        let bits = cell.connections.get(port)?;
        let bit = bits.first()?;
        let index = module_bit_index.get(*module_name)?;
        index.resolve(bit).map(|(net, _)| net.to_string())
    });

    assign_clock_domains(&mut graph, &signals.clocks);
    assign_edge_flow_types(&mut graph, &signals.clocks, &signals.resets);

    // `is_clock`/`is_reset`/`is_active_low_reset` describe a node that *is*
    // a clock/reset source (an IOPort pin, say) — this purely cell-based
    // ingest never manufactures such nodes, so nothing to flag here. A flip
    // flop driven by a recognized active-low reset net is marked instead,
    // since that's observable from its in-edges.
    let ff_ids: Vec<String> = graph
        .nodes
        .iter()
        .filter(|(_, n)| n.entity_class == EntityClass::FlipFlop)
        .map(|(id, _)| id.clone())
        .collect();
    for ff_id in ff_ids {
        let is_active_low = graph.nodes[&ff_id]
            .in_edges
            .iter()
            .filter_map(|eid| graph.edges.get(eid))
            .any(|e| signals.active_low_resets.contains(&e.base_signal));
        if is_active_low {
            graph.nodes.get_mut(&ff_id).unwrap().is_active_low_reset = true;
        }
    }

    Ok(graph)
}

fn build_cell_nodes(graph: &mut DesignGraph, module_name: &str, module: &super::ir::Module) -> BTreeMap<String, String> {
    let mut ids = BTreeMap::new();
    for (name, cell) in &module.cells {
        let entity_class = map_cell_type(&cell.type_);
        let ports: Vec<String> = cell
            .connections
            .iter()
            .map(|(p, bits)| {
                let dir = cell.port_directions.get(p).copied().unwrap_or(Direction::Input);
                format!("{p}:{dir:?}:{}", bits.len())
            })
            .collect();
        let mut sorted_ports = ports;
        sorted_ports.sort();
        let signature = SignatureBuilder::new()
            .field(&cell.type_)
            .field(module_name)
            .field(sorted_ports.join(","))
            .signature();
        let node_id = make_node_id(entity_class.as_str(), &signature);
        let mut node = Node::new(node_id.clone(), entity_class, module_name.to_string(), name.clone());
        node.module_type = Some(cell.type_.clone());
        if let Some(src) = &cell.src {
            let (file, line) = crate::shared::utils::parse_src(src);
            node.provenance.push(ProvenanceRecord {
                origin_file: file,
                origin_line: line,
                tool_stage: ToolStage::Rtl,
                confidence: Confidence::Exact,
            });
        }
        graph.insert_node(node);
        ids.insert(name.clone(), node_id);
    }
    ids
}

/// Per wire (by net name), records which cell-node ids drive it and which
/// load it, resolved bit by bit. `Bit::Const` bits never resolve to a net
/// and are skipped — a constant has no driving cell to connect.
fn connect_wires_to_cells(module: &super::ir::Module, cell_ids: &BTreeMap<String, String>, wires: &mut ModuleWires) {
    for (cell_name, cell) in &module.cells {
        let Some(cell_node_id) = cell_ids.get(cell_name) else { continue };
        for (port, bits) in &cell.connections {
            let direction = cell.port_directions.get(port).copied().unwrap_or(Direction::Input);
            for bit in bits {
                let Some((net_name, _)) = wires.resolve(bit) else { continue };
                let net_name = net_name.to_string();
                let Some(fanout) = wires.fanout.get_mut(&net_name) else { continue };
                match direction {
                    Direction::Output => fanout.drivers.push(cell_node_id.clone()),
                    Direction::Input | Direction::Inout => fanout.loads.push(cell_node_id.clone()),
                }
            }
        }
    }
}

/// Emits one `Data`/`Combinational` edge per (driver, load) pair on every
/// wire. The flow type is provisional — `assign_edge_flow_types` retags it
/// once clock/reset nets are known. A wire with no driver or no load (a
/// primary input/output, or a dangling net) produces no edges.
fn build_wire_edges(graph: &mut DesignGraph, module_name: &str, module: &super::ir::Module, wires: &ModuleWires) {
    let mut seq = 0u64;
    for (net_name, fanout) in &wires.fanout {
        let Some(netname) = module.netnames.get(net_name) else { continue };
        let (base_signal, bit_idx) = split_signal_bit(net_name);
        let bit_idx = if netname.bits.len() > 1 { bit_idx } else { None };
        for src in &fanout.drivers {
            for dst in &fanout.loads {
                let edge_id = format!("E_tmp_{module_name}_{seq}");
                seq += 1;
                let mut edge = Edge::new(
                    edge_id,
                    src.clone(),
                    dst.clone(),
                    RelationType::Data,
                    EdgeFlowType::Combinational,
                    base_signal.clone(),
                    bit_idx,
                );
                if let Some(src_loc) = &netname.src {
                    let (file, line) = crate::shared::utils::parse_src(src_loc);
                    edge.provenance.push(ProvenanceRecord {
                        origin_file: file,
                        origin_line: line,
                        tool_stage: ToolStage::Rtl,
                        confidence: Confidence::Exact,
                    });
                }
                graph.insert_edge(edge);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::ir::{Bit, Module, Netname};

    fn simple_doc() -> NetlistDocument {
        let mut module = Module::default();
        module.netnames.insert("clk".to_string(), Netname { bits: vec![Bit::Index(1)], src: None });
        module.netnames.insert("d".to_string(), Netname { bits: vec![Bit::Index(2)], src: None });
        module.netnames.insert("q".to_string(), Netname { bits: vec![Bit::Index(3)], src: None });
        let mut connections = BTreeMap::new();
        connections.insert("CLK".to_string(), vec![Bit::Index(1)]);
        connections.insert("D".to_string(), vec![Bit::Index(2)]);
        connections.insert("Q".to_string(), vec![Bit::Index(3)]);
        let mut port_directions = BTreeMap::new();
        port_directions.insert("CLK".to_string(), Direction::Input);
        port_directions.insert("D".to_string(), Direction::Input);
        port_directions.insert("Q".to_string(), Direction::Output);
        module.cells.insert(
            "ff0".to_string(),
            Cell { type_: "$dff".to_string(), port_directions, connections, src: None },
        );
        let mut doc = NetlistDocument::default();
        doc.modules.insert("top".to_string(), module);
        doc
    }

    #[test]
    fn cells_become_nodes_but_wires_do_not() {
        let doc = simple_doc();
        let graph = build_nodes_and_edges(&doc).unwrap();
        assert_eq!(graph.nodes.len(), 1);
        let ff = graph.nodes.values().next().unwrap();
        assert_eq!(ff.entity_class, EntityClass::FlipFlop);
    }

    #[test]
    fn a_wire_with_no_driver_or_load_produces_no_edge() {
        let doc = simple_doc();
        let graph = build_nodes_and_edges(&doc).unwrap();
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn clock_net_flags_the_ff_node_and_domain() {
        let mut doc = simple_doc();
        {
            let module = doc.modules.get_mut("top").unwrap();
            let mut conn = BTreeMap::new();
            conn.insert("Y".to_string(), vec![Bit::Index(1)]);
            let mut dirs = BTreeMap::new();
            dirs.insert("Y".to_string(), Direction::Output);
            module.cells.insert("osc0".to_string(), Cell { type_: "$buf".to_string(), port_directions: dirs, connections: conn, src: None });
        }
        let graph = build_nodes_and_edges(&doc).unwrap();
        let ff = graph.nodes.values().find(|n| n.entity_class == EntityClass::FlipFlop).unwrap();
        assert_eq!(ff.clock_domain.as_deref(), Some("clk"));
        let clk_edge = graph.edges.values().find(|e| e.base_signal == "clk").unwrap();
        assert_eq!(clk_edge.flow_type, EdgeFlowType::ClockTree);
        assert_eq!(clk_edge.relation_type, RelationType::Data);
    }

    #[test]
    fn adjacency_lists_match_the_edge_table() {
        let mut doc = simple_doc();
        {
            let module = doc.modules.get_mut("top").unwrap();
            let mut conn = BTreeMap::new();
            conn.insert("Y".to_string(), vec![Bit::Index(2)]);
            let mut dirs = BTreeMap::new();
            dirs.insert("Y".to_string(), Direction::Output);
            module.cells.insert("drv0".to_string(), Cell { type_: "$buf".to_string(), port_directions: dirs, connections: conn, src: None });
        }
        let graph = build_nodes_and_edges(&doc).unwrap();
        let ff = graph.nodes.values().find(|n| n.entity_class == EntityClass::FlipFlop).unwrap();
        assert_eq!(ff.in_edges.len(), 1);
        let drv = graph.nodes.values().find(|n| n.local_name == "drv0").unwrap();
        assert_eq!(drv.out_edges.len(), 1);
        assert_eq!(drv.out_edges[0], ff.in_edges[0]);
    }
}
